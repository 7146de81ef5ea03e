//! Output assembly and file writing for generated code.
//!
//! This module handles the final phase of generation: assembling every
//! emitted item of a unit into one Rust module, validating it with `syn`,
//! formatting it with `prettyplease` and writing it to disk atomically.
//!
//! ## Module Layout
//!
//! ```text
//! // Code generated by jrpc-gen. DO NOT EDIT.
//! //! module docs
//! use jrpc as rt;
//! use serde::{Deserialize, Serialize};
//! use <resolved imports>;
//!
//! <message structs, accessors and Validate impls>
//! <event bindings>
//! <routers>
//! <client stubs>
//! ```
//!
//! ## Guarantees
//!
//! - **All or nothing**: any error aborts the unit before anything is written
//! - **Validation**: the assembled module is parsed with `syn` before formatting
//! - **Atomic writes**: temp file + rename, never a partially written file

use std::fs;
use std::path::Path;

use jrpc_define::CompilationUnit;
use proc_macro2::TokenStream;
use quote::quote;

use crate::codegen::{
    generate_client, generate_event, generate_message, generate_router, generate_validate, ident,
};
use crate::config::GeneratorOptions;
use crate::errors::GeneratorError;
use crate::plan::{UnitPlan, build};

/// Header prepended to every generated file.
pub const GENERATED_HEADER: &str = "// Code generated by jrpc-gen. DO NOT EDIT.";

/// Assembles the module for a planned unit.
///
/// ## Errors
///
/// Returns [`GeneratorError::CodeGenError`] if a rendered type or path does
/// not parse.
pub fn assemble_unit(
    plan: &UnitPlan,
    options: &GeneratorOptions,
) -> Result<TokenStream, GeneratorError> {
    let runtime: syn::Path = syn::parse_str(&options.runtime_crate).map_err(|e| {
        GeneratorError::ConfigError(format!(
            "runtime crate '{}' is not a valid path: {}",
            options.runtime_crate, e
        ))
    })?;

    let doc = format!(" Generated bindings for the `{}` unit.", plan.package);

    let serde_use = (!plan.messages.is_empty()).then(|| {
        quote! { use serde::{Deserialize, Serialize}; }
    });

    let imports = plan
        .imports
        .iter()
        .map(|entry| {
            let path: syn::Path = syn::parse_str(&entry.path).map_err(|e| {
                GeneratorError::CodeGenError(format!("Invalid import path '{}': {}", entry.path, e))
            })?;
            Ok(match &entry.alias {
                Some(alias) => {
                    let alias = ident(alias);
                    quote! { use #path as #alias; }
                }
                None => quote! { use #path; },
            })
        })
        .collect::<Result<Vec<_>, GeneratorError>>()?;

    let mut messages = Vec::with_capacity(plan.messages.len());
    for message in &plan.messages {
        messages.push(generate_message(message)?);
        messages.push(generate_validate(message)?);
    }

    let events: Vec<TokenStream> = if options.emit_events {
        plan.messages
            .iter()
            .filter_map(|message| {
                message
                    .event
                    .as_ref()
                    .map(|event| generate_event(message, event))
            })
            .collect()
    } else {
        Vec::new()
    };

    let routers = if options.emit_router {
        plan.routers
            .iter()
            .map(generate_router)
            .collect::<Result<Vec<_>, _>>()?
    } else {
        Vec::new()
    };

    let clients = if options.emit_client {
        plan.methods()
            .map(|(router, method)| generate_client(router, method))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        Vec::new()
    };

    Ok(quote! {
        #![doc = #doc]
        #![doc = ""]
        #![doc = " Collections cannot tell an omitted value from an empty one: both decode as empty."]

        #[allow(unused_imports)]
        use #runtime as rt;
        #serde_use
        #(#imports)*

        #(#messages)*

        #(#events)*

        #(#routers)*

        #(#clients)*
    })
}

/// Validates generated code by parsing it with syn.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {}", e)))
}

/// Formats generated code with prettyplease and prepends the generated header.
pub fn format_code(file: &syn::File) -> String {
    let formatted = prettyplease::unparse(file);
    format!("{}\n\n{}", GENERATED_HEADER, formatted)
}

/// Writes content to a file atomically using temp file + rename.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if:
/// - Parent directories cannot be created
/// - The temp file cannot be written
/// - The rename operation fails
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("rs.tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GeneratorError::WriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Generates the formatted module for `unit`.
///
/// ## Errors
///
/// Returns the first error found while planning or building the unit. No
/// code is produced for a unit with any error.
///
/// ## Examples
///
/// ```
/// use jrpc_define::{CompilationUnit, Message};
/// use jrpc_gen::config::GeneratorOptions;
/// use jrpc_gen::output::generate_unit;
///
/// let unit = CompilationUnit::new("pingdef").message(Message::new("Ping", vec![]));
/// let code = generate_unit(&unit, &GeneratorOptions::default()).unwrap();
///
/// assert!(code.starts_with("// Code generated by jrpc-gen. DO NOT EDIT."));
/// assert!(code.contains("pub struct Ping"));
/// assert!(code.contains("impl rt::Validate for Ping"));
/// ```
pub fn generate_unit(
    unit: &CompilationUnit,
    options: &GeneratorOptions,
) -> Result<String, GeneratorError> {
    options.validate()?;
    let plan = build(unit)?;
    let tokens = assemble_unit(&plan, options)?;
    let file = validate_code(&tokens)?;
    let code = format_code(&file);

    tracing::info!(
        package = %plan.package,
        messages = plan.messages.len(),
        routers = plan.routers.len(),
        "Generated unit"
    );

    Ok(code)
}

/// Generates `unit` and writes it to `output`.
///
/// In dry-run mode the code is printed to stdout instead of written.
/// Returns the generated code either way.
pub fn generate_and_write(
    unit: &CompilationUnit,
    output: &Path,
    options: &GeneratorOptions,
    dry_run: bool,
) -> Result<String, GeneratorError> {
    let code = generate_unit(unit, options)?;

    if dry_run {
        println!("{}", code);
    } else {
        write_atomic(output, &code)?;
        tracing::info!(path = %output.display(), "Wrote generated module");
    }

    Ok(code)
}

/// Loads a unit from `input` (`.json` or `.toml`) and generates it.
pub fn generate_from_path(
    input: &Path,
    output: &Path,
    options: &GeneratorOptions,
    dry_run: bool,
) -> Result<String, GeneratorError> {
    let unit = CompilationUnit::from_path(input)?;
    tracing::debug!(path = %input.display(), package = %unit.package, "Loaded unit");
    generate_and_write(&unit, output, options, dry_run)
}
