//! The checked-in bindings stay in step with `schema/scene.json`.
//!
//! Set `JRPC_GEN_UPDATE=1` to rewrite `src/def.rs` from the schema.

use std::path::{Path, PathBuf};

use jrpc_define::CompilationUnit;
use jrpc_gen::config::GeneratorOptions;
use jrpc_gen::output::{format_code, generate_unit, write_atomic};

fn manifest_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn checked_in() -> String {
    std::fs::read_to_string(manifest_path("src/def.rs")).unwrap()
}

fn generated() -> String {
    let unit = CompilationUnit::from_path(&manifest_path("schema/scene.json")).unwrap();
    generate_unit(&unit, &GeneratorOptions::default()).unwrap()
}

/// Re-renders a source file the way the generator lays out its output.
fn rendered(source: &str) -> String {
    format_code(&syn::parse_file(source).unwrap())
}

#[test]
fn checked_in_module_matches_the_generator() {
    let generated = generated();
    if std::env::var_os("JRPC_GEN_UPDATE").is_some() {
        write_atomic(&manifest_path("src/def.rs"), &generated).unwrap();
    }

    assert_eq!(
        generated,
        rendered(&checked_in()),
        "src/def.rs is stale; rerun with JRPC_GEN_UPDATE=1"
    );
}

#[test]
fn checked_in_module_carries_generated_header() {
    assert!(checked_in().starts_with(jrpc_gen::output::GENERATED_HEADER));
}

#[test]
fn a_dropped_item_is_detected() {
    let def = checked_in();
    let start = def.rfind("impl ListScenesRequest {").unwrap();
    let trimmed = &def[..start];

    assert_ne!(generated(), rendered(trimmed));
}
