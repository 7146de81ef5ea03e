//! jrpc Code Generator
//!
//! Generates typed messages, routers, client stubs and event bindings from a
//! serialized compilation unit.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use jrpc_gen::config::{DEFAULT_RUNTIME_CRATE, GeneratorOptions};
use jrpc_gen::errors::GeneratorError;
use jrpc_gen::output::generate_from_path;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// jrpc code generator - transforms schema units into typed Rust bindings
#[derive(Parser, Debug)]
#[command(name = "jrpc-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Compilation unit to generate (.json or .toml)
    #[arg(short, long)]
    unit: PathBuf,

    /// Output file for the generated module
    #[arg(short, long, default_value = "src/def.rs")]
    output: PathBuf,

    /// Path generated code uses to reach the runtime crate
    #[arg(long, default_value = DEFAULT_RUNTIME_CRATE)]
    runtime: String,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// Skip router generation
    #[arg(long)]
    no_router: bool,

    /// Skip client stub generation
    #[arg(long)]
    no_client: bool,

    /// Skip event bindings
    #[arg(long)]
    no_events: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,jrpc_gen=info".to_string(),
            2 => "info,jrpc_gen=debug".to_string(),
            _ => "debug,jrpc_gen=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_file(verbose >= 3)
                .with_line_number(verbose >= 3)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn run(cli: &Cli) -> Result<(), GeneratorError> {
    let options = GeneratorOptions {
        runtime_crate: cli.runtime.clone(),
        emit_router: !cli.no_router,
        emit_client: !cli.no_client,
        emit_events: !cli.no_events,
    };

    tracing::info!(
        unit = %cli.unit.display(),
        output = %cli.output.display(),
        dry_run = cli.dry_run,
        "Generating unit"
    );

    generate_from_path(&cli.unit, &cli.output, &options, cli.dry_run)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => {
            if !cli.dry_run {
                eprintln!(
                    "{} {} -> {}",
                    "generated".green().bold(),
                    cli.unit.display(),
                    cli.output.display()
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
