//! End-to-end tests: generate code and verify it compiles.
//!
//! These tests exercise the full pipeline from a serialized unit to
//! compiled code. They are slower than unit tests since they invoke cargo.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use jrpc_define::{CompilationUnit, Field, FieldType, Message, ScalarKind};
use jrpc_gen::config::GeneratorOptions;
use jrpc_gen::output::generate_and_write;

/// Writes a crate at `dir` depending on the workspace runtime by path.
fn write_crate(dir: &Path, lib: &str) {
    let runtime = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .canonicalize()
        .expect("Failed to locate runtime crate");

    let manifest = format!(
        r#"[package]
name = "generated-check"
version = "0.1.0"
edition = "2024"

[dependencies]
jrpc = {{ path = "{}" }}
serde = {{ version = "1.0", features = ["derive"] }}

[workspace]
"#,
        runtime.display()
    );
    std::fs::write(dir.join("Cargo.toml"), manifest).expect("Failed to write Cargo.toml");
    std::fs::write(dir.join("src/lib.rs"), lib).expect("Failed to write lib.rs");
}

/// Runs `cargo <subcommand>` on the crate at `dir`, panicking with its output on failure.
fn cargo(dir: &Path, subcommand: &str) {
    let output = Command::new("cargo")
        .args([subcommand, "--manifest-path"])
        .arg(dir.join("Cargo.toml"))
        .output()
        .expect("Failed to run cargo");

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        panic!(
            "cargo {} failed on generated code:\n\nSTDOUT:\n{}\n\nSTDERR:\n{}",
            subcommand, stdout, stderr
        );
    }
}

/// Tests that the scene bindings compile against the runtime.
///
/// This test:
/// 1. Generates `src/def.rs` from the scene schema into a temp crate
/// 2. Writes a Cargo.toml depending on `jrpc` by path
/// 3. Runs `cargo check` to verify the generated code compiles
#[test]
#[ignore = "slow: compiles generated code"]
fn generated_code_compiles() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let crate_dir = temp_dir.path().join("generated");
    let schema = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../service-scene/schema/scene.json");

    let unit = CompilationUnit::from_path(&schema).expect("Failed to load schema");
    generate_and_write(
        &unit,
        &crate_dir.join("src/def.rs"),
        &GeneratorOptions::default(),
        false,
    )
    .expect("Failed to generate code");
    write_crate(&crate_dir, "pub mod def;\n");

    cargo(&crate_dir, "check");
}

const MAP_VALUES_LIB: &str = r#"pub mod def;

#[cfg(test)]
mod tests {
    use jrpc::Validate;

    use crate::def::{Zone, Zone_Fixture};

    #[test]
    fn map_values_are_validated() {
        let mut zone = Zone::default();
        zone.fixtures.insert("lamp".to_string(), Zone_Fixture::default());
        let err = zone.validate().unwrap_err();
        assert_eq!(err.kind(), jrpc::ErrorKind::BadRequest);

        if let Some(fixture) = zone.fixtures.get_mut("lamp") {
            fixture.set_device_id("d-1");
        }
        assert!(zone.validate().is_ok());
    }
}
"#;

/// Tests that values of a message-valued map are validated at runtime.
#[test]
#[ignore = "slow: compiles and runs generated code"]
fn generated_map_values_are_validated() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let crate_dir = temp_dir.path().join("generated");

    let unit = CompilationUnit::new("zonedef")
        .message(Message::new(
            "Zone",
            vec![Field::new(
                "fixtures",
                FieldType::map(ScalarKind::String, FieldType::message("Zone.Fixture")),
            )],
        ))
        .message(
            Message::new(
                "Fixture",
                vec![Field::new("device_id", FieldType::Scalar(ScalarKind::String)).required()],
            )
            .nested_in(["Zone"]),
        );
    generate_and_write(
        &unit,
        &crate_dir.join("src/def.rs"),
        &GeneratorOptions::default(),
        false,
    )
    .expect("Failed to generate code");
    write_crate(&crate_dir, MAP_VALUES_LIB);

    cargo(&crate_dir, "test");
}
