//! Integration tests running the polymsg binary inside a temporary project.

#![allow(non_snake_case)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const SCHEMA: &str = include_str!("../../polymsg-core/tests/fixtures/schema.json");
const NEW_ADDRESS: &str =
    include_str!("../../polymsg-core/tests/fixtures/messages/address/new-address.json");

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("schema.json"), SCHEMA).unwrap();
    fs::create_dir_all(dir.path().join("messages/address")).unwrap();
    fs::write(dir.path().join("messages/address/new-address.json"), NEW_ADDRESS).unwrap();
    dir
}

fn polymsg(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_polymsg"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

// =============================================================================
// init
// =============================================================================

#[test]
fn init___empty_directory___writes_default_config() {
    let dir = TempDir::new().unwrap();

    let output = polymsg(dir.path(), &["init"]);

    assert!(output.status.success());
    let config = fs::read_to_string(dir.path().join("polymsg.toml")).unwrap();
    assert!(config.contains("schema = \"schema.json\""));
    assert!(config.contains("[backends.go]"));
}

#[test]
fn init___config_exists___fails_without_force() {
    let dir = TempDir::new().unwrap();
    assert!(polymsg(dir.path(), &["init"]).status.success());

    assert!(!polymsg(dir.path(), &["init"]).status.success());
    assert!(polymsg(dir.path(), &["init", "--force"]).status.success());
}

// =============================================================================
// generate
// =============================================================================

#[test]
fn generate___default_config___writes_under_output() {
    let dir = project();

    let output = polymsg(dir.path(), &["-q", "generate"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(dir.path().join("output/go/address/new_address/new_address.go").is_file());
    assert!(dir.path().join("output/go/enums/enums.go").is_file());
    assert!(dir.path().join("output/ruby/schemas.rb").is_file());
    assert!(dir.path().join("output/json-schema/address/new_address.json").is_file());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("for 1 messages with 5 backends"));
}

#[test]
fn generate___backend_flag_and_config_output___honored() {
    let dir = project();
    fs::write(
        dir.path().join("polymsg.toml"),
        "[backends.protobuf]\noutput = \"gen/proto\"\npackage_root = \"acme\"\n",
    )
    .unwrap();

    let output = polymsg(dir.path(), &["generate", "--backend", "protobuf"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let proto =
        fs::read_to_string(dir.path().join("gen/proto/address/new_address/new_address.proto"))
            .unwrap();
    assert!(proto.contains("package acme.address.new_address;"));
    assert!(!dir.path().join("output").exists());
}

#[test]
fn generate___undeclared_message_with_strict___exit_failure() {
    let dir = project();
    fs::write(
        dir.path().join("messages/address/old-address.json"),
        NEW_ADDRESS.replace("\"newAddress\"", "\"oldAddress\""),
    )
    .unwrap();

    let lenient = polymsg(dir.path(), &["-q", "generate", "-b", "go"]);
    let strict = polymsg(dir.path(), &["-q", "generate", "-b", "go", "--strict"]);

    assert!(lenient.status.success());
    assert!(String::from_utf8_lossy(&lenient.stdout).contains("oldAddress is not defined in the schema"));
    assert!(!strict.status.success());
}

#[test]
fn generate___missing_schema___exit_failure() {
    let dir = TempDir::new().unwrap();

    let output = polymsg(dir.path(), &["-q", "generate"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("schema.json"));
}

// =============================================================================
// check
// =============================================================================

#[test]
fn check___valid_project___success_without_output() {
    let dir = project();

    let output = polymsg(dir.path(), &["-q", "check"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(!dir.path().join("output").exists());
}

#[test]
fn check___unknown_backend___exit_failure() {
    let dir = project();

    let output = polymsg(dir.path(), &["check", "--backend", "cobol"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown backend: cobol"));
}

#[test]
fn cli___verbose_and_quiet___rejected() {
    let dir = TempDir::new().unwrap();

    let output = polymsg(dir.path(), &["-v", "-q", "init"]);

    assert!(!output.status.success());
    assert!(!dir.path().join("polymsg.toml").exists());
}
