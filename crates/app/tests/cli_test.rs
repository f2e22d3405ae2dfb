//! End-to-end tests for the `stencil` binary.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn stencil(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stencil"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run stencil")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_resolves_positional_text() {
    let output = stencil(&["--no-system-env", "-D", "user=ada", "hi ${user}, ${greeting:welcome}"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "hi ada, welcome\n");
}

#[test]
fn test_resolves_against_property_files() {
    let dir = tempdir().unwrap();
    let yaml = dir.path().join("application.yml");
    let properties = dir.path().join("override.properties");
    fs::write(&yaml, "db:\n  host: localhost\n  port: 5432\n  url: jdbc://${db.host}:${db.port}\n").unwrap();
    fs::write(&properties, "db.host=db.internal\n").unwrap();

    let output = stencil(&[
        "--no-system-env",
        "--source",
        properties.to_str().unwrap(),
        "--source",
        yaml.to_str().unwrap(),
        "${db.url}",
    ]);

    assert!(output.status.success(), "{output:?}");
    assert_eq!(stdout(&output), "jdbc://db.internal:5432\n");
}

#[test]
fn test_reads_file_input_verbatim() {
    let dir = tempdir().unwrap();
    let template = dir.path().join("template.txt");
    fs::write(&template, "name=${name}\nescaped=\\${name}\n").unwrap();

    let output = stencil(&[
        "--no-system-env",
        "-D",
        "name=stencil",
        "--file",
        template.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "name=stencil\nescaped=${name}\n");
}

#[test]
fn test_reads_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_stencil"))
        .args(["--no-system-env", "-D", "x=1"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"x is ${x}")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert_eq!(stdout(&output), "x is 1");
}

#[test]
fn test_system_environment_is_used() {
    let output = Command::new(env!("CARGO_BIN_EXE_stencil"))
        .arg("${stencil.test.value}")
        .env("STENCIL_TEST_VALUE", "from-env")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout(&output), "from-env\n");
}

#[test]
fn test_custom_syntax() {
    let output = stencil(&[
        "--no-system-env",
        "--prefix",
        "{{",
        "--suffix",
        "}}",
        "--separator",
        "|",
        "-D",
        "a=A",
        "{{a}} {{b|B}} ${a}",
    ]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "A B ${a}\n");
}

#[test]
fn test_strict_mode_fails() {
    let output = stencil(&["--no-system-env", "--strict", "value=${missing}"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Could not resolve placeholder 'missing'"), "{stderr}");
}

#[test]
fn test_circular_reference_fails() {
    let output = stencil(&["--no-system-env", "-D", "a=${b}", "-D", "b=${a}", "${a}"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Circular placeholder reference 'a'"), "{stderr}");
}

#[test]
fn test_missing_source_file_fails() {
    let output = stencil(&["--no-system-env", "--source", "/nonexistent/app.yml", "x"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("failed to load property sources"), "{stderr}");
}
