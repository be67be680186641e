//! Integration tests for the compspec binary

mod common;

use assert_cmd::Command;
use common::create_test_spec;
use predicates::prelude::*;

const SPEC: &str = r#"
name: foo
opts:
  - short: [-v]
args:
  - index: 1
    name: path
    comp: {builtin: files}
"#;

fn compspec() -> Command {
    Command::cargo_bin("compspec").unwrap()
}

#[test]
fn test_help_exits_zero() {
    compspec()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--output"));
}

#[test]
fn test_missing_source_exits_one() {
    compspec()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_unknown_flag_exits_one() {
    let (_dir, path) = create_test_spec(SPEC);
    compspec()
        .arg("--bogus")
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_writes_script_to_stdout() {
    let (_dir, path) = create_test_spec(SPEC);
    compspec()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Generated by compspec"))
        .stdout(predicate::str::ends_with("complete -F _compspec_foo 'foo'\n"));
}

#[test]
fn test_writes_script_to_output_file() {
    let (dir, path) = create_test_spec(SPEC);
    let out = dir.path().join("foo.bash");

    compspec()
        .arg("-o")
        .arg(&out)
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("wrote bash completion for 'foo'"));

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("_compspec_foo() {"));
}

#[test]
fn test_schema_violation_refuses_generation() {
    let (dir, path) = create_test_spec("opts:\n  - short: [-v]\n    value:\n      comp: {}\n");
    let out = dir.path().join("foo.bash");

    compspec()
        .arg("--output")
        .arg(&out)
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with(
            "compspec: invalid configuration: name: missing required field; ",
        ))
        .stderr(predicate::str::contains("opts[0].value.comp"));

    assert!(!out.exists());
}

#[test]
fn test_unsupported_shell() {
    let (_dir, path) = create_test_spec(SPEC);
    compspec()
        .args(["-s", "zsh"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr("compspec: unsupported shell 'zsh' (supported: bash)\n");
}

#[test]
fn test_unsupported_shell_checked_before_validation() {
    let (_dir, path) = create_test_spec("not: [valid");
    compspec()
        .args(["--shell", "fish"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unsupported shell 'fish'"));
}

#[test]
fn test_malformed_document() {
    let text = "name: [unclosed";
    let (_dir, path) = create_test_spec(text);
    let cause = serde_yaml::from_str::<serde_yaml::Value>(text).unwrap_err();

    compspec()
        .arg(&path)
        .assert()
        .code(1)
        .stderr(format!("compspec: malformed document: {}\n", cause));
}

#[test]
fn test_unreadable_source() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("absent.yml");
    let cause = std::fs::read_to_string(&path).unwrap_err();

    compspec()
        .arg(&path)
        .assert()
        .code(1)
        .stderr(format!("compspec: cannot read '{}': {}\n", path.display(), cause));
}

#[test]
fn test_unwritable_destination() {
    let (dir, path) = create_test_spec(SPEC);
    compspec()
        .arg("-o")
        .arg(dir.path().join("missing-dir").join("foo.bash"))
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("compspec: cannot write '"))
        .stderr(predicate::function(|err: &str| err.lines().count() == 1));
}

#[test]
fn test_warnings_and_quiet() {
    let spec = "name: foo\nopts:\n  - short: [-v]\n  - short: [-v]\n";
    let (_dir, path) = create_test_spec(spec);

    compspec()
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("flag '-v' is declared more than once"));

    compspec()
        .arg("-q")
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_verbose_prints_debug() {
    let (_dir, path) = create_test_spec(SPEC);
    compspec()
        .arg("--verbose")
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("command 'foo': 1 option(s), 1 argument(s)"));
}

#[test]
fn test_print_own_completions() {
    compspec()
        .args(["--print-completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("compspec"));
}
