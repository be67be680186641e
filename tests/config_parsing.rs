//! Integration tests for completion spec parsing

mod common;

use common::create_test_spec;
use compspec::config::{
    parse_config, parse_config_file, parse_document, validate, ArgIndex, CompletionSource,
};
use compspec::{compile, CompspecError, Shell};

#[test]
fn test_parse_complete_spec() {
    let yaml = r#"
name: deploy
use_doubledash: true
opts:
  - short: [-e, --env]
    description: Target environment
    value:
      name: ENV
      comp:
        cmd: [printf, '%s\n', staging, production]
  - short: -f
    description: Force
    value:
      name: FILE
      comp:
        builtin: files
  - short: [-n]
args:
  - index: 1
    name: service
    comp:
      cmd: [ls, services]
  - index: 2
    name: version
    skip_if:
      has_opt_any: [-n]
  - index: "*"
    name: extra
    comp:
      builtin: directories
"#;

    let config = parse_config(yaml).unwrap();

    assert_eq!(config.name, "deploy");
    assert!(config.use_doubledash);
    assert_eq!(config.opts.len(), 3);
    assert_eq!(config.opts[0].short, vec!["-e".to_string(), "--env".to_string()]);
    assert_eq!(config.opts[1].short, vec!["-f".to_string()]);
    assert_eq!(
        config.opts[1].value.as_ref().unwrap().comp,
        Some(CompletionSource::files())
    );
    assert!(!config.opts[2].takes_value());

    assert_eq!(config.args[0].index, ArgIndex::Position(1));
    assert_eq!(config.args[1].skip_if.as_ref().unwrap().has_opt_any, vec!["-n".to_string()]);
    assert_eq!(config.args[2].index, ArgIndex::Rest);
    assert_eq!(config.args[2].comp, Some(CompletionSource::directories()));
}

#[test]
fn test_missing_name_is_a_violation() {
    let err = parse_config("opts:\n  - short: [-v]\n").unwrap_err();
    let violations = err.violations();
    assert!(!violations.is_empty());
    assert_eq!(violations[0].path, "name");
}

#[test]
fn test_comp_with_neither_or_both_fails() {
    for comp in ["{}", "{builtin: files, cmd: [ls]}"] {
        let yaml = format!("name: foo\nargs:\n  - index: 1\n    comp: {}\n", comp);
        let raw = parse_document(&yaml).unwrap();
        let violations = validate(&raw).unwrap_err();
        assert_eq!(violations.len(), 1, "comp {}", comp);
        assert_eq!(violations[0].path, "args[0].comp");
    }
}

#[test]
fn test_violations_are_reported_together() {
    let err = parse_config(
        r#"
opts:
  - short: [-b]
    value:
      comp: {builtin: sockets}
args:
  - index: 0
"#,
    )
    .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("name: missing required field"));
    assert!(message.contains("opts[0].value.comp"));
    assert!(message.contains("args[0].index"));
    assert_eq!(err.violations().len(), 3);
}

#[test]
fn test_malformed_document() {
    let result = parse_config("name: foo\nopts: [\n");
    assert!(matches!(result, Err(CompspecError::MalformedDocument(_))));
}

#[test]
fn test_json_document() {
    let config = parse_config(
        r#"{
  "name": "foo",
  "opts": [{"short": ["-v"]}],
  "args": [{"index": 1, "name": "path", "comp": {"builtin": "files"}}]
}"#,
    )
    .unwrap();
    assert_eq!(config.opts[0].short, vec!["-v".to_string()]);
    assert_eq!(config.args[0].comp, Some(CompletionSource::files()));
}

#[test]
fn test_parse_spec_file() {
    let (_dir, path) = create_test_spec("name: foo\nopts:\n  - short: [-v]\n");
    let config = parse_config_file(&path).unwrap();
    assert_eq!(config.name, "foo");
}

#[test]
fn test_compile_refuses_invalid_spec() {
    let result = compile("name: foo\nargs:\n  - index: 1\n    comp: {cmd: []}\n", Shell::Bash);
    assert!(matches!(result, Err(CompspecError::Schema(_))));
}

#[test]
fn test_compile_valid_spec() {
    let script = compile("name: foo\nopts:\n  - short: [-v]\n", Shell::Bash).unwrap();
    assert_eq!(script.shell, Shell::Bash);
    assert!(script.text.contains("_compspec_foo() {"));
    assert!(script.text.ends_with("complete -F _compspec_foo 'foo'\n"));
}
