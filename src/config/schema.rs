//! Configuration validation
//!
//! Checks a raw document against the completion spec schema. Every violation
//! is collected before reporting; a document with any violation never reaches
//! the generator.

use crate::config::types::{describe, flag_list, string_list, ArgIndex, CompletionSource, Config};
use serde_yaml::{Mapping, Value};
use std::fmt;

/// A single schema violation, located by path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Location in the document, e.g. `opts[1].value.comp`
    pub path: String,
    pub message: String,
}

impl SchemaViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        SchemaViolation {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Validate a raw document and build the configuration model
pub fn validate(raw: &Value) -> Result<Config, Vec<SchemaViolation>> {
    let violations = collect_violations(raw);
    if !violations.is_empty() {
        return Err(violations);
    }

    serde_yaml::from_value(raw.clone()).map_err(|e| vec![SchemaViolation::new("", e.to_string())])
}

/// Collect every schema violation in a raw document
pub fn collect_violations(raw: &Value) -> Vec<SchemaViolation> {
    let mut checker = Checker::default();

    let root = match raw.as_mapping() {
        Some(root) => root,
        None => {
            checker.push("", format!("document root must be a mapping, got {}", describe(raw)));
            return checker.violations;
        }
    };

    match root.get("name") {
        None | Some(Value::Null) => checker.push("name", "missing required field"),
        Some(Value::String(name)) if name.is_empty() => checker.push("name", "must not be empty"),
        Some(Value::String(_)) => {}
        Some(other) => checker.push("name", format!("must be a string, got {}", describe(other))),
    }

    if let Some(value) = root.get("use_doubledash") {
        if !value.is_bool() {
            checker.push("use_doubledash", format!("must be a boolean, got {}", describe(value)));
        }
    }

    if let Some(value) = root.get("short_opt_prefix") {
        match value.as_str() {
            Some("") => checker.push("short_opt_prefix", "must not be empty"),
            Some(_) => {}
            None => checker.push(
                "short_opt_prefix",
                format!("must be a string, got {}", describe(value)),
            ),
        }
    }

    if let Some(opts) = checker.list(root, "opts", "opts") {
        for (i, opt) in opts.iter().enumerate() {
            checker.option(&format!("opts[{}]", i), opt);
        }
    }

    if let Some(args) = checker.list(root, "args", "args") {
        for (i, arg) in args.iter().enumerate() {
            checker.arg(&format!("args[{}]", i), arg);
        }
    }

    checker.violations
}

#[derive(Default)]
struct Checker {
    violations: Vec<SchemaViolation>,
}

impl Checker {
    fn push(&mut self, path: &str, message: impl Into<String>) {
        self.violations.push(SchemaViolation::new(path, message));
    }

    /// An optional list field
    fn list<'v>(&mut self, parent: &'v Mapping, key: &str, path: &str) -> Option<&'v Vec<Value>> {
        match parent.get(key) {
            None => None,
            Some(Value::Sequence(seq)) => Some(seq),
            Some(other) => {
                self.push(path, format!("must be a list, got {}", describe(other)));
                None
            }
        }
    }

    /// An optional mapping field; null counts as absent
    fn mapping<'v>(&mut self, parent: &'v Mapping, key: &str, path: &str) -> Option<&'v Mapping> {
        match parent.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Mapping(mapping)) => Some(mapping),
            Some(other) => {
                self.push(path, format!("must be a mapping, got {}", describe(other)));
                None
            }
        }
    }

    fn optional_string(&mut self, parent: &Mapping, key: &str, path: &str) {
        match parent.get(key) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(other) => self.push(path, format!("must be a string, got {}", describe(other))),
        }
    }

    fn comp(&mut self, parent: &Mapping, path: &str) {
        match parent.get("comp") {
            None | Some(Value::Null) => {}
            Some(value) => {
                if let Err(message) = CompletionSource::from_value(value) {
                    self.push(path, message);
                }
            }
        }
    }

    fn option(&mut self, path: &str, opt: &Value) {
        let opt = match opt.as_mapping() {
            Some(opt) => opt,
            None => {
                self.push(path, format!("must be a mapping, got {}", describe(opt)));
                return;
            }
        };

        if let Some(short) = opt.get("short") {
            match flag_list(short) {
                Ok(flags) if flags.iter().any(String::is_empty) => {
                    self.push(&format!("{}.short", path), "flag literals must not be empty")
                }
                Ok(_) => {}
                Err(message) => self.push(&format!("{}.short", path), message),
            }
        }
        self.optional_string(opt, "description", &format!("{}.description", path));

        let value_path = format!("{}.value", path);
        if let Some(value) = self.mapping(opt, "value", &value_path) {
            self.optional_string(value, "name", &format!("{}.name", value_path));
            self.comp(value, &format!("{}.comp", value_path));
        }
    }

    fn arg(&mut self, path: &str, arg: &Value) {
        let arg = match arg.as_mapping() {
            Some(arg) => arg,
            None => {
                self.push(path, format!("must be a mapping, got {}", describe(arg)));
                return;
            }
        };

        match arg.get("index") {
            None | Some(Value::Null) => {
                self.push(&format!("{}.index", path), "missing required field")
            }
            Some(index) => {
                if let Err(message) = ArgIndex::from_value(index) {
                    self.push(&format!("{}.index", path), message);
                }
            }
        }
        self.optional_string(arg, "name", &format!("{}.name", path));
        self.comp(arg, &format!("{}.comp", path));

        let skip_path = format!("{}.skip_if", path);
        if let Some(skip_if) = self.mapping(arg, "skip_if", &skip_path) {
            match skip_if.get("has_opt_any") {
                None => {}
                Some(flags) => {
                    if let Err(message) = string_list(flags) {
                        self.push(&format!("{}.has_opt_any", skip_path), message);
                    }
                }
            }
        }
    }
}
