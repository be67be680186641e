//! Core configuration types
//!
//! This module defines the data structures that represent a completion spec
//! document. A `Config` is built once by the validator and is read-only after
//! that.

use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::fmt;

/// Default flag prefix
pub const DEFAULT_OPT_PREFIX: &str = "-";

/// Catch-all positional index as written in documents
pub const REST_INDEX: &str = "*";

/// Top-level configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Name of the command the completer is registered for
    pub name: String,

    /// Whether a literal `--` ends option scanning
    #[serde(default)]
    pub use_doubledash: bool,

    /// Characters marking a flag
    #[serde(default = "default_opt_prefix")]
    pub short_opt_prefix: String,

    /// Declared options, in declaration order
    #[serde(default)]
    pub opts: Vec<OptionSpec>,

    /// Declared positional arguments, in declaration order
    #[serde(default)]
    pub args: Vec<ArgSpec>,
}

fn default_opt_prefix() -> String {
    DEFAULT_OPT_PREFIX.to_string()
}

impl Config {
    /// Create an empty configuration for `name`
    pub fn new(name: impl Into<String>) -> Self {
        Config {
            name: name.into(),
            use_doubledash: false,
            short_opt_prefix: default_opt_prefix(),
            opts: Vec::new(),
            args: Vec::new(),
        }
    }

    /// Add an option
    pub fn with_opt(mut self, opt: OptionSpec) -> Self {
        self.opts.push(opt);
        self
    }

    /// Add a positional argument
    pub fn with_arg(mut self, arg: ArgSpec) -> Self {
        self.args.push(arg);
        self
    }

    /// Enable `--` as the end-of-options marker
    pub fn with_doubledash(mut self, enabled: bool) -> Self {
        self.use_doubledash = enabled;
        self
    }
}

/// An option (flag) definition
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OptionSpec {
    /// Flag literals, e.g. `-v`
    #[serde(default, deserialize_with = "deserialize_flags")]
    pub short: Vec<String>,

    /// Help text (informational only)
    #[serde(default)]
    pub description: Option<String>,

    /// The value this option takes, if any
    #[serde(default)]
    pub value: Option<ValueSpec>,
}

impl OptionSpec {
    /// A flag that takes no value
    pub fn flag<I, S>(short: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        OptionSpec {
            short: short.into_iter().map(Into::into).collect(),
            description: None,
            value: None,
        }
    }

    /// Attach a value, completed from `comp`
    pub fn with_value(mut self, name: impl Into<String>, comp: Option<CompletionSource>) -> Self {
        self.value = Some(ValueSpec {
            name: Some(name.into()),
            comp,
        });
        self
    }

    pub fn takes_value(&self) -> bool {
        self.value.is_some()
    }
}

/// The value taken by an option
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValueSpec {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub comp: Option<CompletionSource>,
}

/// A positional argument definition
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArgSpec {
    /// Slot position, or the catch-all
    pub index: ArgIndex,

    #[serde(default)]
    pub name: Option<String>,

    /// Source of candidates for this slot
    #[serde(default)]
    pub comp: Option<CompletionSource>,

    /// Drops the slot's requiredness when a listed flag was used
    #[serde(default)]
    pub skip_if: Option<SkipIf>,
}

impl ArgSpec {
    pub fn new(index: ArgIndex, name: impl Into<String>) -> Self {
        ArgSpec {
            index,
            name: Some(name.into()),
            comp: None,
            skip_if: None,
        }
    }

    pub fn with_comp(mut self, comp: CompletionSource) -> Self {
        self.comp = Some(comp);
        self
    }

    pub fn skip_if_any<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_if = Some(SkipIf {
            has_opt_any: flags.into_iter().map(Into::into).collect(),
        });
        self
    }
}

/// Conditional requirement rule for a positional slot
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkipIf {
    #[serde(default)]
    pub has_opt_any: Vec<String>,
}

/// Position of a positional argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArgIndex {
    /// An explicit 1-based position
    Position(u32),
    /// Every token beyond the explicit positions
    Rest,
}

impl ArgIndex {
    /// Interpret a document value as an index
    pub fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Number(n) => match n.as_u64() {
                Some(0) | None => Err(format!(
                    "expected a positive integer or \"{}\", got {}",
                    REST_INDEX, n
                )),
                Some(i) => u32::try_from(i)
                    .map(ArgIndex::Position)
                    .map_err(|_| format!("index {} is out of range", i)),
            },
            Value::String(s) if s == REST_INDEX => Ok(ArgIndex::Rest),
            other => Err(format!(
                "expected a positive integer or \"{}\", got {}",
                REST_INDEX,
                describe(other)
            )),
        }
    }
}

impl fmt::Display for ArgIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgIndex::Position(i) => write!(f, "{}", i),
            ArgIndex::Rest => f.write_str(REST_INDEX),
        }
    }
}

impl<'de> Deserialize<'de> for ArgIndex {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        let value = Value::deserialize(deserializer)?;
        ArgIndex::from_value(&value).map_err(D::Error::custom)
    }
}

/// Filesystem-backed completion kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Files,
    Directories,
}

impl Builtin {
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Files => "files",
            Builtin::Directories => "directories",
        }
    }
}

/// Where completion candidates come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionSource {
    Builtin(Builtin),
    /// Literal argument vector; its stdout lines are the candidates
    Command(Vec<String>),
}

impl CompletionSource {
    pub fn files() -> Self {
        CompletionSource::Builtin(Builtin::Files)
    }

    pub fn directories() -> Self {
        CompletionSource::Builtin(Builtin::Directories)
    }

    pub fn command<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CompletionSource::Command(argv.into_iter().map(Into::into).collect())
    }

    /// Interpret a document value as a completion source
    ///
    /// The value must be a mapping with exactly one of `builtin` or `cmd`.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        let mapping = match value {
            Value::Mapping(mapping) => mapping,
            other => return Err(format!("expected a mapping, got {}", describe(other))),
        };

        if let Some((key, _)) = mapping
            .iter()
            .find(|(key, _)| !matches!(key.as_str(), Some("builtin") | Some("cmd")))
        {
            return Err(format!("unexpected key {}", describe_key(key)));
        }

        match (mapping.get("builtin"), mapping.get("cmd")) {
            (Some(_), Some(_)) => Err("'builtin' and 'cmd' are mutually exclusive".to_string()),
            (None, None) => Err("expected exactly one of 'builtin' or 'cmd'".to_string()),
            (Some(builtin), None) => match builtin.as_str() {
                Some("files") => Ok(CompletionSource::files()),
                Some("directories") => Ok(CompletionSource::directories()),
                Some(other) => Err(format!(
                    "builtin must be 'files' or 'directories', got '{}'",
                    other
                )),
                None => Err(format!("builtin must be a string, got {}", describe(builtin))),
            },
            (None, Some(cmd)) => {
                let argv = string_list(cmd).map_err(|e| format!("cmd {}", e))?;
                if argv.is_empty() {
                    return Err("cmd must name at least a program".to_string());
                }
                Ok(CompletionSource::Command(argv))
            }
        }
    }
}

impl<'de> Deserialize<'de> for CompletionSource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        let value = Value::deserialize(deserializer)?;
        CompletionSource::from_value(&value).map_err(D::Error::custom)
    }
}

/// Read a list of strings
pub(crate) fn string_list(value: &Value) -> Result<Vec<String>, String> {
    let seq = value
        .as_sequence()
        .ok_or_else(|| format!("must be a list of strings, got {}", describe(value)))?;

    seq.iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| format!("item {} must be a string, got {}", i, describe(item)))
        })
        .collect()
}

/// Read flag literals: a single string or a list of strings
pub(crate) fn flag_list(value: &Value) -> Result<Vec<String>, String> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Null => Ok(Vec::new()),
        Value::Sequence(_) => string_list(value),
        other => Err(format!(
            "must be a string or a list of strings, got {}",
            describe(other)
        )),
    }
}

/// Custom deserializer for flag literals that handles both single values and arrays
fn deserialize_flags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Value::deserialize(deserializer)?;
    flag_list(&value).map_err(D::Error::custom)
}

/// Human-readable kind of a document value, for messages
pub(crate) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn describe_key(key: &Value) -> String {
    match key.as_str() {
        Some(s) => format!("'{}'", s),
        None => describe(key).to_string(),
    }
}
