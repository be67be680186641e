//! Supported target shells

use crate::config::Config;
use crate::error::CompspecError;
use crate::generator::bash;
use crate::generator::plan::Plan;
use std::fmt;
use std::str::FromStr;

/// A shell with a generator back end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
}

impl Shell {
    pub const ALL: &'static [Shell] = &[Shell::Bash];

    pub fn name(self) -> &'static str {
        match self {
            Shell::Bash => "bash",
        }
    }

    /// Compile `config` into a complete completion script for this shell
    pub fn generate(self, config: &Config) -> Script {
        let plan = Plan::new(config);
        let (function, mut text) = match self {
            Shell::Bash => (bash::function_name(plan.command), bash::generate(&plan)),
        };
        text.push_str(&self.registration(&plan));

        Script {
            shell: self,
            function,
            text,
            warnings: plan.warnings,
        }
    }

    fn registration(self, plan: &Plan<'_>) -> String {
        match self {
            Shell::Bash => bash::registration(plan),
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Shell {
    type Err = CompspecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shell::ALL
            .iter()
            .copied()
            .find(|shell| shell.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CompspecError::UnsupportedShell(s.to_string()))
    }
}

/// Generated completion script
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub shell: Shell,
    /// Name of the completion function
    pub function: String,
    /// Function source followed by its registration
    pub text: String,
    /// Non-fatal problems found in the configuration
    pub warnings: Vec<String>,
}
