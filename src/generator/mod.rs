//! Completion script generation
//!
//! A validated configuration is lowered into a [`Plan`], which a shell back
//! end turns into the source of a completion function.

pub mod bash;
pub mod escape;
pub mod plan;
pub mod shell;

// Re-export main types
pub use escape::{quote, quote_for_embedding};
pub use plan::{FlagId, FlagPlan, Plan, SlotPlan};
pub use shell::{Script, Shell};

use crate::config::parse_config;
use crate::error::Result;

/// Compile completion spec source text into a script for `shell`
pub fn compile(source: &str, shell: Shell) -> Result<Script> {
    let config = parse_config(source)?;
    Ok(shell.generate(&config))
}
