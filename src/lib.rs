//! compspec - compile a declarative CLI description into shell completion
//!
//! A completion spec names a command, its flags, the values those flags take
//! and its positional arguments. compspec validates the spec and emits a bash
//! function that works out, on every completion trigger, whether a flag, a
//! flag's value or a positional argument is being completed, and which source
//! supplies the candidates.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use error::{CompspecError, Result};
pub use generator::{compile, Script, Shell};

/// Current version of compspec
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
