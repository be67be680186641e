//! CLI interface and argument parsing
//!
//! This module handles command-line interface parsing and drives one
//! generation run.

pub mod app;

// Re-export main types
pub use app::*;
