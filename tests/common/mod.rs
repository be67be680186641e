//! Common test utilities
#![allow(dead_code)]

use compspec::generator::quote;
use compspec::Script;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Create a temporary directory with a spec file
pub fn create_test_spec(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let spec_path = temp_dir.path().join("spec.yml");
    fs::write(&spec_path, content).unwrap();
    (temp_dir, spec_path)
}

/// Whether a `bash` binary can be run
pub fn bash_available() -> bool {
    Command::new("bash")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Run bash code after sourcing `script`, returning stdout
///
/// Panics if bash reports anything on stderr, which catches syntax errors in
/// the generated script.
pub fn run_with_script(script: &Script, code: &str, cwd: &Path) -> String {
    let script_dir = TempDir::new().unwrap();
    let script_path = script_dir.path().join("completion.bash");
    fs::write(&script_path, &script.text).unwrap();

    let driver = format!("source {}\n{}", quote(&script_path.display().to_string()), code);
    let output = Command::new("bash")
        .args(["--noprofile", "--norc", "-c", driver.as_str()])
        .current_dir(cwd)
        .output()
        .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.is_empty(), "bash stderr: {}\nscript:\n{}", stderr, script.text);
    assert!(output.status.success(), "bash exited with {:?}", output.status);
    String::from_utf8(output.stdout).unwrap()
}

/// Trigger the completion function with the cursor on the last word
///
/// Returns the sorted candidates, or `None` when no bash is installed.
pub fn complete_in(script: &Script, words: &[&str], cwd: &Path) -> Option<Vec<String>> {
    if !bash_available() {
        eprintln!("bash not found; skipping runtime completion check");
        return None;
    }

    let words_literal = words.iter().map(|w| quote(w)).collect::<Vec<_>>().join(" ");
    let code = format!(
        "COMP_WORDS=({})\nCOMP_CWORD={}\n{}\nprintf '%s\\n' \"${{COMPREPLY[@]}}\"\n",
        words_literal,
        words.len() - 1,
        script.function
    );

    let stdout = run_with_script(script, &code, cwd);
    let mut candidates: Vec<String> = stdout
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    candidates.sort();
    Some(candidates)
}

/// Like [`complete_in`], in a fresh empty directory
pub fn complete(script: &Script, words: &[&str]) -> Option<Vec<String>> {
    let cwd = TempDir::new().unwrap();
    complete_in(script, words, cwd.path())
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
