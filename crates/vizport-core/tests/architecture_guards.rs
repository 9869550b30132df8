//! Architecture guard tests for the vizport workspace.
//!
//! These tests scan source files to enforce design-level consistency:
//! - Error types derive thiserror instead of hand-writing Display
//! - No `Result<_, String>` in vizport-core
//! - No `unwrap()`/`expect()` outside test code
//! - The connector is never shared behind a lock
//! - Public SDK functions are documented
//! - File size limits
//!
//! Run: `cargo test --package vizport-core --test architecture_guards -- --nocapture`

use std::fs;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Walk `dir` recursively, collecting .rs files that pass `filter`.
fn collect_rs_files(dir: &Path, filter: &dyn Fn(&Path) -> bool) -> Vec<PathBuf> {
    let mut result = Vec::new();
    if !dir.exists() {
        return result;
    }
    for entry in walkdir(dir) {
        if entry.extension().is_some_and(|e| e == "rs") && filter(&entry) {
            result.push(entry);
        }
    }
    result
}

/// Simple recursive directory walk (no external dep).
fn walkdir(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(walkdir(&path));
            } else {
                files.push(path);
            }
        }
    }
    files
}

/// Return the workspace root (two levels up from vizport-core/tests/).
fn workspace_root() -> PathBuf {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR")); // crates/vizport-core
    manifest
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .expect("cannot determine workspace root")
        .to_path_buf()
}

fn is_test_file(path: &Path) -> bool {
    let s = path.to_string_lossy();
    s.contains("/tests/") || s.ends_with("_tests.rs") || s.ends_with("_test.rs")
}

/// Source files of the workspace crates, tests excluded.
fn source_files(root: &Path) -> Vec<PathBuf> {
    collect_rs_files(&root.join("crates"), &|p| {
        !is_test_file(p) && p.to_string_lossy().contains("/vizport-")
    })
}

/// Lines before the first `#[cfg(test)]`, with their 1-based numbers.
fn non_test_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .map(|(i, line)| (i + 1, line))
}

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with("//") || trimmed.starts_with('*')
}

/// Strip the workspace root prefix for display.
fn rel(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

fn report(rule: &str, advice: &str, violations: &[(String, usize, String)]) {
    if violations.is_empty() {
        return;
    }
    let mut msg = format!("\n[{rule}] {advice}\n\n");
    for (file, line, text) in violations {
        msg.push_str(&format!("  {}:{} -> {}\n", file, line, text));
    }
    panic!("{msg}");
}

// ---------------------------------------------------------------------------
// VP-ERR-01: Error types must use thiserror, no hand-written Display
// ---------------------------------------------------------------------------

#[test]
fn test_error_types_use_thiserror() {
    let root = workspace_root();
    let mut violations = Vec::new();

    for file in source_files(&root) {
        let Ok(content) = fs::read_to_string(&file) else {
            continue;
        };
        for (n, line) in non_test_lines(&content) {
            let trimmed = line.trim();
            if trimmed.starts_with("impl")
                && trimmed.contains("Display for")
                && trimmed.contains("Error")
            {
                violations.push((rel(&file, &root), n, trimmed.to_string()));
            }
        }
    }

    report(
        "VP-ERR-01",
        "Hand-written Display for Error types detected. Use #[derive(thiserror::Error)] instead.",
        &violations,
    );
}

// ---------------------------------------------------------------------------
// VP-ERR-02: No Result<_, String> in vizport-core
// ---------------------------------------------------------------------------

#[test]
fn test_no_result_string_in_core() {
    let root = workspace_root();
    let core_src = root.join("crates/vizport-core/src");
    let mut violations = Vec::new();

    for file in collect_rs_files(&core_src, &|p| !is_test_file(p)) {
        let Ok(content) = fs::read_to_string(&file) else {
            continue;
        };
        for (n, line) in non_test_lines(&content) {
            let trimmed = line.trim();
            if is_comment(trimmed) {
                continue;
            }
            if let Some(pos) = trimmed.find("Result<") {
                let after = &trimmed[pos..];
                if after.contains(", String>") || after.contains(",String>") {
                    violations.push((rel(&file, &root), n, trimmed.to_string()));
                }
            }
        }
    }

    report(
        "VP-ERR-02",
        "Result<_, String> found in vizport-core. Use ScriptResult instead.",
        &violations,
    );
}

// ---------------------------------------------------------------------------
// VP-ERR-03: No unwrap()/expect() in library code
// ---------------------------------------------------------------------------

#[test]
fn test_no_unwrap_outside_tests() {
    let root = workspace_root();
    let mut violations = Vec::new();

    for file in source_files(&root) {
        let Ok(content) = fs::read_to_string(&file) else {
            continue;
        };
        for (n, line) in non_test_lines(&content) {
            let trimmed = line.trim();
            if is_comment(trimmed) {
                continue;
            }
            if trimmed.contains(".unwrap()") || trimmed.contains(".expect(") {
                violations.push((rel(&file, &root), n, trimmed.to_string()));
            }
        }
    }

    report(
        "VP-ERR-03",
        "unwrap()/expect() in non-test code. Propagate a ScriptError instead.",
        &violations,
    );
}

// ---------------------------------------------------------------------------
// VP-CONN-01: No RwLock/Mutex wrapping Connector
// ---------------------------------------------------------------------------

#[test]
fn test_no_lock_on_connector() {
    let root = workspace_root();
    let mut violations = Vec::new();

    for file in source_files(&root) {
        let Ok(content) = fs::read_to_string(&file) else {
            continue;
        };
        for (n, line) in non_test_lines(&content) {
            let trimmed = line.trim();
            if is_comment(trimmed) {
                continue;
            }
            if trimmed.contains("Mutex<Connector") || trimmed.contains("RwLock<Connector") {
                violations.push((rel(&file, &root), n, trimmed.to_string()));
            }
        }
    }

    report(
        "VP-CONN-01",
        "Connector behind a lock. One command in flight is enforced by &mut self; pass the connector by value or &mut.",
        &violations,
    );
}

// ---------------------------------------------------------------------------
// VP-DOC-01: Public SDK functions carry at least a one-line doc comment
// ---------------------------------------------------------------------------

#[test]
fn test_public_sdk_functions_are_documented() {
    let root = workspace_root();
    let mut violations = Vec::new();

    let sdk_files = collect_rs_files(&root.join("crates/vizport-sdk/src"), &|p| !is_test_file(p));
    for file in sdk_files {
        let Ok(content) = fs::read_to_string(&file) else {
            continue;
        };
        let lines: Vec<(usize, &str)> = non_test_lines(&content).collect();
        for (i, (n, line)) in lines.iter().enumerate() {
            let trimmed = line.trim();
            if !(trimmed.starts_with("pub fn ") || trimmed.starts_with("pub async fn ")) {
                continue;
            }
            let documented = lines[..i]
                .iter()
                .rev()
                .map(|(_, l)| l.trim())
                .find(|l| !l.starts_with("#["))
                .is_some_and(|l| l.starts_with("///"));
            if !documented {
                violations.push((rel(&file, &root), *n, trimmed.to_string()));
            }
        }
    }

    report(
        "VP-DOC-01",
        "Public SDK functions without a doc comment. Add at least a one-line `///`.",
        &violations,
    );
}

// ---------------------------------------------------------------------------
// VP-SIZE-01: File size limits (500 lines for non-test files)
// ---------------------------------------------------------------------------

#[test]
fn test_file_size_limits() {
    const MAX_LINES: usize = 500;

    let root = workspace_root();
    let mut violations = Vec::new();

    for file in source_files(&root) {
        let Ok(content) = fs::read_to_string(&file) else {
            continue;
        };
        let line_count = content.lines().count();
        if line_count > MAX_LINES {
            violations.push((rel(&file, &root), line_count, format!("{line_count} lines")));
        }
    }

    report(
        "VP-SIZE-01",
        "Files exceeding 500 lines (split into submodules).",
        &violations,
    );
}
