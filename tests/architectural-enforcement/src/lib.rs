//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - The control client never blocks the async runtime (no std sockets or sleeps)
//! - Library code propagates errors instead of panicking
//!
//! The helpers here scan production source: everything before a file's first
//! `#[cfg(test)]`, with comment lines skipped.

use std::fs;
use std::path::{Path, PathBuf};

/// A line of production code that breaks a rule
#[derive(Debug, Clone)]
pub struct Violation {
    /// File containing the line
    pub path: PathBuf,
    /// 1-based line number
    pub line_number: usize,
    /// Offending line, trimmed
    pub line: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.line_number, self.line)
    }
}

/// Workspace root, resolved from this package's manifest directory
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// Production source files under `dir` (relative to the workspace root)
///
/// Test-only fixture modules (`test_utils.rs`) are excluded.
#[must_use]
pub fn production_files(dir: &str) -> Vec<PathBuf> {
    let path = workspace_root().join(dir);
    if !path.exists() {
        return Vec::new();
    }

    walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .filter(|e| e.file_name() != "test_utils.rs")
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Production lines of `path` as (1-based line number, code without trailing comment)
#[must_use]
pub fn production_lines(path: &Path) -> Vec<(usize, String)> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };

    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| line.trim() != "#[cfg(test)]")
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .map(|(idx, line)| {
            let code = line.split("//").next().unwrap_or(line);
            (idx + 1, code.to_string())
        })
        .collect()
}

/// Find production lines under `dirs` containing any of `patterns`
#[must_use]
pub fn find_violations(dirs: &[&str], patterns: &[&str]) -> Vec<Violation> {
    let mut violations = Vec::new();

    for dir in dirs {
        for path in production_files(dir) {
            for (line_number, code) in production_lines(&path) {
                if patterns.iter().any(|p| code.contains(p)) {
                    violations.push(Violation {
                        path: path.clone(),
                        line_number,
                        line: code.trim().to_string(),
                    });
                }
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let dir = std::env::temp_dir().join(format!("ae-scan-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("sample.rs");
        fs::write(
            &file,
            "fn a() {}\n// comment .unwrap()\nlet x = y; // trailing .unwrap()\n#[cfg(test)]\nfn t() { z.unwrap(); }\n",
        )
        .unwrap();

        let lines = production_lines(&file);
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|(_, code)| !code.contains(".unwrap()")));
        assert_eq!(lines[1].0, 3);
    }
}
