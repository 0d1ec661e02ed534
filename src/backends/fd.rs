//! fd integration
//!
//! Runs fd inside the search directory and reads one path per output line.
//! A missing binary, a non-zero exit or empty output all mean "no results".

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::backends::search::SearchStrategy;
use crate::core::model::SourceMode;
use crate::core::util::command_exists;
use crate::ident::codec::Identifier;
use crate::ident::filter::is_eligible_path;

/// Check which fd command is available (`fdfind` on Debian/Ubuntu)
pub fn get_fd_command() -> Option<&'static str> {
    if command_exists("fd") {
        Some("fd")
    } else if command_exists("fdfind") {
        Some("fdfind")
    } else {
        None
    }
}

/// fd-backed search strategy
#[derive(Debug, Clone)]
pub struct FdSearch {
    program: &'static str,
}

impl FdSearch {
    pub fn new(program: &'static str) -> Self {
        Self { program }
    }

    /// Look up an fd binary on PATH once
    pub fn detect() -> Option<Self> {
        get_fd_command().map(Self::new)
    }

    pub fn program(&self) -> &'static str {
        self.program
    }

    fn command(&self, dir: &Path, id: &Identifier, recursive: bool) -> Command {
        let mut cmd = Command::new(self.program);
        cmd.current_dir(dir)
            .arg("--fixed-strings")
            .arg("--hidden")
            .arg("--no-ignore")
            .arg("--color")
            .arg("never");
        if !recursive {
            cmd.arg("--max-depth").arg("1");
        }
        cmd.arg("--").arg(id.as_str());
        cmd
    }
}

/// Split fd output into paths relative to the search directory
pub fn parse_output(stdout: &str) -> Vec<PathBuf> {
    stdout
        .lines()
        .map(str::trim_end)
        .map(|l| l.strip_prefix("./").unwrap_or(l))
        .map(|l| l.trim_end_matches('/'))
        .filter(|l| !l.is_empty())
        .map(PathBuf::from)
        .filter(|p| is_eligible_path(p))
        .collect()
}

impl SearchStrategy for FdSearch {
    fn source_mode(&self) -> SourceMode {
        SourceMode::Fd
    }

    fn find_by_identifier(&self, dir: &Path, id: &Identifier, recursive: bool) -> Vec<PathBuf> {
        let output = match self.command(dir, id, recursive).output() {
            Ok(output) => output,
            Err(e) => {
                debug!(program = self.program, error = %e, "fd failed to start");
                return Vec::new();
            }
        };

        if !output.status.success() {
            debug!(
                program = self.program,
                dir = %dir.display(),
                status = ?output.status.code(),
                "fd exited with failure, treating as no results"
            );
            return Vec::new();
        }

        let results = parse_output(&String::from_utf8_lossy(&output.stdout));
        debug!(
            dir = %dir.display(),
            id = %id,
            recursive,
            count = results.len(),
            "fd search finished"
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_output() {
        let out = "./a/20240101T120000--x.org\nsub/20240101T120000--d/\n\nb.org~\n";
        assert_eq!(
            parse_output(out),
            vec![
                PathBuf::from("a/20240101T120000--x.org"),
                PathBuf::from("sub/20240101T120000--d"),
            ]
        );
    }

    #[test]
    fn test_parse_output_empty() {
        assert!(parse_output("").is_empty());
        assert!(parse_output("\n\n").is_empty());
    }

    #[test]
    fn test_missing_program_is_no_results() {
        let temp = tempfile::tempdir().unwrap();
        let fd = FdSearch::new("idlink-no-such-fd-binary");
        let id = Identifier::parse("20240101T120000").unwrap();
        assert!(fd.find_by_identifier(temp.path(), &id, true).is_empty());
    }

    #[test]
    fn test_fd_search_when_installed() {
        let Some(fd) = FdSearch::detect() else {
            return;
        };
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/20240101T120000--deep.org"), "").unwrap();
        fs::write(temp.path().join("20240101T120000--top.org"), "").unwrap();
        fs::write(temp.path().join("20240101T120000--top.org~"), "").unwrap();
        let id = Identifier::parse("20240101T120000").unwrap();

        let shallow = fd.find_by_identifier(temp.path(), &id, false);
        assert_eq!(shallow, vec![PathBuf::from("20240101T120000--top.org")]);

        let deep = fd.find_by_identifier(temp.path(), &id, true);
        assert_eq!(deep.len(), 2);
    }
}
