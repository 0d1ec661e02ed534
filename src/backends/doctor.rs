//! Doctor - search tool and directory checks

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::backends::fd::get_fd_command;
use crate::backends::search::select_strategy;
use crate::core::config::Config;
use crate::core::model::{Confidence, Issue, ResultItem, ResultSet};
use crate::core::paths::normalize_path;
use crate::core::render::{RenderConfig, Renderer};

/// Dependency status
#[derive(Debug, Clone)]
pub struct DependencyStatus {
    pub name: String,
    pub command: Option<String>,
    pub required: bool,
    pub notes: Option<String>,
}

impl DependencyStatus {
    pub fn available(&self) -> bool {
        self.command.is_some()
    }

    pub fn to_result_item(&self) -> ResultItem {
        let status = if self.available() { "✓" } else { "✗" };
        let required = if self.required {
            "required"
        } else {
            "optional"
        };

        let mut message = format!(
            "{} {} ({}) - {}",
            status,
            self.name,
            required,
            self.command
                .as_ref()
                .map(|c| format!("found: {}", c))
                .unwrap_or_else(|| "not found".to_string())
        );
        if let Some(notes) = &self.notes {
            message = format!("{}\n  Note: {}", message, notes);
        }

        let mut item = ResultItem::check(message);
        if !self.available() {
            item = item.with_confidence(Confidence::Low);
            if self.required {
                item = item.with_error(Issue::new(
                    "MISSING_DEPENDENCY",
                    format!("{} is required but not found", self.name),
                ));
            }
        }
        item
    }
}

/// Check external tools
pub fn check_dependencies() -> Vec<DependencyStatus> {
    vec![DependencyStatus {
        name: "fd".to_string(),
        command: get_fd_command().map(str::to_string),
        required: false,
        notes: Some(
            "Without fd, identifier search walks directories in-process. \
             Install: brew install fd / apt install fd-find / cargo install fd-find"
                .to_string(),
        ),
    }]
}

/// Check one configured directory
pub fn check_dir(role: &str, dir: &Path) -> ResultItem {
    let shown = normalize_path(dir);
    if dir.is_dir() {
        ResultItem::check(format!("✓ {} {}", role, shown)).with_path(shown)
    } else {
        let code = if dir.exists() {
            "NOT_A_DIRECTORY"
        } else {
            "MISSING_DIRECTORY"
        };
        ResultItem::check(format!("✗ {} {}", role, shown))
            .with_path(shown.clone())
            .with_confidence(Confidence::Low)
            .with_error(Issue::new(code, format!("{} {} is unusable", role, shown)))
    }
}

/// Collect every doctor check for `config`
pub fn collect_checks(config: &Config) -> ResultSet {
    let mut result_set: ResultSet = check_dependencies()
        .iter()
        .map(DependencyStatus::to_result_item)
        .collect();

    let backend = select_strategy(config.search_backend);
    result_set.push(ResultItem::check(format!(
        "search backend: {:?} (configured: {:?})",
        backend.source_mode(),
        config.search_backend
    )));

    if config.store_dirs.is_empty() {
        result_set.push(
            ResultItem::check("✗ no store directory configured".to_string())
                .with_confidence(Confidence::Low),
        );
    }
    for dir in &config.store_dirs {
        result_set.push(check_dir("store", dir));
    }

    let extra: Vec<&PathBuf> = config
        .search_dirs
        .iter()
        .filter(|d| !config.store_dirs.contains(d))
        .collect();
    for dir in extra {
        result_set.push(check_dir("search", dir));
    }

    result_set
}

/// Run the doctor command
pub fn run_doctor(config: &Config, render: RenderConfig) -> Result<()> {
    let result_set = collect_checks(config);
    Renderer::new(render).print(&result_set);

    if result_set.has_errors() {
        eprintln!("\n⚠️  Some configured directories are unusable!");
    }
    Ok(())
}
