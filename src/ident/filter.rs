//! Search-result eligibility

use std::path::Path;

/// Editor backup files (`name~`) and empty names are never search results
pub fn is_eligible(name: &str) -> bool {
    !name.is_empty() && !name.ends_with('~')
}

/// `is_eligible` applied to the final component of a path
pub fn is_eligible_path(path: &Path) -> bool {
    path.file_name()
        .map(|n| is_eligible(&n.to_string_lossy()))
        .unwrap_or(false)
}
