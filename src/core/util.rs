//! Common utilities

use std::path::Path;
use std::time::SystemTime;

use crate::core::model::Meta;

/// Get file modification time in milliseconds since epoch
pub fn get_mtime_ms(path: &Path) -> std::io::Result<i64> {
    let metadata = std::fs::metadata(path)?;
    let mtime = metadata.modified()?;
    let duration = mtime
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    Ok(duration.as_millis() as i64)
}

/// Collect size/mtime/type metadata for an entry, skipping what can't be read
pub fn entry_meta(path: &Path) -> Meta {
    let mut meta = Meta::default();
    if let Ok(md) = std::fs::metadata(path) {
        meta.is_dir = Some(md.is_dir());
        if md.is_file() {
            meta.size = Some(md.len());
        }
    }
    if let Ok(mtime) = get_mtime_ms(path) {
        meta.mtime_ms = Some(mtime);
    }
    meta
}

/// Check if a command is available in PATH
pub fn command_exists(cmd: &str) -> bool {
    std::process::Command::new("which")
        .arg(cmd)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
