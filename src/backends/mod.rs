//! Backends module - identifier search and filesystem scanning
//!
//! Provides:
//! - search: the search strategy seam and the find command
//! - fd: fd/fdfind integration
//! - walk: in-process directory walk
//! - scan: list identified entries
//! - doctor: tool and directory checks

pub mod doctor;
pub mod fd;
pub mod scan;
pub mod search;
pub mod walk;
