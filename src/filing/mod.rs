//! Filing module - operations that put identifiers into names on disk
//!
//! - tag: rename in place
//! - store: move or copy into a store directory

pub mod store;
pub mod tag;
