//! Links module - find and resolve links embedded in text files

pub mod api;
pub mod parse;
