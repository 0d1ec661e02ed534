//! Resolution module
//!
//! - segment: rebuild a path component by component
//! - store: recursive search of the configured directories
//! - cascade: ordered stages, first success wins
//! - api: the resolve command

pub mod api;
pub mod cascade;
pub mod segment;
pub mod store;
