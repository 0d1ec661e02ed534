//! Identifier module
//!
//! - codec: generate, extract, embed and strip identifiers
//! - filter: which directory entries may be search results
//! - entity: decompose a name into its parts
//! - api: the `id` subcommands

pub mod api;
pub mod codec;
pub mod entity;
pub mod filter;
