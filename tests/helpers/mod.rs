//! Shared helpers for the integration suite

pub mod source_fixtures;
pub mod tree_assertions;
