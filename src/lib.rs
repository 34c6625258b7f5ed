//! topicharvest - materialize GitHub topic search results as local folders
//!
//! Each non-fork repository matching the search gets a directory named after
//! its sanitized qualified name, holding an `info.txt` marker with the URL and
//! description. The search and the filesystem are injected through the traits
//! in [`ports`].

pub mod adapters;
pub mod app;
pub mod cleanup;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod menu;
pub mod pipeline;
pub mod ports;
pub mod processor;

// Re-exports for ergonomics
pub use domain::*;
pub use error::*;
