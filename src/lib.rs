//! hed-docs: search every HED documentation site at once.
//!
//! A thin application around the [`hed_search`] core:
//!
//! - **Config**: TOML file listing sources and ranking options, defaulting
//!   to the public HED sites
//! - **Output**: grouped plain-text or JSON rendering of merged results
//! - **CLI**: the `hed-docs-search` binary

pub mod config;
pub mod error;
pub mod output;

pub use config::AppConfig;
pub use error::{AppError, Result};
