//! Workspace base error type.
//!
//! Sub-crates define their own error enums and either wrap `CoreError` as one
//! variant or keep it separate.  Prefer whichever keeps error sites clean.

use thiserror::Error;

/// The base error type for `av-core` and a common variant for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `av-core`.
pub type CoreResult<T> = Result<T, CoreError>;
