// src/errors.rs

//! Crate-wide error types and aliases.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcdogError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("process table query failed: {0}")]
    ProcessTable(String),

    #[error("failed to signal pid {pid}: {reason}")]
    Signal { pid: u32, reason: String },

    /// The only fatal engine outcome: processes survived both the graceful
    /// and the forced signal phase. The cycle must stop here, before any
    /// relaunch, so the caller can intervene.
    #[error("processes survived graceful and forced termination: {survivors:?}")]
    TerminationFailed { survivors: Vec<u32> },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ProcdogError>;
