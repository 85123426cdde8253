// Chunk: docs/chunks/scheme_definitions - Errors raised while building or loading schemes

//! Configuration-time errors.
//!
//! Labeling itself never fails. Everything here surfaces while schemes or the
//! engine configuration are being built or loaded.

use std::path::PathBuf;

/// Errors raised while building, compiling or loading a scheme.
#[derive(Debug, thiserror::Error)]
pub enum SchemeError {
    #[error("failed to read scheme file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scheme definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error("scheme `{scheme}` defines label `{label}` more than once")]
    DuplicateLabel { scheme: String, label: String },

    #[error("scheme `{scheme}` lists unknown label `{label}` in its precedence")]
    UnknownPrecedenceLabel { scheme: String, label: String },

    #[error("scheme `{scheme}` lists label `{label}` in its precedence more than once")]
    DuplicatePrecedenceLabel { scheme: String, label: String },

    #[error("scheme `{scheme}` maps unknown label `{label}` to a sub-scheme")]
    UnknownSubSchemeLabel { scheme: String, label: String },

    #[error("scheme `{scheme}` references unknown scheme `{referenced}`")]
    UnknownScheme { scheme: String, referenced: String },

    #[error("scheme `{scheme}` defines delimited label `{label}` without a start pattern")]
    MissingStartPattern { scheme: String, label: String },

    #[error("scheme `{scheme}` gives label `{label}` an invalid color `{color}`")]
    InvalidColor {
        scheme: String,
        label: String,
        color: String,
    },
}

/// Errors raised while loading a [`LabelerConfig`](crate::LabelerConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid labeler config: {0}")]
    Json(#[from] serde_json::Error),
}
