//! Error type shared by the library and the binary.

use std::path::PathBuf;

use thiserror::Error;

/// Failures outside the explanation core: configuration, grammar loading,
/// terminal I/O and output encoding.
#[derive(Debug, Error)]
pub enum Error {
    /// A config file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config file is not valid TOML or has the wrong shape.
    #[error("config parse error in {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The merged config could not be rendered back to TOML.
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// A config path referenced an unset environment variable.
    #[error("failed to expand path: {0}")]
    PathExpand(#[from] shellexpand::LookupError<std::env::VarError>),

    /// The bash grammar is incompatible with the linked tree-sitter runtime.
    #[error("failed to load bash grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    /// The interactive prompt failed (e.g. no terminal attached).
    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// Writing to the output stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
