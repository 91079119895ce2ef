//! shexplain: explain a shell command, token by token.
//!
//! A command string is parsed with tree-sitter-bash into leaf groups of typed
//! [`parse::AstNode`]s, each carrying its byte span in the original string.
//! Two independent consumers turn those nodes into output: the explanation
//! generator ([`explain::generate`]) produces one description per node, and
//! the span highlighter ([`highlight::highlight`]) decorates each node's slice
//! of the command so the two can be read side by side.
//!
//! # Architecture
//!
//! - **[`parse`]**: Shell parsing: tree-sitter walker, word helpers, node types.
//! - **[`knowledge`]**: Program, subcommand and option knowledge, built from configuration.
//! - **[`explain`]**: Explanation records and their text rendering.
//! - **[`highlight`]**: Span decoration and the [`highlight::Decorator`] styling seam.
//! - **[`console`]**: Prompting, printing, and the "No result" path.
//! - **[`config`]**: Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]**: File logging to `~/.local/share/shexplain/shexplain.log`.

/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Interactive prompt and terminal rendering.
pub mod console;
/// Error type shared across the crate.
pub mod error;
/// Explanation generator: per-node records and block rendering.
pub mod explain;
/// Span highlighter and decoration styles.
pub mod highlight;
/// Knowledge registry: what programs and options mean.
pub mod knowledge;
/// File-based logging.
pub mod logging;
/// Shell command parsing: tree-sitter AST, word helpers, node types.
pub mod parse;

pub use error::{Error, Result};

use parse::ExplainResponse;

/// Parse a command against the default knowledge base.
///
/// This is the main entry point for tests and simple usage.
/// For CLI usage with a user config, build the registry directly.
pub fn explain(command: &str) -> Result<ExplainResponse> {
    let config = config::Config::default_config();
    let registry = knowledge::Registry::from_config(&config);
    parse::parse(command, &registry)
}
