//! # Error Types: Generation Error Taxonomy
//!
//! Defines the error types used throughout routegen. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Propagation
//!
//! - Per-route and per-field errors (`UnresolvableHandler`,
//!   `NoValidationSource`, `UnsupportedRule`) are recovered where they occur:
//!   the pipeline degrades to an empty rule mapping or drops one failure
//!   scenario and keeps going. They surface in the run summary.
//! - `OutputWriteFailure` is the only fatal variant during a run. Nothing
//!   written before it is assumed valid.
//! - `Snapshot` and `Serialization` fail before or after generation and
//!   abort the invocation.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for routegen.
#[derive(Error, Debug)]
pub enum RouteGenError {
    /// The handler reference is not a reflectable `Class@method` string.
    #[error("unresolvable handler '{reference}': closures carry no validation request")]
    UnresolvableHandler {
        /// The handler reference as the router reports it.
        reference: String,
    },

    /// No parameter of the handler exposes validation rules.
    #[error("no validation source for handler '{reference}'")]
    NoValidationSource {
        /// The `Class@method` reference that was inspected.
        reference: String,
    },

    /// None of a field's rule tokens has a failure-synthesis strategy.
    #[error("unsupported rule list for field '{field}': [{}]", tokens.join(", "))]
    UnsupportedRule {
        /// Field whose failure scenario was skipped.
        field: String,
        /// Raw tokens declared for the field.
        tokens: Vec<String>,
    },

    /// The output location could not be created or written.
    #[error("failed to write generated tests to {}: {source}", path.display())]
    OutputWriteFailure {
        /// Directory or file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The route snapshot could not be read or parsed.
    #[error("route snapshot error: {0}")]
    Snapshot(String),

    /// Serialization of a generated artifact failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RouteGenError {
    /// Whether this error aborts the run rather than degrading one route or field.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::OutputWriteFailure { .. } | Self::Snapshot(_) | Self::Serialization(_)
        )
    }
}
