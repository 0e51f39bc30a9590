//! Error types shared across the service.
//!
//! Each domain gets its own `thiserror` enum; handlers translate these into
//! HTTP status codes at the boundary. Numeric parse failures inside the
//! scoring/pricing/gap heuristics are deliberately *not* errors; those are
//! swallowed where they occur and the affected contribution is skipped.

use thiserror::Error;

/// Errors raised while resolving configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is missing.
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired {
        /// Environment variable name.
        key: String,
        /// What to do about it.
        hint: String,
    },

    /// A variable is present but unusable.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue {
        /// Environment variable name.
        key: String,
        /// Why the value was rejected.
        message: String,
    },
}

/// Errors raised by the catalog/history store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The data directory could not be created.
    #[error("Failed to prepare data directory '{path}': {source}")]
    DataDir {
        /// Directory we tried to create.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A collection could not be written back to disk.
    #[error("Failed to persist {collection} to '{path}': {reason}")]
    Persist {
        /// Which collection failed ("products" or "proposals").
        collection: &'static str,
        /// File path of the snapshot.
        path: String,
        /// Underlying failure.
        reason: String,
    },
}

/// Errors raised while turning uploads into usable data.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The uploaded catalog file could not be parsed as CSV.
    #[error("Catalog parse error: {0}")]
    Csv(#[from] csv::Error),

    /// The uploaded tender document could not be read as a PDF.
    #[error("Document extraction failed: {reason}")]
    Pdf {
        /// Underlying parser failure.
        reason: String,
    },

    /// The upload is neither a PDF nor valid UTF-8 text.
    #[error("Unsupported document: not a PDF and not valid UTF-8 text")]
    UnsupportedDocument,
}

/// Errors raised while starting or running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Host/port did not form a socket address.
    #[error("Invalid listen address '{addr}': {reason}")]
    InvalidAddress {
        /// The address we tried to parse.
        addr: String,
        /// Why parsing failed.
        reason: String,
    },

    /// The listener could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address we tried to bind.
        addr: std::net::SocketAddr,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The accept loop failed.
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while rendering a proposal document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The assembled PDF could not be encoded or written.
    #[error("Failed to build proposal PDF: {reason}")]
    Pdf {
        /// Underlying writer failure.
        reason: String,
    },
}
