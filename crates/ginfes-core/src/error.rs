//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout the Ginfes stack. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Assembly errors fail before any signing or network work and carry the
//!   offending element or party so callers can fix the input record.
//! - Signer and sender failures are opaque: they are produced by injected
//!   collaborators and propagated unchanged.
//! - There is no partial success. A batch is fully assembled, signed,
//!   validated, and sent, or the call fails with exactly one of these.

use thiserror::Error;

/// Top-level error type for the Ginfes stack.
#[derive(Error, Debug)]
pub enum GinfesError {
    /// Document assembly failed before signing.
    #[error("assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    /// The injected signer failed.
    #[error("signing error: {0}")]
    Signing(#[from] SigningError),

    /// The signed document failed schema validation; the send was blocked.
    #[error("schema validation error: {0}")]
    SchemaValidation(#[from] SchemaValidationError),

    /// The injected sender failed after validation passed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Certificate retrieval failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

/// Error during XML document assembly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    /// A lot may carry at most 50 RPS records.
    #[error("lot holds {count} RPS records; the limit is 50 per lot")]
    BatchTooLarge {
        /// Number of records the caller supplied.
        count: usize,
    },

    /// A party block carried neither a CNPJ nor a CPF.
    #[error("party '{party}' has neither CNPJ nor CPF; exactly one is required")]
    MissingTaxId {
        /// Which party block was being assembled (e.g. "Tomador").
        party: String,
    },

    /// A schema-required field had no value on the input record.
    #[error("required element '{element}' has no value")]
    MissingField {
        /// The XML element name that could not be emitted.
        element: String,
    },
}

/// Opaque failure propagated unchanged from the injected signer.
#[derive(Error, Debug, Clone)]
#[error("{0}")]
pub struct SigningError(pub String);

/// A document was rejected by the schema validator.
///
/// Validation is a trust boundary: a document that fails here is never
/// handed to the sender.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct SchemaValidationError {
    /// Validator diagnostic, verbatim.
    pub message: String,
}

/// Opaque failure propagated unchanged from the injected sender.
#[derive(Error, Debug, Clone)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Certificate material could not be retrieved or parsed.
#[derive(Error, Debug, Clone)]
#[error("{0}")]
pub struct CryptoError(pub String);
