//! # Dispatcher — Strip, Validate, Resolve, Send
//!
//! One operation-agnostic tail for every operation: strip any XML prolog
//! the signer may have added, validate against the deployment schema when
//! the operation participates in validation, resolve the logical operation
//! to its wire identifier, and hand the payload to the sender. The raw
//! response comes back unmodified.
//!
//! Validation failure blocks the network call; a transport error is the
//! only failure possible after validation has passed.

use ginfes_core::config::ProviderConfig;
use ginfes_core::error::GinfesError;
use ginfes_core::operation::Operation;
use ginfes_xml::writer::XmlDocument;
use tracing::debug;

use crate::capability::{RawResponse, SchemaValidator, Sender, WireOperation};

/// Dispatch a signed document for the given operation.
pub fn dispatch<V: SchemaValidator, T: Sender>(
    validator: &V,
    sender: &T,
    config: &ProviderConfig,
    op: Operation,
    document: &XmlDocument,
) -> Result<RawResponse, GinfesError> {
    let payload = document.without_prolog();
    if op.validates() {
        validator.validate(&payload, &config.schema_path)?;
    }
    let wire = WireOperation::from(op);
    debug!(
        operation = wire.name,
        version = wire.version.as_str(),
        validated = op.validates(),
        payload_len = payload.as_str().len(),
        "dispatching"
    );
    let response = sender.send(&payload, &wire)?;
    Ok(response)
}

/// Validate a document for the given operation without sending it.
///
/// Used by the validate-only lot submission mode; applies the same prolog
/// stripping as [`dispatch`] so the validated bytes match what would be
/// sent.
pub fn validate_only<V: SchemaValidator>(
    validator: &V,
    config: &ProviderConfig,
    document: &XmlDocument,
) -> Result<(), GinfesError> {
    let payload = document.without_prolog();
    validator.validate(&payload, &config.schema_path)?;
    Ok(())
}
