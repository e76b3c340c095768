//! # ginfes-client — Operation Layer
//!
//! Ties the assembled documents from `ginfes-xml` to the outside world:
//! capability traits for the concerns this workspace deliberately does not
//! implement (XMLDSig signing, XSD validation, certificate storage, SOAP
//! transport), the per-operation signing plans, the dispatcher, and the
//! [`GinfesClient`] facade exposing the protocol operations.
//!
//! ## Key Design Principles
//!
//! 1. **Composition over inheritance.** The four collaborators are injected
//!    as trait implementations; each logical operation supplies its own
//!    assembly and signing plan to one operation-agnostic dispatcher.
//!
//! 2. **Signing plans are data.** Which elements get signed, in what order,
//!    with which reference attribute and wrapper, is a declared ordered
//!    plan per operation — including the empty plan for operations this
//!    deployment dispatches unsigned.
//!
//! 3. **Fail before the network.** Size limits fail before assembly,
//!    assembly failures before signing, validation failures before the
//!    send. A transport error is the only failure that can occur after
//!    validation has passed.
//!
//! ## Crate Policy
//!
//! - Synchronous, single-threaded, request/response. The one blocking point
//!   is inside the injected [`Sender`].
//! - No retry, no caching, no timeout layer.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod capability;
pub mod client;
pub mod dispatch;
pub mod signing;

// Re-export primary types for ergonomic imports.
pub use capability::{
    Certificate, CertificateProvider, RawResponse, SchemaValidator, Sender, SignatureHash,
    SigningStep, WireOperation, XmlSigner,
};
pub use client::GinfesClient;
pub use dispatch::dispatch;
pub use signing::{run_plan, signing_plan, SigningPlan};
