//! # ginfes-xml — Canonical XML Production
//!
//! Converts typed invoice and cancellation records into the exact XML the
//! Ginfes service accepts. Everything the remote schema cares about is
//! produced here: element order, conditional field emission, currency
//! rendering, and the lot/cancellation/query envelope shapes.
//!
//! ## Key Design Principles
//!
//! 1. **Element order is the wire contract.** The service rejects documents
//!    with reordered children, so every block is emitted from a fixed
//!    sequence, never from a map.
//!
//! 2. **Presence policy as data.** Whether a missing field fails assembly
//!    or is silently omitted is declared per field in a table
//!    ([`fields::Field`]), not scattered through control flow. An absent
//!    optional never produces an empty element.
//!
//! 3. **Prolog-free output.** Assembled documents carry no XML declaration;
//!    payloads are embedded inside an outer envelope by the transport layer
//!    and the service rejects nested prologs.
//!
//! ## Crate Policy
//!
//! - Deterministic: identical inputs produce identical bytes.
//! - No IO, no signing, no network — signing and dispatch live in
//!   `ginfes-client`.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod batch;
pub mod cancel;
pub mod fields;
pub mod party;
pub mod query;
pub mod rps;
pub mod writer;

// Re-export primary types for ergonomic imports.
pub use batch::assemble_batch;
pub use cancel::{assemble_cancellation_v2, assemble_cancellation_v3, CancellationRequest};
pub use party::{ConstrucaoCivil, Contato, Endereco, Intermediario, OrgaoGerador, Tomador};
pub use query::TomadorFilter;
pub use rps::{Rps, RpsIdentification, Servico, Valores};
pub use writer::{XmlBuilder, XmlDocument};
