//! # ginfes-core — Foundational Types for the Ginfes NFSe Stack
//!
//! This crate is the bedrock of the workspace. It defines the protocol
//! contract that every other crate builds on: the error hierarchy, taxpayer
//! identity newtypes, provider configuration, the lot/cancellation status
//! code tables, and the logical-to-wire operation mapping for the Ginfes
//! municipal web service (ABRASF schema dialect).
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for taxpayer identifiers.** `Cnpj`, `Cpf`, and the
//!    either-or `TaxId` — no bare strings for identifiers that the remote
//!    schema distinguishes structurally.
//!
//! 2. **Status codes as enums.** `LotStatus` and `CancellationReason` carry
//!    the canonical code-to-meaning mapping; consumers never compare bare
//!    integers against magic numbers.
//!
//! 3. **Operations as data.** `Operation` declares its wire identifier,
//!    protocol version, and whether the deployment signs and validates the
//!    payload. Signing participation varies across municipal deployments,
//!    so it is a declared property of the operation, never control flow
//!    buried in a method body.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ginfes-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod identity;
pub mod operation;
pub mod status;

// Re-export primary types for ergonomic imports.
pub use config::ProviderConfig;
pub use error::{
    AssemblyError, CryptoError, GinfesError, SchemaValidationError, SigningError, TransportError,
};
pub use identity::{Cnpj, Cpf, TaxId};
pub use operation::{Operation, ProtocolVersion};
pub use status::{CancellationReason, LotStatus};
