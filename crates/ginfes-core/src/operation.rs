//! # Operation Table — Single Source of Truth
//!
//! Defines the `Operation` enum mapping each logical operation of the
//! Ginfes protocol to its wire identifier, protocol version, and its
//! participation in signing and schema validation. Every `match` on
//! `Operation` is exhaustive — adding an operation forces the dispatcher
//! and the signing-plan table to handle it at compile time.
//!
//! ## Design
//!
//! Not every operation is signed under this protocol, and which ones are
//! varies across municipal deployments. Participation is therefore declared
//! here as data rather than left as commented-out signing calls inside
//! operation bodies. The two operations dispatched without a signature are
//! also dispatched without schema validation.

use serde::{Deserialize, Serialize};

/// Wire protocol version an operation is dispatched under.
///
/// The service accepts V3 for everything except the legacy flat
/// cancellation, which still rides the V2 endpoint in some municipalities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolVersion {
    /// Legacy protocol version "2".
    V2,
    /// Current protocol version "3".
    V3,
}

impl ProtocolVersion {
    /// The version string the transport layer advertises.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V2 => "2",
            Self::V3 => "3",
        }
    }
}

/// All logical operations of the Ginfes protocol.
///
/// | Operation | Wire identifier | Version | Signed | Validated |
/// |---|---|---|---|---|
/// | RecepcionarLoteRps | RecepcionarLoteRpsV3 | V3 | yes | yes |
/// | ConsultarSituacaoLoteRps | ConsultarSituacaoLoteRpsV3 | V3 | yes | yes |
/// | ConsultarLoteRps | ConsultarLoteRpsV3 | V3 | no | no |
/// | ConsultarNfse | ConsultarNfseV3 | V3 | no | no |
/// | ConsultarNfsePorRps | ConsultarNfsePorRpsV3 | V3 | yes | yes |
/// | CancelarNfseV3 | CancelarNfseV3 | V3 | yes (nested) | yes |
/// | CancelarNfseV2 | CancelarNfse | V2 | yes | yes |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Submit a lot of 1..=50 RPS records (asynchronous).
    RecepcionarLoteRps,
    /// Query the processing situation of a submitted lot.
    ConsultarSituacaoLoteRps,
    /// Query the full result of a submitted lot.
    ConsultarLoteRps,
    /// Query issued NFSe by emission period and optional taker.
    ConsultarNfse,
    /// Query the NFSe generated for one RPS identification.
    ConsultarNfsePorRps,
    /// Cancel an issued NFSe (nested-signature V3 document).
    CancelarNfseV3,
    /// Cancel an issued NFSe (flat legacy V2 document).
    CancelarNfseV2,
}

impl Operation {
    /// The operation identifier sent on the wire.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::RecepcionarLoteRps => "RecepcionarLoteRpsV3",
            Self::ConsultarSituacaoLoteRps => "ConsultarSituacaoLoteRpsV3",
            Self::ConsultarLoteRps => "ConsultarLoteRpsV3",
            Self::ConsultarNfse => "ConsultarNfseV3",
            Self::ConsultarNfsePorRps => "ConsultarNfsePorRpsV3",
            Self::CancelarNfseV3 => "CancelarNfseV3",
            Self::CancelarNfseV2 => "CancelarNfse",
        }
    }

    /// The protocol version this operation rides on.
    pub fn version(self) -> ProtocolVersion {
        match self {
            Self::CancelarNfseV2 => ProtocolVersion::V2,
            _ => ProtocolVersion::V3,
        }
    }

    /// Whether the payload is validated against the schema before dispatch.
    ///
    /// Mirrors signing participation: the two operations dispatched with an
    /// empty signing plan skip validation as well.
    pub fn validates(self) -> bool {
        !matches!(self, Self::ConsultarLoteRps | Self::ConsultarNfse)
    }

    /// All operations, in protocol order.
    pub fn all() -> &'static [Operation] {
        &[
            Self::RecepcionarLoteRps,
            Self::ConsultarSituacaoLoteRps,
            Self::ConsultarLoteRps,
            Self::ConsultarNfse,
            Self::ConsultarNfsePorRps,
            Self::CancelarNfseV3,
            Self::CancelarNfseV2,
        ]
    }
}
