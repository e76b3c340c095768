//! # Cancellation Envelopes — Two Protocol Variants
//!
//! Builds the `CancelarNfseEnvio` documents. The two variants differ in
//! shape, not just version:
//!
//! - **V3** nests `InfPedidoCancelamento` (carrying the full municipal
//!   identification) inside `Pedido`, and downstream signing is two-layer:
//!   the inner element first, then the `Pedido` wrapper.
//! - **V2** is the flat legacy document — provider identity plus invoice
//!   number — signed in one step. Some municipalities (Guarulhos among
//!   them) reject V3 and still require this shape.
//!
//! Defaults follow the protocol: reason code 1 (issuance error) and a
//! request id equal to the invoice number.

use ginfes_core::config::ProviderConfig;
use ginfes_core::status::CancellationReason;
use serde::{Deserialize, Serialize};

use crate::writer::{XmlBuilder, XmlDocument};

/// A cancellation request as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationRequest {
    /// Number of the NFSe to cancel.
    pub numero: u64,
    /// Reason code; defaults to issuance error.
    pub codigo: CancellationReason,
    /// Request id; defaults to the invoice number.
    pub id: Option<String>,
}

impl CancellationRequest {
    pub fn new(numero: u64) -> Self {
        Self {
            numero,
            codigo: CancellationReason::default(),
            id: None,
        }
    }

    /// The id attribute of the inner request element.
    pub fn request_id(&self) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| self.numero.to_string())
    }
}

/// Assemble the nested V3 cancellation document (unsigned).
///
/// Shape: `CancelarNfseEnvio` > `Pedido` > `InfPedidoCancelamento Id=…` >
/// `IdentificacaoNfse` (number, provider CNPJ, municipal registration,
/// municipality code) + `CodigoCancelamento`.
pub fn assemble_cancellation_v3(
    request: &CancellationRequest,
    config: &ProviderConfig,
) -> XmlDocument {
    let id = request.request_id();
    let mut xml = XmlBuilder::new();
    xml.open_with_attrs("CancelarNfseEnvio", &config.namespace_attrs())
        .open("Pedido")
        .open_with_attrs("InfPedidoCancelamento", &[("Id", &id)])
        .open("IdentificacaoNfse")
        .leaf("Numero", &request.numero.to_string())
        .leaf("Cnpj", &config.cnpj)
        .leaf("InscricaoMunicipal", &config.inscricao_municipal)
        .leaf("CodigoMunicipio", &config.codigo_municipio)
        .close("IdentificacaoNfse")
        .leaf("CodigoCancelamento", &request.codigo.code().to_string())
        .close("InfPedidoCancelamento")
        .close("Pedido")
        .close("CancelarNfseEnvio");
    xml.finish_document()
}

/// Assemble the flat legacy V2 cancellation document (unsigned).
///
/// Shape: `CancelarNfseEnvio` > `Prestador` + `NumeroNfse`. No request id,
/// no reason code — the V2 endpoint accepts neither.
pub fn assemble_cancellation_v2(numero: u64, config: &ProviderConfig) -> XmlDocument {
    let mut xml = XmlBuilder::new();
    xml.open_with_attrs("CancelarNfseEnvio", &config.namespace_attrs())
        .open("Prestador")
        .leaf("Cnpj", &config.cnpj)
        .leaf("InscricaoMunicipal", &config.inscricao_municipal)
        .close("Prestador")
        .leaf("NumeroNfse", &numero.to_string())
        .close("CancelarNfseEnvio");
    xml.finish_document()
}
