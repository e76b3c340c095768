//! # Lot Envelope — 1..=50 RPS per Submission
//!
//! Wraps assembled RPS fragments into the `EnviarLoteRpsEnvio` envelope.
//! Assembly is all-or-nothing: the size check runs before any record is
//! rendered, and a failing record aborts the whole lot. No partial batch
//! is ever produced.

use ginfes_core::config::ProviderConfig;
use ginfes_core::error::AssemblyError;

use crate::rps::Rps;
use crate::writer::{XmlBuilder, XmlDocument};

/// Protocol limit on RPS records per lot. The service has no streaming or
/// partial-batch semantics; larger submissions must be split by the caller.
pub const MAX_RPS_PER_LOT: usize = 50;

/// Assemble the lot envelope for 1..=50 records.
///
/// Records are rendered in caller order, each with the provider block
/// injected from `config`; the declared `QuantidadeRps` always equals the
/// record count.
///
/// # Errors
///
/// [`AssemblyError::BatchTooLarge`] for more than 50 records, before any
/// rendering; any record's assembly error otherwise.
pub fn assemble_batch(
    records: &[Rps],
    lote: &str,
    config: &ProviderConfig,
) -> Result<XmlDocument, AssemblyError> {
    if records.len() > MAX_RPS_PER_LOT {
        return Err(AssemblyError::BatchTooLarge {
            count: records.len(),
        });
    }

    let mut lista = String::new();
    for rps in records {
        lista.push_str(&rps.render(Some(config))?);
    }

    let mut xml = XmlBuilder::new();
    xml.open_with_attrs("EnviarLoteRpsEnvio", &config.namespace_attrs())
        .open_with_attrs("LoteRps", &[("Id", lote), ("versao", "1.00")])
        .leaf("NumeroLote", lote)
        .leaf("Cnpj", &config.cnpj)
        .leaf("InscricaoMunicipal", &config.inscricao_municipal)
        .leaf("QuantidadeRps", &records.len().to_string())
        .open("ListaRps")
        .raw(&lista)
        .close("ListaRps")
        .close("LoteRps")
        .close("EnviarLoteRpsEnvio");
    Ok(xml.finish_document())
}
