//! # Query Envelopes
//!
//! Small envelopes for the synchronous query operations. These skip the
//! record and lot assemblers entirely; they still flow through the signing
//! orchestrator (with whatever plan the operation declares, possibly empty)
//! and the dispatcher.

use chrono::NaiveDate;
use ginfes_core::config::ProviderConfig;
use ginfes_core::identity::TaxId;
use serde::{Deserialize, Serialize};

use crate::rps::RpsIdentification;
use crate::writer::{XmlBuilder, XmlDocument};

/// Optional taker filter on the period query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TomadorFilter {
    /// CNPJ or CPF of the taker.
    pub tax_id: TaxId,
    /// Municipal registration, when known.
    pub inscricao_municipal: Option<String>,
}

fn emit_prestador(xml: &mut XmlBuilder, config: &ProviderConfig) {
    xml.open("Prestador")
        .leaf("Cnpj", &config.cnpj)
        .leaf("InscricaoMunicipal", &config.inscricao_municipal)
        .close("Prestador");
}

/// `ConsultarSituacaoLoteRpsEnvio` — lot processing situation by protocol
/// number.
pub fn assemble_situacao_lote(protocolo: &str, config: &ProviderConfig) -> XmlDocument {
    let mut xml = XmlBuilder::new();
    xml.open_with_attrs("ConsultarSituacaoLoteRpsEnvio", &config.namespace_attrs());
    emit_prestador(&mut xml, config);
    xml.leaf("Protocolo", protocolo)
        .close("ConsultarSituacaoLoteRpsEnvio");
    xml.finish_document()
}

/// `ConsultarLoteRpsEnvio` — full lot result by protocol number.
pub fn assemble_consulta_lote(protocolo: &str, config: &ProviderConfig) -> XmlDocument {
    let mut xml = XmlBuilder::new();
    xml.open_with_attrs("ConsultarLoteRpsEnvio", &config.namespace_attrs());
    emit_prestador(&mut xml, config);
    xml.leaf("Protocolo", protocolo).close("ConsultarLoteRpsEnvio");
    xml.finish_document()
}

/// `ConsultarNfseEnvio` — issued NFSe by emission period, optionally
/// narrowed to one taker.
pub fn assemble_consulta_nfse(
    inicio: NaiveDate,
    fim: NaiveDate,
    tomador: Option<&TomadorFilter>,
    config: &ProviderConfig,
) -> XmlDocument {
    let mut xml = XmlBuilder::new();
    xml.open_with_attrs("ConsultarNfseEnvio", &config.namespace_attrs());
    emit_prestador(&mut xml, config);
    xml.open("PeriodoEmissao")
        .leaf("DataInicial", &inicio.format("%Y-%m-%d").to_string())
        .leaf("DataFinal", &fim.format("%Y-%m-%d").to_string())
        .close("PeriodoEmissao");
    if let Some(tom) = tomador {
        xml.open("Tomador")
            .open("CpfCnpj")
            .leaf(tom.tax_id.element_name(), tom.tax_id.value())
            .close("CpfCnpj");
        if let Some(im) = &tom.inscricao_municipal {
            xml.leaf("InscricaoMunicipal", im);
        }
        xml.close("Tomador");
    }
    xml.close("ConsultarNfseEnvio");
    xml.finish_document()
}

/// `ConsultarNfseRpsEnvio` — the NFSe generated for one RPS identification.
pub fn assemble_consulta_por_rps(
    identificacao: &RpsIdentification,
    config: &ProviderConfig,
) -> XmlDocument {
    let mut xml = XmlBuilder::new();
    xml.open_with_attrs("ConsultarNfseRpsEnvio", &config.namespace_attrs())
        .open("IdentificacaoRps")
        .leaf("Numero", &identificacao.numero.to_string())
        .leaf("Serie", &identificacao.serie)
        .leaf("Tipo", &identificacao.tipo.to_string())
        .close("IdentificacaoRps");
    emit_prestador(&mut xml, config);
    xml.close("ConsultarNfseRpsEnvio");
    xml.finish_document()
}
