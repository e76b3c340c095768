//! # RPS Assembly — Canonical `Rps` Fragment Production
//!
//! Converts one typed invoice-request record into the `<Rps><InfRps>…`
//! fragment the lot envelope carries. Deterministic and pure: identical
//! inputs produce identical bytes.
//!
//! ## Child Order Inside `InfRps`
//!
//! IdentificacaoRps, RpsSubstituido?, DataEmissao, NaturezaOperacao,
//! RegimeEspecialTributacao?, OptanteSimplesNacional, IncentivadorCultural,
//! Status, Servico, Prestador?, Tomador, Intermediario?, OrgaoGerador?,
//! ConstrucaoCivil?. The order is part of the wire contract.
//!
//! ## Value Rendering
//!
//! Inside `Servico/Valores`, currency amounts go through the two-decimal
//! formatter — except `IssRetido`, `ValorIssRetido`, `Aliquota`, and
//! `ValorLiquidoNfse`, which the service receives verbatim as supplied.
//! Those four are therefore `String` fields on [`Valores`]; routing them
//! through the formatter would change accepted wire bytes.
//!
//! ## Provider Injection
//!
//! The `Prestador` block is injected from the shared [`ProviderConfig`],
//! never taken from the record; a record assembled without a config carries
//! no provider block (the lot envelope identifies the provider instead).

use chrono::NaiveDateTime;
use ginfes_core::config::ProviderConfig;
use ginfes_core::error::AssemblyError;
use serde::{Deserialize, Serialize};

use crate::fields::{currency, emit, flag, fmt_currency, Field};
use crate::party::{
    emit_construcao_civil, emit_intermediario, emit_orgao_gerador, emit_tomador, ConstrucaoCivil,
    Intermediario, OrgaoGerador, Tomador,
};
use crate::writer::XmlBuilder;

/// Identification triple of an RPS (also used for the replaced-RPS
/// reference and the query-by-RPS operation).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RpsIdentification {
    /// Sequential RPS number.
    pub numero: u64,
    /// Series within the provider's numbering.
    pub serie: String,
    /// RPS type code (1 = RPS, 2 = mixed note, 3 = coupon).
    pub tipo: u8,
}

impl RpsIdentification {
    pub fn new(numero: u64, serie: impl Into<String>, tipo: u8) -> Self {
        Self {
            numero,
            serie: serie.into(),
            tipo,
        }
    }

    /// Emit as the named identification element.
    pub(crate) fn emit_as(
        &self,
        xml: &mut XmlBuilder,
        element: &str,
    ) -> Result<(), AssemblyError> {
        xml.open(element);
        emit(
            xml,
            &[
                Field::required("Numero", Some(self.numero.to_string())),
                Field::required("Serie", Some(self.serie.clone())),
                Field::required("Tipo", Some(self.tipo.to_string())),
            ],
        )?;
        xml.close(element);
        Ok(())
    }
}

/// Monetary values of the service block.
///
/// `f64` fields are currency amounts rendered with two decimals. The four
/// `String` fields pass through unformatted; the schema types them as a
/// flag (`IssRetido`), a percentage (`Aliquota`), and net amounts the
/// service recomputes, and existing deployments rely on the verbatim text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valores {
    /// Gross service value.
    pub valor_servicos: f64,
    pub valor_deducoes: Option<f64>,
    pub valor_pis: Option<f64>,
    pub valor_cofins: Option<f64>,
    pub valor_inss: Option<f64>,
    pub valor_ir: Option<f64>,
    pub valor_csll: Option<f64>,
    /// ISS-withheld flag, verbatim (1 = withheld, 2 = not withheld).
    pub iss_retido: Option<String>,
    pub valor_iss: Option<f64>,
    /// Withheld ISS amount, verbatim.
    pub valor_iss_retido: Option<String>,
    pub outras_retencoes: Option<f64>,
    pub base_calculo: Option<f64>,
    /// Rate, verbatim.
    pub aliquota: Option<String>,
    /// Net value, verbatim. Required by the schema.
    pub valor_liquido_nfse: String,
    pub desconto_incondicionado: Option<f64>,
    pub desconto_condicionado: Option<f64>,
}

impl Valores {
    /// Minimal values block: gross and net, nothing withheld.
    pub fn new(valor_servicos: f64, valor_liquido_nfse: impl Into<String>) -> Self {
        Self {
            valor_servicos,
            valor_deducoes: None,
            valor_pis: None,
            valor_cofins: None,
            valor_inss: None,
            valor_ir: None,
            valor_csll: None,
            iss_retido: None,
            valor_iss: None,
            valor_iss_retido: None,
            outras_retencoes: None,
            base_calculo: None,
            aliquota: None,
            valor_liquido_nfse: valor_liquido_nfse.into(),
            desconto_incondicionado: None,
            desconto_condicionado: None,
        }
    }

    fn emit(&self, xml: &mut XmlBuilder) -> Result<(), AssemblyError> {
        xml.open("Valores");
        emit(
            xml,
            &[
                Field::required("ValorServicos", Some(fmt_currency(self.valor_servicos))),
                Field::optional("ValorDeducoes", currency(self.valor_deducoes)),
                Field::optional("ValorPis", currency(self.valor_pis)),
                Field::optional("ValorCofins", currency(self.valor_cofins)),
                Field::optional("ValorInss", currency(self.valor_inss)),
                Field::optional("ValorIr", currency(self.valor_ir)),
                Field::optional("ValorCsll", currency(self.valor_csll)),
                Field::optional("IssRetido", self.iss_retido.clone()),
                Field::optional("ValorIss", currency(self.valor_iss)),
                Field::optional("ValorIssRetido", self.valor_iss_retido.clone()),
                Field::optional("OutrasRetencoes", currency(self.outras_retencoes)),
                Field::optional("BaseCalculo", currency(self.base_calculo)),
                Field::optional("Aliquota", self.aliquota.clone()),
                Field::required("ValorLiquidoNfse", Some(self.valor_liquido_nfse.clone())),
                Field::optional("DescontoIncondicionado", currency(self.desconto_incondicionado)),
                Field::optional("DescontoCondicionado", currency(self.desconto_condicionado)),
            ],
        )?;
        xml.close("Valores");
        Ok(())
    }
}

/// Service descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Servico {
    pub valores: Valores,
    /// Service item code from the national service list.
    pub item_lista_servico: String,
    pub codigo_cnae: Option<String>,
    pub codigo_tributacao_municipio: Option<String>,
    /// Free-text service description.
    pub discriminacao: String,
    /// IBGE code of the municipality where the service was provided.
    pub codigo_municipio: String,
}

impl Servico {
    fn emit(&self, xml: &mut XmlBuilder) -> Result<(), AssemblyError> {
        xml.open("Servico");
        self.valores.emit(xml)?;
        emit(
            xml,
            &[
                Field::required("ItemListaServico", Some(self.item_lista_servico.clone())),
                Field::optional("CodigoCnae", self.codigo_cnae.clone()),
                Field::optional(
                    "CodigoTributacaoMunicipio",
                    self.codigo_tributacao_municipio.clone(),
                ),
                Field::required("Discriminacao", Some(self.discriminacao.clone())),
                Field::required("CodigoMunicipio", Some(self.codigo_municipio.clone())),
            ],
        )?;
        xml.close("Servico");
        Ok(())
    }
}

/// One tax-invoice-request record, the precursor of an NFSe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rps {
    pub identificacao: RpsIdentification,
    /// Identification of the RPS this one supersedes, when replacing.
    pub rps_substituido: Option<RpsIdentification>,
    pub data_emissao: NaiveDateTime,
    /// Operation-nature code (1 = taxed in the municipality, …).
    pub natureza_operacao: u8,
    pub regime_especial_tributacao: Option<u8>,
    /// Simples Nacional participant.
    pub optante_simples_nacional: bool,
    /// Cultural-incentive beneficiary.
    pub incentivador_cultural: bool,
    /// RPS status code (1 = normal, 2 = cancelled).
    pub status: u8,
    pub servico: Servico,
    pub tomador: Option<Tomador>,
    pub intermediario: Option<Intermediario>,
    pub orgao_gerador: Option<OrgaoGerador>,
    pub construcao_civil: Option<ConstrucaoCivil>,
}

impl Rps {
    /// Render the `<Rps>` fragment, prolog-free.
    ///
    /// With a config the provider block is injected between the service and
    /// taker blocks; without one it is omitted (lot submission identifies
    /// the provider on the envelope).
    ///
    /// # Errors
    ///
    /// [`AssemblyError::MissingTaxId`] when a party block carries neither
    /// identifier; [`AssemblyError::MissingField`] when a schema-required
    /// field is empty.
    pub fn render(&self, config: Option<&ProviderConfig>) -> Result<String, AssemblyError> {
        let mut xml = XmlBuilder::new();
        xml.open("Rps").open("InfRps");

        self.identificacao.emit_as(&mut xml, "IdentificacaoRps")?;
        if let Some(substituido) = &self.rps_substituido {
            substituido.emit_as(&mut xml, "RpsSubstituido")?;
        }
        emit(
            &mut xml,
            &[
                Field::required(
                    "DataEmissao",
                    Some(self.data_emissao.format("%Y-%m-%dT%H:%M:%S").to_string()),
                ),
                Field::required("NaturezaOperacao", Some(self.natureza_operacao.to_string())),
                Field::optional(
                    "RegimeEspecialTributacao",
                    self.regime_especial_tributacao.map(|v| v.to_string()),
                ),
                Field::required(
                    "OptanteSimplesNacional",
                    Some(flag(self.optante_simples_nacional)),
                ),
                Field::required("IncentivadorCultural", Some(flag(self.incentivador_cultural))),
                Field::required("Status", Some(self.status.to_string())),
            ],
        )?;
        self.servico.emit(&mut xml)?;
        if let Some(config) = config {
            xml.open("Prestador");
            emit(
                &mut xml,
                &[
                    Field::optional(
                        "Cnpj",
                        Some(config.cnpj.clone()).filter(|c| !c.is_empty()),
                    ),
                    Field::required(
                        "InscricaoMunicipal",
                        Some(config.inscricao_municipal.clone()),
                    ),
                ],
            )?;
            xml.close("Prestador");
        }
        emit_tomador(&mut xml, self.tomador.as_ref())?;
        emit_intermediario(&mut xml, self.intermediario.as_ref())?;
        emit_orgao_gerador(&mut xml, self.orgao_gerador.as_ref())?;
        emit_construcao_civil(&mut xml, self.construcao_civil.as_ref())?;

        xml.close("InfRps").close("Rps");
        Ok(xml.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ginfes_core::identity::TaxId;

    fn minimal_rps() -> Rps {
        Rps {
            identificacao: RpsIdentification::new(1, "1", 1),
            rps_substituido: None,
            data_emissao: NaiveDate::from_ymd_opt(2020, 6, 1)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
            natureza_operacao: 1,
            regime_especial_tributacao: None,
            optante_simples_nacional: true,
            incentivador_cultural: false,
            status: 1,
            servico: Servico {
                valores: Valores::new(100.0, "100"),
                item_lista_servico: "101".to_string(),
                codigo_cnae: None,
                codigo_tributacao_municipio: None,
                discriminacao: "svc".to_string(),
                codigo_municipio: "3550308".to_string(),
            },
            tomador: Some(Tomador {
                tax_id: Some(TaxId::cnpj("11222333000181")),
                inscricao_municipal: None,
                razao_social: "Empresa Exemplo Ltda".to_string(),
                endereco: None,
                contato: None,
            }),
            intermediario: None,
            orgao_gerador: None,
            construcao_civil: None,
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let rps = minimal_rps();
        assert_eq!(rps.render(None).unwrap(), rps.render(None).unwrap());
    }

    #[test]
    fn test_root_shape_and_no_prolog() {
        let out = minimal_rps().render(None).unwrap();
        assert!(out.starts_with("<Rps><InfRps>"));
        assert!(out.ends_with("</InfRps></Rps>"));
        assert!(!out.contains("<?xml"));
    }

    #[test]
    fn test_header_field_order() {
        let out = minimal_rps().render(None).unwrap();
        assert!(out.contains(
            "<DataEmissao>2020-06-01T10:30:00</DataEmissao>\
             <NaturezaOperacao>1</NaturezaOperacao>\
             <OptanteSimplesNacional>1</OptanteSimplesNacional>\
             <IncentivadorCultural>2</IncentivadorCultural>\
             <Status>1</Status>"
        ));
    }

    #[test]
    fn test_substituted_rps_follows_identification() {
        let mut rps = minimal_rps();
        rps.rps_substituido = Some(RpsIdentification::new(9, "1", 1));
        let out = rps.render(None).unwrap();
        let ident_end = out.find("</IdentificacaoRps>").unwrap();
        let subst_at = out.find("<RpsSubstituido>").unwrap();
        let emissao_at = out.find("<DataEmissao>").unwrap();
        assert!(ident_end < subst_at && subst_at < emissao_at);
        assert!(out.contains("<RpsSubstituido><Numero>9</Numero>"));
    }

    #[test]
    fn test_absent_optionals_leave_no_empty_elements() {
        let out = minimal_rps().render(None).unwrap();
        for tag in [
            "RpsSubstituido",
            "RegimeEspecialTributacao",
            "ValorDeducoes",
            "CodigoCnae",
            "Intermediario",
            "OrgaoGerador",
            "ConstrucaoCivil",
            "Prestador",
        ] {
            assert!(!out.contains(&format!("<{tag}")), "unexpected <{tag}>");
        }
    }

    #[test]
    fn test_currency_formatted_and_passthrough_fields() {
        let mut rps = minimal_rps();
        rps.servico.valores.valor_deducoes = Some(10.5);
        rps.servico.valores.base_calculo = Some(89.5);
        rps.servico.valores.aliquota = Some("0.0250".to_string());
        rps.servico.valores.iss_retido = Some("2".to_string());
        let out = rps.render(None).unwrap();
        assert!(out.contains("<ValorServicos>100.00</ValorServicos>"));
        assert!(out.contains("<ValorDeducoes>10.50</ValorDeducoes>"));
        assert!(out.contains("<BaseCalculo>89.50</BaseCalculo>"));
        // Pass-through fields keep the caller's text byte-for-byte.
        assert!(out.contains("<Aliquota>0.0250</Aliquota>"));
        assert!(out.contains("<IssRetido>2</IssRetido>"));
        assert!(out.contains("<ValorLiquidoNfse>100</ValorLiquidoNfse>"));
    }

    #[test]
    fn test_provider_block_injected_from_config() {
        let config = ProviderConfig::new("99999999000191", "12345", "3525904");
        let out = minimal_rps().render(Some(&config)).unwrap();
        assert!(out.contains(
            "<Prestador><Cnpj>99999999000191</Cnpj>\
             <InscricaoMunicipal>12345</InscricaoMunicipal></Prestador>"
        ));
        // Provider sits between the service and taker blocks.
        let servico_end = out.find("</Servico>").unwrap();
        let prestador_at = out.find("<Prestador>").unwrap();
        let tomador_at = out.find("<Tomador>").unwrap();
        assert!(servico_end < prestador_at && prestador_at < tomador_at);
    }

    #[test]
    fn test_provider_block_without_cnpj_omits_element() {
        let config = ProviderConfig::new("", "12345", "3525904");
        let out = minimal_rps().render(Some(&config)).unwrap();
        assert!(out.contains("<Prestador><InscricaoMunicipal>12345</InscricaoMunicipal></Prestador>"));
    }

    #[test]
    fn test_no_taker_emits_empty_tomador_element() {
        let mut rps = minimal_rps();
        rps.tomador = None;
        let out = rps.render(None).unwrap();
        assert!(out.contains("<Tomador></Tomador>"));
    }

    #[test]
    fn test_special_regime_emitted_when_set() {
        let mut rps = minimal_rps();
        rps.regime_especial_tributacao = Some(6);
        let out = rps.render(None).unwrap();
        assert!(out.contains(
            "<RegimeEspecialTributacao>6</RegimeEspecialTributacao><OptanteSimplesNacional>"
        ));
    }

    #[test]
    fn test_description_is_escaped() {
        let mut rps = minimal_rps();
        rps.servico.discriminacao = "suporte & manutenção".to_string();
        let out = rps.render(None).unwrap();
        assert!(out.contains("<Discriminacao>suporte &amp; manutenção</Discriminacao>"));
    }
}
