//! # Party Blocks — Taker, Intermediary, Issuing Authority, Works Site
//!
//! Value records and emission for the party blocks nested inside an RPS.
//! Each block has its own child order quirks, preserved exactly:
//!
//! - `Tomador` nests the `CpfCnpj` choice inside `IdentificacaoTomador`
//!   before the name; `Intermediario` puts `RazaoSocial` *before* the
//!   `CpfCnpj` choice inside its identification block.
//! - The `Contato` block appears only when at least one of phone/email is
//!   present.
//! - The `Tomador` element itself is always emitted, empty when the record
//!   carries no taker — the schema expects the element either way.

use ginfes_core::error::AssemblyError;
use ginfes_core::identity::{require_tax_id, TaxId};
use serde::{Deserialize, Serialize};

use crate::fields::{emit, Field};
use crate::writer::XmlBuilder;

/// Service taker (recipient).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tomador {
    /// CNPJ or CPF; assembly fails with `MissingTaxId` when neither is set.
    pub tax_id: Option<TaxId>,
    /// Municipal registration, when the taker has one.
    pub inscricao_municipal: Option<String>,
    /// Legal or trade name.
    pub razao_social: String,
    /// Address block.
    pub endereco: Option<Endereco>,
    /// Contact block.
    pub contato: Option<Contato>,
}

/// Taker address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endereco {
    /// Street.
    pub endereco: String,
    /// Street number.
    pub numero: String,
    /// Unit, floor, or other complement.
    pub complemento: Option<String>,
    /// Neighbourhood.
    pub bairro: String,
    /// IBGE municipality code.
    pub codigo_municipio: String,
    /// Two-letter state code.
    pub uf: String,
    /// Postal code.
    pub cep: String,
}

/// Taker contact details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contato {
    pub telefone: Option<String>,
    pub email: Option<String>,
}

impl Contato {
    /// The block is emitted only when it carries something.
    pub fn is_empty(&self) -> bool {
        self.telefone.is_none() && self.email.is_none()
    }
}

/// Brokering party on the transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intermediario {
    /// Legal or trade name.
    pub razao_social: String,
    /// CNPJ or CPF; assembly fails with `MissingTaxId` when neither is set.
    pub tax_id: Option<TaxId>,
    /// Municipal registration, when the intermediary has one.
    pub inscricao_municipal: Option<String>,
}

/// Issuing authority of the NFSe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgaoGerador {
    /// IBGE municipality code.
    pub codigo_municipio: String,
    /// Two-letter state code.
    pub uf: String,
}

/// Civil-construction works reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstrucaoCivil {
    /// Municipal works registration code.
    pub codigo_obra: String,
    /// Technical responsibility record (ART).
    pub art: String,
}

/// Emit the `CpfCnpj` choice block for whichever identifier is set.
fn emit_cpf_cnpj(
    xml: &mut XmlBuilder,
    tax_id: Option<&TaxId>,
    party: &str,
) -> Result<(), AssemblyError> {
    let tax_id = require_tax_id(tax_id, party)?;
    xml.open("CpfCnpj")
        .leaf(tax_id.element_name(), tax_id.value())
        .close("CpfCnpj");
    Ok(())
}

/// Emit the `Tomador` block. Always present as an element; empty when the
/// record has no taker.
pub fn emit_tomador(xml: &mut XmlBuilder, tomador: Option<&Tomador>) -> Result<(), AssemblyError> {
    let Some(tom) = tomador else {
        xml.open("Tomador").close("Tomador");
        return Ok(());
    };
    xml.open("Tomador");
    xml.open("IdentificacaoTomador");
    emit_cpf_cnpj(xml, tom.tax_id.as_ref(), "Tomador")?;
    emit(
        xml,
        &[Field::optional(
            "InscricaoMunicipal",
            tom.inscricao_municipal.clone(),
        )],
    )?;
    xml.close("IdentificacaoTomador");
    emit(
        xml,
        &[Field::required("RazaoSocial", Some(tom.razao_social.clone()))],
    )?;
    if let Some(end) = &tom.endereco {
        xml.open("Endereco");
        emit(
            xml,
            &[
                Field::required("Endereco", Some(end.endereco.clone())),
                Field::required("Numero", Some(end.numero.clone())),
                Field::optional("Complemento", end.complemento.clone()),
                Field::required("Bairro", Some(end.bairro.clone())),
                Field::required("CodigoMunicipio", Some(end.codigo_municipio.clone())),
                Field::required("Uf", Some(end.uf.clone())),
                Field::required("Cep", Some(end.cep.clone())),
            ],
        )?;
        xml.close("Endereco");
    }
    if let Some(contato) = tom.contato.as_ref().filter(|c| !c.is_empty()) {
        xml.open("Contato");
        emit(
            xml,
            &[
                Field::optional("Telefone", contato.telefone.clone()),
                Field::optional("Email", contato.email.clone()),
            ],
        )?;
        xml.close("Contato");
    }
    xml.close("Tomador");
    Ok(())
}

/// Emit the `Intermediario` block, when present.
pub fn emit_intermediario(
    xml: &mut XmlBuilder,
    intermediario: Option<&Intermediario>,
) -> Result<(), AssemblyError> {
    let Some(int) = intermediario else {
        return Ok(());
    };
    xml.open("Intermediario");
    xml.open("IdentificacaoIntermediario");
    // Name first, then the identifier choice — the one block ordered this way.
    emit(
        xml,
        &[Field::required("RazaoSocial", Some(int.razao_social.clone()))],
    )?;
    emit_cpf_cnpj(xml, int.tax_id.as_ref(), "Intermediario")?;
    emit(
        xml,
        &[Field::optional(
            "InscricaoMunicipal",
            int.inscricao_municipal.clone(),
        )],
    )?;
    xml.close("IdentificacaoIntermediario");
    xml.close("Intermediario");
    Ok(())
}

/// Emit the `OrgaoGerador` block, when present.
pub fn emit_orgao_gerador(
    xml: &mut XmlBuilder,
    orgao: Option<&OrgaoGerador>,
) -> Result<(), AssemblyError> {
    let Some(orgao) = orgao else {
        return Ok(());
    };
    xml.open("OrgaoGerador");
    emit(
        xml,
        &[
            Field::required("CodigoMunicipio", Some(orgao.codigo_municipio.clone())),
            Field::required("Uf", Some(orgao.uf.clone())),
        ],
    )?;
    xml.close("OrgaoGerador");
    Ok(())
}

/// Emit the `ConstrucaoCivil` block, when present.
pub fn emit_construcao_civil(
    xml: &mut XmlBuilder,
    obra: Option<&ConstrucaoCivil>,
) -> Result<(), AssemblyError> {
    let Some(obra) = obra else {
        return Ok(());
    };
    xml.open("ConstrucaoCivil");
    emit(
        xml,
        &[
            Field::required("CodigoObra", Some(obra.codigo_obra.clone())),
            Field::required("Art", Some(obra.art.clone())),
        ],
    )?;
    xml.close("ConstrucaoCivil");
    Ok(())
}
