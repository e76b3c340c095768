//! # Taxpayer Identity Newtypes
//!
//! Newtype wrappers for the Brazilian taxpayer identifiers carried by NFSe
//! documents. These prevent accidental identifier confusion — you cannot
//! pass a CPF where a CNPJ is expected, and a party that must carry exactly
//! one of the two expresses that with `TaxId`.
//!
//! The Ginfes service distinguishes the two structurally: a `CpfCnpj` block
//! contains either a `<Cnpj>` or a `<Cpf>` child, never both and never
//! neither. `TaxId::element_name()` gives the schema element for whichever
//! variant is set.

use serde::{Deserialize, Serialize};

use crate::error::AssemblyError;

/// Brazilian legal-entity taxpayer identifier (14 digits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cnpj(pub String);

/// Brazilian individual taxpayer identifier (11 digits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cpf(pub String);

/// Exactly one of the two taxpayer identifiers a party may carry.
///
/// The remote schema rejects a `CpfCnpj` block with both or neither child,
/// so the either-or is encoded at the type level wherever the identifier is
/// known to be present. Party records where the identifier may be absent
/// hold an `Option<TaxId>` and fail assembly with
/// [`AssemblyError::MissingTaxId`] when it is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxId {
    /// Legal entity.
    Cnpj(Cnpj),
    /// Individual.
    Cpf(Cpf),
}

impl TaxId {
    /// Construct from a CNPJ string.
    pub fn cnpj(value: impl Into<String>) -> Self {
        Self::Cnpj(Cnpj(value.into()))
    }

    /// Construct from a CPF string.
    pub fn cpf(value: impl Into<String>) -> Self {
        Self::Cpf(Cpf(value.into()))
    }

    /// The schema element name for this identifier ("Cnpj" or "Cpf").
    pub fn element_name(&self) -> &'static str {
        match self {
            Self::Cnpj(_) => "Cnpj",
            Self::Cpf(_) => "Cpf",
        }
    }

    /// The identifier digits, verbatim as supplied by the caller.
    pub fn value(&self) -> &str {
        match self {
            Self::Cnpj(Cnpj(v)) => v,
            Self::Cpf(Cpf(v)) => v,
        }
    }
}

/// Resolve an optional tax id for a named party block, failing assembly
/// when neither identifier is present.
pub fn require_tax_id<'a>(
    tax_id: Option<&'a TaxId>,
    party: &str,
) -> Result<&'a TaxId, AssemblyError> {
    tax_id.ok_or_else(|| AssemblyError::MissingTaxId {
        party: party.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cnpj_element_name() {
        let id = TaxId::cnpj("99999999000191");
        assert_eq!(id.element_name(), "Cnpj");
        assert_eq!(id.value(), "99999999000191");
    }

    #[test]
    fn test_cpf_element_name() {
        let id = TaxId::cpf("12345678909");
        assert_eq!(id.element_name(), "Cpf");
        assert_eq!(id.value(), "12345678909");
    }

    #[test]
    fn test_require_tax_id_present() {
        let id = TaxId::cpf("12345678909");
        assert_eq!(require_tax_id(Some(&id), "Tomador").unwrap().value(), "12345678909");
    }

    #[test]
    fn test_require_tax_id_absent_names_party() {
        let err = require_tax_id(None, "Intermediario").unwrap_err();
        assert_eq!(
            err,
            AssemblyError::MissingTaxId {
                party: "Intermediario".to_string()
            }
        );
    }
}
