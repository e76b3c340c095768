//! # Field Tables — Presence Policy as Data
//!
//! The remote schema rejects both unexpected-missing and unexpected-present
//! elements, so each leaf field carries a declared presence policy instead
//! of an inline boolean at every call site. A block is emitted by handing
//! an ordered field table to [`emit`]:
//!
//! - `Required` with no value fails assembly with `MissingField`.
//! - `Optional` with no value is omitted entirely — never an empty element.
//! - An empty string counts as "no value" either way; the service treats
//!   `<Tag></Tag>` as a schema violation, not as absence.
//!
//! Currency amounts are rendered here with exactly two decimal digits and a
//! period separator regardless of locale. A small set of value fields is
//! deliberately *not* routed through the currency formatter (see
//! [`crate::rps::Valores`]).

use ginfes_core::error::AssemblyError;

use crate::writer::XmlBuilder;

/// Presence policy of one leaf field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Absence fails assembly.
    Required,
    /// Absence omits the element.
    Optional,
}

/// One leaf element in emission order: name, value, presence policy.
#[derive(Debug, Clone)]
pub struct Field {
    /// Schema element name.
    pub name: &'static str,
    /// Rendered value, if the input record carries one.
    pub value: Option<String>,
    /// What absence means for this field.
    pub presence: Presence,
}

impl Field {
    /// A field whose absence fails assembly.
    pub fn required(name: &'static str, value: Option<String>) -> Self {
        Self {
            name,
            value,
            presence: Presence::Required,
        }
    }

    /// A field whose absence omits the element.
    pub fn optional(name: &'static str, value: Option<String>) -> Self {
        Self {
            name,
            value,
            presence: Presence::Optional,
        }
    }
}

/// Emit an ordered field table into the builder.
pub fn emit(xml: &mut XmlBuilder, fields: &[Field]) -> Result<(), AssemblyError> {
    for field in fields {
        let value = field.value.as_deref().filter(|v| !v.is_empty());
        match (value, field.presence) {
            (Some(value), _) => {
                xml.leaf(field.name, value);
            }
            (None, Presence::Optional) => {}
            (None, Presence::Required) => {
                return Err(AssemblyError::MissingField {
                    element: field.name.to_string(),
                })
            }
        }
    }
    Ok(())
}

/// Render a currency amount with exactly two decimal digits and a period
/// separator, independent of locale.
pub fn fmt_currency(value: f64) -> String {
    format!("{value:.2}")
}

/// Currency-format an optional amount for a field table entry.
pub fn currency(value: Option<f64>) -> Option<String> {
    value.map(fmt_currency)
}

/// Render a schema yes/no flag (1 = yes, 2 = no).
pub fn flag(value: bool) -> String {
    if value { "1" } else { "2" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(fields: &[Field]) -> Result<String, AssemblyError> {
        let mut xml = XmlBuilder::new();
        emit(&mut xml, fields)?;
        Ok(xml.finish())
    }

    #[test]
    fn test_required_present() {
        let out = render(&[Field::required("Numero", Some("81".into()))]).unwrap();
        assert_eq!(out, "<Numero>81</Numero>");
    }

    #[test]
    fn test_required_absent_fails() {
        let err = render(&[Field::required("Numero", None)]).unwrap_err();
        assert_eq!(
            err,
            AssemblyError::MissingField {
                element: "Numero".to_string()
            }
        );
    }

    #[test]
    fn test_required_empty_string_fails() {
        let err = render(&[Field::required("Serie", Some(String::new()))]).unwrap_err();
        assert!(matches!(err, AssemblyError::MissingField { .. }));
    }

    #[test]
    fn test_optional_absent_emits_nothing() {
        let out = render(&[
            Field::optional("CodigoCnae", None),
            Field::required("Discriminacao", Some("svc".into())),
        ])
        .unwrap();
        assert_eq!(out, "<Discriminacao>svc</Discriminacao>");
    }

    #[test]
    fn test_optional_empty_string_emits_nothing() {
        let out = render(&[Field::optional("RegimeEspecialTributacao", Some(String::new()))])
            .unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_order_is_preserved() {
        let out = render(&[
            Field::required("Numero", Some("1".into())),
            Field::required("Serie", Some("A".into())),
            Field::required("Tipo", Some("1".into())),
        ])
        .unwrap();
        assert_eq!(out, "<Numero>1</Numero><Serie>A</Serie><Tipo>1</Tipo>");
    }

    #[test]
    fn test_fmt_currency_pads_and_truncates() {
        assert_eq!(fmt_currency(10.0), "10.00");
        assert_eq!(fmt_currency(10.5), "10.50");
        assert_eq!(fmt_currency(0.1), "0.10");
        assert_eq!(fmt_currency(1234.567), "1234.57");
    }

    #[test]
    fn test_flag_values() {
        assert_eq!(flag(true), "1");
        assert_eq!(flag(false), "2");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Two decimals, period separator, no grouping, for any
            // non-negative amount in the range invoices actually carry.
            #[test]
            fn currency_always_two_decimals(v in 0.0f64..1_000_000_000.0) {
                let s = fmt_currency(v);
                let (_, frac) = s.split_once('.').expect("period separator");
                prop_assert_eq!(frac.len(), 2);
                prop_assert!(s.chars().all(|c| c.is_ascii_digit() || c == '.'));
            }
        }
    }
}
