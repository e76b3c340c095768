//! # Signing Plans — Ordered, Declarative, Per Operation
//!
//! Which elements an operation signs, in what order, is protocol data, not
//! control flow. Each [`Operation`] maps to a [`SigningPlan`]: an ordered
//! sequence of steps the orchestrator applies front to back. Two plans
//! deserve attention:
//!
//! - The V3 cancellation is **two-layer**: the inner
//!   `InfPedidoCancelamento` is signed first (referenced by its `Id`
//!   attribute, re-rooted into `Pedido`), then the `Pedido` element is
//!   signed as a whole and re-rooted into `CancelarNfseEnvio`. The order
//!   is load-bearing — signing the outer element first produces a document
//!   whose inner signature reference is invalid, and the service rejects
//!   it silently.
//!
//! - Two query operations carry the **empty plan**. They are dispatched
//!   unsigned under this deployment; the plan exists so the variance is
//!   declared rather than buried as dead code.

use ginfes_core::error::SigningError;
use ginfes_core::operation::Operation;
use ginfes_xml::writer::XmlDocument;

use crate::capability::{Certificate, SigningStep, XmlSigner};

/// Ordered signing steps for one operation. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SigningPlan {
    steps: Vec<SigningStep>,
}

impl SigningPlan {
    /// The empty plan: the document passes through unsigned.
    pub fn unsigned() -> Self {
        Self::default()
    }

    /// A plan from ordered steps.
    pub fn of(steps: Vec<SigningStep>) -> Self {
        Self { steps }
    }

    /// Steps in application order.
    pub fn steps(&self) -> &[SigningStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// The signing plan declared for each operation.
pub fn signing_plan(op: Operation) -> SigningPlan {
    match op {
        Operation::RecepcionarLoteRps => SigningPlan::of(vec![SigningStep::new(
            "LoteRps",
            Some("Id"),
            Some("EnviarLoteRpsEnvio"),
        )]),
        Operation::ConsultarSituacaoLoteRps => SigningPlan::of(vec![SigningStep::new(
            "ConsultarSituacaoLoteRpsEnvio",
            None,
            None,
        )]),
        // Dispatched unsigned under this deployment.
        Operation::ConsultarLoteRps | Operation::ConsultarNfse => SigningPlan::unsigned(),
        Operation::ConsultarNfsePorRps => {
            SigningPlan::of(vec![SigningStep::new("ConsultarNfseRpsEnvio", None, None)])
        }
        // Inner first, outer second. Do not reorder.
        Operation::CancelarNfseV3 => SigningPlan::of(vec![
            SigningStep::new("InfPedidoCancelamento", Some("Id"), Some("Pedido")),
            SigningStep::new("Pedido", None, Some("CancelarNfseEnvio")),
        ]),
        Operation::CancelarNfseV2 => {
            SigningPlan::of(vec![SigningStep::new("CancelarNfseEnvio", None, None)])
        }
    }
}

/// Apply a plan's steps in order. An empty plan returns the document
/// untouched without consulting the signer.
pub fn run_plan<S: XmlSigner>(
    signer: &S,
    certificate: &Certificate,
    document: XmlDocument,
    plan: &SigningPlan,
) -> Result<XmlDocument, SigningError> {
    let mut document = document;
    for step in plan.steps() {
        document = signer.sign(&document, step, certificate)?;
    }
    Ok(document)
}
