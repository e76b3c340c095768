//! # Client Facade
//!
//! One `GinfesClient` per provider: holds the shared read-only
//! [`ProviderConfig`] and the four injected capabilities, and exposes the
//! protocol operations. Every method is synchronous and terminal — a call
//! either returns the raw service response or fails before the network.

use chrono::NaiveDate;
use ginfes_core::config::ProviderConfig;
use ginfes_core::error::GinfesError;
use ginfes_core::operation::Operation;
use ginfes_xml::batch::assemble_batch;
use ginfes_xml::cancel::{
    assemble_cancellation_v2, assemble_cancellation_v3, CancellationRequest,
};
use ginfes_xml::query::{
    assemble_consulta_lote, assemble_consulta_nfse, assemble_consulta_por_rps,
    assemble_situacao_lote, TomadorFilter,
};
use ginfes_xml::rps::{Rps, RpsIdentification};
use ginfes_xml::writer::XmlDocument;
use tracing::info;

use crate::capability::{
    CertificateProvider, RawResponse, SchemaValidator, Sender, XmlSigner,
};
use crate::dispatch::{dispatch, validate_only};
use crate::signing::{run_plan, signing_plan};

/// Client for one provider against one Ginfes deployment.
///
/// Generic over the injected capabilities: signer, validator, sender, and
/// certificate provider. The configuration and certificate material are
/// read-only shared state across all calls; no call mutates them.
pub struct GinfesClient<S, V, T, C> {
    config: ProviderConfig,
    signer: S,
    validator: V,
    sender: T,
    certificates: C,
}

impl<S, V, T, C> GinfesClient<S, V, T, C>
where
    S: XmlSigner,
    V: SchemaValidator,
    T: Sender,
    C: CertificateProvider,
{
    pub fn new(config: ProviderConfig, signer: S, validator: V, sender: T, certificates: C) -> Self {
        Self {
            config,
            signer,
            validator,
            sender,
            certificates,
        }
    }

    /// The configuration this client assembles and dispatches under.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Sign `document` according to the operation's declared plan, then
    /// validate and send it.
    fn sign_and_dispatch(
        &self,
        op: Operation,
        document: XmlDocument,
    ) -> Result<RawResponse, GinfesError> {
        let plan = signing_plan(op);
        let signed = if plan.is_empty() {
            document
        } else {
            let certificate = self.certificates.signing_certificate()?;
            run_plan(&self.signer, &certificate, document, &plan)?
        };
        dispatch(&self.validator, &self.sender, &self.config, op, &signed)
    }

    /// Submit a lot of 1..=50 RPS records for NFSe issuance (asynchronous
    /// on the service side; the response carries the lot protocol number).
    pub fn recepcionar_lote_rps(
        &self,
        records: &[Rps],
        lote: &str,
    ) -> Result<RawResponse, GinfesError> {
        let envelope = assemble_batch(records, lote, &self.config)?;
        info!(lote, records = records.len(), "submitting RPS lot");
        self.sign_and_dispatch(Operation::RecepcionarLoteRps, envelope)
    }

    /// Assemble, sign, and validate a lot without sending it.
    ///
    /// Useful for vetting a batch against the schema before committing a
    /// lot number.
    pub fn validar_lote_rps(&self, records: &[Rps], lote: &str) -> Result<(), GinfesError> {
        let envelope = assemble_batch(records, lote, &self.config)?;
        let plan = signing_plan(Operation::RecepcionarLoteRps);
        let certificate = self.certificates.signing_certificate()?;
        let signed = run_plan(&self.signer, &certificate, envelope, &plan)?;
        validate_only(&self.validator, &self.config, &signed)
    }

    /// Query the processing situation of a submitted lot.
    ///
    /// The numeric code in the response is interpreted per
    /// [`ginfes_core::status::LotStatus`].
    pub fn consultar_situacao_lote(&self, protocolo: &str) -> Result<RawResponse, GinfesError> {
        let envelope = assemble_situacao_lote(protocolo, &self.config);
        self.sign_and_dispatch(Operation::ConsultarSituacaoLoteRps, envelope)
    }

    /// Query the full result of a submitted lot.
    pub fn consultar_lote_rps(&self, protocolo: &str) -> Result<RawResponse, GinfesError> {
        let envelope = assemble_consulta_lote(protocolo, &self.config);
        self.sign_and_dispatch(Operation::ConsultarLoteRps, envelope)
    }

    /// Query NFSe issued in a period, optionally narrowed to one taker.
    pub fn consultar_nfse(
        &self,
        inicio: NaiveDate,
        fim: NaiveDate,
        tomador: Option<&TomadorFilter>,
    ) -> Result<RawResponse, GinfesError> {
        let envelope = assemble_consulta_nfse(inicio, fim, tomador, &self.config);
        self.sign_and_dispatch(Operation::ConsultarNfse, envelope)
    }

    /// Query the NFSe generated for one RPS identification.
    pub fn consultar_nfse_por_rps(
        &self,
        identificacao: &RpsIdentification,
    ) -> Result<RawResponse, GinfesError> {
        let envelope = assemble_consulta_por_rps(identificacao, &self.config);
        self.sign_and_dispatch(Operation::ConsultarNfsePorRps, envelope)
    }

    /// Cancel an issued NFSe.
    ///
    /// Delegates to the V3 path unconditionally, matching the behavior the
    /// service has been exercised with. Deployments that reject V3
    /// (Guarulhos among them) call [`GinfesClient::cancelar_nfse_v2`]
    /// directly.
    pub fn cancelar_nfse(
        &self,
        request: &CancellationRequest,
    ) -> Result<RawResponse, GinfesError> {
        self.cancelar_nfse_v3(request)
    }

    /// Cancel an issued NFSe via the nested-signature V3 document.
    pub fn cancelar_nfse_v3(
        &self,
        request: &CancellationRequest,
    ) -> Result<RawResponse, GinfesError> {
        let envelope = assemble_cancellation_v3(request, &self.config);
        info!(numero = request.numero, "cancelling NFSe (v3)");
        self.sign_and_dispatch(Operation::CancelarNfseV3, envelope)
    }

    /// Cancel an issued NFSe via the flat legacy V2 document.
    pub fn cancelar_nfse_v2(&self, numero: u64) -> Result<RawResponse, GinfesError> {
        let envelope = assemble_cancellation_v2(numero, &self.config);
        info!(numero, "cancelling NFSe (v2)");
        self.sign_and_dispatch(Operation::CancelarNfseV2, envelope)
    }
}
