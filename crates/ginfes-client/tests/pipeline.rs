//! End-to-end pipeline tests with mock capabilities: assembly through
//! signing plan through dispatch, without touching real crypto or network.

use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::rc::Rc;

use chrono::NaiveDate;
use ginfes_client::{
    run_plan, signing_plan, Certificate, CertificateProvider, GinfesClient, RawResponse,
    SchemaValidator, Sender, SigningPlan, SigningStep, WireOperation, XmlSigner,
};
use ginfes_core::config::ProviderConfig;
use ginfes_core::error::{
    AssemblyError, CryptoError, GinfesError, SchemaValidationError, SigningError, TransportError,
};
use ginfes_core::identity::TaxId;
use ginfes_core::operation::{Operation, ProtocolVersion};
use ginfes_xml::cancel::{assemble_cancellation_v3, CancellationRequest};
use ginfes_xml::writer::XmlDocument;
use ginfes_xml::{Rps, RpsIdentification, Servico, Tomador, Valores};

/// Signer mock: appends a `<Signature>` marker inside the wrapper (or the
/// target itself), carrying a digest of the target element's bytes at
/// signing time. Order-sensitive by construction, like the real thing: a
/// signature taken before a nested signature exists has a different digest.
#[derive(Default)]
struct MarkerSigner {
    calls: RefCell<Vec<&'static str>>,
}

impl MarkerSigner {
    fn digest(element: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        element.hash(&mut hasher);
        hasher.finish()
    }
}

impl XmlSigner for MarkerSigner {
    fn sign(
        &self,
        document: &XmlDocument,
        step: &SigningStep,
        _certificate: &Certificate,
    ) -> Result<XmlDocument, SigningError> {
        self.calls.borrow_mut().push(step.target);
        let doc = document.as_str();
        let open_probe = format!("<{}", step.target);
        let close_tag = format!("</{}>", step.target);
        let start = doc
            .find(&open_probe)
            .ok_or_else(|| SigningError(format!("target {} not found", step.target)))?;
        let end = doc
            .find(&close_tag)
            .ok_or_else(|| SigningError(format!("target {} not closed", step.target)))?
            + close_tag.len();
        let element = &doc[start..end];

        let reference = match step.reference_attr {
            Some(attr) => {
                let open_tag = &doc[start..doc[start..].find('>').map(|i| start + i).unwrap_or(end)];
                let probe = format!("{attr}=\"");
                let at = open_tag
                    .find(&probe)
                    .ok_or_else(|| SigningError(format!("{attr} attribute missing")))?
                    + probe.len();
                let id_end = open_tag[at..]
                    .find('"')
                    .ok_or_else(|| SigningError("unterminated attribute".to_string()))?;
                open_tag[at..at + id_end].to_string()
            }
            None => step.target.to_string(),
        };

        let signature = format!(
            "<Signature Reference=\"#{reference}\" Digest=\"{:x}\"/>",
            Self::digest(element)
        );
        let insert_before = match step.wrapper {
            Some(wrapper) => format!("</{wrapper}>"),
            None => close_tag,
        };
        let at = doc
            .rfind(&insert_before)
            .ok_or_else(|| SigningError(format!("no {insert_before} to sign into")))?;
        let mut signed = String::with_capacity(doc.len() + signature.len());
        signed.push_str(&doc[..at]);
        signed.push_str(&signature);
        signed.push_str(&doc[at..]);
        Ok(XmlDocument::new(signed))
    }
}

#[derive(Default)]
struct RecordingValidator {
    validated: RefCell<Vec<String>>,
}

impl SchemaValidator for RecordingValidator {
    fn validate(&self, document: &XmlDocument, _schema: &Path) -> Result<(), SchemaValidationError> {
        self.validated
            .borrow_mut()
            .push(document.as_str().to_string());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingSender {
    sent: RefCell<Vec<(String, ProtocolVersion, String)>>,
}

impl Sender for RecordingSender {
    fn send(
        &self,
        payload: &XmlDocument,
        operation: &WireOperation,
    ) -> Result<RawResponse, TransportError> {
        self.sent.borrow_mut().push((
            operation.name.to_string(),
            operation.version,
            payload.as_str().to_string(),
        ));
        Ok(RawResponse("<EnviarLoteRpsResposta/>".to_string()))
    }
}

struct StaticCertificates;

impl CertificateProvider for StaticCertificates {
    fn signing_certificate(&self) -> Result<Certificate, CryptoError> {
        Ok(Certificate::from_pem(b"-----BEGIN TEST-----".to_vec()))
    }
}

/// Local newtype around `Rc` so the capability traits can be implemented
/// for shared handles without tripping the orphan rule.
struct Shared<T>(Rc<T>);

type TestClient = GinfesClient<
    Shared<MarkerSigner>,
    Shared<RecordingValidator>,
    Shared<RecordingSender>,
    StaticCertificates,
>;

impl XmlSigner for Shared<MarkerSigner> {
    fn sign(
        &self,
        document: &XmlDocument,
        step: &SigningStep,
        certificate: &Certificate,
    ) -> Result<XmlDocument, SigningError> {
        self.0.sign(document, step, certificate)
    }
}

impl SchemaValidator for Shared<RecordingValidator> {
    fn validate(&self, document: &XmlDocument, schema: &Path) -> Result<(), SchemaValidationError> {
        self.0.validate(document, schema)
    }
}

impl Sender for Shared<RecordingSender> {
    fn send(
        &self,
        payload: &XmlDocument,
        operation: &WireOperation,
    ) -> Result<RawResponse, TransportError> {
        self.0.send(payload, operation)
    }
}

fn harness() -> (TestClient, Rc<MarkerSigner>, Rc<RecordingValidator>, Rc<RecordingSender>) {
    let signer = Rc::new(MarkerSigner::default());
    let validator = Rc::new(RecordingValidator::default());
    let sender = Rc::new(RecordingSender::default());
    let client = GinfesClient::new(
        ProviderConfig::new("99999999000191", "12345", "3525904"),
        Shared(Rc::clone(&signer)),
        Shared(Rc::clone(&validator)),
        Shared(Rc::clone(&sender)),
        StaticCertificates,
    );
    (client, signer, validator, sender)
}

fn minimal_rps(numero: u64) -> Rps {
    Rps {
        identificacao: RpsIdentification::new(numero, "1", 1),
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
fn minimal_lot_submission_end_to_end() {
    let (client, signer, validator, sender) = harness();
    let response = client.recepcionar_lote_rps(&[minimal_rps(1)], "1").unwrap();
    assert_eq!(response.as_str(), "<EnviarLoteRpsResposta/>");

    assert_eq!(*signer.calls.borrow(), vec!["LoteRps"]);

    let sent = sender.sent.borrow();
    assert_eq!(sent.len(), 1);
    let (op, version, payload) = &sent[0];
    assert_eq!(op, "RecepcionarLoteRpsV3");
    assert_eq!(*version, ProtocolVersion::V3);
    assert!(payload.starts_with("<EnviarLoteRpsEnvio"));
    assert_eq!(payload.matches("<Rps>").count(), 1);
    assert!(payload.contains("<QuantidadeRps>1</QuantidadeRps>"));
    assert!(payload.contains("<Signature Reference=\"#1\""));
    assert!(!payload.contains("<?xml"));

    // The validator saw exactly the payload that was sent.
    assert_eq!(validator.validated.borrow()[0], *payload);
}

#[test]
fn oversized_lot_fails_before_signing_and_sending() {
    let (client, signer, _validator, sender) = harness();
    let records: Vec<Rps> = (1..=51).map(minimal_rps).collect();
    let err = client.recepcionar_lote_rps(&records, "1").unwrap_err();
    match err {
        GinfesError::Assembly(AssemblyError::BatchTooLarge { count }) => assert_eq!(count, 51),
        other => panic!("expected BatchTooLarge, got {other}"),
    }
    assert!(signer.calls.borrow().is_empty());
    assert!(sender.sent.borrow().is_empty());
}

#[test]
fn validate_only_mode_never_sends() {
    let (client, signer, validator, sender) = harness();
    client.validar_lote_rps(&[minimal_rps(1)], "7").unwrap();
    assert_eq!(*signer.calls.borrow(), vec!["LoteRps"]);
    assert_eq!(validator.validated.borrow().len(), 1);
    assert!(sender.sent.borrow().is_empty());
}

#[test]
fn unsigned_query_skips_signer_and_validator() {
    let (client, signer, validator, sender) = harness();
    client
        .consultar_nfse(
            NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 6, 30).unwrap(),
            None,
        )
        .unwrap();
    assert!(signer.calls.borrow().is_empty());
    assert!(validator.validated.borrow().is_empty());
    assert_eq!(sender.sent.borrow()[0].0, "ConsultarNfseV3");
}

#[test]
fn signed_query_signs_envelope_root() {
    let (client, signer, _validator, sender) = harness();
    client.consultar_situacao_lote("PR-1").unwrap();
    assert_eq!(*signer.calls.borrow(), vec!["ConsultarSituacaoLoteRpsEnvio"]);
    let payload = &sender.sent.borrow()[0].2;
    assert!(payload.contains("<Signature Reference=\"#ConsultarSituacaoLoteRpsEnvio\""));
}

#[test]
fn v3_cancellation_nests_inner_signature_inside_outer_scope() {
    let (client, signer, _validator, sender) = harness();
    client
        .cancelar_nfse(&CancellationRequest::new(812))
        .unwrap();
    assert_eq!(*signer.calls.borrow(), vec!["InfPedidoCancelamento", "Pedido"]);

    let payload = &sender.sent.borrow()[0].2;
    let inner_sig = payload.find("<Signature Reference=\"#812\"").unwrap();
    let pedido_close = payload.find("</Pedido>").unwrap();
    let outer_sig = payload.find("<Signature Reference=\"#Pedido\"").unwrap();
    // Inner signature lives inside the Pedido element; the outer one sits
    // after it, inside the envelope root.
    assert!(inner_sig < pedido_close);
    assert!(pedido_close < outer_sig);

    // The outer digest was taken over a Pedido element that already
    // contained the inner signature.
    let pedido = &payload[payload.find("<Pedido").unwrap()..pedido_close + "</Pedido>".len()];
    assert!(pedido.contains("<Signature Reference=\"#812\""));
    let expected = format!("Digest=\"{:x}\"", MarkerSigner::digest(pedido));
    assert!(payload[outer_sig..].starts_with(&format!(
        "<Signature Reference=\"#Pedido\" {expected}"
    )));
}

#[test]
fn reversed_cancellation_plan_is_structurally_different() {
    let signer = MarkerSigner::default();
    let certificate = Certificate::from_pem(Vec::new());
    let config = ProviderConfig::new("99999999000191", "12345", "3525904");
    let unsigned = assemble_cancellation_v3(&CancellationRequest::new(812), &config);

    let correct = run_plan(
        &signer,
        &certificate,
        unsigned.clone(),
        &signing_plan(Operation::CancelarNfseV3),
    )
    .unwrap();

    let reversed_plan = SigningPlan::of(vec![
        SigningStep::new("Pedido", None, Some("CancelarNfseEnvio")),
        SigningStep::new("InfPedidoCancelamento", Some("Id"), Some("Pedido")),
    ]);
    let reversed = run_plan(&signer, &certificate, unsigned, &reversed_plan).unwrap();

    assert_ne!(correct, reversed);
    // Outer-first: the Pedido digest was taken before the inner signature
    // existed, so it cannot match a Pedido element containing one.
    let out = reversed.as_str();
    let pedido_close = out.find("</Pedido>").unwrap();
    let pedido = &out[out.find("<Pedido").unwrap()..pedido_close + "</Pedido>".len()];
    let covering_digest = format!("Digest=\"{:x}\"", MarkerSigner::digest(pedido));
    let outer_sig_at = out.find("<Signature Reference=\"#Pedido\"").unwrap();
    assert!(!out[outer_sig_at..].starts_with(&format!(
        "<Signature Reference=\"#Pedido\" {covering_digest}"
    )));
}

#[test]
fn v2_cancellation_rides_legacy_wire_operation() {
    let (client, signer, _validator, sender) = harness();
    client.cancelar_nfse_v2(812).unwrap();
    assert_eq!(*signer.calls.borrow(), vec!["CancelarNfseEnvio"]);
    let sent = sender.sent.borrow();
    assert_eq!(sent[0].0, "CancelarNfse");
    assert_eq!(sent[0].1, ProtocolVersion::V2);
    assert!(sent[0].2.contains("<NumeroNfse>812</NumeroNfse>"));
}

#[test]
fn query_by_rps_identification_round_trip() {
    let (client, _signer, _validator, sender) = harness();
    client
        .consultar_nfse_por_rps(&RpsIdentification::new(81, "A", 1))
        .unwrap();
    let sent = sender.sent.borrow();
    assert_eq!(sent[0].0, "ConsultarNfsePorRpsV3");
    assert!(sent[0]
        .2
        .contains("<Numero>81</Numero><Serie>A</Serie><Tipo>1</Tipo>"));
}
