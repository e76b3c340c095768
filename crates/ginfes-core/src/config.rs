//! # Provider Configuration
//!
//! Identity and deployment parameters of the service provider issuing the
//! RPS records. The configuration is loaded once (historically from a JSON
//! document), attached to the client, and shared read-only across every
//! record in a run — no call mutates it.

use std::path::PathBuf;

use serde::Deserialize;

/// ABRASF namespace attached to envelope roots under the `nfse` prefix.
pub const XMLNS_NFSE: &str = "http://www.abrasf.org.br/nfse.xsd";

/// Default namespace attached to envelope roots.
///
/// The single slash is not a typo in this crate: the deployed Ginfes
/// service publishes (and accepts) exactly this URI as the default
/// namespace, and correcting it changes the bytes of every envelope.
pub const XMLNS_DEFAULT: &str = "http:/www.abrasf.org.br/nfse.xsd";

/// Read-only provider identity and deployment parameters.
///
/// Shared by reference across all records of a batch; the provider block
/// inside each assembled RPS is injected from here, never taken from the
/// record itself.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Provider CNPJ. May be empty for deployments that identify the
    /// provider by municipal registration alone; the in-record provider
    /// block then omits the `Cnpj` element.
    pub cnpj: String,

    /// Municipal registration number (Inscrição Municipal).
    #[serde(alias = "im")]
    pub inscricao_municipal: String,

    /// IBGE municipality code of the provider.
    #[serde(alias = "cmun")]
    pub codigo_municipio: String,

    /// Default namespace on envelope roots.
    #[serde(default = "default_xmlns")]
    pub xmlns: String,

    /// Namespace bound to the `nfse` prefix on envelope roots.
    #[serde(default = "default_xmlns_nfse")]
    pub xmlns_nfse: String,

    /// Schema resource every validated payload is checked against.
    #[serde(default = "default_schema_path")]
    pub schema_path: PathBuf,
}

fn default_xmlns() -> String {
    XMLNS_DEFAULT.to_string()
}

fn default_xmlns_nfse() -> String {
    XMLNS_NFSE.to_string()
}

fn default_schema_path() -> PathBuf {
    PathBuf::from("storage/schemes/nfse.xsd")
}

impl ProviderConfig {
    /// Minimal configuration from the three provider identity fields,
    /// with deployment defaults for namespaces and schema path.
    pub fn new(
        cnpj: impl Into<String>,
        inscricao_municipal: impl Into<String>,
        codigo_municipio: impl Into<String>,
    ) -> Self {
        Self {
            cnpj: cnpj.into(),
            inscricao_municipal: inscricao_municipal.into(),
            codigo_municipio: codigo_municipio.into(),
            xmlns: default_xmlns(),
            xmlns_nfse: default_xmlns_nfse(),
            schema_path: default_schema_path(),
        }
    }

    /// Load from the JSON document shape used by existing deployments
    /// (`{"cnpj": ..., "im": ..., "cmun": ...}`).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The envelope root namespace attribute pair, in emission order.
    pub fn namespace_attrs(&self) -> [(&'static str, &str); 2] {
        [("xmlns", &self.xmlns), ("xmlns:nfse", &self.xmlns_nfse)]
    }
}
