//! Cloud provider certificate records
//!
//! The shape a provider API hands back for a stored server certificate.
//! Only the fields the chain builder consumes are modeled; the API client
//! itself lives outside this crate.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A certificate record from a cloud certificate store
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderCertificate {
    /// Store-side name or identifier of the record
    #[serde(alias = "ServerCertificateName")]
    pub name: String,

    /// PEM body of the leaf certificate
    #[serde(default, alias = "CertificateBody")]
    pub certificate_body: Option<String>,

    /// Optional PEM blob with the intermediate chain
    #[serde(default, alias = "CertificateChain")]
    pub certificate_chain: Option<String>,

    /// When the record was uploaded to the store
    #[serde(default, alias = "UploadDate")]
    pub uploaded_at: Option<DateTime<Utc>>,
}
