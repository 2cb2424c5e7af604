//! Certificate chain assembly
//!
//! A [`CertificateChain`] is an ordered trust path: one leaf plus zero or
//! more intermediates, leaf-to-root order, with bundled roots elided where
//! a verified walk produced the list. Five independent construction paths
//! cover the places certificate material actually comes from: a live
//! handshake, a stored certificate plus a chain blob, internet discovery
//! via issuer URLs, a bare full-chain blob, and a cloud provider record.

mod fetch;
mod handshake;

pub use fetch::{CertificateFetcher, HttpFetcher};

use crate::certificate::{codec, Certificate};
use crate::provider::ProviderCertificate;
use crate::trust::TrustStore;
use crate::utils::{ChainCheckError, DiscoveryError, Result};
use crate::verify;

/// Maximum number of certificates an internet discovery walk will visit.
const MAX_WALK_LENGTH: usize = 32;

/// An ordered trust path: leaf first, then intermediates toward the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateChain {
    pub leaf: Certificate,
    pub intermediates: Vec<Certificate>,
}

impl CertificateChain {
    /// Fetch the chain a live server presents.
    ///
    /// Any server certificate is accepted at this stage; verification is a
    /// separate, later step. The peer list is taken in presentation order
    /// with no filtering: first is the leaf, the rest are intermediates.
    pub fn from_tls_handshake(host: &str, port: u16) -> Result<Self> {
        let peer_certs = handshake::fetch_peer_certificates(host, port)?;

        let mut certificates = Vec::with_capacity(peer_certs.len());
        for der in &peer_certs {
            certificates.push(Certificate::from_single_der(der)?);
        }
        let leaf = certificates.remove(0);

        Ok(CertificateChain {
            leaf,
            intermediates: certificates,
        })
    }

    /// Build from a stored leaf plus a blob of intermediate certificates.
    ///
    /// The blob is verified to form a trust path from the leaf up to a
    /// bundled root; the verified path (not the blob's order) is what gets
    /// recorded, stopping at and excluding the first bundled root. An
    /// unrecognized authority surfaces as the typed
    /// [`verify::VerificationError::UnknownAuthority`]; other verification
    /// failures pass through opaquely.
    pub fn from_certificate_and_chain_blob(
        leaf: Certificate,
        blob: &[u8],
        store: &TrustStore,
    ) -> Result<Self> {
        let parsed = codec::parse_certificates(blob)?;
        let path = verify::trust_path(&leaf, &parsed, store)?;

        // Walk the verified path, skipping the leaf. Certificates after the
        // first bundled root are dropped; single-root chains are the normal
        // case and cross-signed tails are intentionally not chased.
        let mut intermediates = Vec::new();
        for cert in path.into_iter().skip(1) {
            if store.is_bundled(&cert) {
                break;
            }
            intermediates.push(cert);
        }

        Ok(CertificateChain {
            leaf,
            intermediates,
        })
    }

    /// Build from a stored leaf by walking issuer-URL hints across the
    /// internet until a bundled root is reached.
    ///
    /// Each hop tries the current certificate's issuer URLs in order and
    /// takes the first that yields a certificate; a non-root certificate
    /// with no issuer URLs, or a hop whose URLs all fail, ends the walk
    /// with a [`DiscoveryError`].
    pub fn from_certificate_and_internet(
        leaf: Certificate,
        store: &TrustStore,
        fetcher: &dyn CertificateFetcher,
    ) -> Result<Self> {
        let mut intermediates = Vec::new();
        let mut current = leaf.clone();
        let mut is_leaf = true;
        let mut visited = 0usize;

        loop {
            if store.is_bundled(&current) {
                break;
            }

            if !is_leaf {
                intermediates.push(current.clone());
            }
            is_leaf = false;

            visited += 1;
            if visited > MAX_WALK_LENGTH {
                return Err(DiscoveryError::DepthExceeded {
                    max: MAX_WALK_LENGTH,
                }
                .into());
            }

            if current.issuer_urls().is_empty() {
                return Err(DiscoveryError::NoIssuerUrl {
                    subject: current.readable_subject(),
                }
                .into());
            }

            let mut next = None;
            let mut last_error = String::new();
            for url in current.issuer_urls() {
                match fetcher.fetch(url) {
                    Ok(cert) => {
                        next = Some(cert);
                        break;
                    }
                    Err(e) => last_error = e.to_string(),
                }
            }

            current = match next {
                Some(cert) => cert,
                None => {
                    return Err(DiscoveryError::ExhaustedUrls {
                        subject: current.readable_subject(),
                        message: last_error,
                    }
                    .into())
                }
            };
        }

        Ok(CertificateChain {
            leaf,
            intermediates,
        })
    }

    /// Build from a blob holding the whole chain, leaf first.
    ///
    /// Certificates are taken at face value in presentation order; no
    /// bundled-root filtering happens here.
    pub fn from_full_chain_blob(blob: &[u8]) -> Result<Self> {
        let mut certificates = codec::parse_certificates(blob)?;
        let leaf = certificates.remove(0);
        Ok(CertificateChain {
            leaf,
            intermediates: certificates,
        })
    }

    /// Build from a cloud provider certificate record. The body is
    /// mandatory; the accompanying chain, when present, is taken verbatim.
    pub fn from_provider_record(record: &ProviderCertificate) -> Result<Self> {
        let body = record
            .certificate_body
            .as_deref()
            .ok_or(ChainCheckError::MissingCertificateBody)?;
        let leaf = codec::parse_certificate(body.as_bytes())?;

        let intermediates = match record.certificate_chain.as_deref() {
            Some(chain) => codec::parse_certificates(chain.as_bytes())?,
            None => Vec::new(),
        };

        Ok(CertificateChain {
            leaf,
            intermediates,
        })
    }

    /// Concatenated PEM of the intermediates, for re-upload to external
    /// stores.
    pub fn intermediates_to_pem(&self) -> String {
        let mut out = String::new();
        for cert in &self.intermediates {
            out.push_str(&cert.to_pem());
        }
        out
    }
}
