//! Integration tests for the chain builders

use chaincheck::certificate::{parse_certificate, parse_certificates, Certificate};
use chaincheck::chain::{CertificateChain, CertificateFetcher};
use chaincheck::utils::{ChainCheckError, DiscoveryError};
use chaincheck::verify::VerificationError;
use chaincheck::{ProviderCertificate, TrustStore};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn fixture(name: &str) -> Vec<u8> {
    std::fs::read(fixtures_dir().join(name)).expect("fixture should exist")
}

fn fixture_cert(name: &str) -> Certificate {
    parse_certificate(&fixture(name)).unwrap()
}

fn root_store() -> TrustStore {
    TrustStore::from_pem(&fixture("root.pem")).unwrap()
}

/// Fetcher backed by a URL map; URLs outside the map fail.
struct MapFetcher {
    certs: HashMap<String, Certificate>,
}

impl MapFetcher {
    fn new(entries: &[(&str, &str)]) -> Self {
        let certs = entries
            .iter()
            .map(|(url, file)| (url.to_string(), fixture_cert(file)))
            .collect();
        MapFetcher { certs }
    }
}

impl CertificateFetcher for MapFetcher {
    fn fetch(&self, url: &str) -> chaincheck::Result<Certificate> {
        self.certs.get(url).cloned().ok_or_else(|| {
            ChainCheckError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no certificate served at {}", url),
            ))
        })
    }
}

#[test]
fn test_full_chain_blob() {
    let chain = CertificateChain::from_full_chain_blob(&fixture("chain.pem")).unwrap();
    assert!(chain.leaf.subject().contains("valid.chaincheck.test"));
    assert_eq!(chain.intermediates.len(), 1);
    assert!(chain.intermediates[0].subject().contains("Intermediate"));
}

#[test]
fn test_full_chain_blob_keeps_roots_verbatim() {
    // no trust filtering on this path: a root in the blob stays in the list
    let mut blob = fixture("chain.pem");
    blob.extend_from_slice(&fixture("root.pem"));
    let chain = CertificateChain::from_full_chain_blob(&blob).unwrap();
    assert_eq!(chain.intermediates.len(), 2);
}

#[test]
fn test_full_chain_blob_round_trip() {
    let chain = CertificateChain::from_full_chain_blob(&fixture("chain.pem")).unwrap();

    let mut blob = chain.leaf.to_pem();
    blob.push_str(&chain.intermediates_to_pem());
    let reparsed = parse_certificates(blob.as_bytes()).unwrap();

    let original = parse_certificates(&fixture("chain.pem")).unwrap();
    assert_eq!(reparsed, original);
}

#[test]
fn test_full_chain_blob_empty_fails() {
    assert!(CertificateChain::from_full_chain_blob(b"").is_err());
}

#[test]
fn test_chain_blob_walk_elides_bundled_root() {
    let store = root_store();
    let leaf = fixture_cert("leaf.pem");

    // blob carries intermediate AND root; the verified walk must stop at
    // the bundled root and exclude it
    let mut blob = fixture("intermediate.pem");
    blob.extend_from_slice(&fixture("root.pem"));

    let chain = CertificateChain::from_certificate_and_chain_blob(leaf, &blob, &store).unwrap();
    assert_eq!(chain.intermediates.len(), 1);
    assert!(chain.intermediates[0].subject().contains("Intermediate"));
}

#[test]
fn test_chain_blob_normalizes_order() {
    // the walk records the verified path, not the blob's order
    let store = root_store();
    let leaf = fixture_cert("leaf.pem");

    let mut blob = fixture("root.pem");
    blob.extend_from_slice(&fixture("intermediate.pem"));

    let chain = CertificateChain::from_certificate_and_chain_blob(leaf, &blob, &store).unwrap();
    assert_eq!(chain.intermediates.len(), 1);
    assert!(chain.intermediates[0].subject().contains("Intermediate"));
}

#[test]
fn test_chain_blob_unknown_authority_is_typed() {
    let store = root_store();
    let leaf = fixture_cert("selfsigned.pem");

    let result =
        CertificateChain::from_certificate_and_chain_blob(leaf, &fixture("intermediate.pem"), &store);
    assert!(matches!(
        result,
        Err(ChainCheckError::Verification(
            VerificationError::UnknownAuthority
        ))
    ));
}

#[test]
fn test_internet_discovery_tries_next_url_on_failure() {
    let store = root_store();
    let leaf = fixture_cert("leaf.pem");

    // the leaf's first issuer URL is not served; the second must be used
    let fetcher = MapFetcher::new(&[
        ("http://ca.chaincheck.test/intermediate.cer", "intermediate.pem"),
        ("http://ca.chaincheck.test/root.cer", "root.pem"),
    ]);

    let chain = CertificateChain::from_certificate_and_internet(leaf, &store, &fetcher).unwrap();
    assert_eq!(chain.intermediates.len(), 1);
    assert!(chain.intermediates[0].subject().contains("Intermediate"));
}

#[test]
fn test_internet_discovery_exhausted_urls() {
    let store = root_store();
    let leaf = fixture_cert("leaf.pem");
    let fetcher = MapFetcher::new(&[]);

    let result = CertificateChain::from_certificate_and_internet(leaf, &store, &fetcher);
    assert!(matches!(
        result,
        Err(ChainCheckError::Discovery(
            DiscoveryError::ExhaustedUrls { .. }
        ))
    ));
}

#[test]
fn test_internet_discovery_dead_end_without_issuer_urls() {
    let store = root_store();
    // self-signed, not bundled, and carries no issuer URL hints
    let leaf = fixture_cert("selfsigned.pem");
    let fetcher = MapFetcher::new(&[]);

    let result = CertificateChain::from_certificate_and_internet(leaf, &store, &fetcher);
    assert!(matches!(
        result,
        Err(ChainCheckError::Discovery(DiscoveryError::NoIssuerUrl { .. }))
    ));
}

#[test]
fn test_internet_discovery_bundled_leaf_stops_immediately() {
    let store = root_store();
    let leaf = fixture_cert("root.pem");
    let fetcher = MapFetcher::new(&[]);

    let chain = CertificateChain::from_certificate_and_internet(leaf, &store, &fetcher).unwrap();
    assert!(chain.intermediates.is_empty());
}

#[test]
fn test_provider_record() {
    let record = ProviderCertificate {
        name: "www-example".to_string(),
        certificate_body: Some(String::from_utf8(fixture("leaf.pem")).unwrap()),
        certificate_chain: Some(String::from_utf8(fixture("intermediate.pem")).unwrap()),
        uploaded_at: None,
    };

    let chain = CertificateChain::from_provider_record(&record).unwrap();
    assert!(chain.leaf.subject().contains("valid.chaincheck.test"));
    assert_eq!(chain.intermediates.len(), 1);
}

#[test]
fn test_provider_record_chain_is_optional() {
    let record = ProviderCertificate {
        name: "www-example".to_string(),
        certificate_body: Some(String::from_utf8(fixture("leaf.pem")).unwrap()),
        certificate_chain: None,
        uploaded_at: None,
    };

    let chain = CertificateChain::from_provider_record(&record).unwrap();
    assert!(chain.intermediates.is_empty());
}

#[test]
fn test_provider_record_requires_body() {
    let record = ProviderCertificate {
        name: "www-example".to_string(),
        certificate_body: None,
        certificate_chain: None,
        uploaded_at: None,
    };

    assert!(matches!(
        CertificateChain::from_provider_record(&record),
        Err(ChainCheckError::MissingCertificateBody)
    ));
}

#[test]
fn test_provider_record_deserializes_api_payloads() {
    let payload = r#"{
        "ServerCertificateName": "www-example",
        "CertificateBody": "-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n",
        "UploadDate": "2026-01-15T12:00:00Z"
    }"#;
    let record: ProviderCertificate = serde_json::from_str(payload).unwrap();
    assert_eq!(record.name, "www-example");
    assert!(record.certificate_body.is_some());
    assert!(record.certificate_chain.is_none());
    assert!(record.uploaded_at.is_some());
}
