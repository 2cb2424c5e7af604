//! Integration tests for the warning rules

use chaincheck::certificate::parse_certificate;
use chaincheck::warnings::{evaluate, Warning};
use chaincheck::TrustStore;
use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn fixture(name: &str) -> Vec<u8> {
    std::fs::read(fixtures_dir().join(name)).expect("fixture should exist")
}

fn unrelated_store() -> TrustStore {
    // a store that does not contain any of the certificates under test
    TrustStore::from_pem(&fixture("root.pem")).unwrap()
}

#[test]
fn test_long_lived_cert_has_no_warnings() {
    let cert = parse_certificate(&fixture("leaf.pem")).unwrap();
    assert!(evaluate(&cert, &unrelated_store()).is_empty());
}

#[test]
fn test_expiring_cert_warns() {
    let cert = parse_certificate(&fixture("expiring.pem")).unwrap();
    let warnings = evaluate(&cert, &unrelated_store());
    assert_eq!(warnings.len(), 1);
    match &warnings[0] {
        Warning::Expiration { days_to_expire } => assert!(*days_to_expire < 90.0),
        other => panic!("expected an expiration warning, got {:?}", other),
    }
}

#[test]
fn test_short_rsa_key_warns() {
    let cert = parse_certificate(&fixture("rsa1024.pem")).unwrap();
    let warnings = evaluate(&cert, &unrelated_store());
    assert_eq!(warnings, vec![Warning::KeyTooShort { bits: 1024 }]);
}

#[test]
fn test_sha1_signature_warns() {
    let cert = parse_certificate(&fixture("sha1.pem")).unwrap();
    let warnings = evaluate(&cert, &unrelated_store());
    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        warnings[0],
        Warning::ObsoleteAlgorithm { .. }
    ));
}

#[test]
fn test_bundled_root_exempt_from_algorithm_rule() {
    // the same SHA-1 certificate stops warning once it is a bundled root
    let store = TrustStore::from_pem(&fixture("sha1.pem")).unwrap();
    let cert = parse_certificate(&fixture("sha1.pem")).unwrap();
    assert!(store.is_bundled(&cert));
    assert!(evaluate(&cert, &store).is_empty());
}

#[test]
fn test_bundled_root_exempt_from_key_size_rule() {
    let store = TrustStore::from_pem(&fixture("rsa1024.pem")).unwrap();
    let cert = parse_certificate(&fixture("rsa1024.pem")).unwrap();
    assert!(evaluate(&cert, &store).is_empty());
}

#[test]
fn test_bundled_root_not_exempt_from_expiration_rule() {
    let store = TrustStore::from_pem(&fixture("expiring.pem")).unwrap();
    let cert = parse_certificate(&fixture("expiring.pem")).unwrap();
    assert!(store.is_bundled(&cert));
    let warnings = evaluate(&cert, &store);
    assert_eq!(warnings.len(), 1);
    assert!(matches!(warnings[0], Warning::Expiration { .. }));
}

#[test]
fn test_warnings_preserve_rule_order() {
    // 1024-bit key AND expiring soon: expiration is declared first
    let cert = parse_certificate(&fixture("rsa1024-expiring.pem")).unwrap();
    let warnings = evaluate(&cert, &unrelated_store());
    assert_eq!(warnings.len(), 2);
    assert!(matches!(warnings[0], Warning::Expiration { .. }));
    assert!(matches!(warnings[1], Warning::KeyTooShort { bits: 1024 }));
}

#[test]
fn test_warning_text_mentions_the_numbers() {
    let cert = parse_certificate(&fixture("rsa1024.pem")).unwrap();
    let warnings = evaluate(&cert, &unrelated_store());
    assert_eq!(warnings[0].title(), "Key size is too short.");
    assert!(warnings[0].description().contains("1024 bits"));
}
