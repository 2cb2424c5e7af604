//! Integration tests for chain verification

use chaincheck::certificate::parse_certificate;
use chaincheck::chain::CertificateChain;
use chaincheck::verify::{find_trust_path, verify_chain, VerificationError};
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

fn root_store() -> TrustStore {
    TrustStore::from_pem(&fixture("root.pem")).unwrap()
}

fn good_chain() -> CertificateChain {
    CertificateChain::from_full_chain_blob(&fixture("chain.pem")).unwrap()
}

#[test]
fn test_good_chain_verifies_without_hostname() {
    assert!(verify_chain(&good_chain(), "", &root_store()).is_ok());
}

#[test]
fn test_good_chain_verifies_with_covered_hostname() {
    assert!(verify_chain(&good_chain(), "valid.chaincheck.test", &root_store()).is_ok());
}

#[test]
fn test_hostname_mismatch_carries_names() {
    let result = verify_chain(&good_chain(), "wrong.example.org", &root_store());
    match result {
        Err(VerificationError::HostnameMismatch {
            dns_names,
            hostname,
        }) => {
            assert_eq!(hostname, "wrong.example.org");
            assert!(dns_names.contains(&"valid.chaincheck.test".to_string()));
        }
        other => panic!("expected a hostname mismatch, got {:?}", other),
    }
}

#[test]
fn test_self_signed_leaf_is_unknown_authority() {
    let leaf = parse_certificate(&fixture("selfsigned.pem")).unwrap();
    let chain = CertificateChain {
        leaf,
        intermediates: Vec::new(),
    };
    assert_eq!(
        verify_chain(&chain, "", &root_store()),
        Err(VerificationError::UnknownAuthority)
    );
}

#[test]
fn test_missing_intermediate_is_unknown_authority() {
    let leaf = parse_certificate(&fixture("leaf.pem")).unwrap();
    let chain = CertificateChain {
        leaf,
        intermediates: Vec::new(),
    };
    assert_eq!(
        verify_chain(&chain, "", &root_store()),
        Err(VerificationError::UnknownAuthority)
    );
}

#[test]
fn test_trust_path_ends_at_bundled_root() {
    let store = root_store();
    let leaf = parse_certificate(&fixture("leaf.pem")).unwrap();
    let intermediate = parse_certificate(&fixture("intermediate.pem")).unwrap();

    let path = find_trust_path(&leaf, std::slice::from_ref(&intermediate), &store).unwrap();
    assert_eq!(path.len(), 3);
    assert_eq!(path[0], leaf);
    assert_eq!(path[1], intermediate);
    assert!(store.is_bundled(&path[2]));
}

#[test]
fn test_unrelated_intermediate_does_not_help() {
    let store = root_store();
    let leaf = parse_certificate(&fixture("selfsigned.pem")).unwrap();
    let intermediate = parse_certificate(&fixture("intermediate.pem")).unwrap();

    assert!(find_trust_path(&leaf, &[intermediate], &store).is_none());
}

#[test]
fn test_hostname_checked_after_trust() {
    // an untrusted chain reports the trust failure even when the hostname
    // would also have mismatched
    let leaf = parse_certificate(&fixture("selfsigned.pem")).unwrap();
    let chain = CertificateChain {
        leaf,
        intermediates: Vec::new(),
    };
    assert_eq!(
        verify_chain(&chain, "wrong.example.org", &root_store()),
        Err(VerificationError::UnknownAuthority)
    );
}

#[test]
fn test_verification_errors_render_advice() {
    let message = VerificationError::UnknownAuthority.to_string();
    assert!(message.contains("self-signed"));
    assert!(message.contains("intermediate certificates"));

    let mismatch = VerificationError::HostnameMismatch {
        dns_names: vec!["a.example.org".to_string()],
        hostname: "b.example.org".to_string(),
    };
    let message = mismatch.to_string();
    assert!(message.contains("a.example.org"));
    assert!(message.contains("b.example.org"));
}
