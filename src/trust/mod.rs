//! Trusted root certificate store
//!
//! Holds the bundled root pool plus a subject index for O(1) "is this a
//! bundled root" membership tests. Built once at process start and passed
//! by reference; read-only thereafter.
//!
//! The bundle is discovered the same way OpenSSL finds it: `SSL_CERT_FILE`,
//! then `openssl-probe`, then well-known bundle paths, then certificate
//! directories.

use crate::certificate::Certificate;
use crate::utils::TrustError;
use std::collections::HashMap;
use std::path::Path;
use x509_parser::prelude::*;

/// Well-known CA bundle file paths, in order of preference.
const KNOWN_CA_BUNDLE_PATHS: &[&str] = &[
    "/etc/ssl/certs/ca-certificates.crt", // Debian/Ubuntu
    "/etc/pki/tls/certs/ca-bundle.crt",   // RHEL/CentOS/Fedora
    "/etc/ssl/ca-bundle.pem",             // openSUSE
    "/etc/ssl/cert.pem",                  // macOS, Alpine
];

/// Well-known CA certificate directory paths.
const KNOWN_CA_DIR_PATHS: &[&str] = &["/etc/ssl/certs"];

/// The bundled root certificate pool.
///
/// Keyed by the raw DER subject so both membership tests and issuer lookups
/// are byte-exact, with no name canonicalization.
pub struct TrustStore {
    certs_by_subject: HashMap<Vec<u8>, Vec<Vec<u8>>>,
    count: usize,
}

impl std::fmt::Debug for TrustStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustStore")
            .field("count", &self.count)
            .finish()
    }
}

impl TrustStore {
    fn empty() -> Self {
        TrustStore {
            certs_by_subject: HashMap::new(),
            count: 0,
        }
    }

    /// Load the bundled root pool.
    ///
    /// A failure here is fatal for the process: no trust decision can be
    /// made with a partial or empty store, so callers must not continue.
    pub fn bundled() -> Result<Self, TrustError> {
        let mut store = TrustStore::empty();

        let probe = openssl_probe::probe();
        let file_candidates = std::env::var("SSL_CERT_FILE")
            .ok()
            .into_iter()
            .chain(
                probe
                    .cert_file
                    .iter()
                    .map(|p| p.to_string_lossy().into_owned()),
            )
            .chain(KNOWN_CA_BUNDLE_PATHS.iter().map(|s| (*s).to_string()));

        for candidate in file_candidates {
            if let Ok(data) = std::fs::read(&candidate) {
                if store.add_pem_bundle(&data) > 0 {
                    return Ok(store);
                }
            }
        }

        let dir_candidates = std::env::var("SSL_CERT_DIR")
            .ok()
            .into_iter()
            .chain(
                probe
                    .cert_dir
                    .iter()
                    .map(|p| p.to_string_lossy().into_owned()),
            )
            .chain(KNOWN_CA_DIR_PATHS.iter().map(|s| (*s).to_string()));

        for dir in dir_candidates {
            if store.add_pem_directory(Path::new(&dir)) > 0 {
                return Ok(store);
            }
        }

        Err(TrustError::BundleLoad {
            message: "no root certificate bundle found on this system".to_string(),
        })
    }

    /// Build a store from caller-supplied PEM material. Used by tests and
    /// by collaborators pinning their own roots.
    pub fn from_pem(data: &[u8]) -> Result<Self, TrustError> {
        let mut store = TrustStore::empty();
        if store.add_pem_bundle(data) == 0 {
            return Err(TrustError::BundleLoad {
                message: "no certificates found in the supplied bundle".to_string(),
            });
        }
        Ok(store)
    }

    /// Add every CERTIFICATE block in a PEM bundle, skipping entries that
    /// fail to parse (real-world bundles contain the occasional dud).
    /// Returns the number of certificates added.
    fn add_pem_bundle(&mut self, data: &[u8]) -> usize {
        let blocks = match ::pem::parse_many(data) {
            Ok(blocks) => blocks,
            Err(_) => return 0,
        };
        let mut added = 0;
        for block in blocks {
            if block.tag() != "CERTIFICATE" {
                continue;
            }
            if self.add_der(block.contents()) {
                added += 1;
            }
        }
        added
    }

    fn add_pem_directory(&mut self, dir: &Path) -> usize {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => return 0,
        };
        let mut added = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && is_pem_cert_file(&path) {
                if let Ok(data) = std::fs::read(&path) {
                    added += self.add_pem_bundle(&data);
                }
            }
        }
        added
    }

    fn add_der(&mut self, der: &[u8]) -> bool {
        let subject = match X509Certificate::from_der(der) {
            Ok((_, x509)) => x509.subject().as_raw().to_vec(),
            Err(_) => return false,
        };
        self.certs_by_subject
            .entry(subject)
            .or_default()
            .push(der.to_vec());
        self.count += 1;
        true
    }

    /// True iff the certificate's raw subject matches a subject in the
    /// bundled pool. A subject-equality test only, not a chain check: it
    /// exists so the chain builder can stop walking once it reaches a root
    /// the verifier will trust anyway.
    pub fn is_bundled(&self, cert: &Certificate) -> bool {
        self.certs_by_subject.contains_key(cert.raw_subject())
    }

    /// DER certificates in the pool whose subject matches the given raw
    /// issuer name, for trust-path construction.
    pub(crate) fn issuer_candidates(&self, subject_raw: &[u8]) -> &[Vec<u8>] {
        self.certs_by_subject
            .get(subject_raw)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Matches `.pem`, `.crt`, `.cer` extensions and OpenSSL hash-linked files
/// (`XXXXXXXX.N` with a single-digit extension).
fn is_pem_cert_file(path: &Path) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(e) => e,
        None => return false,
    };
    matches!(ext, "pem" | "crt" | "cer")
        || (ext.len() == 1 && ext.bytes().next().is_some_and(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bundle_rejected() {
        assert!(TrustStore::from_pem(b"no pem here").is_err());
    }

    #[test]
    fn test_is_pem_cert_file() {
        assert!(is_pem_cert_file(Path::new("/etc/ssl/certs/foo.pem")));
        assert!(is_pem_cert_file(Path::new("ca.crt")));
        assert!(is_pem_cert_file(Path::new("a1b2c3d4.0")));
        assert!(!is_pem_cert_file(Path::new("README.md")));
        assert!(!is_pem_cert_file(Path::new("noext")));
    }
}
