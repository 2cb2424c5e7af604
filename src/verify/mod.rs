//! Chain verification against the bundled root pool
//!
//! Builds a trust path from the leaf through the supplied intermediates to
//! a bundled root, checking signatures and validity windows at each hop,
//! and classifies failures into a closed set callers can match on.

use crate::certificate::Certificate;
use crate::chain::CertificateChain;
use crate::trust::TrustStore;
use x509_parser::prelude::*;

/// Maximum trust-path length, as a guard against issuer loops.
const MAX_PATH_DEPTH: usize = 32;

/// Structured verification outcome.
///
/// The variants carry enough data for callers to compose their own
/// messages; `Display` renders the long-form operator advice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// The certificate's DNS names don't cover the target host
    HostnameMismatch {
        dns_names: Vec<String>,
        hostname: String,
    },
    /// No trust path from the leaf to a bundled root
    UnknownAuthority,
    /// Anything the underlying engine reports that doesn't merit its own type
    Other(String),
}

impl std::fmt::Display for VerificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationError::HostnameMismatch {
                dns_names,
                hostname,
            } => {
                writeln!(f, "The received certificate, which is valid for:")?;
                writeln!(f)?;
                for name in dns_names {
                    writeln!(f, "  - {}", name)?;
                }
                writeln!(f)?;
                writeln!(f, "Doesn't match the target hostname, which is:")?;
                writeln!(f)?;
                writeln!(f, "    {}", hostname)?;
                writeln!(f)?;
                write!(
                    f,
                    "You're probably using the wrong certificate for this use."
                )
            }
            VerificationError::UnknownAuthority => {
                writeln!(
                    f,
                    "Unable to verify the certificate chain up to a trusted bundled root CA"
                )?;
                writeln!(f, "certificate. This can be due to:")?;
                writeln!(f)?;
                writeln!(f, "  - Using self-signed certificates")?;
                writeln!(f)?;
                writeln!(
                    f,
                    "  - The server side not serving the intermediate certificates needed to"
                )?;
                writeln!(f, "    build a trust chain up to a bundled certificate")?;
                writeln!(f)?;
                writeln!(
                    f,
                    "This should probably be corrected if you want your site to work for the"
                )?;
                writeln!(
                    f,
                    "majority of users. In the second case you might not see errors at first,"
                )?;
                writeln!(
                    f,
                    "since modern browsers cache intermediate certificates, but you'll see"
                )?;
                write!(f, "intermittent connection problems anyway.")
            }
            VerificationError::Other(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for VerificationError {}

/// Verify a chain: trust path first, then (when `dns_name` is non-empty)
/// hostname coverage of the leaf.
pub fn verify_chain(
    chain: &CertificateChain,
    dns_name: &str,
    store: &TrustStore,
) -> Result<(), VerificationError> {
    trust_path(&chain.leaf, &chain.intermediates, store)?;

    if !dns_name.is_empty() && !chain.leaf.matches_hostname(dns_name) {
        return Err(VerificationError::HostnameMismatch {
            dns_names: chain.leaf.dns_names().to_vec(),
            hostname: dns_name.to_string(),
        });
    }

    Ok(())
}

/// Compute the verified trust path, classifying failures. The returned path
/// starts at the leaf and, unless the leaf itself is bundled, ends with the
/// bundled root that anchors it.
pub(crate) fn trust_path(
    leaf: &Certificate,
    intermediates: &[Certificate],
    store: &TrustStore,
) -> Result<Vec<Certificate>, VerificationError> {
    if !leaf.is_time_valid() {
        return Err(VerificationError::Other(format!(
            "certificate for {} is outside its validity period",
            leaf.readable_subject()
        )));
    }
    find_trust_path(leaf, intermediates, store).ok_or(VerificationError::UnknownAuthority)
}

/// Depth-first issuer chase from the leaf over the intermediate pool,
/// verifying each hop's signature, terminating at a bundled root. Returns
/// the full ordered path, or `None` when no anchor is reachable.
pub fn find_trust_path(
    leaf: &Certificate,
    intermediates: &[Certificate],
    store: &TrustStore,
) -> Option<Vec<Certificate>> {
    let mut path = vec![leaf.clone()];
    let mut used = vec![false; intermediates.len()];
    if search(leaf, intermediates, &mut used, &mut path, store) {
        Some(path)
    } else {
        None
    }
}

fn search(
    current: &Certificate,
    intermediates: &[Certificate],
    used: &mut [bool],
    path: &mut Vec<Certificate>,
    store: &TrustStore,
) -> bool {
    // Anchor reached: the current certificate is itself a bundled root.
    if store.is_bundled(current) {
        return true;
    }

    // Or its issuer is in the pool and the signature checks out.
    for root_der in store.issuer_candidates(current.raw_issuer()) {
        if verify_signed_by(current.der(), root_der) {
            if let Ok(root) = Certificate::from_single_der(root_der) {
                path.push(root);
                return true;
            }
        }
    }

    if path.len() >= MAX_PATH_DEPTH {
        return false;
    }

    for (idx, candidate) in intermediates.iter().enumerate() {
        if used[idx] {
            continue;
        }
        if candidate.raw_subject() != current.raw_issuer() {
            continue;
        }
        if !candidate.is_time_valid() {
            continue;
        }
        if !verify_signed_by(current.der(), candidate.der()) {
            continue;
        }

        used[idx] = true;
        path.push(candidate.clone());
        if search(candidate, intermediates, used, path, store) {
            return true;
        }
        path.pop();
        used[idx] = false;
    }

    false
}

fn verify_signed_by(child_der: &[u8], parent_der: &[u8]) -> bool {
    let child = match X509Certificate::from_der(child_der) {
        Ok((_, cert)) => cert,
        Err(_) => return false,
    };
    let parent = match X509Certificate::from_der(parent_der) {
        Ok((_, cert)) => cert,
        Err(_) => return false,
    };
    child.verify_signature(Some(parent.public_key())).is_ok()
}
