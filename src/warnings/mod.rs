//! Advisory warnings over a single certificate
//!
//! Each rule is a pure function of one certificate plus trust-store
//! membership; rules never look at chain context. Bundled roots are exempt
//! from the algorithm and key-size rules but not from the expiration rule.

use crate::certificate::{Certificate, PublicKeyInfo, SignatureAlgorithm};
use crate::trust::TrustStore;

/// Days-to-expiry threshold below which the expiration warning fires.
const EXPIRY_WARNING_DAYS: f64 = 90.0;

/// Minimum acceptable RSA modulus size in bits.
const MIN_RSA_BITS: u64 = 2048;

/// An advisory finding over a single certificate
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    Expiration { days_to_expire: f64 },
    ObsoleteAlgorithm { algorithm: SignatureAlgorithm },
    KeyTooShort { bits: u64 },
}

impl Warning {
    pub fn title(&self) -> &'static str {
        match self {
            Warning::Expiration { .. } => "The certificate will expire soon.",
            Warning::ObsoleteAlgorithm { .. } => "Certificate signed with obsolete algorithm.",
            Warning::KeyTooShort { .. } => "Key size is too short.",
        }
    }

    pub fn description(&self) -> String {
        match self {
            Warning::Expiration { days_to_expire } => format!(
                "This certificate is set to expire in {:.2} days, which is less than 3 \
                 months. You should probably prepare to renew this certificate (or any \
                 descendant certificate) soon.",
                days_to_expire
            ),
            Warning::ObsoleteAlgorithm { algorithm } => format!(
                "This certificate was signed using {}, which is considered a broken/weak \
                 algorithm. Modern browsers will tend to reject certificates signed in \
                 this manner, and you should consider replacing this certificate.",
                algorithm
            ),
            Warning::KeyTooShort { bits } => format!(
                "This certificate has a key that's too short ({} bits) for today's \
                 standards. RSA keys should have at least 2048 bits, and ECDSA curves \
                 should respect the requirements established by the CA/B forum. You \
                 should probably replace this certificate.",
                bits
            ),
        }
    }
}

/// Run every rule against the certificate, collecting non-empty results in
/// rule-declaration order: expiration, obsolete algorithm, key too short.
pub fn evaluate(cert: &Certificate, store: &TrustStore) -> Vec<Warning> {
    let mut warnings = Vec::new();
    if let Some(w) = expiration_warning(cert) {
        warnings.push(w);
    }
    if let Some(w) = obsolete_algorithm_warning(cert, store) {
        warnings.push(w);
    }
    if let Some(w) = key_too_short_warning(cert, store) {
        warnings.push(w);
    }
    warnings
}

fn expiration_warning(cert: &Certificate) -> Option<Warning> {
    let days_to_expire = cert.days_to_expire();
    if days_to_expire < EXPIRY_WARNING_DAYS {
        Some(Warning::Expiration { days_to_expire })
    } else {
        None
    }
}

fn obsolete_algorithm_warning(cert: &Certificate, store: &TrustStore) -> Option<Warning> {
    let algorithm = cert.signature_algorithm();
    if algorithm.is_obsolete() && !store.is_bundled(cert) {
        Some(Warning::ObsoleteAlgorithm {
            algorithm: algorithm.clone(),
        })
    } else {
        None
    }
}

fn key_too_short_warning(cert: &Certificate, store: &TrustStore) -> Option<Warning> {
    if !matches!(cert.public_key(), PublicKeyInfo::Rsa { .. }) {
        return None;
    }
    let bits = cert.key_bits()?;
    if bits < MIN_RSA_BITS && !store.is_bundled(cert) {
        Some(Warning::KeyTooShort { bits })
    } else {
        None
    }
}
