//! Private key parsing, encoding, and certificate pairing
//!
//! Supports RSA and EC (P-256, P-384) keys. Decode attempts run in a fixed
//! order: PKCS#1 RSA, then PKCS#8 restricted to RSA/ECDSA payloads, then
//! SEC1. Output is always PKCS#1 or SEC1; there is no PKCS#8 output path.

use crate::certificate::model::{
    split_uncompressed_point, strip_leading_zeros, Certificate, PublicKeyInfo,
};
use crate::utils::{MismatchError, ParseError};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use pem::{EncodeConfig, LineEnding, Pem};
use pkcs8::DecodePrivateKey;
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::traits::PublicKeyParts;

/// A parsed private key
#[derive(Clone)]
pub enum PrivateKey {
    Rsa(rsa::RsaPrivateKey),
    EcP256(p256::SecretKey),
    EcP384(p384::SecretKey),
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PrivateKey({})", self.kind())
    }
}

impl PrivateKey {
    pub fn kind(&self) -> &'static str {
        match self {
            PrivateKey::Rsa(_) => "RSA",
            PrivateKey::EcP256(_) | PrivateKey::EcP384(_) => "ECDSA",
        }
    }

    /// Encode as a PEM block: PKCS#1 for RSA ("RSA PRIVATE KEY"), SEC1 for
    /// EC ("EC PRIVATE KEY").
    pub fn to_pem(&self) -> Result<String, ParseError> {
        let (tag, der) = match self {
            PrivateKey::Rsa(key) => {
                let doc = key
                    .to_pkcs1_der()
                    .map_err(|e| ParseError::KeyEncode {
                        message: e.to_string(),
                    })?;
                ("RSA PRIVATE KEY", doc.as_bytes().to_vec())
            }
            PrivateKey::EcP256(key) => {
                let der = key.to_sec1_der().map_err(|e| ParseError::KeyEncode {
                    message: e.to_string(),
                })?;
                ("EC PRIVATE KEY", der.to_vec())
            }
            PrivateKey::EcP384(key) => {
                let der = key.to_sec1_der().map_err(|e| ParseError::KeyEncode {
                    message: e.to_string(),
                })?;
                ("EC PRIVATE KEY", der.to_vec())
            }
        };
        let block = Pem::new(tag, der);
        Ok(pem::encode_config(
            &block,
            EncodeConfig::new().set_line_ending(LineEnding::LF),
        ))
    }
}

/// Parse a private key from PEM or DER bytes.
///
/// PEM input must carry a block whose type ends in "PRIVATE KEY"; the exact
/// type is otherwise ignored and every supported encoding is attempted on
/// the unwrapped body.
pub fn parse_private_key(data: &[u8]) -> Result<PrivateKey, ParseError> {
    let body;
    let der: &[u8] = if crate::certificate::codec::looks_like_pem(data) {
        let blocks = pem::parse_many(data).map_err(|e| ParseError::MalformedPem {
            message: e.to_string(),
        })?;
        let block = blocks.first().ok_or(ParseError::NonKeyPemBlock)?;
        if !block.tag().ends_with("PRIVATE KEY") {
            return Err(ParseError::NonKeyPemBlock);
        }
        body = block.contents().to_vec();
        &body
    } else {
        data
    };

    decode_private_key_der(der)
}

fn decode_private_key_der(der: &[u8]) -> Result<PrivateKey, ParseError> {
    if let Ok(key) = rsa::RsaPrivateKey::from_pkcs1_der(der) {
        return Ok(PrivateKey::Rsa(key));
    }
    if let Ok(key) = rsa::RsaPrivateKey::from_pkcs8_der(der) {
        return Ok(PrivateKey::Rsa(key));
    }
    if let Ok(key) = p256::SecretKey::from_pkcs8_der(der) {
        return Ok(PrivateKey::EcP256(key));
    }
    if let Ok(key) = p384::SecretKey::from_pkcs8_der(der) {
        return Ok(PrivateKey::EcP384(key));
    }
    if let Ok(key) = p256::SecretKey::from_sec1_der(der) {
        return Ok(PrivateKey::EcP256(key));
    }
    if let Ok(key) = p384::SecretKey::from_sec1_der(der) {
        return Ok(PrivateKey::EcP384(key));
    }
    Err(ParseError::UnsupportedPrivateKey)
}

/// Check that a private key's public component equals the certificate's
/// public key: modulus for RSA, both curve point coordinates for ECDSA.
/// Any other pairing is an unconditional mismatch.
pub fn match_key_to_certificate(
    cert: &Certificate,
    key: &PrivateKey,
) -> Result<(), MismatchError> {
    match cert.public_key() {
        PublicKeyInfo::Rsa { modulus } => {
            let rsa_key = match key {
                PrivateKey::Rsa(k) => k,
                other => {
                    return Err(MismatchError::KeyTypeMismatch {
                        cert_kind: "RSA",
                        key_kind: other.kind(),
                    })
                }
            };
            let key_modulus = rsa_key.n().to_bytes_be();
            if strip_leading_zeros(&key_modulus) != modulus.as_slice() {
                return Err(MismatchError::RsaKeyMismatch);
            }
            Ok(())
        }
        PublicKeyInfo::Ecdsa { curve, point } => {
            let (cert_x, cert_y) =
                split_uncompressed_point(point).ok_or(MismatchError::EcdsaKeyMismatch)?;
            let (key_x, key_y) = match (key, curve.as_str()) {
                (PrivateKey::EcP256(k), "P-256") => {
                    let encoded = k.public_key().to_encoded_point(false);
                    (
                        encoded.x().map(|x| x.to_vec()),
                        encoded.y().map(|y| y.to_vec()),
                    )
                }
                (PrivateKey::EcP384(k), "P-384") => {
                    let encoded = k.public_key().to_encoded_point(false);
                    (
                        encoded.x().map(|x| x.to_vec()),
                        encoded.y().map(|y| y.to_vec()),
                    )
                }
                (PrivateKey::Rsa(_), _) => {
                    return Err(MismatchError::KeyTypeMismatch {
                        cert_kind: "ECDSA",
                        key_kind: "RSA",
                    })
                }
                _ => return Err(MismatchError::EcdsaKeyMismatch),
            };
            match (key_x, key_y) {
                (Some(x), Some(y)) if x == cert_x && y == cert_y => Ok(()),
                _ => Err(MismatchError::EcdsaKeyMismatch),
            }
        }
        other => Err(MismatchError::UnsupportedAlgorithm {
            algorithm: other.kind().to_string(),
        }),
    }
}
