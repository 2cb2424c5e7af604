//! Owned certificate model
//!
//! Wraps a parsed X.509 certificate in an owned structure so values can be
//! passed around without tying them to the lifetime of the source buffer.
//! All fields are extracted once at construction; the raw DER is retained
//! for re-encoding and signature checks.

use crate::certificate::key::PrivateKey;
use crate::utils::ParseError;
use chrono::{DateTime, TimeZone, Utc};
use sha2::{Digest, Sha256};
use x509_parser::prelude::*;
use x509_parser::public_key::PublicKey;

const OID_ACCESS_CA_ISSUERS: &str = "1.3.6.1.5.5.7.48.2";

/// Signature algorithm of a certificate, as a closed set plus a raw
/// fallback for algorithms the tool has no special handling for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    Md2Rsa,
    Md5Rsa,
    Sha1Rsa,
    Sha256Rsa,
    Sha384Rsa,
    Sha512Rsa,
    RsaPss,
    DsaSha1,
    EcdsaSha1,
    EcdsaSha256,
    EcdsaSha384,
    EcdsaSha512,
    Ed25519,
    Other(String),
}

impl SignatureAlgorithm {
    fn from_oid(oid: &str) -> Self {
        match oid {
            "1.2.840.113549.1.1.2" => SignatureAlgorithm::Md2Rsa,
            "1.2.840.113549.1.1.4" => SignatureAlgorithm::Md5Rsa,
            "1.2.840.113549.1.1.5" => SignatureAlgorithm::Sha1Rsa,
            "1.2.840.113549.1.1.11" => SignatureAlgorithm::Sha256Rsa,
            "1.2.840.113549.1.1.12" => SignatureAlgorithm::Sha384Rsa,
            "1.2.840.113549.1.1.13" => SignatureAlgorithm::Sha512Rsa,
            "1.2.840.113549.1.1.10" => SignatureAlgorithm::RsaPss,
            "1.2.840.10040.4.3" => SignatureAlgorithm::DsaSha1,
            "1.2.840.10045.4.1" => SignatureAlgorithm::EcdsaSha1,
            "1.2.840.10045.4.3.2" => SignatureAlgorithm::EcdsaSha256,
            "1.2.840.10045.4.3.3" => SignatureAlgorithm::EcdsaSha384,
            "1.2.840.10045.4.3.4" => SignatureAlgorithm::EcdsaSha512,
            "1.3.101.112" => SignatureAlgorithm::Ed25519,
            other => SignatureAlgorithm::Other(other.to_string()),
        }
    }

    /// Whether browsers consider this algorithm broken or weak
    pub fn is_obsolete(&self) -> bool {
        matches!(
            self,
            SignatureAlgorithm::Md2Rsa
                | SignatureAlgorithm::Md5Rsa
                | SignatureAlgorithm::Sha1Rsa
                | SignatureAlgorithm::DsaSha1
                | SignatureAlgorithm::EcdsaSha1
        )
    }
}

impl std::fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SignatureAlgorithm::Md2Rsa => "MD2-RSA",
            SignatureAlgorithm::Md5Rsa => "MD5-RSA",
            SignatureAlgorithm::Sha1Rsa => "SHA1-RSA",
            SignatureAlgorithm::Sha256Rsa => "SHA256-RSA",
            SignatureAlgorithm::Sha384Rsa => "SHA384-RSA",
            SignatureAlgorithm::Sha512Rsa => "SHA512-RSA",
            SignatureAlgorithm::RsaPss => "RSA-PSS",
            SignatureAlgorithm::DsaSha1 => "DSA-SHA1",
            SignatureAlgorithm::EcdsaSha1 => "ECDSA-SHA1",
            SignatureAlgorithm::EcdsaSha256 => "ECDSA-SHA256",
            SignatureAlgorithm::EcdsaSha384 => "ECDSA-SHA384",
            SignatureAlgorithm::EcdsaSha512 => "ECDSA-SHA512",
            SignatureAlgorithm::Ed25519 => "Ed25519",
            SignatureAlgorithm::Other(oid) => oid,
        };
        write!(f, "{}", name)
    }
}

/// Public key material extracted from a certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKeyInfo {
    /// RSA modulus, big-endian with leading zeros stripped
    Rsa { modulus: Vec<u8> },
    /// Named curve plus the SEC1 point as encoded in the certificate
    Ecdsa { curve: String, point: Vec<u8> },
    Dsa,
    Other(String),
}

impl PublicKeyInfo {
    pub fn kind(&self) -> &'static str {
        match self {
            PublicKeyInfo::Rsa { .. } => "RSA",
            PublicKeyInfo::Ecdsa { .. } => "ECDSA",
            PublicKeyInfo::Dsa => "DSA",
            PublicKeyInfo::Other(_) => "Unknown algorithm",
        }
    }
}

/// A single parsed X.509 certificate plus an optional associated private key.
///
/// Immutable after construction. Equality compares the raw DER bytes.
#[derive(Clone)]
pub struct Certificate {
    der: Vec<u8>,
    subject: String,
    issuer: String,
    subject_cn: Option<String>,
    issuer_cn: Option<String>,
    raw_subject: Vec<u8>,
    raw_issuer: Vec<u8>,
    subject_key_id: Option<Vec<u8>>,
    authority_key_id: Option<Vec<u8>>,
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
    dns_names: Vec<String>,
    signature_algorithm: SignatureAlgorithm,
    public_key: PublicKeyInfo,
    issuer_urls: Vec<String>,
    private_key: Option<PrivateKey>,
}

impl PartialEq for Certificate {
    fn eq(&self, other: &Self) -> bool {
        self.der == other.der
    }
}

impl Eq for Certificate {}

impl std::fmt::Debug for Certificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Certificate")
            .field("subject", &self.subject)
            .field("issuer", &self.issuer)
            .field("not_after", &self.not_after)
            .field("has_private_key", &self.private_key.is_some())
            .finish()
    }
}

impl Certificate {
    /// Parse a single DER-encoded certificate into an owned value
    pub fn from_single_der(der: &[u8]) -> Result<Self, ParseError> {
        let (_, cert) =
            X509Certificate::from_der(der).map_err(|e| ParseError::MalformedCertificate {
                message: format!("{:?}", e),
            })?;
        Self::from_x509(&cert, der.to_vec())
    }

    pub(crate) fn from_x509(cert: &X509Certificate, der: Vec<u8>) -> Result<Self, ParseError> {
        let subject = cert.subject().to_string();
        let issuer = cert.issuer().to_string();
        let subject_cn = extract_cn(cert.subject());
        let issuer_cn = extract_cn(cert.issuer());
        let raw_subject = cert.subject().as_raw().to_vec();
        let raw_issuer = cert.issuer().as_raw().to_vec();

        let not_before = asn1_time_to_datetime(cert.validity().not_before)?;
        let not_after = asn1_time_to_datetime(cert.validity().not_after)?;

        let mut subject_key_id = None;
        let mut authority_key_id = None;
        let mut issuer_urls = Vec::new();
        for ext in cert.extensions() {
            match ext.parsed_extension() {
                ParsedExtension::SubjectKeyIdentifier(ki) => {
                    subject_key_id = Some(ki.0.to_vec());
                }
                ParsedExtension::AuthorityKeyIdentifier(aki) => {
                    authority_key_id = aki.key_identifier.as_ref().map(|ki| ki.0.to_vec());
                }
                ParsedExtension::AuthorityInfoAccess(aia) => {
                    for desc in &aia.accessdescs {
                        if desc.access_method.to_id_string() == OID_ACCESS_CA_ISSUERS {
                            if let GeneralName::URI(uri) = &desc.access_location {
                                issuer_urls.push(uri.to_string());
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        let dns_names = extract_dns_names(cert);
        let signature_algorithm =
            SignatureAlgorithm::from_oid(&cert.signature_algorithm.algorithm.to_id_string());
        let public_key = extract_public_key(cert);

        Ok(Certificate {
            der,
            subject,
            issuer,
            subject_cn,
            issuer_cn,
            raw_subject,
            raw_issuer,
            subject_key_id,
            authority_key_id,
            not_before,
            not_after,
            dns_names,
            signature_algorithm,
            public_key,
            issuer_urls,
            private_key: None,
        })
    }

    /// Load a certificate from a PEM or DER file
    pub fn from_file(path: &std::path::Path) -> crate::utils::Result<Self> {
        let data = std::fs::read(path)?;
        Ok(crate::certificate::codec::parse_certificate(&data)?)
    }

    /// Load a certificate and private key from a file pair, enforcing that
    /// the key's public component matches the certificate's public key.
    pub fn with_key_from_files(
        cert_path: &std::path::Path,
        key_path: &std::path::Path,
    ) -> crate::utils::Result<Self> {
        let mut cert = Self::from_file(cert_path)?;
        let key_data = std::fs::read(key_path)?;
        let key = crate::certificate::key::parse_private_key(&key_data)?;
        crate::certificate::key::match_key_to_certificate(&cert, &key)?;
        cert.private_key = Some(key);
        Ok(cert)
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub(crate) fn raw_subject(&self) -> &[u8] {
        &self.raw_subject
    }

    pub(crate) fn raw_issuer(&self) -> &[u8] {
        &self.raw_issuer
    }

    pub fn subject_key_id(&self) -> Option<&[u8]> {
        self.subject_key_id.as_deref()
    }

    pub fn authority_key_id(&self) -> Option<&[u8]> {
        self.authority_key_id.as_deref()
    }

    pub fn not_before(&self) -> DateTime<Utc> {
        self.not_before
    }

    pub fn not_after(&self) -> DateTime<Utc> {
        self.not_after
    }

    pub fn dns_names(&self) -> &[String] {
        &self.dns_names
    }

    pub fn signature_algorithm(&self) -> &SignatureAlgorithm {
        &self.signature_algorithm
    }

    pub fn public_key(&self) -> &PublicKeyInfo {
        &self.public_key
    }

    /// URLs from the Authority Information Access extension pointing at the
    /// issuing certificate, used for automated chain discovery.
    pub fn issuer_urls(&self) -> &[String] {
        &self.issuer_urls
    }

    pub fn private_key(&self) -> Option<&PrivateKey> {
        self.private_key.as_ref()
    }

    pub fn days_to_expire(&self) -> f64 {
        (self.not_after - Utc::now()).num_seconds() as f64 / 86_400.0
    }

    pub fn is_time_valid(&self) -> bool {
        let now = Utc::now();
        now >= self.not_before && now <= self.not_after
    }

    /// Short human identifier: key-identifier prefix plus common name
    pub fn readable_subject(&self) -> String {
        let cn = self.subject_cn.as_deref().unwrap_or(&self.subject);
        match &self.subject_key_id {
            Some(ski) if ski.len() >= 4 => format!("{} ({})", hex::encode(&ski[..4]), cn),
            _ => cn.to_string(),
        }
    }

    /// Issuer identifier, with special cases for self-signed and unsigned
    /// certificates based on the authority key identifier.
    pub fn readable_issuer(&self) -> String {
        let aki = match &self.authority_key_id {
            None => return "Unsigned".to_string(),
            Some(aki) => aki,
        };
        if Some(aki) == self.subject_key_id.as_ref() {
            return "Self-signed".to_string();
        }
        let cn = self.issuer_cn.as_deref().unwrap_or(&self.issuer);
        if aki.len() >= 4 {
            format!("{} ({})", hex::encode(&aki[..4]), cn)
        } else {
            cn.to_string()
        }
    }

    pub fn readable_expiration(&self) -> String {
        format!(
            "{:.2} days ({})",
            self.days_to_expire(),
            self.not_after.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }

    /// Bit length of the public key: the RSA modulus, or the X coordinate
    /// of an EC point.
    pub fn key_bits(&self) -> Option<u64> {
        match &self.public_key {
            PublicKeyInfo::Rsa { modulus } => Some(bit_length(modulus)),
            PublicKeyInfo::Ecdsa { point, .. } => {
                split_uncompressed_point(point).map(|(x, _)| bit_length(x))
            }
            _ => None,
        }
    }

    pub fn readable_key_bit_length(&self) -> String {
        match self.key_bits() {
            Some(bits) => bits.to_string(),
            None => "[unsupported key algorithm]".to_string(),
        }
    }

    /// Hex SHA-256 fingerprint of the DER encoding
    pub fn fingerprint_sha256(&self) -> String {
        hex::encode(Sha256::digest(&self.der))
    }

    /// Whether the certificate's DNS names cover the given hostname.
    /// A wildcard name matches exactly one additional label.
    pub fn matches_hostname(&self, hostname: &str) -> bool {
        let host = hostname.to_ascii_lowercase();
        self.dns_names
            .iter()
            .any(|name| dns_name_matches(&name.to_ascii_lowercase(), &host))
    }

    /// Encode as a PEM CERTIFICATE block wrapping the raw DER
    pub fn to_pem(&self) -> String {
        crate::certificate::codec::certificate_to_pem(&self.der)
    }
}

fn dns_name_matches(pattern: &str, host: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix("*.") {
        match host.split_once('.') {
            Some((label, rest)) => !label.is_empty() && rest == suffix,
            None => false,
        }
    } else {
        pattern == host
    }
}

fn extract_cn(name: &X509Name) -> Option<String> {
    name.iter_common_name()
        .next()
        .and_then(|attr| attr.as_str().ok())
        .map(|s| s.to_string())
}

fn extract_dns_names(cert: &X509Certificate) -> Vec<String> {
    let mut names = Vec::new();
    if let Ok(Some(san_ext)) = cert.subject_alternative_name() {
        for name in &san_ext.value.general_names {
            if let GeneralName::DNSName(dns) = name {
                names.push(dns.to_string());
            }
        }
    }
    names
}

fn extract_public_key(cert: &X509Certificate) -> PublicKeyInfo {
    let spki = cert.public_key();
    match spki.parsed() {
        Ok(PublicKey::RSA(rsa)) => PublicKeyInfo::Rsa {
            modulus: strip_leading_zeros(rsa.modulus).to_vec(),
        },
        Ok(PublicKey::EC(point)) => {
            let curve = spki
                .algorithm
                .parameters
                .as_ref()
                .and_then(|p| p.as_oid().ok())
                .map(|oid| curve_name(&oid.to_id_string()))
                .unwrap_or_else(|| "Unknown".to_string());
            PublicKeyInfo::Ecdsa {
                curve,
                point: point.data().to_vec(),
            }
        }
        Ok(PublicKey::DSA(_)) => PublicKeyInfo::Dsa,
        _ => PublicKeyInfo::Other(spki.algorithm.algorithm.to_id_string()),
    }
}

fn curve_name(oid: &str) -> String {
    match oid {
        "1.2.840.10045.3.1.7" => "P-256".to_string(),
        "1.3.132.0.34" => "P-384".to_string(),
        "1.3.132.0.35" => "P-521".to_string(),
        other => other.to_string(),
    }
}

pub(crate) fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

fn bit_length(bytes: &[u8]) -> u64 {
    let stripped = strip_leading_zeros(bytes);
    match stripped.first() {
        Some(first) => stripped.len() as u64 * 8 - first.leading_zeros() as u64,
        None => 0,
    }
}

/// Split an uncompressed SEC1 point into its X and Y coordinates
pub(crate) fn split_uncompressed_point(point: &[u8]) -> Option<(&[u8], &[u8])> {
    if point.len() < 3 || point[0] != 0x04 || (point.len() - 1) % 2 != 0 {
        return None;
    }
    let half = (point.len() - 1) / 2;
    Some((&point[1..1 + half], &point[1 + half..]))
}

fn asn1_time_to_datetime(time: ASN1Time) -> Result<DateTime<Utc>, ParseError> {
    Utc.timestamp_opt(time.timestamp(), 0)
        .single()
        .ok_or_else(|| ParseError::MalformedCertificate {
            message: "invalid validity timestamp".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_length() {
        assert_eq!(bit_length(&[0x00, 0x80, 0x00]), 16);
        assert_eq!(bit_length(&[0x01]), 1);
        assert_eq!(bit_length(&[0xff; 256]), 2048);
        assert_eq!(bit_length(&[]), 0);
    }

    #[test]
    fn test_dns_name_matching() {
        assert!(dns_name_matches("example.com", "example.com"));
        assert!(!dns_name_matches("example.com", "other.com"));
        assert!(dns_name_matches("*.example.com", "www.example.com"));
        assert!(!dns_name_matches("*.example.com", "example.com"));
        assert!(!dns_name_matches("*.example.com", "a.b.example.com"));
    }

    #[test]
    fn test_split_uncompressed_point() {
        let mut point = vec![0x04];
        point.extend_from_slice(&[0xaa; 32]);
        point.extend_from_slice(&[0xbb; 32]);
        let (x, y) = split_uncompressed_point(&point).unwrap();
        assert_eq!(x, &[0xaa; 32][..]);
        assert_eq!(y, &[0xbb; 32][..]);
        assert!(split_uncompressed_point(&[0x02, 0x01, 0x02]).is_none());
    }

    #[test]
    fn test_obsolete_signature_algorithms() {
        assert!(SignatureAlgorithm::Sha1Rsa.is_obsolete());
        assert!(SignatureAlgorithm::Md5Rsa.is_obsolete());
        assert!(SignatureAlgorithm::DsaSha1.is_obsolete());
        assert!(!SignatureAlgorithm::Sha256Rsa.is_obsolete());
        assert!(!SignatureAlgorithm::EcdsaSha256.is_obsolete());
    }
}
