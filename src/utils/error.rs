//! Custom error types for chaincheck
//!
//! Domain-specific error types using `thiserror` for the failure modes of
//! certificate parsing, key matching, trust store loading, chain discovery,
//! and live TLS retrieval.

use thiserror::Error;

/// Top-level error type for chaincheck operations
#[derive(Error, Debug)]
pub enum ChainCheckError {
    #[error("certificate parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("key mismatch: {0}")]
    Mismatch(#[from] MismatchError),

    #[error("trust store error: {0}")]
    Trust(#[from] TrustError),

    #[error("chain discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("verification failed: {0}")]
    Verification(#[from] crate::verify::VerificationError),

    #[error("TLS error: {0}")]
    Tls(#[from] TlsError),

    #[error("provider certificate record has no certificate body")]
    MissingCertificateBody,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Certificate and private key parsing errors
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("no certificates were found in the input")]
    NoCertificates,

    #[error("unable to decode certificate: {message}")]
    MalformedCertificate { message: String },

    #[error("unable to decode PEM input: {message}")]
    MalformedPem { message: String },

    #[error("found a non-key PEM block where a private key was expected")]
    NonKeyPemBlock,

    #[error("failed to parse private key (tried PKCS#1, PKCS#8, and SEC1)")]
    UnsupportedPrivateKey,

    #[error("unable to encode private key: {message}")]
    KeyEncode { message: String },
}

/// Certificate/private-key pairing errors
#[derive(Error, Debug)]
pub enum MismatchError {
    #[error("public key is {cert_kind} but private key is {key_kind}")]
    KeyTypeMismatch {
        cert_kind: &'static str,
        key_kind: &'static str,
    },

    #[error("private RSA key does not match the certificate's public RSA key")]
    RsaKeyMismatch,

    #[error("private ECDSA key does not match the certificate's public ECDSA key")]
    EcdsaKeyMismatch,

    #[error("unsupported public key algorithm: {algorithm}")]
    UnsupportedAlgorithm { algorithm: String },
}

/// Trusted root bundle loading errors. These are fatal: no operation
/// requiring trust decisions can proceed without the bundle.
#[derive(Error, Debug)]
pub enum TrustError {
    #[error("unable to load certificates from the trusted root bundle: {message}")]
    BundleLoad { message: String },
}

/// Internet chain-walk errors
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("certificate for {subject} does not point to a parent certificate")]
    NoIssuerUrl { subject: String },

    #[error("unable to fetch next certificate in chain for {subject}: {message}")]
    ExhaustedUrls { subject: String, message: String },

    #[error("chain walk exceeded {max} certificates without reaching a trusted root")]
    DepthExceeded { max: usize },
}

/// Live TLS handshake errors
#[derive(Error, Debug)]
pub enum TlsError {
    #[error("unable to establish connection to {host}:{port}: {message}")]
    Connection {
        host: String,
        port: u16,
        message: String,
    },

    #[error("server at {host}:{port} presented no certificates")]
    NoPeerCertificates { host: String, port: u16 },

    #[error("TLS configuration error: {message}")]
    Configuration { message: String },
}

/// Result type alias using ChainCheckError
pub type Result<T> = std::result::Result<T, ChainCheckError>;
