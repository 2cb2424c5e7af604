//! chaincheck library
//!
//! Certificate chain assembly and trust verification for TLS deployments:
//! - PEM/DER certificate and private key parsing, with key/cert pairing
//! - Chain building from live handshakes, stored blobs, cloud provider
//!   records, and internet discovery over issuer URLs
//! - Trust-path verification against the bundled root store, with typed
//!   failure classification
//! - Advisory warnings for expiry, weak signatures, and short keys
//! - Indentable text reports for terminal display
//!
//! # Usage
//!
//! ```rust,ignore
//! use chaincheck::{CertificateChain, TrustStore};
//!
//! let store = TrustStore::bundled()?;
//! let chain = CertificateChain::from_tls_handshake("example.com", 443)?;
//! chaincheck::verify::verify_chain(&chain, "example.com", &store)?;
//! ```

pub mod certificate;
pub mod chain;
pub mod cli;
pub mod commands;
pub mod provider;
pub mod report;
pub mod trust;
pub mod utils;
pub mod verify;
pub mod warnings;

// Re-export commonly used types
pub use certificate::{Certificate, PrivateKey, PublicKeyInfo, SignatureAlgorithm};
pub use chain::{CertificateChain, CertificateFetcher, HttpFetcher};
pub use provider::ProviderCertificate;
pub use trust::TrustStore;
pub use utils::{ChainCheckError, Result};
pub use verify::VerificationError;
pub use warnings::Warning;
