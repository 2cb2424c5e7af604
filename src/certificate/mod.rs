//! Certificate model and codec
//!
//! Parsing, encoding, and the owned [`Certificate`] value used throughout
//! the rest of the crate.

pub mod codec;
pub mod key;
pub mod model;

pub use codec::{certificate_to_pem, parse_certificate, parse_certificates};
pub use key::{match_key_to_certificate, parse_private_key, PrivateKey};
pub use model::{Certificate, PublicKeyInfo, SignatureAlgorithm};
