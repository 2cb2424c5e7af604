//! Utility modules for chaincheck

pub mod error;

pub use error::{
    ChainCheckError, DiscoveryError, MismatchError, ParseError, Result, TlsError, TrustError,
};
