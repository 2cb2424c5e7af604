//! Issuer certificate fetching for internet chain discovery

use crate::certificate::{codec, Certificate};
use crate::utils::Result;
use std::time::Duration;

/// Fetches the certificate an issuer URL points at.
///
/// The chain walk is generic over this so discovery can be exercised
/// without a network.
pub trait CertificateFetcher {
    fn fetch(&self, url: &str) -> Result<Certificate>;
}

/// Blocking HTTP fetcher used in production
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(HttpFetcher { client })
    }
}

impl CertificateFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Certificate> {
        tracing::debug!(url, "fetching issuer certificate");
        let response = self.client.get(url).send()?.error_for_status()?;
        let body = response.bytes()?;
        Ok(codec::parse_certificate(&body)?)
    }
}
