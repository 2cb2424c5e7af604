//! Prepare command: resolve the intermediates for a certificate/key pair
//!
//! Produces the chain blob hosting targets want alongside the leaf and key.
//! The report goes to stderr so the PEM on stdout stays pipeable.

use crate::certificate::Certificate;
use crate::chain::{CertificateChain, HttpFetcher};
use crate::report;
use crate::trust::TrustStore;
use crate::utils::Result;
use console::style;
use std::io::Write;
use std::path::Path;

pub fn run_prepare(
    cert_path: &Path,
    key_path: &Path,
    chain_path: Option<&Path>,
    out: Option<&Path>,
    width: usize,
) -> Result<()> {
    let store = TrustStore::bundled()?;
    let leaf = Certificate::with_key_from_files(cert_path, key_path)?;

    let chain = match chain_path {
        Some(path) => {
            let blob = std::fs::read(path)?;
            CertificateChain::from_certificate_and_chain_blob(leaf, &blob, &store)?
        }
        None => {
            let fetcher = HttpFetcher::new()?;
            CertificateChain::from_certificate_and_internet(leaf, &store, &fetcher)?
        }
    };

    eprintln!("{}", style("Resolved Chain").bold().underlined());
    eprintln!();
    report::chain_lines(&chain, &store, width).write_to(&mut std::io::stderr())?;
    eprintln!();

    let pem = chain.intermediates_to_pem();
    match out {
        Some(path) => {
            std::fs::write(path, pem)?;
            eprintln!("Wrote {} intermediates to {}", chain.intermediates.len(), path.display());
        }
        None => {
            std::io::stdout().write_all(pem.as_bytes())?;
        }
    }

    Ok(())
}
