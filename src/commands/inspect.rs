//! Inspect command: report on a chain stored in a local file

use crate::chain::CertificateChain;
use crate::report;
use crate::trust::TrustStore;
use crate::utils::Result;
use crate::verify;
use console::style;
use std::path::Path;

/// Parse a full-chain blob, render the report, and verify the chain,
/// optionally against a DNS name.
pub fn run_inspect(file: &Path, dns_name: Option<&str>, width: usize) -> Result<()> {
    let store = TrustStore::bundled()?;
    let data = std::fs::read(file)?;
    let chain = CertificateChain::from_full_chain_blob(&data)?;

    println!("{}", style("Certificate Information").bold().underlined());
    println!();
    report::chain_lines(&chain, &store, width).write_to(&mut std::io::stdout())?;

    println!();
    println!("{}", style("Certificate Verification").bold().underlined());
    println!();

    match verify::verify_chain(&chain, dns_name.unwrap_or(""), &store) {
        Ok(()) => println!("Result: {}", style("PASSED!").green().bold()),
        Err(e) => {
            println!("Result: {}", style("FAILED.").red().bold());
            println!();
            println!("{}", e);
        }
    }

    Ok(())
}
