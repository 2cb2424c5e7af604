//! Verify command: check a live server's certificate configuration

use crate::chain::CertificateChain;
use crate::report;
use crate::trust::TrustStore;
use crate::utils::Result;
use crate::verify;
use console::style;

/// Fetch the chain a server presents and verify it against the bundled
/// roots and the target hostname.
pub fn run_verify(target: &str, width: usize) -> Result<()> {
    let (host, port) = split_host_port(target);
    if port == 443 && !target.contains(':') {
        println!("Port not given, assuming 443.");
        println!();
    }

    let store = TrustStore::bundled()?;

    println!("{}", style("Certificate Information").bold().underlined());
    println!();

    let chain = CertificateChain::from_tls_handshake(&host, port)?;
    report::chain_lines(&chain, &store, width).write_to(&mut std::io::stdout())?;

    println!();
    println!("{}", style("Certificate Verification").bold().underlined());
    println!();

    match verify::verify_chain(&chain, &host, &store) {
        Ok(()) => println!("Result: {}", style("PASSED!").green().bold()),
        Err(e) => {
            println!("Result: {}", style("FAILED.").red().bold());
            println!();
            println!("{}", e);
        }
    }

    Ok(())
}

/// Split `host[:port]`, defaulting the port to 443
fn split_host_port(target: &str) -> (String, u16) {
    match target.rsplit_once(':') {
        Some((host, port)) => match port.parse::<u16>() {
            Ok(port) => (host.to_string(), port),
            Err(_) => (target.to_string(), 443),
        },
        None => (target.to_string(), 443),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_host_port() {
        assert_eq!(
            split_host_port("example.com"),
            ("example.com".to_string(), 443)
        );
        assert_eq!(
            split_host_port("example.com:8443"),
            ("example.com".to_string(), 8443)
        );
    }
}
