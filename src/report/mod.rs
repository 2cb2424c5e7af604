//! Text report rendering
//!
//! Produces append-only, re-indentable line sequences describing chains,
//! certificates, and their warnings. This is a human-facing report, not a
//! machine-readable format.

use crate::certificate::Certificate;
use crate::chain::CertificateChain;
use crate::trust::TrustStore;
use crate::warnings;
use std::io::Write;

/// An append-only buffer of report lines that can be re-indented as a block
#[derive(Debug, Clone, Default)]
pub struct Lines {
    lines: Vec<String>,
}

impl Lines {
    pub fn new() -> Self {
        Lines::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn append(&mut self, other: Lines) {
        self.lines.extend(other.lines);
    }

    /// A copy with every line prefixed by `indent`
    pub fn indented_by(&self, indent: &str) -> Lines {
        Lines {
            lines: self
                .lines
                .iter()
                .map(|line| format!("{}{}", indent, line))
                .collect(),
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn write_to(&self, out: &mut impl Write) -> std::io::Result<()> {
        for line in &self.lines {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Lines {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Render a whole chain: the leaf, then each intermediate, nested under
/// numbered labels.
pub fn chain_lines(chain: &CertificateChain, store: &TrustStore, wrap: usize) -> Lines {
    let mut lines = Lines::new();

    lines.push("Leaf Certificate:");
    lines.append(certificate_lines(&chain.leaf, store, wrap.saturating_sub(2)).indented_by("  "));

    for (index, cert) in chain.intermediates.iter().enumerate() {
        lines.push(format!("Intermediate #{}:", index + 1));
        lines.append(certificate_lines(cert, store, wrap.saturating_sub(2)).indented_by("  "));
    }

    lines
}

/// Render one certificate: identity, validity, algorithms, names, and any
/// warnings word-wrapped to the given width.
pub fn certificate_lines(cert: &Certificate, store: &TrustStore, wrap: usize) -> Lines {
    let mut lines = Lines::new();

    lines.push(format!("Subject:      {}", cert.readable_subject()));
    lines.push(format!("Issuer:       {}", cert.readable_issuer()));
    lines.push(format!(
        "Bundled root: {}",
        if store.is_bundled(cert) { "yes" } else { "no" }
    ));
    lines.push(format!("Expires in:   {}", cert.readable_expiration()));
    lines.push(format!("Sig. algo:    {}", cert.signature_algorithm()));
    lines.push(format!("Key algo:     {}", cert.public_key().kind()));
    lines.push(format!("Key bits:     {}", cert.readable_key_bit_length()));
    lines.push(format!("Fingerprint:  {}", cert.fingerprint_sha256()));
    lines.append(domain_lines(cert));
    lines.append(warning_lines(cert, store, wrap));

    lines
}

fn domain_lines(cert: &Certificate) -> Lines {
    let mut lines = Lines::new();
    let mut prefix = "Valid for:    ";
    for name in cert.dns_names() {
        lines.push(format!("{}{}", prefix, name));
        prefix = "              ";
    }
    lines
}

fn warning_lines(cert: &Certificate, store: &TrustStore, wrap: usize) -> Lines {
    let mut lines = Lines::new();
    lines.push("Warnings:");

    let warnings = warnings::evaluate(cert, store);
    if warnings.is_empty() {
        lines.push("  - None. Yay!");
        return lines;
    }

    for warning in &warnings {
        let mut prefix = "  - ";
        for piece in word_wrap(&warning.description(), wrap.saturating_sub(4)) {
            lines.push(format!("{}{}", prefix, piece));
            prefix = "    ";
        }
    }

    lines
}

fn word_wrap(text: &str, width: usize) -> Vec<String> {
    textwrap::wrap(text, width.max(1))
        .into_iter()
        .map(|cow| cow.into_owned())
        .collect()
}
