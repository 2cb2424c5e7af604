//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chaincheck")]
#[command(version)]
#[command(about = "Verify and prepare TLS certificate chains", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Wrap report output at this column
    #[arg(long, default_value = "80", global = true)]
    pub width: usize,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a live server's certificate configuration
    Verify(VerifyArgs),

    /// Report on a chain stored in a local file
    Inspect(InspectArgs),

    /// Resolve the intermediates for a certificate/key pair
    Prepare(PrepareArgs),
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Target as hostname[:port]; port defaults to 443
    pub target: String,
}

#[derive(Args)]
pub struct InspectArgs {
    /// PEM or DER file holding the full chain, leaf first
    pub file: PathBuf,

    /// Additionally require the leaf to cover this DNS name
    #[arg(long)]
    pub dns_name: Option<String>,
}

#[derive(Args)]
pub struct PrepareArgs {
    /// Leaf certificate file
    #[arg(long)]
    pub cert: PathBuf,

    /// Private key file; must match the certificate
    #[arg(long)]
    pub key: PathBuf,

    /// Chain blob to resolve intermediates from. Without it the
    /// intermediates are discovered over the internet via issuer URLs.
    #[arg(long)]
    pub chain: Option<PathBuf>,

    /// Write the intermediates PEM here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}
