//! chaincheck - verify and prepare TLS certificate chains
//!
//! Checks live servers, local chain files, and certificate/key pairs
//! against the bundled root store, and resolves the intermediates needed
//! for deployment.

use chaincheck::cli::{Cli, Commands};
use chaincheck::commands;
use chaincheck::utils::Result;
use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

fn main() {
    // Install the ring crypto provider for rustls
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    if let Err(e) = run() {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    match cli.command {
        Commands::Verify(args) => commands::run_verify(&args.target, cli.width),
        Commands::Inspect(args) => {
            commands::run_inspect(&args.file, args.dns_name.as_deref(), cli.width)
        }
        Commands::Prepare(args) => commands::run_prepare(
            &args.cert,
            &args.key,
            args.chain.as_deref(),
            args.out.as_deref(),
            cli.width,
        ),
    }
}
