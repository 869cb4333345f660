//! Command-line interface for testforge
//!
//! # Usage Examples
//!
//! ## Classify
//! ```bash
//! # Route files by test kind
//! testforge classify src/payment.test-impl.ts src/orders.integration.ts e2e/checkout.spec.ts
//!
//! # Other ecosystems
//! testforge classify --ext tsx --ext js ui/Cart.test.tsx
//! ```
//!
//! ## Generate
//! ```bash
//! # Three reproducible fixtures as JSON
//! testforge generate --schema user.yaml --count 3 --seed 42
//!
//! # From a request file, as JSON lines
//! testforge generate --request fixtures/users.request.yaml --format jsonl -o users.jsonl
//! ```
//!
//! ## Check
//! ```bash
//! testforge check --schema user.yaml --input users.json
//! ```
//!
//! Logs go to stderr and are controlled with `RUST_LOG`, e.g.
//! `RUST_LOG=sample_generator=trace` shows every rejected candidate.

use clap::{Parser, Subcommand};
use testforge::commands::{
    run_check, run_classify, run_generate, CheckArgs, ClassifyArgs, GenerateArgs,
};

#[derive(Parser)]
#[command(name = "testforge")]
#[command(about = "Classify test files by kind and generate schema-driven test fixtures")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify test files as unit, integration, e2e or test implementation
    Classify(ClassifyArgs),

    /// Generate sample values from a schema
    Generate(GenerateArgs),

    /// Check JSON samples against a schema
    Check(CheckArgs),
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Classify(args) => run_classify(args),
        Commands::Generate(args) => run_generate(args),
        Commands::Check(args) => run_check(args),
    }
}
