use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use bitcoin::Transaction;
use clap::{Parser, Subcommand, ValueEnum};
use spv_proofs::{generate_proof, ProofBundle};
use tracing::{info, warn};

mod report;

use report::ProofReport;

/// Generate SPV inclusion proofs for a segwit transaction inside a synthetic block.
#[derive(Debug, Parser)]
#[command(name = "spv-proof", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a block around a transaction and print the proof bundle
    Generate(GenerateArgs),
    /// Check a CBOR proof bundle written by `generate --format cbor`
    Verify {
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Debug, clap::Args)]
struct GenerateArgs {
    /// Raw segwit transaction as hex
    #[arg(long, conflicts_with = "tx_file", required_unless_present = "tx_file")]
    tx: Option<String>,
    /// File holding the raw transaction as hex
    #[arg(long)]
    tx_file: Option<PathBuf>,
    /// Number of transactions in the synthetic block
    #[arg(long, default_value_t = 2)]
    tx_count: u64,
    /// Position of the transaction in the block
    #[arg(long, default_value_t = 1)]
    tx_index: u64,
    /// Use random filler transaction ids instead of deterministic ones
    #[arg(long)]
    random: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Cbor,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Verify { input } => run_verify(&input),
    }
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let tx_hex = match (&args.tx, &args.tx_file) {
        (Some(tx), _) => tx.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("reading transaction from {}", path.display()))?,
        (None, None) => bail!("either --tx or --tx-file is required"),
    };
    let raw_tx = decode_hex(&tx_hex)?;
    describe_transaction(&raw_tx);

    let bundle = generate_proof(&raw_tx, args.tx_count, args.tx_index, args.random)
        .context("generating proof bundle")?;

    let rendered = match args.format {
        OutputFormat::Text => ProofReport::from_bundle(&bundle)?.to_text().into_bytes(),
        OutputFormat::Json => ProofReport::from_bundle(&bundle)?.to_json()?.into_bytes(),
        OutputFormat::Cbor => bundle.to_cbor()?,
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("writing proof to {}", path.display()))?;
            info!("Wrote {} bytes to {}", rendered.len(), path.display());
        }
        None => {
            use std::io::Write;
            std::io::stdout().write_all(&rendered).context("writing proof to stdout")?;
        }
    }
    Ok(())
}

fn run_verify(input: &Path) -> Result<()> {
    let data = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let bundle = ProofBundle::from_cbor(&data)?;
    bundle.verify()?;

    let report = ProofReport::from_bundle(&bundle)?;
    info!(
        "Proof for tx {} at index {} verified against header {}",
        report.txid, report.tx_index, report.header_hash
    );
    println!("valid");
    Ok(())
}

/// Decodes hex, tolerating surrounding whitespace and a `0x` prefix.
fn decode_hex(input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(trimmed).context("transaction is not valid hex")
}

/// Logs what the `bitcoin` crate makes of the bytes; the proof itself
/// accepts anything.
fn describe_transaction(raw_tx: &[u8]) {
    match bitcoin::consensus::deserialize::<Transaction>(raw_tx) {
        Ok(tx) => {
            info!(
                "Transaction txid {} wtxid {} ({} inputs, {} outputs)",
                tx.compute_txid(),
                tx.compute_wtxid(),
                tx.input.len(),
                tx.output.len()
            );
            if tx.input.iter().all(|input| input.witness.is_empty()) {
                warn!("Transaction carries no witness data");
            }
        }
        Err(e) => warn!("Bytes do not decode as a Bitcoin transaction: {}", e),
    }
}
