use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use colored::Colorize;
use gfec_codec::{active_engine, audit_limited, generator_matrix, Code, Strategy};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Parser)]
#[command(name = "gfec", about = "GF(2^8) erasure coding toolkit")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Encode random data, corrupt some shards, and decode them back.
    Demo {
        #[arg(long, default_value_t = 8)] k: usize,
        #[arg(long, default_value_t = 12)] m: usize,
        /// Bytes per shard.
        #[arg(long, default_value_t = 16)] len: usize,
        #[arg(long, default_value_t = Strategy::Cauchy)] strategy: Strategy,
        /// Shards to erase, comma separated.
        #[arg(long, value_delimiter = ',', default_value = "0,2,3,4")] erase: Vec<usize>,
        #[arg(long)] seed: Option<u64>,
    },
    /// Check every maximal erasure pattern for a singular decode.
    Audit {
        #[arg(long)] k: usize,
        #[arg(long)] m: usize,
        #[arg(long, default_value_t = Strategy::Vandermonde)] strategy: Strategy,
        /// Stop after this many patterns.
        #[arg(long)] limit: Option<usize>,
    },
    /// Print a generator matrix.
    Matrix {
        #[arg(long)] k: usize,
        #[arg(long)] m: usize,
        #[arg(long, default_value_t = Strategy::Cauchy)] strategy: Strategy,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    info!("gfec {} (kernel: {})", env!("CARGO_PKG_VERSION"), active_engine());

    match cli.cmd {
        Cmd::Demo { k, m, len, strategy, erase, seed } => demo(k, m, len, strategy, &erase, seed),
        Cmd::Audit { k, m, strategy, limit } => audit(k, m, strategy, limit),
        Cmd::Matrix { k, m, strategy } => {
            let g = generator_matrix(strategy, k, m).with_context(|| format!("building {strategy} generator"))?;
            print!("{g}");
            Ok(())
        }
    }
}

fn demo(k: usize, m: usize, len: usize, strategy: Strategy, erase: &[usize], seed: Option<u64>) -> anyhow::Result<()> {
    let code = Code::with_strategy(strategy, k, m, len).context("invalid code parameters")?;
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let source: Vec<u8> = (0..code.data_len()).map(|_| rng.gen()).collect();
    info!("Source: {}", hex::encode(&source));

    let parity = code.encode(&source)?;
    info!("Encoded: {}", hex::encode(&parity));

    let mut shards = source.clone();
    shards.extend_from_slice(&parity);
    for &row in erase {
        if row >= m {
            bail!("cannot erase shard {row}: only {m} shards");
        }
        shards[row * len..(row + 1) * len].fill(0x62);
    }
    info!("Corrupted: {}", hex::encode(&shards[..code.data_len()]));

    let recovered = code.decode(&shards, erase).context("decode failed")?;
    info!("Recovered: {}", hex::encode(&recovered));

    if recovered == source {
        println!("{} {strategy} k={k} m={m}: recovered shards {erase:?}", "OK".green().bold());
        Ok(())
    } else {
        println!("{} {strategy} k={k} m={m}: output differs from source", "FAIL".red().bold());
        bail!("recovered data does not match source")
    }
}

fn audit(k: usize, m: usize, strategy: Strategy, limit: Option<usize>) -> anyhow::Result<()> {
    let report = audit_limited(strategy, k, m, limit.unwrap_or(usize::MAX))?;
    for pattern in &report.singular {
        println!("{} erasing {pattern:?}", "SINGULAR".red());
    }
    let scope = if report.exhaustive { "all" } else { "first" };
    let verdict = if report.is_mds() { "OK".green().bold() } else { "NOT MDS".red().bold() };
    println!(
        "{verdict} {strategy} k={k} m={m}: {} singular of {scope} {} patterns",
        report.singular.len(),
        report.patterns_checked
    );
    Ok(())
}
