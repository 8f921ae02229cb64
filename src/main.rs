//! xvrec CLI - Command-line tool for Xenoverse record files.
//!
//! This is the main entry point for the xvrec command-line application.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use tracing::{debug, warn};

use xvrec::prelude::*;

/// xvrec - Xenoverse record file tool (BCM, BDM, BSA)
#[derive(Parser)]
#[command(name = "xvrec")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the kind, byte order and entry counts of a file
    Info {
        /// Input BCM/BDM/BSA file
        #[arg(short, long, env = "XVREC_INPUT")]
        input: PathBuf,

        /// Also load and list entry comments
        #[arg(short, long)]
        comments: bool,
    },

    /// Dump all entries as JSON
    Dump {
        /// Input BCM/BDM/BSA file
        #[arg(short, long, env = "XVREC_INPUT")]
        input: PathBuf,

        /// Output JSON file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Load a file and save it again (little-endian, canonical layout)
    Resave {
        /// Input BCM/BDM/BSA file
        #[arg(short, long, env = "XVREC_INPUT")]
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Carry the comment sidecar over to the output
        #[arg(short, long)]
        comments: bool,
    },

    /// Verify that files survive a load/save round trip
    Check {
        /// Input files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info { input, comments } => {
            cmd_info(&input, comments)?;
        }
        Commands::Dump { input, output } => {
            cmd_dump(&input, output.as_deref())?;
        }
        Commands::Resave {
            input,
            output,
            comments,
        } => {
            cmd_resave(&input, &output, comments)?;
        }
        Commands::Check { inputs } => {
            cmd_check(&inputs)?;
        }
    }

    Ok(())
}

fn open(path: &Path) -> Result<AnyContainer> {
    AnyContainer::open(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn cmd_info(input: &Path, comments: bool) -> Result<()> {
    let start = Instant::now();
    let mut container = open(input)?;
    if comments {
        container.load_comments(input);
    }

    let header = container.header();
    println!("File:       {}", input.display());
    println!("Kind:       {}", container.kind());
    println!("Byte order: {}", container.endian().name());
    println!("Data start: {}", header.data_start);
    println!("Entries:    {}", container.entry_count());

    match &container {
        AnyContainer::Bcm(bcm) => {
            if container.has_comments() {
                for (index, entry) in bcm.entries().iter().enumerate() {
                    println!("  {index:>4}{}", entry.display_comment());
                }
            }
        }
        AnyContainer::Bdm(bdm) => {
            println!("Layout:     {:?}", bdm.source_layout());
            for (index, entry) in bdm.entries().iter().enumerate() {
                let damage: Vec<u16> = entry.sub_entries.iter().map(|s| s.damage_amount).collect();
                println!("  {index:>4} id {:<6} damage {damage:?}{}", entry.id, entry.display_comment());
            }
        }
        AnyContainer::Bsa(bsa) => {
            let empty = bsa.entries().iter().filter(|e| e.is_none()).count();
            println!("Empty:      {empty}");
            for (index, entry) in bsa.entries().iter().enumerate() {
                let Some(entry) = entry else { continue };
                let types: Vec<&str> = entry
                    .sub_entries
                    .iter()
                    .map(|s| s.item_type.name())
                    .collect();
                println!(
                    "  {index:>4} collisions {} expirations {} items {} {types:?}",
                    entry.collisions.len(),
                    entry.expirations.len(),
                    entry.item_count()
                );
            }
        }
    }

    debug!(elapsed = ?start.elapsed(), "info done");

    Ok(())
}

fn cmd_dump(input: &Path, output: Option<&Path>) -> Result<()> {
    let container = open(input)?;

    let entries = entries_json(&container)?;

    let header = container.header();
    let document = json!({
        "kind": container.kind().name(),
        "endian": container.endian().name(),
        "header": {
            "u_06": header.u_06,
            "num_entries": header.num_entries,
            "data_start": header.data_start,
        },
        "entries": entries,
    });
    let text = serde_json::to_string_pretty(&document)?;

    match output {
        Some(path) => {
            fs::write(path, text).context("Failed to write output file")?;
            println!("Dumped {} entries to {}", container.entry_count(), path.display());
        }
        None => println!("{text}"),
    }

    Ok(())
}

fn cmd_resave(input: &Path, output: &Path, comments: bool) -> Result<()> {
    println!("Resaving: {} -> {}", input.display(), output.display());

    let mut container = open(input)?;
    if container.endian() == Endian::Big {
        warn!("{} is big-endian; output will be little-endian", input.display());
    }

    if comments {
        container.load_comments(input);
    }
    container
        .save(output)
        .with_context(|| format!("Failed to save {}", output.display()))?;
    if comments {
        container.save_comments(output);
    }

    println!("Saved {} entries", container.entry_count());

    Ok(())
}

fn entries_json(container: &AnyContainer) -> Result<serde_json::Value> {
    let value = match container {
        AnyContainer::Bcm(bcm) => serde_json::to_value(bcm.entries()),
        AnyContainer::Bdm(bdm) => serde_json::to_value(bdm.entries()),
        AnyContainer::Bsa(bsa) => serde_json::to_value(bsa.entries()),
    };
    value.context("Failed to serialize entries")
}

/// Entries as compared across a round trip.
///
/// BSA section counts and offsets are derived on save, so both sides are
/// compared with the header layout they would be written with.
fn comparable_entries(container: &AnyContainer) -> Result<serde_json::Value> {
    match container {
        AnyContainer::Bsa(bsa) => {
            let mut entries = bsa.entries().to_vec();
            for entry in entries.iter_mut().flatten() {
                entry.header = entry.layout()?;
            }
            serde_json::to_value(entries).context("Failed to serialize entries")
        }
        _ => entries_json(container),
    }
}

/// Fail unless `reloaded` holds the same entries as `source`, field for field.
fn verify_entries(source: &AnyContainer, reloaded: &AnyContainer) -> Result<()> {
    if source.kind() != reloaded.kind() {
        anyhow::bail!("kind changed: {} -> {}", source.kind(), reloaded.kind());
    }
    if reloaded.entry_count() != source.entry_count() {
        anyhow::bail!(
            "entry count changed: {} -> {}",
            source.entry_count(),
            reloaded.entry_count()
        );
    }

    let before = comparable_entries(source)?;
    let after = comparable_entries(reloaded)?;
    if let (Some(before), Some(after)) = (before.as_array(), after.as_array()) {
        if let Some(index) = before.iter().zip(after).position(|(b, a)| b != a) {
            anyhow::bail!("entry {index} differs after the round trip");
        }
    } else if before != after {
        anyhow::bail!("entries differ after the round trip");
    }

    Ok(())
}

/// Outcome of a round trip through load and save.
enum CheckOutcome {
    /// The saved bytes equal the source.
    Identical,
    /// The source was rewritten (byte order or data start), but the rewrite
    /// is stable.
    Canonicalized,
}

fn check_file(path: &Path) -> Result<CheckOutcome> {
    let data = fs::read(path).context("Failed to read file")?;
    let container = AnyContainer::parse(&data)?;
    let saved = container.to_bytes()?;
    if saved == data {
        return Ok(CheckOutcome::Identical);
    }

    let reloaded = AnyContainer::parse(&saved).context("Saved output does not load")?;
    verify_entries(&container, &reloaded)?;
    if reloaded.to_bytes()? != saved {
        anyhow::bail!("second save differs from first");
    }

    Ok(CheckOutcome::Canonicalized)
}

fn cmd_check(inputs: &[PathBuf]) -> Result<()> {
    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let mut identical = 0;
    let mut canonicalized = 0;
    let mut failed = 0;

    for path in inputs {
        match check_file(path) {
            Ok(CheckOutcome::Identical) => identical += 1,
            Ok(CheckOutcome::Canonicalized) => {
                pb.println(format!("{}: canonicalized", path.display()));
                canonicalized += 1;
            }
            Err(e) => {
                pb.println(format!("{}: {e:#}", path.display()));
                failed += 1;
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Done");
    println!(
        "Checked {} files in {:?}: {} identical, {} canonicalized, {} failed",
        inputs.len(),
        start.elapsed(),
        identical,
        canonicalized,
        failed
    );

    if failed > 0 {
        anyhow::bail!("{failed} file(s) failed the round trip");
    }

    Ok(())
}
