//! octabank CLI: inspect, verify and repair a bank file.
//!
//! Usage:
//!   ob-cli bank01.work
//!   ob-cli bank01.work --pattern 3
//!   ob-cli bank01.work --json > bank01.json
//!   ob-cli bank01.work --template factory.work --fix --output fixed.work
//!
//! Without `--template` the checksum baseline is taken from the bank's own
//! stored checksum, so an unedited bank always verifies.

use anyhow::{Context, Result};
use clap::Parser;
use ob_formats::{Bank, BankOptions, Baseline, ChecksumPolicy, PartState, Pattern};
use ob_ir::{FxSlot, StepSet, STEP_COUNT};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ob-cli")]
#[command(about = "Inspect, verify and repair bank files")]
#[command(version)]
struct Cli {
    /// Bank file to read
    path: PathBuf,

    /// Fail when the stored checksum disagrees with the template's
    #[arg(long, requires = "template")]
    strict: bool,

    /// Factory template bank to derive the checksum baseline from
    #[arg(long)]
    template: Option<PathBuf>,

    /// Rewrite the checksum against the template's baseline
    #[arg(long, requires = "template")]
    fix: bool,

    /// Where --fix writes (defaults to the input file)
    #[arg(short, long, requires = "fix")]
    output: Option<PathBuf>,

    /// Also print per-track steps of this pattern (1-16)
    #[arg(short, long, conflicts_with = "json")]
    pattern: Option<usize>,

    /// Print the whole bank, steps and scenes included, as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn options(&self) -> Result<BankOptions> {
        let baseline = match &self.template {
            Some(path) => {
                let data = fs::read(path).with_context(|| format!("reading template {}", path.display()))?;
                Some(Baseline::from_template(&data).with_context(|| format!("template {}", path.display()))?)
            }
            None => None,
        };
        Ok(BankOptions {
            baseline,
            checksum: if self.strict { ChecksumPolicy::Strict } else { ChecksumPolicy::Warn },
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let options = cli.options()?;
    let data = fs::read(&cli.path).with_context(|| format!("reading {}", cli.path.display()))?;
    let mut bank = Bank::open(data, &options).with_context(|| format!("opening {}", cli.path.display()))?;

    if cli.json {
        println!("{}", to_json(&bank)?);
    } else {
        print_summary(&bank)?;
    }

    if let Some(n) = cli.pattern {
        let pattern = bank.pattern(n)?;
        println!();
        println!("Pattern {n}");
        print_steps(&pattern);
    }

    if cli.fix {
        let out = cli.output.as_ref().unwrap_or(&cli.path);
        let checksum = bank.update_checksum();
        fs::write(out, bank.as_bytes()).with_context(|| format!("writing {}", out.display()))?;
        info!(checksum, path = %out.display(), "checksum rewritten");
    }

    Ok(())
}

fn to_json(bank: &Bank) -> Result<String> {
    let summary = bank.summary(true, true).context("decoding bank")?;
    Ok(serde_json::to_string_pretty(&summary)?)
}

fn print_summary(bank: &Bank) -> Result<()> {
    let stored = bank.stored_checksum();
    let computed = bank.compute_checksum();
    println!("Version:   {}", bank.version());
    println!(
        "Checksum:  stored {stored:#06x}, computed {computed:#06x} ({})",
        if stored == computed { "ok" } else { "MISMATCH" }
    );
    println!("Flex:      {} slots", bank.flex_slot_count());
    println!();

    for n in 1..=4 {
        let part = bank.part(n, PartState::Unsaved)?;
        println!("Part {n}: {}", bank.part_name(n)?);
        for track in part.audio_tracks() {
            println!(
                "  T{}  {:<8} {:<14} {:<14}",
                track.track(),
                track.machine_type()?.name(),
                track.fx_type(FxSlot::Fx1)?.name(),
                track.fx_type(FxSlot::Fx2)?.name(),
            );
        }
    }
    println!();

    for (i, pattern) in bank.patterns().enumerate() {
        let trigs: usize = pattern.audio_tracks().map(|t| t.trigs().len()).sum();
        let midi_trigs: usize = pattern.midi_tracks().map(|t| t.trigs().len()).sum();
        println!(
            "Pattern {:>2}: length {:>2}, scale {}, part {}, trigs {} audio / {} midi",
            i + 1,
            pattern.length(),
            pattern.scale()?,
            pattern.part()?,
            trigs,
            midi_trigs,
        );
    }
    Ok(())
}

fn step_row(trigs: StepSet, trigless: StepSet) -> String {
    (1..=STEP_COUNT)
        .map(|s| match (trigs.contains(s), trigless.contains(s)) {
            (true, _) => 'X',
            (false, true) => 'o',
            _ => '.',
        })
        .collect()
}

fn print_steps(pattern: &Pattern<&[u8]>) {
    for track in pattern.audio_tracks() {
        println!("  T{} {}", track.track_id() + 1, step_row(track.trigs(), track.trigless()));
    }
    for track in pattern.midi_tracks() {
        println!("  M{} {}", track.track_id() + 1, step_row(track.trigs(), track.trigless()));
    }
}
