use std::io;

use anyhow::{Context, Result};
use audio_volume_batch_compress::prompt::Prompter;
use audio_volume_batch_compress::{CompressionOptions, OutputFormat, SymphoniaTransform, run};
use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// container for the compressed files
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Mp3)]
    format: OutputFormat,

    /// in batch mode, skip files that fail instead of aborting
    #[arg(short, long)]
    keep_going: bool,

    /// seed for the random output name suffix
    #[arg(long)]
    seed: Option<u64>,

    /// do not draw the batch progress bar
    #[arg(long)]
    no_progress: bool,

    /// log progress details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };
    _ = pretty_env_logger::formatted_builder()
        .filter_level(level)
        .format_timestamp_secs()
        .parse_filters("symphonia=error")
        .parse_default_env()
        .try_init();

    let options = CompressionOptions {
        output_format: cli.format,
        keep_going: cli.keep_going,
        show_progress: !cli.no_progress,
    };
    info!("Output format: {}", options.output_format);
    info!("Keep going on failure: {}", options.keep_going);

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    let results = run(&mut prompter, &SymphoniaTransform, &mut rng, &options)
        .context("Compression failed")?;
    info!("Processed {} file(s)", results.len());
    Ok(())
}
