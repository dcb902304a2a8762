use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use riffdate::args::Args;
use riffdate::config::Config;
use riffdate::extract::extract;
use riffdate::tree::Printer;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let config = Config::from(Args::parse());
    init_logging(&config.log_level);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("riffdate: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(config: &Config) -> Result<()> {
    let file = File::open(&config.path).with_context(|| format!("open {}", config.path.display()))?;

    let mut printer = Printer::new(io::stdout().lock(), config.color);
    let summary = extract(BufReader::new(file), &config.extract, &mut printer)?;
    log::debug!("{} walk ended: {:?}", config.path.display(), summary.outcome);
    printer.finish()?;

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// 1: open or other I/O failure, 2: not RIFF, 3: truncated, 4: unseekable skip
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<riff::Error>() {
        Some(riff::Error::NotARiffFile { .. }) => 2,
        Some(riff::Error::TruncatedInput { .. }) => 3,
        Some(riff::Error::SeekError { .. }) => 4,
        Some(riff::Error::Io(_)) | None => 1,
    }
}
