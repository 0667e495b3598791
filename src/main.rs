mod config;
mod input;
mod logging;
mod pipeline;
mod records;

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::config::{ErrorPolicy, Settings};
use crate::logging::LogHandle;
use crate::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "offer_etl", about = "Extract product offers from HTML into a CSV table")]
struct Cli {
    /// Settings file (default: offer_etl.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// HTML input (default: index.html beside the program, else the built-in sample)
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// CSV output path
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// What to do with a product card missing a required element
    #[arg(long, value_enum)]
    on_error: Option<ErrorPolicy>,
}

impl Cli {
    fn apply(self, settings: &mut Settings) {
        if let Some(input) = self.input {
            settings.input = Some(input);
        }
        if let Some(output) = self.output {
            settings.output = output;
        }
        if let Some(log_file) = self.log_file {
            settings.log_file = log_file;
        }
        if let Some(policy) = self.on_error {
            settings.on_error = policy;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;
    cli.apply(&mut settings);

    let log = LogHandle::init(&settings.log_file)?;
    let pipeline = Pipeline::new(settings, log)?;
    let report = pipeline.run()?;

    pipeline.log().in_scope(|| {
        info!(
            "{} cards, {} extracted, {} skipped{}, {} rows, load: {:?}",
            report.cards,
            report.extracted,
            report.skipped,
            if report.aborted { " (aborted)" } else { "" },
            report.rows,
            report.load
        )
    });
    Ok(())
}
