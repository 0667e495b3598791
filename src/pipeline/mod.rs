pub mod clean;
pub mod extract;
pub mod load;
pub mod transform;

use anyhow::Result;
use tracing::{error, info};

use crate::config::Settings;
use crate::input;
use crate::logging::LogHandle;
use extract::CardExtractor;
use load::LoadOutcome;
use transform::Transformer;

/// How the load stage ended. Load failures never abort the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Written(usize),
    SkippedEmpty,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub cards: usize,
    pub extracted: usize,
    pub skipped: usize,
    pub aborted: bool,
    pub rows: usize,
    pub load: LoadStatus,
}

/// Extract → transform → load, run once per call.
pub struct Pipeline {
    settings: Settings,
    extractor: CardExtractor,
    transformer: Transformer,
    log: LogHandle,
}

impl Pipeline {
    pub fn new(settings: Settings, log: LogHandle) -> Result<Self> {
        let extractor = CardExtractor::new(&settings.selectors, settings.on_error)?;
        let transformer = Transformer::new(settings.number_format.clone());
        Ok(Pipeline {
            settings,
            extractor,
            transformer,
            log,
        })
    }

    /// Read the configured input, then run the three stages. Only an unreadable input errors.
    pub fn run(&self) -> Result<PipelineReport> {
        let document = self
            .log
            .in_scope(|| input::load_document(self.settings.input.as_deref()))?;
        Ok(self.run_document(&document))
    }

    pub fn log(&self) -> &LogHandle {
        &self.log
    }

    pub fn run_document(&self, html: &str) -> PipelineReport {
        self.log.in_scope(|| self.run_stages(html))
    }

    fn run_stages(&self, html: &str) -> PipelineReport {
        info!("--- ETL pipeline start ---");

        let extraction = self.extractor.extract(html);
        let cards = extraction.cards;
        let skipped = extraction.skipped();
        let aborted = extraction.aborted;
        let products = extraction.into_products();

        let table = self.transformer.transform(&products);

        let load = match load::load(&table, &self.settings.output) {
            Ok(LoadOutcome::Written { rows, .. }) => LoadStatus::Written(rows),
            Ok(LoadOutcome::SkippedEmpty) => LoadStatus::SkippedEmpty,
            Err(e) => {
                error!("Load failed: {}", e);
                LoadStatus::Failed(e.to_string())
            }
        };

        info!("--- ETL pipeline end ---");
        PipelineReport {
            cards,
            extracted: products.len(),
            skipped,
            aborted,
            rows: table.len(),
            load,
        }
    }
}
