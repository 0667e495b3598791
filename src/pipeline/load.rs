use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::records::{OfferTable, COLUMNS};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to write CSV {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to flush {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Written { rows: usize, path: PathBuf },
    SkippedEmpty,
}

/// Write the table as comma-separated UTF-8 with a header row. An empty table writes nothing.
pub fn load(table: &OfferTable, path: &Path) -> Result<LoadOutcome, LoadError> {
    info!("Loading offers into {:?}", path);
    if table.is_empty() {
        warn!("Offer table is empty; nothing to write");
        return Ok(LoadOutcome::SkippedEmpty);
    }

    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)
        .map_err(csv_err)?;

    writer.write_record(COLUMNS).map_err(csv_err)?;
    for offer in &table.rows {
        writer.write_record(offer.to_record()).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Load done: {} rows saved to {:?}", table.len(), path);
    Ok(LoadOutcome::Written {
        rows: table.len(),
        path: path.to_path_buf(),
    })
}
