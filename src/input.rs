use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

const DEFAULT_INPUT_NAME: &str = "index.html";

/// Product list shipped with the binary, used when no input file is around.
pub const SAMPLE_DOCUMENT: &str = include_str!("../data/index.html");

/// `index.html` in the executable's directory.
pub fn default_input_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join(DEFAULT_INPUT_NAME))
}

/// Read the HTML to process. An explicit path must be readable; otherwise fall back
/// from `index.html` beside the program to the built-in sample.
pub fn load_document(explicit: Option<&Path>) -> Result<String> {
    if let Some(path) = explicit {
        info!("Reading input {:?}", path);
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input {:?}", path));
    }

    match default_input_path() {
        Some(path) if path.is_file() => {
            info!("Reading input {:?}", path);
            std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read input {:?}", path))
        }
        _ => {
            info!("No {} beside the program; using the built-in sample", DEFAULT_INPUT_NAME);
            Ok(SAMPLE_DOCUMENT.to_string())
        }
    }
}
