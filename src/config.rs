use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "offer_etl.toml";
const ENV_PREFIX: &str = "OFFER_ETL";

/// What the extractor does when a card is missing a required element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log the bad card and keep scanning.
    #[default]
    Skip,
    /// Stop the scan at the first bad card; later cards are lost.
    Abort,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// HTML source. `None` means `index.html` beside the executable.
    pub input: Option<PathBuf>,
    pub output: PathBuf,
    pub log_file: PathBuf,
    pub on_error: ErrorPolicy,
    pub selectors: Selectors,
    pub number_format: NumberFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            input: None,
            output: PathBuf::from("ofertas_calculadas.csv"),
            log_file: PathBuf::from("etl_pipeline.log"),
            on_error: ErrorPolicy::default(),
            selectors: Selectors::default(),
            number_format: NumberFormat::default(),
        }
    }
}

/// CSS selectors (and attribute names) locating each field of a product card.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub card: String,
    pub name: String,
    pub price: String,
    pub rating: String,
    pub image: String,
    pub discount: String,
    pub image_attr: String,
    pub date_attr: String,
    pub id_attr: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Selectors {
            card: "div.product-card".into(),
            name: "h2".into(),
            price: "p.price".into(),
            rating: "span.rating".into(),
            image: "img".into(),
            discount: "span.discount-rate".into(),
            image_attr: "src".into(),
            date_attr: "data-date".into(),
            id_attr: "id".into(),
        }
    }
}

/// Separators used by prices in the source markup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    pub thousands_separator: String,
    pub decimal_separator: String,
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat {
            thousands_separator: ".".into(),
            decimal_separator: ",".into(),
        }
    }
}

impl Settings {
    /// Defaults, then the config file, then `OFFER_ETL_*` environment variables.
    /// An explicit `config_file` must exist; the default one is optional.
    pub fn load(config_file: Option<&Path>) -> Result<Settings> {
        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")
    }
}
