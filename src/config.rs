use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

const ENV_PREFIX: &str = "PROBLEMS";

/// Runtime settings shared by every pipeline component.
///
/// Loaded from `PROBLEMS_*` environment variables on top of the defaults below;
/// CLI flags are applied afterwards by `main`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub db_path: PathBuf,
    pub source_lang: String,
    pub target_lang: String,
    /// Max characters per translation call.
    pub chunk_ceiling: usize,
    pub fetch_timeout_secs: u64,
    pub translate_timeout_secs: u64,
    pub translate_endpoint: String,
    pub view_host: String,
    pub raw_host: String,
    pub view_marker: String,
    pub link_base: String,
    pub doc_suffix: String,
    pub path_marker: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            db_path: PathBuf::from("data/problems.sqlite"),
            source_lang: "auto".into(),
            target_lang: "en".into(),
            chunk_ceiling: 3000,
            fetch_timeout_secs: 10,
            translate_timeout_secs: 30,
            translate_endpoint: "https://translate.googleapis.com/translate_a/single".into(),
            view_host: "github.com".into(),
            raw_host: "raw.githubusercontent.com".into(),
            view_marker: "blob".into(),
            link_base: "https://github.com".into(),
            doc_suffix: ".md".into(),
            path_marker: "/problems/".into(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        ::config::Config::builder()
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize::<Settings>())
            .context("Failed to load settings from environment")
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn translate_timeout(&self) -> Duration {
        Duration::from_secs(self.translate_timeout_secs)
    }
}
