// crates/quakeflux/src/config.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use quakeflux_core::aggregator::DEFAULT_TOP_COUNTRIES;
use quakeflux_core::pipeline::{default_partitions, PipelineOptions};
use quakeflux_parser::DEFAULT_EXTRACT_PATTERN;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "quakeflux.toml";

/// One source of settings. Layers are stacked: defaults, config file, environment, flags.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub raw_dir: Option<PathBuf>,
    pub stage_dir: Option<PathBuf>,
    pub input_pattern: Option<String>,
    pub timezone: Option<String>,
    pub top_countries: Option<usize>,
    pub partitions: Option<usize>,
}

impl ConfigLayer {
    /// Values set in `higher` win.
    pub fn overlay(self, higher: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            raw_dir: higher.raw_dir.or(self.raw_dir),
            stage_dir: higher.stage_dir.or(self.stage_dir),
            input_pattern: higher.input_pattern.or(self.input_pattern),
            timezone: higher.timezone.or(self.timezone),
            top_countries: higher.top_countries.or(self.top_countries),
            partitions: higher.partitions.or(self.partitions),
        }
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Reads `QUAKEFLUX_*` variables through `lookup` so tests need not touch the
    /// process environment.
    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(ConfigLayer {
            raw_dir: lookup("QUAKEFLUX_RAW_DIR").map(PathBuf::from),
            stage_dir: lookup("QUAKEFLUX_STAGE_DIR").map(PathBuf::from),
            input_pattern: lookup("QUAKEFLUX_INPUT_PATTERN"),
            timezone: lookup("QUAKEFLUX_TIMEZONE"),
            top_countries: parse_count(&lookup, "QUAKEFLUX_TOP_COUNTRIES")?,
            partitions: parse_count(&lookup, "QUAKEFLUX_PARTITIONS")?,
        })
    }
}

fn parse_count(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<usize>> {
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse::<usize>()
                .with_context(|| format!("{key} must be a non-negative integer, got '{value}'"))
        })
        .transpose()
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub raw_dir: PathBuf,
    pub stage_dir: PathBuf,
    pub input_pattern: String,
    pub timezone: Tz,
    pub top_countries: usize,
    pub partitions: usize,
}

impl Settings {
    /// Loads the config file (explicit path, else `quakeflux.toml` when present), then the
    /// environment, then `flags`.
    pub fn load(config_path: Option<&Path>, flags: ConfigLayer) -> Result<Self> {
        let file_layer = match config_path {
            Some(path) => ConfigLayer::from_toml_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    ConfigLayer::from_toml_file(default_path)?
                } else {
                    ConfigLayer::default()
                }
            }
        };
        let env_layer = ConfigLayer::from_env(|key| std::env::var(key).ok())?;

        Self::resolve(file_layer.overlay(env_layer).overlay(flags))
    }

    pub fn resolve(layer: ConfigLayer) -> Result<Self> {
        let timezone = match layer.timezone.as_deref() {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|err| anyhow!("unknown timezone '{name}': {err}"))?,
            None => Tz::UTC,
        };

        let settings = Settings {
            raw_dir: layer.raw_dir.unwrap_or_else(|| PathBuf::from("data/raw")),
            stage_dir: layer.stage_dir.unwrap_or_else(|| PathBuf::from("data/stage")),
            input_pattern: layer
                .input_pattern
                .unwrap_or_else(|| DEFAULT_EXTRACT_PATTERN.to_string()),
            timezone,
            top_countries: layer.top_countries.unwrap_or(DEFAULT_TOP_COUNTRIES),
            partitions: layer.partitions.unwrap_or_else(default_partitions),
        };
        settings.pipeline_options().validate()?;
        Ok(settings)
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            timezone: self.timezone,
            top_countries: self.top_countries,
            partitions: self.partitions,
        }
    }
}
