use crate::graph::{parse_color, MAX_DIMENSION};
use crate::report::ReportKind;
use crate::RenderOptions;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Run settings, read from an optional JSON file and overridden by CLI flags.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    pub top_n: usize,
    pub reports: Vec<ReportKind>,
    pub render: RenderOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("cars.csv"),
            out_dir: PathBuf::from("charts"),
            top_n: 10,
            reports: ReportKind::ALL.to_vec(),
            render: RenderOptions::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Invalid config file '{}'", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would only fail later, inside a report.
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            anyhow::bail!("top_n must be at least 1");
        }
        if self.render.width == 0 || self.render.height == 0 {
            anyhow::bail!(
                "Chart size must be non-zero (width: {}, height: {})",
                self.render.width,
                self.render.height
            );
        }
        if self.render.width > MAX_DIMENSION || self.render.height > MAX_DIMENSION {
            anyhow::bail!(
                "Chart size must be at most {}px per side (width: {}, height: {})",
                MAX_DIMENSION,
                self.render.width,
                self.render.height
            );
        }
        for color in [&self.render.bar_color, &self.render.point_color].into_iter().flatten() {
            if parse_color(color).is_none() {
                anyhow::bail!("Unknown color '{}'", color);
            }
        }
        if self.reports.is_empty() {
            anyhow::bail!("At least one report must be selected");
        }
        Ok(())
    }
}
