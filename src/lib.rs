// Library exports for laptimes

pub mod aggregate;
pub mod config;
pub mod derive;
pub mod error;
pub mod graph;
pub mod report;
pub mod schema;
pub mod select;
pub mod table;

pub use error::ReportError;
pub use report::{ChartData, ReportKind};
pub use table::Table;

use clap::ValueEnum;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, ValueEnum)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
    /// Fill colour of bar charts (name or hex)
    #[serde(default)]
    pub bar_color: Option<String>,
    /// Dot colour of scatter charts (name or hex)
    #[serde(default)]
    pub point_color: Option<String>,
}

fn default_width() -> u32 { 1000 }
fn default_height() -> u32 { 800 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            format: OutputFormat::Png,
            bar_color: None,
            point_color: None,
        }
    }
}
