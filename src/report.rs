// Per-chart pipelines: load -> validate -> derive/aggregate/select -> render

use crate::aggregate;
use crate::config::Config;
use crate::derive::{self, PowerWeightSeries};
use crate::error::Result;
use crate::graph::{self, Canvas, ChartStyle, Figure};
use crate::schema::{self, DRIVER, POWER_WEIGHT, RANK, TIME, VEHICLE};
use crate::select;
use crate::table::Table;
use crate::RenderOptions;
use anyhow::Context;
use clap::ValueEnum;
use plotters::style::{RGBColor, BLACK};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    TopLapTimes,
    FastestByManufacturer,
    DriverFrequency,
    PowerWeight,
}

impl ReportKind {
    /// Every report, in the order they are run by default.
    pub const ALL: [ReportKind; 4] = [
        ReportKind::TopLapTimes,
        ReportKind::FastestByManufacturer,
        ReportKind::DriverFrequency,
        ReportKind::PowerWeight,
    ];

    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            ReportKind::PowerWeight => schema::POWER_WEIGHT_COLUMNS,
            _ => schema::TRIAL_COLUMNS,
        }
    }

    pub fn file_stem(&self) -> &'static str {
        match self {
            ReportKind::TopLapTimes => "top_lap_times",
            ReportKind::FastestByManufacturer => "fastest_by_manufacturer",
            ReportKind::DriverFrequency => "driver_frequency",
            ReportKind::PowerWeight => "power_weight",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportKind::TopLapTimes => "top-lap-times",
            ReportKind::FastestByManufacturer => "fastest-by-manufacturer",
            ReportKind::DriverFrequency => "driver-frequency",
            ReportKind::PowerWeight => "power-weight",
        };
        f.write_str(name)
    }
}

/// Parallel label/time sequences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    pub labels: Vec<String>,
    pub times: Vec<f64>,
}

/// Parallel label/count sequences in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountSeries {
    pub labels: Vec<String>,
    pub counts: Vec<usize>,
}

/// The series one report hands to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    TopLapTimes(TimeSeries),
    FastestByManufacturer(TimeSeries),
    DriverFrequency(CountSeries),
    PowerWeight(PowerWeightSeries),
}

impl ChartData {
    pub fn kind(&self) -> ReportKind {
        match self {
            ChartData::TopLapTimes(_) => ReportKind::TopLapTimes,
            ChartData::FastestByManufacturer(_) => ReportKind::FastestByManufacturer,
            ChartData::DriverFrequency(_) => ReportKind::DriverFrequency,
            ChartData::PowerWeight(_) => ReportKind::PowerWeight,
        }
    }

    pub fn figure(&self) -> Figure {
        match self {
            ChartData::TopLapTimes(s) => Figure::HorizontalBars {
                labels: s.labels.clone(),
                values: s.times.clone(),
            },
            ChartData::FastestByManufacturer(s) => Figure::CategoryScatter {
                labels: s.labels.clone(),
                values: s.times.clone(),
            },
            ChartData::DriverFrequency(s) => Figure::VerticalBars {
                labels: s.labels.clone(),
                values: s.counts.iter().map(|&c| c as f64).collect(),
            },
            ChartData::PowerWeight(s) => Figure::Scatter {
                x: s.power.iter().map(|&v| v as f64).collect(),
                y: s.mass.iter().map(|&v| v as f64).collect(),
            },
        }
    }
}

/// The `n` best-ranked vehicles with their lap times, ascending by rank.
pub fn top_lap_times(table: &Table, n: usize) -> Result<TimeSeries> {
    schema::validate(table, ReportKind::TopLapTimes.required_columns())?;

    let ranks = table.parse_column::<u64>(RANK)?;
    let vehicles = table.column(VEHICLE)?;
    let times = table.time_column(TIME)?;

    let top = select::top_n_by_rank(&ranks, n);
    Ok(TimeSeries {
        labels: top.iter().map(|&i| vehicles[i].to_string()).collect(),
        times: top.iter().map(|&i| times[i]).collect(),
    })
}

/// Fastest lap per manufacturer, ascending by time.
pub fn fastest_by_manufacturer(table: &Table) -> Result<TimeSeries> {
    schema::validate(table, ReportKind::FastestByManufacturer.required_columns())?;

    let vehicles = table.column(VEHICLE)?;
    let times = table.time_column(TIME)?;

    let mut fastest = aggregate::grouped_min(
        vehicles
            .iter()
            .map(|v| derive::manufacturer(v))
            .zip(times.iter().copied()),
    );
    select::sort_by_time(&mut fastest);

    let (labels, times) = fastest.into_iter().unzip();
    Ok(TimeSeries { labels, times })
}

/// How often each driver appears, in first-seen order.
pub fn driver_frequency(table: &Table) -> Result<CountSeries> {
    schema::validate(table, ReportKind::DriverFrequency.required_columns())?;

    let drivers = table.column(DRIVER)?;
    let (labels, counts) = aggregate::frequency(drivers).into_iter().unzip();
    Ok(CountSeries { labels, counts })
}

/// Power and mass pairs from the composite column. Cells that do not parse
/// are counted in `skipped` rather than failing the report.
pub fn power_weight(table: &Table) -> Result<PowerWeightSeries> {
    schema::validate(table, ReportKind::PowerWeight.required_columns())?;

    let series = derive::power_weight_series(table.column(POWER_WEIGHT)?);
    if series.skipped > 0 {
        log::info!(
            "power-weight: skipped {} of {} records with unparseable '{}' values",
            series.skipped,
            table.len(),
            POWER_WEIGHT
        );
    }
    Ok(series)
}

/// Run the transformation half of a report over an already loaded table.
pub fn build(kind: ReportKind, table: &Table, top_n: usize) -> Result<ChartData> {
    Ok(match kind {
        ReportKind::TopLapTimes => ChartData::TopLapTimes(top_lap_times(table, top_n)?),
        ReportKind::FastestByManufacturer => {
            ChartData::FastestByManufacturer(fastest_by_manufacturer(table)?)
        }
        ReportKind::DriverFrequency => ChartData::DriverFrequency(driver_frequency(table)?),
        ReportKind::PowerWeight => ChartData::PowerWeight(power_weight(table)?),
    })
}

/// Load the source afresh and build one report's series.
pub fn prepare(kind: ReportKind, path: &Path, top_n: usize) -> Result<ChartData> {
    let table = Table::load(path)?;
    log::debug!("{}: {} rows from {}", kind, table.len(), path.display());
    build(kind, &table, top_n)
}

/// Titles and colours for a report's chart. `top_n` only shows up in the
/// lap-time title.
pub fn chart_style(kind: ReportKind, options: &RenderOptions, top_n: usize) -> ChartStyle {
    let bar_color = resolve_color(&options.bar_color, graph::SKY_BLUE);
    let point_color = resolve_color(&options.point_color, BLACK);

    let (title, x_label, y_label, color) = match kind {
        ReportKind::TopLapTimes => (
            format!("Top {} Vehicle Lap Times at Nürburgring", top_n),
            "Lap Time (minutes)",
            "",
            bar_color,
        ),
        ReportKind::FastestByManufacturer => (
            "Fastest Lap Time by Vehicle Manufacturer".to_string(),
            "",
            "Fastest Lap Time (minutes)",
            point_color,
        ),
        ReportKind::DriverFrequency => {
            ("Driver Name Frequency".to_string(), "Drivers", "Count", bar_color)
        }
        ReportKind::PowerWeight => ("PS KG values".to_string(), "PS", "KG", point_color),
    };

    ChartStyle {
        title,
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        color,
    }
}

fn resolve_color(color: &Option<String>, default: RGBColor) -> RGBColor {
    color.as_deref().and_then(graph::parse_color).unwrap_or(default)
}

/// Run one report end to end and return the encoded chart.
pub fn render_report(kind: ReportKind, config: &Config) -> anyhow::Result<Vec<u8>> {
    let data = prepare(kind, &config.input, config.top_n)?;
    Canvas::new(&config.render)
        .render(&data.figure(), &chart_style(kind, &config.render, config.top_n))
        .with_context(|| format!("Failed to render {} chart", kind))
}

/// Result of one report in a batch run.
#[derive(Debug)]
pub struct ReportOutcome {
    pub kind: ReportKind,
    pub result: anyhow::Result<PathBuf>,
}

/// Run the configured reports in order, writing each chart under `out_dir`.
///
/// A failing report is logged and recorded; the remaining reports still run.
pub fn run_all(config: &Config) -> Vec<ReportOutcome> {
    config
        .reports
        .iter()
        .map(|&kind| {
            log::info!("{}: reading {}", kind, config.input.display());
            let result = render_report(kind, config).and_then(|bytes| {
                let path = config
                    .out_dir
                    .join(kind.file_stem())
                    .with_extension(config.render.format.extension());
                std::fs::write(&path, bytes)
                    .with_context(|| format!("Failed to write chart '{}'", path.display()))?;
                Ok(path)
            });

            match &result {
                Ok(path) => log::info!("{}: wrote {}", kind, path.display()),
                Err(e) => log::error!("{}: {:#}", kind, e),
            }
            ReportOutcome { kind, result }
        })
        .collect()
}
