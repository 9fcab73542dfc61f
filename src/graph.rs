use crate::{OutputFormat, RenderOptions};
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, Ranged};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

pub const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

const POINT_SIZE: i32 = 3;

/// Largest accepted chart width or height, in pixels
pub const MAX_DIMENSION: u32 = 16_384;

/// Title, axis descriptions and fill colour of one chart
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub color: RGBColor,
}

/// The four chart shapes the reports produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Figure {
    /// One bar per label, first label on top, value axis ticked at every value
    HorizontalBars { labels: Vec<String>, values: Vec<f64> },
    /// Dots over a categorical x axis
    CategoryScatter { labels: Vec<String>, values: Vec<f64> },
    /// One bar per label, left to right
    VerticalBars { labels: Vec<String>, values: Vec<f64> },
    Scatter { x: Vec<f64>, y: Vec<f64> },
}

impl Figure {
    fn validate(&self) -> Result<()> {
        let (a, b) = match self {
            Figure::HorizontalBars { labels, values }
            | Figure::CategoryScatter { labels, values }
            | Figure::VerticalBars { labels, values } => (labels.len(), values.len()),
            Figure::Scatter { x, y } => (x.len(), y.len()),
        };
        if a != b {
            anyhow::bail!(
                "Categories and values must have the same length (categories: {}, values: {})",
                a,
                b
            );
        }
        if a == 0 {
            anyhow::bail!("Cannot create chart with no data to plot");
        }
        Ok(())
    }
}

/// Fixed-size drawing surface that encodes a figure as PNG or SVG
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    format: OutputFormat,
}

impl Canvas {
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            width: options.width,
            height: options.height,
            format: options.format,
        }
    }

    /// Draw `figure` and return the encoded image bytes.
    pub fn render(&self, figure: &Figure, style: &ChartStyle) -> Result<Vec<u8>> {
        figure.validate()?;
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            anyhow::bail!(
                "Chart size {}x{} exceeds the {}px limit",
                self.width,
                self.height,
                MAX_DIMENSION
            );
        }
        match self.format {
            OutputFormat::Png => self.render_png(figure, style),
            OutputFormat::Svg => self.render_svg(figure, style),
        }
    }

    fn render_png(&self, figure: &Figure, style: &ChartStyle) -> Result<Vec<u8>> {
        let len = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|px| px.checked_mul(3))
            .with_context(|| {
                format!("Chart size {}x{} is too large", self.width, self.height)
            })?;
        let mut buffer = vec![0u8; len];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (self.width, self.height))
                .into_drawing_area();
            draw_figure(&root, figure, style)?;
            root.present().context("Failed to present drawing")?;
        }

        let mut png_bytes = Vec::new();
        {
            let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
            encoder
                .write_image(&buffer, self.width, self.height, image::ColorType::Rgb8)
                .context("Failed to encode PNG")?;
        }

        Ok(png_bytes)
    }

    fn render_svg(&self, figure: &Figure, style: &ChartStyle) -> Result<Vec<u8>> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height))
                .into_drawing_area();
            draw_figure(&root, figure, style)?;
            root.present().context("Failed to present drawing")?;
        }
        Ok(svg.into_bytes())
    }
}

fn draw_figure<DB>(root: &DrawingArea<DB, Shift>, figure: &Figure, style: &ChartStyle) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).context("Failed to fill background")?;

    match figure {
        Figure::HorizontalBars { labels, values } => draw_horizontal_bars(root, labels, values, style),
        Figure::CategoryScatter { labels, values } => draw_category_scatter(root, labels, values, style),
        Figure::VerticalBars { labels, values } => draw_vertical_bars(root, labels, values, style),
        Figure::Scatter { x, y } => draw_scatter(root, x, y, style),
    }
}

fn draw_horizontal_bars<DB>(
    root: &DrawingArea<DB, Shift>,
    labels: &[String],
    values: &[f64],
    style: &ChartStyle,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let n = labels.len();

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(&style.title, ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(label_area_size(labels))
        .build_cartesian_2d(
            time_axis(values),
            category_axis(n),
        )
        .context("Failed to build chart")?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .bold_line_style(BLACK.mix(0.2))
        .x_desc(style.x_label.as_str())
        .x_label_formatter(&|x| format!("{:.2}", x))
        .y_label_formatter(&|y| category_label(labels, *y, true))
        .draw()
        .context("Failed to draw mesh")?;

    // Row i sits in slot n - 1 - i so the first label ends up on top
    chart
        .draw_series(values.iter().enumerate().map(|(i, &v)| {
            let slot = (n - 1 - i) as f64;
            Rectangle::new([(0.0, slot + 0.1), (v, slot + 0.9)], style.color.filled())
        }))
        .context("Failed to draw bars")?;

    Ok(())
}

fn draw_category_scatter<DB>(
    root: &DrawingArea<DB, Shift>,
    labels: &[String],
    values: &[f64],
    style: &ChartStyle,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let n = labels.len();

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(&style.title, ("sans-serif", 20))
        .x_label_area_size(label_area_size(labels))
        .y_label_area_size(60)
        .build_cartesian_2d(
            category_axis(n),
            padded_range(values),
        )
        .context("Failed to build chart")?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .bold_line_style(BLACK.mix(0.2))
        .y_desc(style.y_label.as_str())
        .x_label_style(rotated_label_font())
        .x_label_formatter(&|x| category_label(labels, *x, false))
        .y_label_formatter(&|y| format!("{:.2}", y))
        .draw()
        .context("Failed to draw mesh")?;

    chart
        .draw_series(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| Circle::new((i as f64 + 0.5, v), POINT_SIZE, style.color.filled())),
        )
        .context("Failed to draw point series")?;

    Ok(())
}

fn draw_vertical_bars<DB>(
    root: &DrawingArea<DB, Shift>,
    labels: &[String],
    values: &[f64],
    style: &ChartStyle,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let n = labels.len();
    let y_range = bar_range(values);

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(&style.title, ("sans-serif", 20))
        .x_label_area_size(label_area_size(labels))
        .y_label_area_size(50)
        .build_cartesian_2d(
            category_axis(n),
            KeyPointAxis::new(y_range.clone(), integer_ticks(&y_range)),
        )
        .context("Failed to build chart")?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .bold_line_style(BLACK.mix(0.2))
        .x_desc(style.x_label.as_str())
        .y_desc(style.y_label.as_str())
        .x_label_style(rotated_label_font())
        .x_label_formatter(&|x| category_label(labels, *x, false))
        .y_label_formatter(&|y| format!("{:.0}", y))
        .draw()
        .context("Failed to draw mesh")?;

    chart
        .draw_series(values.iter().enumerate().map(|(i, &v)| {
            let x = i as f64;
            Rectangle::new([(x + 0.1, 0.0), (x + 0.9, v)], style.color.filled())
        }))
        .context("Failed to draw bars")?;

    Ok(())
}

fn draw_scatter<DB>(
    root: &DrawingArea<DB, Shift>,
    x_data: &[f64],
    y_data: &[f64],
    style: &ChartStyle,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(&style.title, ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(padded_range(x_data), padded_range(y_data))
        .context("Failed to build chart")?;

    chart
        .configure_mesh()
        .x_desc(style.x_label.as_str())
        .y_desc(style.y_label.as_str())
        .draw()
        .context("Failed to draw mesh")?;

    chart
        .draw_series(
            x_data
                .iter()
                .zip(y_data)
                .map(|(&x, &y)| Circle::new((x, y), POINT_SIZE, style.color.filled())),
        )
        .context("Failed to draw point series")?;

    Ok(())
}

/// Data range with 5% padding on both sides, or +/-1 around a single value.
fn padded_range(data: &[f64]) -> Range<f64> {
    let min = data.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        (min - 1.0)..(max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding)..(max + padding)
    }
}

/// Value range for bars, always including the zero baseline.
fn bar_range(data: &[f64]) -> Range<f64> {
    let min = data.iter().cloned().fold(0.0, f64::min);
    let max = data.iter().cloned().fold(0.0, f64::max);

    if min == max {
        min..(max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        min..(max + padding)
    }
}

/// Whole-number ticks across `range`, at most about ten of them.
fn integer_ticks(range: &Range<f64>) -> Vec<f64> {
    let lo = range.start.ceil() as i64;
    let hi = range.end.floor() as i64;
    let step = ((hi - lo) / 10).max(1);
    (lo..=hi).step_by(step as usize).map(|v| v as f64).collect()
}

/// Continuous f64 axis whose ticks and labels sit exactly at the given values.
#[derive(Debug, Clone)]
pub struct KeyPointAxis {
    range: Range<f64>,
    ticks: Vec<f64>,
}

impl KeyPointAxis {
    pub fn new(range: Range<f64>, ticks: Vec<f64>) -> Self {
        Self { range, ticks }
    }

    pub fn ticks(&self) -> &[f64] {
        &self.ticks
    }
}

impl Ranged for KeyPointAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        let span = self.range.end - self.range.start;
        let pixels = limit.1 - limit.0;
        if span == 0.0 || pixels == 0 {
            return limit.1;
        }
        let ratio = (value - self.range.start) / span;
        limit.0 + (pixels as f64 * ratio + 1e-3).floor() as i32
    }

    // Every tick is drawn regardless of the hinted label budget
    fn key_points<Hint: KeyPointHint>(&self, _hint: Hint) -> Vec<f64> {
        self.ticks.clone()
    }

    fn range(&self) -> Range<f64> {
        self.range.clone()
    }
}

/// Value axis of the lap-time bars, ticked at every lap time.
fn time_axis(values: &[f64]) -> KeyPointAxis {
    KeyPointAxis::new(bar_range(values), values.to_vec())
}

/// `n` unit-wide category slots labelled at their centres.
fn category_axis(n: usize) -> KeyPointAxis {
    KeyPointAxis::new(0.0..n as f64, (0..n).map(|i| i as f64 + 0.5).collect())
}

/// Label of the category slot containing `pos`. With `top_down` the slots are
/// numbered from the top of the axis.
fn category_label(labels: &[String], pos: f64, top_down: bool) -> String {
    if pos < 0.0 {
        return String::new();
    }
    let slot = pos.floor() as usize;
    let idx = if top_down {
        labels.len().checked_sub(slot + 1)
    } else {
        Some(slot)
    };
    idx.and_then(|i| labels.get(i)).cloned().unwrap_or_default()
}

fn label_area_size(labels: &[String]) -> u32 {
    let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;
    (longest * 7 + 20).clamp(40, 260)
}

fn rotated_label_font() -> TextStyle<'static> {
    ("sans-serif", 12).into_font().transform(FontTransform::Rotate90).into()
}

/// Parse a colour name or hex string (#RRGGBB, #RGB)
pub fn parse_color(color_str: &str) -> Option<RGBColor> {
    let color_str = color_str.trim();

    if color_str.starts_with('#') {
        return parse_hex_color(color_str);
    }

    match color_str.to_lowercase().as_str() {
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        "red" => Some(RGBColor(255, 0, 0)),
        "green" => Some(RGBColor(0, 128, 0)),
        "blue" => Some(RGBColor(0, 0, 255)),
        "skyblue" => Some(SKY_BLUE),
        "orange" => Some(RGBColor(255, 165, 0)),
        "purple" => Some(RGBColor(128, 0, 128)),
        "gray" | "grey" => Some(RGBColor(128, 128, 128)),
        _ => None,
    }
}

fn parse_hex_color(hex: &str) -> Option<RGBColor> {
    let hex = hex.trim_start_matches('#');
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(RGBColor(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(RGBColor(r, g, b))
        }
        _ => None,
    }
}
