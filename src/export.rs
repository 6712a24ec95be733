//! Static chart export through plotters (PNG, SVG)

use crate::errors::{ChartError, Result};
use crate::layouts;
use crate::static_chart::{Artist, Axes, Figure};
use chrono::{DateTime, Utc};
use plotters::coord::types::RangedDateTime;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::path::Path;
use tracing::info;

/// Tick label size in points
const TICK_FONT_SIZE: f64 = 10.0;
/// Legend swatch length in pixels
const LEGEND_SWATCH: i32 = 20;

/// Output format for static exports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Svg,
}

impl ExportFormat {
    /// Guess the format from a file extension, defaulting to PNG
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => ExportFormat::Svg,
            _ => ExportFormat::Png,
        }
    }
}

/// Render the figure to a file; the format follows the extension
pub fn save(figure: &Figure, axes: &Axes, path: &Path) -> Result<()> {
    match ExportFormat::from_path(path) {
        ExportFormat::Png => export_png(figure, axes, path),
        ExportFormat::Svg => export_svg(figure, axes, path),
    }
}

pub fn export_png(figure: &Figure, axes: &Axes, path: &Path) -> Result<()> {
    let size = figure.pixel_size();
    info!(path = %path.display(), width = size.0, height = size.1, "exporting PNG chart");
    let root = BitMapBackend::new(path, size).into_drawing_area();
    render_on(figure, axes, root)
}

pub fn export_svg(figure: &Figure, axes: &Axes, path: &Path) -> Result<()> {
    let size = figure.pixel_size();
    info!(path = %path.display(), width = size.0, height = size.1, "exporting SVG chart");
    let root = SVGBackend::new(path, size).into_drawing_area();
    render_on(figure, axes, root)
}

/// Render to an in-memory SVG document
pub fn to_svg_string(figure: &Figure, axes: &Axes) -> Result<String> {
    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, figure.pixel_size()).into_drawing_area();
        render_on(figure, axes, root)?;
    }
    Ok(buffer)
}

/// Draw every artist of `axes` onto an arbitrary plotters drawing area
pub fn render_on<DB>(figure: &Figure, axes: &Axes, root: DrawingArea<DB, Shift>) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (x_range, y_range) = axes.data_limits().ok_or(ChartError::EmptyChart)?;
    let scale = figure.dpi / 72.0;

    root.fill(&figure.background.to_rgb())?;

    let margin = if figure.tight_layout { 10 } else { 40 };
    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(margin)
        .x_label_area_size(points_to_px(60.0, scale))
        .y_label_area_size(points_to_px(60.0, scale));
    if let Some(title) = axes.title() {
        builder.caption(&title.text, font_for(title, scale));
    }
    let mut chart = builder.build_cartesian_2d(RangedDateTime::from(x_range), y_range)?;

    let x_formatter = |t: &DateTime<Utc>| t.format("%Y-%m-%d %H:%M").to_string();
    let tick_font = FontDesc::new(FontFamily::SansSerif, TICK_FONT_SIZE * scale, FontStyle::Normal);
    {
        let mut mesh = chart.configure_mesh();
        mesh.x_label_formatter(&x_formatter)
            .x_label_style(tick_font.transform(tick_transform(axes.x_tick_rotation())))
            .y_label_style(tick_font.clone());

        if let Some(label) = axes.x_label() {
            mesh.x_desc(label.text.as_str())
                .axis_desc_style(font_for(label, scale));
        }
        if let Some(label) = axes.y_label() {
            mesh.y_desc(label.text.as_str());
        }
        match axes.grid_style() {
            Some(grid) => {
                mesh.bold_line_style(grid.color.with_alpha(grid.alpha).to_rgba())
                    .light_line_style(TRANSPARENT);
            }
            None => {
                mesh.disable_mesh();
            }
        }
        mesh.draw()?;
    }

    for artist in axes.artists_by_z_order() {
        match artist {
            Artist::Line(line) => {
                let style = line.color.to_rgba().stroke_width(points_to_px(line.width, scale));
                let points = line.x.iter().copied().zip(line.y.iter().copied());
                let series = chart.draw_series(LineSeries::new(points, style))?;
                if let Some(label) = &line.label {
                    series.label(label.as_str()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + LEGEND_SWATCH, y)], style)
                    });
                }
            }
            Artist::Band(band) => {
                let fill = band.color.to_rgba().filled();
                let mut outline: Vec<(DateTime<Utc>, f64)> =
                    band.x.iter().copied().zip(band.upper.iter().copied()).collect();
                outline.extend(
                    band.x
                        .iter()
                        .copied()
                        .zip(band.lower.iter().copied())
                        .rev(),
                );
                let series = chart.draw_series(std::iter::once(Polygon::new(outline, fill)))?;
                if let Some(label) = &band.label {
                    series.label(label.as_str()).legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + LEGEND_SWATCH, y + 5)], fill)
                    });
                }
            }
            Artist::Markers(markers) => {
                let fill = markers.color.to_rgba().filled();
                let radius = marker_radius(markers.size, scale);
                let series = chart.draw_series(
                    markers
                        .x
                        .iter()
                        .copied()
                        .zip(markers.y.iter().copied())
                        .map(|p| Circle::new(p, radius, fill)),
                )?;
                if let Some(label) = &markers.label {
                    series
                        .label(label.as_str())
                        .legend(move |(x, y)| Circle::new((x + LEGEND_SWATCH / 2, y), radius, fill));
                }
            }
        }
    }

    if axes.has_legend_entries() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(FontDesc::new(FontFamily::SansSerif, TICK_FONT_SIZE * scale, FontStyle::Normal))
            .draw()?;
    }

    root.present()?;
    Ok(())
}

fn font_for(text: &layouts::TextStyle, scale: f64) -> FontDesc<'static> {
    let style = if text.bold {
        FontStyle::Bold
    } else {
        FontStyle::Normal
    };
    FontDesc::new(FontFamily::SansSerif, text.font_size * scale, style)
}

fn points_to_px(points: f64, scale: f64) -> u32 {
    ((points * scale).round() as u32).max(1)
}

/// Radius in pixels of a marker whose area is `size` points squared
fn marker_radius(size: f64, scale: f64) -> u32 {
    points_to_px(size.max(0.0).sqrt() / 2.0, scale)
}

/// plotters only rotates text by quarter turns; snap to the nearest one
fn tick_transform(degrees: f64) -> FontTransform {
    let degrees = degrees.rem_euclid(360.0);
    if degrees == 0.0 || degrees >= 315.0 {
        FontTransform::None
    } else if degrees <= 135.0 {
        FontTransform::Rotate270
    } else if degrees <= 225.0 {
        FontTransform::Rotate180
    } else {
        FontTransform::Rotate90
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_series;
    use crate::static_chart::{add_anomalies, plot_time_series};
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("a/chart.SVG")), ExportFormat::Svg);
        assert_eq!(ExportFormat::from_path(Path::new("chart.png")), ExportFormat::Png);
        assert_eq!(ExportFormat::from_path(Path::new("chart")), ExportFormat::Png);
    }

    #[test]
    fn test_tick_transform() {
        assert!(matches!(tick_transform(0.0), FontTransform::None));
        assert!(matches!(tick_transform(45.0), FontTransform::Rotate270));
        assert!(matches!(tick_transform(90.0), FontTransform::Rotate270));
        assert!(matches!(tick_transform(180.0), FontTransform::Rotate180));
        assert!(matches!(tick_transform(-90.0), FontTransform::Rotate90));
    }

    #[test]
    fn test_marker_radius() {
        // 50 pt^2 at 100 dpi: sqrt(50)/2 pt * 100/72 px/pt ~= 4.9 px
        assert_eq!(marker_radius(50.0, 100.0 / 72.0), 5);
        assert_eq!(marker_radius(0.0, 1.0), 1);
    }

    #[test]
    fn test_empty_axes_is_an_error() {
        let (fig, ax) = crate::static_chart::subplots((4.0, 3.0));
        assert!(matches!(to_svg_string(&fig, &ax), Err(ChartError::EmptyChart)));
    }

    fn anomaly_chart() -> (Figure, Axes) {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let sample = sample_series(48, start, Duration::hours(1));
        let (fig, mut ax) = plot_time_series(&sample.series, "Sample").unwrap();
        add_anomalies(
            &mut ax,
            &sample.series,
            &sample.is_anomaly,
            &sample.expected,
            &sample.bounds,
        )
        .unwrap();
        (fig, ax)
    }

    #[test]
    fn test_svg_string_contains_title() {
        let (fig, ax) = anomaly_chart();
        let svg = to_svg_string(&fig, &ax).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Time Series"));
    }

    #[test]
    fn test_save_writes_png_and_svg() {
        let dir = tempfile::tempdir().unwrap();
        let (fig, ax) = anomaly_chart();

        let png = dir.path().join("anomalies.png");
        save(&fig, &ax, &png).unwrap();
        let bytes = std::fs::read(&png).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));

        let svg = dir.path().join("anomalies.svg");
        save(&fig, &ax, &svg).unwrap();
        let text = std::fs::read_to_string(&svg).unwrap();
        assert!(text.starts_with("<svg"));
        assert!(text.contains("Anomalies"));
    }

    #[test]
    fn test_save_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let (fig, ax) = anomaly_chart();
        let path = dir.path().join("missing").join("chart.svg");

        assert!(save(&fig, &ax, &path).is_err());
        assert!(!path.exists());
    }
}
