//! Retained figure and axes model drawn later by [`crate::export`]

use crate::errors::{ChartError, Result};
use crate::layouts::TextStyle;
use crate::styles::Color;
use chrono::{DateTime, Duration, Utc};
use std::ops::Range;

/// Pixels per inch used when rasterizing a figure
pub const DEFAULT_DPI: f64 = 100.0;

/// Default z-order of lines
pub const LINE_Z_ORDER: f64 = 2.0;
/// Default z-order of bands and markers, drawn beneath lines
pub const COLLECTION_Z_ORDER: f64 = 1.0;

/// Top-level container: size and page-level options
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// Size in inches (width, height)
    pub size_inches: (f64, f64),
    pub dpi: f64,
    pub tight_layout: bool,
    pub background: Color,
}

impl Figure {
    pub fn new(size_inches: (f64, f64)) -> Self {
        Self {
            size_inches,
            dpi: DEFAULT_DPI,
            tight_layout: false,
            background: Color::WHITE,
        }
    }

    pub fn set_size_inches(&mut self, width: f64, height: f64) -> &mut Self {
        self.size_inches = (width, height);
        self
    }

    pub fn set_tight_layout(&mut self, tight: bool) -> &mut Self {
        self.tight_layout = tight;
        self
    }

    /// Raster size in pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        let (w, h) = self.size_inches;
        ((w * self.dpi).round() as u32, (h * self.dpi).round() as u32)
    }
}

/// Create a figure of the given size together with an empty axes
pub fn subplots(size_inches: (f64, f64)) -> (Figure, Axes) {
    (Figure::new(size_inches), Axes::default())
}

/// Connected line through `(x[i], y[i])`
#[derive(Debug, Clone, PartialEq)]
pub struct LineArtist {
    pub x: Vec<DateTime<Utc>>,
    pub y: Vec<f64>,
    pub label: Option<String>,
    pub color: Color,
    /// Stroke width in points
    pub width: f64,
    pub z_order: f64,
}

impl LineArtist {
    pub fn new(x: &[DateTime<Utc>], y: &[f64], color: Color) -> Self {
        Self {
            x: x.to_vec(),
            y: y.to_vec(),
            label: None,
            color,
            width: 1.5,
            z_order: LINE_Z_ORDER,
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }
}

/// Filled region between `lower[i]` and `upper[i]`
#[derive(Debug, Clone, PartialEq)]
pub struct BandArtist {
    pub x: Vec<DateTime<Utc>>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub label: Option<String>,
    /// Fill color, alpha included
    pub color: Color,
    pub z_order: f64,
}

impl BandArtist {
    pub fn new(x: &[DateTime<Utc>], lower: &[f64], upper: &[f64], color: Color) -> Self {
        Self {
            x: x.to_vec(),
            lower: lower.to_vec(),
            upper: upper.to_vec(),
            label: None,
            color,
            z_order: COLLECTION_Z_ORDER,
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }
}

/// Unconnected markers, one per coordinate pair
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerArtist {
    pub x: Vec<DateTime<Utc>>,
    pub y: Vec<f64>,
    pub label: Option<String>,
    pub color: Color,
    /// Marker area in points squared
    pub size: f64,
    pub z_order: f64,
}

impl MarkerArtist {
    pub fn new(x: &[DateTime<Utc>], y: &[f64], color: Color) -> Self {
        Self {
            x: x.to_vec(),
            y: y.to_vec(),
            label: None,
            color,
            size: 36.0,
            z_order: COLLECTION_Z_ORDER,
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn z_order(mut self, z_order: f64) -> Self {
        self.z_order = z_order;
        self
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Artist {
    Line(LineArtist),
    Band(BandArtist),
    Markers(MarkerArtist),
}

impl Artist {
    pub fn z_order(&self) -> f64 {
        match self {
            Artist::Line(a) => a.z_order,
            Artist::Band(a) => a.z_order,
            Artist::Markers(a) => a.z_order,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Artist::Line(a) => a.label.as_deref(),
            Artist::Band(a) => a.label.as_deref(),
            Artist::Markers(a) => a.label.as_deref(),
        }
    }
}

/// Grid line appearance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStyle {
    pub color: Color,
    pub alpha: f64,
}

impl GridStyle {
    pub fn with_alpha(alpha: f64) -> Self {
        Self {
            color: Color::rgb(176, 176, 176),
            alpha,
        }
    }
}

/// Drawing surface for the static backend
///
/// Artists are kept in insertion order; [`Axes::artists_by_z_order`] gives
/// the paint order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Axes {
    artists: Vec<Artist>,
    title: Option<TextStyle>,
    x_label: Option<TextStyle>,
    y_label: Option<TextStyle>,
    grid: Option<GridStyle>,
    x_tick_rotation: f64,
}

impl Axes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plot(&mut self, line: LineArtist) -> Result<&mut Self> {
        ChartError::check_len("line x/y", line.x.len(), line.y.len())?;
        self.artists.push(Artist::Line(line));
        Ok(self)
    }

    pub fn fill_between(&mut self, band: BandArtist) -> Result<&mut Self> {
        ChartError::check_len("band x/lower", band.x.len(), band.lower.len())?;
        ChartError::check_len("band x/upper", band.x.len(), band.upper.len())?;
        self.artists.push(Artist::Band(band));
        Ok(self)
    }

    pub fn scatter(&mut self, markers: MarkerArtist) -> Result<&mut Self> {
        ChartError::check_len("marker x/y", markers.x.len(), markers.y.len())?;
        self.artists.push(Artist::Markers(markers));
        Ok(self)
    }

    pub fn set_title(&mut self, title: TextStyle) -> &mut Self {
        self.title = Some(title);
        self
    }

    pub fn set_x_label(&mut self, label: TextStyle) -> &mut Self {
        self.x_label = Some(label);
        self
    }

    pub fn set_y_label(&mut self, label: TextStyle) -> &mut Self {
        self.y_label = Some(label);
        self
    }

    /// Show the grid with the given style, or hide it with `None`
    pub fn grid(&mut self, grid: Option<GridStyle>) -> &mut Self {
        self.grid = grid;
        self
    }

    pub fn set_x_tick_rotation(&mut self, degrees: f64) -> &mut Self {
        self.x_tick_rotation = degrees;
        self
    }

    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineArtist> {
        self.artists.iter().filter_map(|a| match a {
            Artist::Line(line) => Some(line),
            _ => None,
        })
    }

    pub fn bands(&self) -> impl Iterator<Item = &BandArtist> {
        self.artists.iter().filter_map(|a| match a {
            Artist::Band(band) => Some(band),
            _ => None,
        })
    }

    pub fn markers(&self) -> impl Iterator<Item = &MarkerArtist> {
        self.artists.iter().filter_map(|a| match a {
            Artist::Markers(markers) => Some(markers),
            _ => None,
        })
    }

    /// Total number of individual markers across all marker artists
    pub fn marker_count(&self) -> usize {
        self.markers().map(MarkerArtist::len).sum()
    }

    pub fn title(&self) -> Option<&TextStyle> {
        self.title.as_ref()
    }

    pub fn x_label(&self) -> Option<&TextStyle> {
        self.x_label.as_ref()
    }

    pub fn y_label(&self) -> Option<&TextStyle> {
        self.y_label.as_ref()
    }

    pub fn grid_style(&self) -> Option<GridStyle> {
        self.grid
    }

    pub fn x_tick_rotation(&self) -> f64 {
        self.x_tick_rotation
    }

    pub fn has_legend_entries(&self) -> bool {
        self.artists.iter().any(|a| a.label().is_some())
    }

    /// Paint order: ascending z-order, insertion order on ties
    pub fn artists_by_z_order(&self) -> Vec<&Artist> {
        let mut ordered: Vec<&Artist> = self.artists.iter().collect();
        ordered.sort_by(|a, b| a.z_order().total_cmp(&b.z_order()));
        ordered
    }

    /// Data extent over every artist, padded so degenerate ranges stay drawable
    pub fn data_limits(&self) -> Option<(Range<DateTime<Utc>>, Range<f64>)> {
        let mut x_min: Option<DateTime<Utc>> = None;
        let mut x_max: Option<DateTime<Utc>> = None;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;

        let mut take_x = |xs: &[DateTime<Utc>]| {
            for &x in xs {
                x_min = Some(x_min.map_or(x, |m| m.min(x)));
                x_max = Some(x_max.map_or(x, |m| m.max(x)));
            }
        };
        let mut ys: Vec<&[f64]> = Vec::new();

        for artist in &self.artists {
            match artist {
                Artist::Line(a) => {
                    take_x(&a.x);
                    ys.push(&a.y);
                }
                Artist::Band(a) => {
                    take_x(&a.x);
                    ys.push(&a.lower);
                    ys.push(&a.upper);
                }
                Artist::Markers(a) => {
                    take_x(&a.x);
                    ys.push(&a.y);
                }
            }
        }

        for &y in ys.iter().flat_map(|s| s.iter()).filter(|y| y.is_finite()) {
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }

        let (mut x_min, mut x_max) = (x_min?, x_max?);
        if !y_min.is_finite() {
            return None;
        }

        if x_min == x_max {
            x_min -= Duration::hours(1);
            x_max += Duration::hours(1);
        }
        let pad = if y_max > y_min {
            (y_max - y_min) * 0.05
        } else {
            1.0
        };

        Some((x_min..x_max, (y_min - pad)..(y_max + pad)))
    }
}
