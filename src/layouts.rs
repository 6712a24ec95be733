//! Layout presets applied by the `update_layout` operations

use serde::{Deserialize, Serialize};

/// Text with a point size and weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub text: String,
    pub font_size: f64,
    #[serde(default)]
    pub bold: bool,
}

impl TextStyle {
    pub fn new(text: &str, font_size: f64) -> Self {
        Self {
            text: text.to_string(),
            font_size,
            bold: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Layout applied to a static figure and its axes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticLayout {
    pub title: TextStyle,
    pub x_label: TextStyle,
    pub y_label: TextStyle,
    /// Figure size in inches (width, height)
    pub figure_size: (f64, f64),
    /// Grid line opacity; `None` hides the grid
    pub grid_alpha: Option<f64>,
    /// X tick label rotation in degrees, counter-clockwise
    pub x_tick_rotation: f64,
    pub tight_layout: bool,
}

impl Default for StaticLayout {
    fn default() -> Self {
        Self {
            title: TextStyle::new("Time Series", 14.0).bold(),
            x_label: TextStyle::new("Time", 12.0),
            y_label: TextStyle::new("Value", 12.0),
            figure_size: (20.0, 8.0),
            grid_alpha: Some(0.3),
            x_tick_rotation: 45.0,
            tight_layout: true,
        }
    }
}

/// Step unit of a range selector button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeStep {
    Day,
    Month,
    All,
}

/// One button of the interactive x-axis range selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeButton {
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub label: Option<String>,
    pub step: RangeStep,
}

impl RangeButton {
    /// Button selecting the trailing `count` steps
    pub fn backward(count: usize, label: &str, step: RangeStep) -> Self {
        Self {
            count: Some(count),
            label: Some(label.to_string()),
            step,
        }
    }

    /// Button resetting to the full range
    pub fn all() -> Self {
        Self {
            count: None,
            label: None,
            step: RangeStep::All,
        }
    }
}

/// Layout applied to an interactive plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractiveLayout {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    /// Plot height in pixels
    pub height: usize,
    pub show_legend: bool,
    pub range_buttons: Vec<RangeButton>,
    pub range_slider: bool,
    /// Allow zooming along the y axis
    pub y_zoom: bool,
}

impl Default for InteractiveLayout {
    fn default() -> Self {
        Self {
            title: "Time Series".to_string(),
            x_title: "Time".to_string(),
            y_title: "Value".to_string(),
            height: 600,
            show_legend: true,
            range_buttons: vec![
                RangeButton::backward(1, "day", RangeStep::Day),
                RangeButton::backward(7, "week", RangeStep::Day),
                RangeButton::backward(1, "month", RangeStep::Month),
                RangeButton::all(),
            ],
            range_slider: true,
            y_zoom: true,
        }
    }
}
