//! Colors and visual styling shared by both chart backends

use plotters::style::{RGBAColor, RGBColor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// RGB color with an alpha channel in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

impl Color {
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const STEELBLUE: Color = Color::rgb(70, 130, 180);
    /// Default forecast blue (31, 119, 180)
    pub const FORECAST: Color = Color::rgb(31, 119, 180);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        Self { r, g, b, alpha }
    }

    /// Same color with the alpha channel replaced
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn to_rgb(self) -> RGBColor {
        RGBColor(self.r, self.g, self.b)
    }

    pub fn to_rgba(self) -> RGBAColor {
        RGBAColor(self.r, self.g, self.b, self.alpha)
    }

    /// CSS notation understood by plotly.js
    pub fn to_css(self) -> String {
        if self.alpha >= 1.0 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.alpha)
        }
    }

    fn named(name: &str) -> Option<Self> {
        let color = match name {
            "blue" => Self::BLUE,
            "red" => Self::RED,
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "green" => Self::rgb(0, 128, 0),
            "orange" => Self::rgb(255, 165, 0),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "steelblue" => Self::STEELBLUE,
            _ => return None,
        };
        Some(color)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Error returned when a color string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid color: {0}")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    /// Accepts a small set of names, `#rrggbb`, `rgb(r, g, b)` and `rgba(r, g, b, a)`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ParseColorError(s.to_string());

        if let Some(color) = Color::named(&s.to_ascii_lowercase()) {
            return Ok(color);
        }

        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 {
                return Err(invalid());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
            return Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        let (body, with_alpha) = if let Some(body) = s.strip_prefix("rgba(") {
            (body, true)
        } else if let Some(body) = s.strip_prefix("rgb(") {
            (body, false)
        } else {
            return Err(invalid());
        };
        let parts: Vec<&str> = body
            .strip_suffix(')')
            .ok_or_else(invalid)?
            .split(',')
            .map(str::trim)
            .collect();
        let arity = if with_alpha { 4 } else { 3 };
        if parts.len() != arity {
            return Err(invalid());
        }
        let channel = |p: &str| p.parse::<u8>().map_err(|_| invalid());
        let alpha = if with_alpha {
            parts[3].parse::<f64>().map_err(|_| invalid())?
        } else {
            1.0
        };
        Ok(Color::rgba(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            alpha,
        ))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Colors used by the composed chart helpers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Base series line
    pub series: Color,
    /// Forecast line and confidence band
    pub forecast: Color,
    /// Anomaly markers
    pub anomaly: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            series: Color::BLUE,
            forecast: Color::FORECAST,
            anomaly: Color::RED,
        }
    }
}

impl Palette {
    /// Seaborn-like whitegrid palette
    pub fn whitegrid() -> Self {
        Self {
            forecast: Color::STEELBLUE,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_and_hex() {
        assert_eq!("red".parse::<Color>().unwrap(), Color::RED);
        assert_eq!("SteelBlue".parse::<Color>().unwrap(), Color::STEELBLUE);
        assert_eq!("#1f77b4".parse::<Color>().unwrap(), Color::FORECAST);
        assert!("#1f77".parse::<Color>().is_err());
        assert!("chartreuse-ish".parse::<Color>().is_err());
    }

    #[test]
    fn test_parse_rgba() {
        let color: Color = "rgba(31, 119, 180, 0.2)".parse().unwrap();
        assert_eq!(color, Color::FORECAST.with_alpha(0.2));
        assert!("rgba(31, 119, 180)".parse::<Color>().is_err());
    }

    #[test]
    fn test_css_output() {
        assert_eq!(Color::FORECAST.to_css(), "rgb(31, 119, 180)");
        assert_eq!(
            Color::FORECAST.with_alpha(0.8).to_css(),
            "rgba(31, 119, 180, 0.8)"
        );
    }

    #[test]
    fn test_palette_partial_deserialize() {
        let palette: Palette = serde_json::from_str(r#"{"anomaly": "orange"}"#).unwrap();
        assert_eq!(palette.anomaly, Color::rgb(255, 165, 0));
        assert_eq!(palette.series, Color::BLUE);
        assert_eq!(palette.forecast, Color::FORECAST);
    }
}
