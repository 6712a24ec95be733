//! # Anomaly Charts
//!
//! Presentation helpers that draw a time series, its forecast confidence band
//! and anomaly markers on two independent charting backends:
//!
//! - [`static_chart`]: a retained [`Figure`](static_chart::Figure) /
//!   [`Axes`](static_chart::Axes) pair rendered to PNG or SVG through
//!   plotters by [`export`]
//! - [`interactive`]: traces and layout on a [`plotly::Plot`]
//!
//! Both groups expose the same operations (`add_line`, `update_layout`,
//! `add_confidence_interval`, `add_points`, `add_anomalies`) and neither
//! depends on the other. The anomaly mask and forecast bounds are inputs;
//! nothing here detects anomalies or fits forecasts.
//!
//! ## Quick Start
//!
//! ```rust
//! use anomaly_charts::data::sample_series;
//! use anomaly_charts::{interactive, static_chart};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let sample = sample_series(96, start, Duration::hours(1));
//!
//! let (_fig, mut ax) = static_chart::plot_time_series(&sample.series, "Requests").unwrap();
//! static_chart::add_anomalies(
//!     &mut ax,
//!     &sample.series,
//!     &sample.is_anomaly,
//!     &sample.expected,
//!     &sample.bounds,
//! )
//! .unwrap();
//!
//! let mut plot = interactive::plot_time_series(&sample.series, "Requests").unwrap();
//! interactive::add_anomalies(
//!     &mut plot,
//!     &sample.series,
//!     &sample.is_anomaly,
//!     &sample.expected,
//!     &sample.bounds,
//! )
//! .unwrap();
//! assert_eq!(ax.marker_count(), 5);
//! ```
//!
//! ## Bound column order
//!
//! Overlay helpers take bounds as `[[f64; 2]]` rows read as `[upper, lower]`.
//! The order is not validated against whatever produced the bounds.

pub mod data;
pub mod errors;
pub mod export;
pub mod interactive;
pub mod layouts;
pub mod static_chart;
pub mod styles;

// Re-export key types for convenience
pub use data::{SampleData, TimeFrame};
pub use errors::{ChartError, Result};
pub use layouts::{InteractiveLayout, StaticLayout};
pub use styles::{Color, Palette};

/// Version of the chart library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
