//! Seaborn-style "whitegrid" variants of the static helpers

use super::{
    subplots, Axes, BandArtist, Figure, GridStyle, LineArtist, MarkerArtist, POINT_Z_ORDER,
};
use crate::data::TimeFrame;
use crate::errors::Result;
use crate::layouts::TextStyle;
use crate::styles::{Color, Palette};
use tracing::debug;

/// Marker area of whitegrid anomaly points, in points squared
pub const POINT_SIZE: f64 = 100.0;

fn apply_theme(ax: &mut Axes) {
    ax.grid(Some(GridStyle {
        color: Color::rgb(204, 204, 204),
        alpha: 1.0,
    }));
}

/// New 12x8 in figure with an unlabelled `value_0` line on a whitegrid theme
pub fn create_time_series(time_series: &TimeFrame, title: &str) -> Result<(Figure, Axes)> {
    let (mut fig, mut ax) = subplots((12.0, 8.0));
    apply_theme(&mut ax);

    ax.plot(
        LineArtist::new(
            time_series.index(),
            time_series.values()?,
            Palette::whitegrid().series,
        )
        .width(2.0),
    )?;

    ax.set_title(TextStyle::new(title, 14.0).bold())
        .set_x_label(TextStyle::new("Time", 12.0))
        .set_y_label(TextStyle::new("Value", 12.0))
        .set_x_tick_rotation(45.0);
    fig.set_tight_layout(true);

    Ok((fig, ax))
}

/// Steelblue forecast line with a 0.3-alpha band
pub fn add_confidence_interval<'a>(ax: &'a mut Axes, forecast: &TimeFrame) -> Result<&'a mut Axes> {
    let columns = forecast.forecast_columns()?;
    let ds = forecast.index();
    let color = Palette::whitegrid().forecast;
    debug!(points = ds.len(), "whitegrid: add confidence interval");

    ax.plot(
        LineArtist::new(ds, columns.expected, color)
            .label("Forecast")
            .width(2.0),
    )?;
    ax.fill_between(
        BandArtist::new(ds, columns.lower, columns.upper, color.with_alpha(0.3))
            .label("Confidence Interval"),
    )
}

/// Whitegrid counterpart of [`super::add_anomalies`]
///
/// Same `[upper, lower]` bound convention. No marker artist is added when
/// the mask flags nothing.
pub fn add_anomalies<'a>(
    ax: &'a mut Axes,
    time_series: &TimeFrame,
    is_anomaly: &[u8],
    expected_values: &[f64],
    expected_bounds: &[[f64; 2]],
) -> Result<&'a mut Axes> {
    let augmented = time_series.with_forecast(expected_values, expected_bounds)?;
    let anomaly_points = augmented.filter_mask(is_anomaly)?;

    if !anomaly_points.is_empty() {
        debug!(points = anomaly_points.len(), "whitegrid: add anomaly points");
        ax.scatter(
            MarkerArtist::new(
                anomaly_points.index(),
                anomaly_points.values()?,
                Palette::whitegrid().anomaly,
            )
            .label("Anomalies")
            .size(POINT_SIZE)
            .z_order(POINT_Z_ORDER),
        )?;
    }

    add_confidence_interval(ax, &augmented)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LOWER_COLUMN;
    use crate::errors::ChartError;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn series(values: &[f64]) -> TimeFrame {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let index: Vec<DateTime<Utc>> = (0..values.len())
            .map(|i| start + Duration::minutes(15 * i as i64))
            .collect();
        TimeFrame::from_values(index, values.to_vec()).unwrap()
    }

    #[test]
    fn test_create_time_series() {
        let (fig, ax) = create_time_series(&series(&[1.0, 2.0]), "Requests").unwrap();

        assert_eq!(fig.size_inches, (12.0, 8.0));
        assert!(fig.tight_layout);
        assert_eq!(ax.title().map(|t| t.text.as_str()), Some("Requests"));
        assert!(!ax.has_legend_entries());
        assert_eq!(ax.grid_style().map(|g| g.alpha), Some(1.0));
        assert_eq!(ax.lines().next().unwrap().width, 2.0);
    }

    #[test]
    fn test_anomalies_skip_empty_markers() {
        let ts = series(&[1.0, 2.0, 3.0]);
        let (_, mut ax) = create_time_series(&ts, "t").unwrap();
        add_anomalies(&mut ax, &ts, &[0, 0, 0], &[2.0; 3], &[[4.0, 0.0]; 3]).unwrap();

        assert_eq!(ax.markers().count(), 0);
        assert_eq!(ax.bands().count(), 1);
        assert_eq!(ax.bands().next().unwrap().color, Color::STEELBLUE.with_alpha(0.3));
    }

    #[test]
    fn test_confidence_interval_missing_column() {
        let mut fc = series(&[1.0, 2.0])
            .with_forecast(&[1.5; 2], &[[3.0, 0.0]; 2])
            .unwrap();
        fc.drop_column(LOWER_COLUMN);

        let mut ax = Axes::new();
        let result = add_confidence_interval(&mut ax, &fc);
        assert!(matches!(
            result,
            Err(ChartError::MissingColumn { ref name }) if name == LOWER_COLUMN
        ));
        assert!(ax.artists().is_empty());
    }

    #[test]
    fn test_anomalies_marker_size() {
        let ts = series(&[1.0, 9.0, 3.0]);
        let mut ax = Axes::new();
        add_anomalies(&mut ax, &ts, &[0, 1, 0], &[2.0; 3], &[[4.0, 0.0]; 3]).unwrap();

        let markers = ax.markers().next().unwrap();
        assert_eq!(markers.size, POINT_SIZE);
        assert_eq!(markers.y, vec![9.0]);
        assert_eq!(markers.z_order, POINT_Z_ORDER);
    }
}
