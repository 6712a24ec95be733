//! Static chart helpers on a retained [`Figure`]/[`Axes`] pair
//!
//! Every helper borrows the caller's axes, appends artists and hands the same
//! reference back so calls can be chained. Nothing is drawn until the caller
//! passes the pair to [`crate::export`].

mod axes;
pub mod whitegrid;

pub use axes::{
    subplots, Artist, Axes, BandArtist, Figure, GridStyle, LineArtist, MarkerArtist,
    COLLECTION_Z_ORDER, DEFAULT_DPI, LINE_Z_ORDER,
};

use crate::data::TimeFrame;
use crate::errors::Result;
use crate::layouts::StaticLayout;
use crate::styles::Color;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Default legend entry of [`add_points`]
pub const DEFAULT_POINTS_NAME: &str = "Anomalies";
/// Marker area of anomaly points, in points squared
pub const POINT_SIZE: f64 = 50.0;
/// Z-order that keeps anomaly points above every line
pub const POINT_Z_ORDER: f64 = 5.0;

/// Add a labelled line
pub fn add_line<'a>(
    ax: &'a mut Axes,
    x_values: &[DateTime<Utc>],
    y_values: &[f64],
    name: &str,
    color: Color,
) -> Result<&'a mut Axes> {
    debug!(label = name, points = x_values.len(), "static: add line");
    ax.plot(LineArtist::new(x_values, y_values, color).label(name).width(1.5))
}

/// Apply the default time series layout to the axes and figure
pub fn update_layout<'a>(ax: &'a mut Axes, fig: &mut Figure) -> &'a mut Axes {
    update_layout_with(ax, fig, &StaticLayout::default())
}

/// Apply an explicit layout; applying the same layout again changes nothing
pub fn update_layout_with<'a>(
    ax: &'a mut Axes,
    fig: &mut Figure,
    layout: &StaticLayout,
) -> &'a mut Axes {
    ax.set_title(layout.title.clone())
        .set_x_label(layout.x_label.clone())
        .set_y_label(layout.y_label.clone())
        .grid(layout.grid_alpha.map(GridStyle::with_alpha))
        .set_x_tick_rotation(layout.x_tick_rotation);

    let (width, height) = layout.figure_size;
    fig.set_size_inches(width, height)
        .set_tight_layout(layout.tight_layout);

    ax
}

/// New 20x8 in figure with the series' `value_0` line and the default layout
pub fn plot_time_series(time_series: &TimeFrame, title: &str) -> Result<(Figure, Axes)> {
    let (mut fig, mut ax) = subplots((20.0, 8.0));
    add_line(
        &mut ax,
        time_series.index(),
        time_series.values()?,
        title,
        Color::BLUE,
    )?;
    update_layout(&mut ax, &mut fig);
    Ok((fig, ax))
}

/// Add the forecast line with its shaded confidence interval
///
/// `forecast` must carry `expected`, `lower` and `upper` columns.
pub fn add_confidence_interval<'a>(ax: &'a mut Axes, forecast: &TimeFrame) -> Result<&'a mut Axes> {
    let columns = forecast.forecast_columns()?;
    let ds = forecast.index();
    debug!(points = ds.len(), "static: add confidence interval");

    ax.plot(
        LineArtist::new(ds, columns.expected, Color::FORECAST.with_alpha(0.8))
            .label("Forecast")
            .width(2.0),
    )?;
    ax.fill_between(
        BandArtist::new(ds, columns.lower, columns.upper, Color::FORECAST.with_alpha(0.2))
            .label("Confidence Interval"),
    )
}

/// Add red "Anomalies" markers drawn above the lines
pub fn add_points<'a>(
    ax: &'a mut Axes,
    x_values: &[DateTime<Utc>],
    y_values: &[f64],
) -> Result<&'a mut Axes> {
    add_points_with(ax, x_values, y_values, DEFAULT_POINTS_NAME, Color::RED)
}

pub fn add_points_with<'a>(
    ax: &'a mut Axes,
    x_values: &[DateTime<Utc>],
    y_values: &[f64],
    name: &str,
    color: Color,
) -> Result<&'a mut Axes> {
    debug!(label = name, points = x_values.len(), "static: add points");
    ax.scatter(
        MarkerArtist::new(x_values, y_values, color)
            .label(name)
            .size(POINT_SIZE)
            .z_order(POINT_Z_ORDER),
    )
}

/// Mark anomalous rows and shade the forecast band over the whole series
///
/// `expected_bounds[i][0]` is taken as the upper bound and
/// `expected_bounds[i][1]` as the lower bound. Markers are added first, then
/// the band; the band always spans every row, not only anomalous ones.
pub fn add_anomalies<'a>(
    ax: &'a mut Axes,
    time_series: &TimeFrame,
    is_anomaly: &[u8],
    expected_values: &[f64],
    expected_bounds: &[[f64; 2]],
) -> Result<&'a mut Axes> {
    let augmented = time_series.with_forecast(expected_values, expected_bounds)?;
    let anomaly_points = augmented.filter_mask(is_anomaly)?;

    add_points(ax, anomaly_points.index(), anomaly_points.values()?)?;
    add_confidence_interval(ax, &augmented)
}
