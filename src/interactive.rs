//! Interactive chart helpers on a plotly [`Plot`]
//!
//! Each helper appends traces to the caller's plot and returns it for
//! chaining. Rendering is left to the caller (`Plot::to_html`,
//! `Plot::write_html`, `Plot::to_json`).

use crate::data::TimeFrame;
use crate::errors::{ChartError, Result};
use crate::layouts::{InteractiveLayout, RangeButton, RangeStep};
use crate::styles::Color;
use chrono::{DateTime, Utc};
use plotly::common::{Fill, Line, Marker, Mode, Title};
use plotly::layout::{
    Axis, AxisType, HoverMode, RangeSelector, RangeSlider, SelectorButton,
    SelectorStep, StepMode,
};
use plotly::{Plot, Scatter};
use tracing::debug;

/// Default legend entry of [`add_points`]
pub const DEFAULT_POINTS_NAME: &str = "Anomalies";
/// Marker diameter of anomaly points, in pixels
pub const POINT_SIZE: usize = 10;

/// Add a labelled line trace
pub fn add_line<'a>(
    fig: &'a mut Plot,
    x_values: &[DateTime<Utc>],
    y_values: &[f64],
    name: &str,
    color: Color,
) -> Result<&'a mut Plot> {
    ChartError::check_len("line x/y", x_values.len(), y_values.len())?;
    debug!(label = name, points = x_values.len(), "interactive: add line");

    let trace = Scatter::new(x_values.to_vec(), y_values.to_vec())
        .mode(Mode::Lines)
        .name(name)
        .line(Line::new().color(color.to_css()));
    fig.add_trace(trace);
    Ok(fig)
}

/// Apply the default time series layout
pub fn update_layout(fig: &mut Plot) -> &mut Plot {
    update_layout_with(fig, &InteractiveLayout::default())
}

/// Apply `config` on top of the plot's current layout
///
/// Title, height, hover mode, legend and both axes are overwritten; every
/// other layout setting the caller made is kept. Applying the same config
/// again changes nothing.
pub fn update_layout_with<'a>(fig: &'a mut Plot, config: &InteractiveLayout) -> &'a mut Plot {
    let buttons = config.range_buttons.iter().map(selector_button).collect();

    let x_axis = Axis::new()
        .title(Title::new(&config.x_title))
        .range_selector(RangeSelector::new().buttons(buttons))
        .range_slider(RangeSlider::new().visible(config.range_slider))
        .type_(AxisType::Date);
    let y_axis = Axis::new()
        .title(Title::new(&config.y_title))
        .fixed_range(!config.y_zoom);

    let layout = fig
        .layout()
        .clone()
        .title(Title::new(&config.title))
        .height(config.height)
        .hover_mode(HoverMode::XUnified)
        .show_legend(config.show_legend)
        .x_axis(x_axis)
        .y_axis(y_axis);

    fig.set_layout(layout);
    fig
}

fn selector_button(button: &RangeButton) -> SelectorButton {
    let mut selector = SelectorButton::new().step(match button.step {
        RangeStep::Day => SelectorStep::Day,
        RangeStep::Month => SelectorStep::Month,
        RangeStep::All => SelectorStep::All,
    });
    if let Some(count) = button.count {
        selector = selector.count(count).step_mode(StepMode::Backward);
    }
    if let Some(label) = &button.label {
        selector = selector.label(label);
    }
    selector
}

/// New plot with the series' `value_0` line and the default layout
pub fn plot_time_series(time_series: &TimeFrame, title: &str) -> Result<Plot> {
    let mut fig = Plot::new();
    add_line(
        &mut fig,
        time_series.index(),
        time_series.values()?,
        title,
        Color::BLUE,
    )?;
    update_layout(&mut fig);
    Ok(fig)
}

/// Add the forecast line and a band filled between two hidden bound traces
///
/// The lower-bound trace fills to the trace added just before it (the upper
/// bound), so the three traces must stay adjacent and in this order.
pub fn add_confidence_interval<'a>(fig: &'a mut Plot, forecast: &TimeFrame) -> Result<&'a mut Plot> {
    let columns = forecast.forecast_columns()?;
    let ds = forecast.index().to_vec();
    debug!(points = ds.len(), "interactive: add confidence interval");

    fig.add_trace(
        Scatter::new(ds.clone(), columns.expected.to_vec())
            .mode(Mode::Lines)
            .name("Forecast")
            .line(Line::new().color(Color::FORECAST.with_alpha(0.8).to_css())),
    );
    fig.add_trace(
        Scatter::new(ds.clone(), columns.upper.to_vec())
            .mode(Mode::Lines)
            .name("Upper Bound")
            .line(Line::new().width(0.0))
            .show_legend(false),
    );
    fig.add_trace(
        Scatter::new(ds, columns.lower.to_vec())
            .mode(Mode::Lines)
            .name("Lower Bound")
            .fill(Fill::ToNextY)
            .fill_color(Color::FORECAST.with_alpha(0.2).to_css())
            .line(Line::new().width(0.0))
            .show_legend(false),
    );
    Ok(fig)
}

/// Add red "Anomalies" markers
pub fn add_points<'a>(
    fig: &'a mut Plot,
    x_values: &[DateTime<Utc>],
    y_values: &[f64],
) -> Result<&'a mut Plot> {
    add_points_with(fig, x_values, y_values, DEFAULT_POINTS_NAME, Color::RED)
}

pub fn add_points_with<'a>(
    fig: &'a mut Plot,
    x_values: &[DateTime<Utc>],
    y_values: &[f64],
    name: &str,
    color: Color,
) -> Result<&'a mut Plot> {
    ChartError::check_len("marker x/y", x_values.len(), y_values.len())?;
    debug!(label = name, points = x_values.len(), "interactive: add points");

    fig.add_trace(
        Scatter::new(x_values.to_vec(), y_values.to_vec())
            .mode(Mode::Markers)
            .name(name)
            .marker(Marker::new().color(color.to_css()).size(POINT_SIZE)),
    );
    Ok(fig)
}

/// Mark anomalous rows and shade the forecast band over the whole series
///
/// `expected_bounds[i][0]` is taken as the upper bound and
/// `expected_bounds[i][1]` as the lower bound. The marker trace is added
/// first, then the three band traces.
pub fn add_anomalies<'a>(
    fig: &'a mut Plot,
    time_series: &TimeFrame,
    is_anomaly: &[u8],
    expected_values: &[f64],
    expected_bounds: &[[f64; 2]],
) -> Result<&'a mut Plot> {
    let augmented = time_series.with_forecast(expected_values, expected_bounds)?;
    let anomaly_points = augmented.filter_mask(is_anomaly)?;

    add_points(fig, anomaly_points.index(), anomaly_points.values()?)?;
    add_confidence_interval(fig, &augmented)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{EXPECTED_COLUMN, LOWER_COLUMN, UPPER_COLUMN};
    use chrono::{Duration, TimeZone};
    use plotly::Layout;
    use serde_json::Value;

    fn series(values: &[f64]) -> TimeFrame {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let index = (0..values.len())
            .map(|i| start + Duration::days(i as i64))
            .collect();
        TimeFrame::from_values(index, values.to_vec()).unwrap()
    }

    fn json(fig: &Plot) -> Value {
        serde_json::from_str(&fig.to_json()).unwrap()
    }

    fn traces(fig: &Plot) -> Vec<Value> {
        json(fig)["data"].as_array().cloned().unwrap_or_default()
    }

    #[test]
    fn test_line_trace() {
        let ts = series(&[1.0, 2.0, 3.0]);
        let mut fig = Plot::new();
        add_line(&mut fig, ts.index(), ts.values().unwrap(), "load", Color::BLUE).unwrap();
        update_layout(&mut fig);

        let data = traces(&fig);
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["name"], "load");
        assert_eq!(data[0]["mode"], "lines");
        assert_eq!(data[0]["line"]["color"], "rgb(0, 0, 255)");
        assert_eq!(data[0]["y"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_line_length_mismatch() {
        let ts = series(&[1.0, 2.0, 3.0]);
        let mut fig = Plot::new();
        let result = add_line(&mut fig, ts.index(), &[1.0], "load", Color::BLUE);

        assert!(matches!(result, Err(ChartError::LengthMismatch { .. })));
        assert!(traces(&fig).is_empty());
    }

    #[test]
    fn test_layout() {
        let mut fig = Plot::new();
        update_layout(&mut fig);

        let layout = &json(&fig)["layout"];
        assert_eq!(layout["title"]["text"], "Time Series");
        assert_eq!(layout["height"], 600);
        assert_eq!(layout["hovermode"], "x unified");
        assert_eq!(layout["showlegend"], true);
        assert_eq!(layout["xaxis"]["type"], "date");
        assert_eq!(layout["xaxis"]["title"]["text"], "Time");
        assert_eq!(layout["xaxis"]["rangeslider"]["visible"], true);
        assert_eq!(layout["yaxis"]["title"]["text"], "Value");
        assert_eq!(layout["yaxis"]["fixedrange"], false);

        let buttons = layout["xaxis"]["rangeselector"]["buttons"].as_array().unwrap();
        let labels: Vec<&str> = buttons.iter().filter_map(|b| b["label"].as_str()).collect();
        assert_eq!(labels, vec!["day", "week", "month"]);
        assert_eq!(buttons[1]["count"], 7);
        assert_eq!(buttons[1]["step"], "day");
        assert_eq!(buttons[1]["stepmode"], "backward");
        assert_eq!(buttons[3]["step"], "all");
    }

    #[test]
    fn test_layout_is_idempotent() {
        let mut once = Plot::new();
        update_layout(&mut once);

        let mut twice = Plot::new();
        update_layout(&mut twice);
        update_layout(&mut twice);

        assert_eq!(json(&once)["layout"], json(&twice)["layout"]);
    }

    #[test]
    fn test_layout_keeps_caller_settings() {
        let mut fig = Plot::new();
        fig.set_layout(Layout::new().width(1200).title(Title::new("old")));
        update_layout(&mut fig);

        let layout = &json(&fig)["layout"];
        assert_eq!(layout["width"], 1200);
        assert_eq!(layout["title"]["text"], "Time Series");
        assert_eq!(layout["height"], 600);
    }

    #[test]
    fn test_confidence_interval_traces() {
        let ts = series(&[1.0, 2.0, 3.0]);
        let fc = ts.with_forecast(&[5.0; 3], &[[10.0, 1.0]; 3]).unwrap();
        let mut fig = Plot::new();
        add_confidence_interval(&mut fig, &fc).unwrap();

        let data = traces(&fig);
        assert_eq!(data.len(), 3);
        assert_eq!(data[0]["name"], "Forecast");
        assert_eq!(data[0]["line"]["color"], "rgba(31, 119, 180, 0.8)");

        assert_eq!(data[1]["name"], "Upper Bound");
        assert_eq!(data[1]["showlegend"], false);
        assert_eq!(data[1]["line"]["width"], 0.0);
        assert!(data[1].get("fill").is_none());

        assert_eq!(data[2]["name"], "Lower Bound");
        assert_eq!(data[2]["showlegend"], false);
        assert_eq!(data[2]["fill"], "tonexty");
        assert_eq!(data[2]["fillcolor"], "rgba(31, 119, 180, 0.2)");
    }

    #[test]
    fn test_confidence_interval_requires_each_column() {
        for column in [EXPECTED_COLUMN, LOWER_COLUMN, UPPER_COLUMN] {
            let mut fc = series(&[1.0, 2.0])
                .with_forecast(&[5.0; 2], &[[10.0, 1.0]; 2])
                .unwrap();
            fc.drop_column(column);

            let mut fig = Plot::new();
            assert!(add_confidence_interval(&mut fig, &fc).is_err());
            assert!(traces(&fig).is_empty());
        }
    }

    #[test]
    fn test_points_defaults() {
        let ts = series(&[1.0, 2.0]);
        let mut fig = Plot::new();
        add_points(&mut fig, ts.index(), ts.values().unwrap()).unwrap();

        let data = traces(&fig);
        assert_eq!(data[0]["name"], DEFAULT_POINTS_NAME);
        assert_eq!(data[0]["mode"], "markers");
        assert_eq!(data[0]["marker"]["color"], "rgb(255, 0, 0)");
        assert_eq!(data[0]["marker"]["size"], 10);
    }

    #[test]
    fn test_anomalies_all_zero_mask() {
        let ts = series(&[1.0, 2.0, 3.0, 4.0]);
        let mut fig = Plot::new();
        add_anomalies(&mut fig, &ts, &[0; 4], &[5.0; 4], &[[10.0, 1.0]; 4]).unwrap();

        let data = traces(&fig);
        assert_eq!(data.len(), 4);
        assert_eq!(data[0]["mode"], "markers");
        assert!(data[0]["x"].as_array().unwrap().is_empty());
        assert_eq!(data[3]["x"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_anomalies_all_ones_mask() {
        let ts = series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let mut fig = Plot::new();
        add_anomalies(&mut fig, &ts, &[1; 5], &[5.0; 5], &[[10.0, 1.0]; 5]).unwrap();

        let data = traces(&fig);
        assert_eq!(data[0]["x"].as_array().unwrap().len(), 5);
        assert_eq!(data[0]["name"], "Anomalies");
    }

    #[test]
    fn test_anomalies_mask_length_mismatch() {
        let ts = series(&[1.0, 2.0, 3.0]);
        let mut fig = Plot::new();
        let result = add_anomalies(&mut fig, &ts, &[0, 1], &[5.0; 3], &[[10.0, 1.0]; 3]);

        assert!(matches!(
            result,
            Err(ChartError::LengthMismatch { expected: 3, actual: 2, .. })
        ));
        assert!(traces(&fig).is_empty());
    }

    #[test]
    fn test_anomalies_bound_column_order() {
        let ts = series(&[5.0, 12.0, 5.0]);
        let mut fig = Plot::new();
        add_anomalies(&mut fig, &ts, &[0, 1, 0], &[5.0; 3], &[[10.0, 1.0]; 3]).unwrap();

        let data = traces(&fig);
        let upper: Vec<f64> = data[2]["y"].as_array().unwrap().iter().filter_map(Value::as_f64).collect();
        let lower: Vec<f64> = data[3]["y"].as_array().unwrap().iter().filter_map(Value::as_f64).collect();
        assert_eq!(upper, vec![10.0, 10.0, 10.0]);
        assert_eq!(lower, vec![1.0, 1.0, 1.0]);
        assert_eq!(data[0]["y"].as_array().unwrap().len(), 1);
    }
}
