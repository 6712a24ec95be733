//! Tabular time series input for the chart helpers

use crate::errors::{ChartError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Observed value column every series must carry
pub const VALUE_COLUMN: &str = "value_0";
/// Forecast expected-value column
pub const EXPECTED_COLUMN: &str = "expected";
/// Forecast upper-bound column
pub const UPPER_COLUMN: &str = "upper";
/// Forecast lower-bound column
pub const LOWER_COLUMN: &str = "lower";

/// Time-indexed table of named `f64` columns
///
/// Columns keep insertion order. The index is not required to be sorted or
/// unique; the backends draw points in the order given. Every column has
/// the index's length, including frames built by deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeFrame")]
pub struct TimeFrame {
    index: Vec<DateTime<Utc>>,
    columns: Vec<(String, Vec<f64>)>,
}

/// Unchecked wire form of [`TimeFrame`]
#[derive(Deserialize)]
struct RawTimeFrame {
    index: Vec<DateTime<Utc>>,
    columns: Vec<(String, Vec<f64>)>,
}

impl TryFrom<RawTimeFrame> for TimeFrame {
    type Error = ChartError;

    fn try_from(raw: RawTimeFrame) -> Result<Self> {
        let mut frame = TimeFrame::new(raw.index);
        for (name, values) in raw.columns {
            frame.insert_column(&name, values)?;
        }
        Ok(frame)
    }
}

impl TimeFrame {
    /// Create an empty table over the given index
    pub fn new(index: Vec<DateTime<Utc>>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// Create a series with its `value_0` column
    pub fn from_values(index: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        Self::new(index).with_column(VALUE_COLUMN, values)
    }

    /// Builder form of [`TimeFrame::insert_column`]
    pub fn with_column(mut self, name: &str, values: Vec<f64>) -> Result<Self> {
        self.insert_column(name, values)?;
        Ok(self)
    }

    /// Add or replace a column; its length must match the index
    pub fn insert_column(&mut self, name: &str, values: Vec<f64>) -> Result<()> {
        ChartError::check_len("column/index", self.index.len(), values.len())?;

        match self.columns.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((name.to_string(), values)),
        }
        Ok(())
    }

    /// Remove a column, returning its values if it existed
    pub fn drop_column(&mut self, name: &str) -> Option<Vec<f64>> {
        let pos = self.columns.iter().position(|(n, _)| n == name)?;
        Some(self.columns.remove(pos).1)
    }

    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
            .ok_or_else(|| ChartError::missing_column(name))
    }

    /// The `value_0` column
    pub fn values(&self) -> Result<&[f64]> {
        self.column(VALUE_COLUMN)
    }

    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Keep only the rows whose mask value is `1`
    pub fn filter_mask(&self, mask: &[u8]) -> Result<TimeFrame> {
        ChartError::check_len("anomaly mask/series", self.len(), mask.len())?;

        let keep: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter(|&(_, &flag)| flag == 1)
            .map(|(i, _)| i)
            .collect();

        Ok(TimeFrame {
            index: keep.iter().map(|&i| self.index[i]).collect(),
            columns: self
                .columns
                .iter()
                .map(|(name, values)| (name.clone(), keep.iter().map(|&i| values[i]).collect()))
                .collect(),
        })
    }

    /// Working copy augmented with `expected`, `upper` and `lower` columns
    ///
    /// `bounds[i][0]` is read as the upper bound and `bounds[i][1]` as the
    /// lower bound. The order is a convention of the forecast producer and is
    /// not checked: a producer emitting `[lower, upper]` gets a band whose
    /// edges are swapped, which still draws but inverts the band's meaning.
    pub fn with_forecast(&self, expected: &[f64], bounds: &[[f64; 2]]) -> Result<TimeFrame> {
        ChartError::check_len("expected values/series", self.len(), expected.len())?;
        ChartError::check_len("expected bounds/series", self.len(), bounds.len())?;

        self.clone()
            .with_column(EXPECTED_COLUMN, expected.to_vec())?
            .with_column(UPPER_COLUMN, bounds.iter().map(|b| b[0]).collect())?
            .with_column(LOWER_COLUMN, bounds.iter().map(|b| b[1]).collect())
    }

    /// Fetch the three forecast columns at once
    pub fn forecast_columns(&self) -> Result<ForecastColumns<'_>> {
        Ok(ForecastColumns {
            expected: self.column(EXPECTED_COLUMN)?,
            lower: self.column(LOWER_COLUMN)?,
            upper: self.column(UPPER_COLUMN)?,
        })
    }
}

/// Borrowed forecast columns of a [`TimeFrame`]
#[derive(Debug, Clone, Copy)]
pub struct ForecastColumns<'a> {
    pub expected: &'a [f64],
    pub lower: &'a [f64],
    pub upper: &'a [f64],
}

/// Synthetic series together with a forecast and detector output
#[derive(Debug, Clone)]
pub struct SampleData {
    pub series: TimeFrame,
    pub is_anomaly: Vec<u8>,
    pub expected: Vec<f64>,
    /// `[upper, lower]` per row
    pub bounds: Vec<[f64; 2]>,
}

/// Deterministic sample series for demos and tests
///
/// The expected value follows a slow seasonal curve; roughly one point in
/// seventeen is pushed outside the band and flagged in the mask.
pub fn sample_series(count: usize, start: DateTime<Utc>, step: Duration) -> SampleData {
    let mut index = Vec::with_capacity(count);
    let mut values = Vec::with_capacity(count);
    let mut expected = Vec::with_capacity(count);
    let mut bounds = Vec::with_capacity(count);
    let mut is_anomaly = Vec::with_capacity(count);

    let mut timestamp = start;
    for i in 0..count {
        let phase = i as f64 / 24.0 * std::f64::consts::TAU;
        let center = 100.0 + 10.0 * phase.sin();
        let width = 4.0 + rand_like(i * 3);
        let noise = (rand_like(i) - 0.5) * width;

        let anomalous = i % 17 == 16;
        let value = if anomalous {
            center + width * (2.0 + rand_like(i * 5))
        } else {
            center + noise
        };

        index.push(timestamp);
        values.push(value);
        expected.push(center);
        bounds.push([center + width, center - width]);
        is_anomaly.push(u8::from(anomalous));

        timestamp += step;
    }

    SampleData {
        series: TimeFrame {
            index,
            columns: vec![(VALUE_COLUMN.to_string(), values)],
        },
        is_anomaly,
        expected,
        bounds,
    }
}

/// Simple deterministic pseudo-random function for sample data
fn rand_like(seed: usize) -> f64 {
    let x = (seed.wrapping_mul(1103515245).wrapping_add(12345)) & 0x7fff_ffff;
    (x as f64) / (0x7fff_ffff as f64)
}
