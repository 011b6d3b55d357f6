//! Flat, row-aligned forecast table and the per-city views the dashboard
//! reads from it.

use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    pub location: String,
    #[serde(rename = "startTime")]
    pub start_time: NaiveDateTime,
    #[serde(rename = "endTime")]
    pub end_time: NaiveDateTime,
    #[serde(rename = "PoP(%)")]
    pub pop: Option<f64>,
    #[serde(rename = "Wx")]
    pub wx: String,
    #[serde(rename = "CI")]
    pub ci: String,
    #[serde(rename = "MinT(°C)")]
    pub min_t: Option<f64>,
    #[serde(rename = "MaxT(°C)")]
    pub max_t: Option<f64>,
}

/// Rows sorted by `(location, start_time)`. Built once per fetch and never
/// mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ForecastTable {
    rows: Vec<ForecastRow>,
}

impl ForecastTable {
    pub const COLUMNS: [&'static str; 8] = [
        "location",
        "startTime",
        "endTime",
        "PoP(%)",
        "Wx",
        "CI",
        "MinT(°C)",
        "MaxT(°C)",
    ];

    /// Callers are expected to hand in rows already in table order.
    pub(crate) fn from_sorted_rows(rows: Vec<ForecastRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForecastRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct location names in order of first appearance.
    pub fn locations(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.location.as_str()) {
                seen.push(&row.location);
            }
        }
        seen
    }

    pub fn for_location<'a>(&'a self, name: &str) -> LocationForecast<'a> {
        LocationForecast {
            rows: self.rows.iter().filter(|r| r.location == name).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ForecastTable {
    type Item = &'a ForecastRow;
    type IntoIter = std::slice::Iter<'a, ForecastRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Rows of a single location, in table order.
#[derive(Debug, Clone)]
pub struct LocationForecast<'a> {
    rows: Vec<&'a ForecastRow>,
}

impl<'a> LocationForecast<'a> {
    pub fn rows(&self) -> &[&'a ForecastRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Start of the first window and end of the last one.
    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.rows.first()?;
        let last = self.rows.last()?;
        Some((first.start_time, last.end_time))
    }

    pub fn temperature_series(&self) -> Vec<(NaiveDateTime, Option<f64>, Option<f64>)> {
        self.rows.iter().map(|r| (r.start_time, r.min_t, r.max_t)).collect()
    }

    pub fn pop_series(&self) -> Vec<(NaiveDateTime, Option<f64>)> {
        self.rows.iter().map(|r| (r.start_time, r.pop)).collect()
    }
}
