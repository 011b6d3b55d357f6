//! Typed view of the F-C0032-001 response body.
//!
//! Only the fields the dashboard needs are modelled; anything else in the
//! payload is ignored by serde.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    /// The API reports `"true"`/`"false"` as a string.
    #[serde(default)]
    pub success: Option<String>,
    pub records: Records,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Records {
    #[serde(rename = "datasetDescription", default)]
    pub dataset_description: Option<String>,
    pub location: Vec<Location>,
}

/// One county or city.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "locationName")]
    pub name: String,
    #[serde(rename = "weatherElement")]
    pub weather_element: Vec<WeatherElement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherElement {
    #[serde(rename = "elementName")]
    pub element_name: String,
    pub time: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
    pub parameter: Parameter,
}

impl TimeSlot {
    pub fn value(&self) -> &str {
        &self.parameter.parameter_name
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(rename = "parameterName")]
    pub parameter_name: String,
    #[serde(rename = "parameterValue", default)]
    pub parameter_value: Option<String>,
    #[serde(rename = "parameterUnit", default)]
    pub parameter_unit: Option<String>,
}

/// The five elements every location must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementName {
    PoP,
    Wx,
    CI,
    MinT,
    MaxT,
}

impl ElementName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementName::PoP => "PoP",
            ElementName::Wx => "Wx",
            ElementName::CI => "CI",
            ElementName::MinT => "MinT",
            ElementName::MaxT => "MaxT",
        }
    }

    #[cfg(test)]
    const fn all() -> &'static [ElementName] {
        &[
            ElementName::PoP,
            ElementName::Wx,
            ElementName::CI,
            ElementName::MinT,
            ElementName::MaxT,
        ]
    }
}

impl std::fmt::Display for ElementName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
