//! Reshapes the nested per-location, per-element response into a flat table.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::{
    error::{ForecastError, Result},
    model::{ElementName, ForecastResponse, Location, TimeSlot},
    table::{ForecastRow, ForecastTable},
};

/// Upstream timestamp layout, local Taiwan time without an offset.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Build the forecast table from a response.
///
/// `PoP` provides the time axis for each location. Every other element must
/// have at least as many slots, and slot `i` of each must cover the same
/// window as `PoP`'s slot `i`. Unparseable `PoP`/`MinT`/`MaxT` values become
/// `None`; unparseable timestamps fail the whole call.
pub fn to_dataframe(response: &ForecastResponse) -> Result<ForecastTable> {
    let mut rows = Vec::new();

    for location in &response.records.location {
        location_rows(location, &mut rows)?;
    }

    // Stable: ties keep emission order.
    rows.sort_by(|a, b| {
        a.location
            .cmp(&b.location)
            .then_with(|| a.start_time.cmp(&b.start_time))
    });

    tracing::debug!(
        locations = response.records.location.len(),
        rows = rows.len(),
        "built forecast table"
    );

    Ok(ForecastTable::from_sorted_rows(rows))
}

fn location_rows(location: &Location, rows: &mut Vec<ForecastRow>) -> Result<()> {
    // Later duplicates overwrite earlier ones.
    let elements: HashMap<&str, &[TimeSlot]> = location
        .weather_element
        .iter()
        .map(|el| (el.element_name.as_str(), el.time.as_slice()))
        .collect();

    let pop = series(&elements, &location.name, ElementName::PoP)?;
    let wx = series(&elements, &location.name, ElementName::Wx)?;
    let ci = series(&elements, &location.name, ElementName::CI)?;
    let min_t = series(&elements, &location.name, ElementName::MinT)?;
    let max_t = series(&elements, &location.name, ElementName::MaxT)?;

    let n = pop.len();
    for (name, slots) in [
        (ElementName::Wx, wx),
        (ElementName::CI, ci),
        (ElementName::MinT, min_t),
        (ElementName::MaxT, max_t),
    ] {
        if slots.len() < n {
            return Err(ForecastError::Schema(format!(
                "location '{}': element '{}' has {} time slots, PoP has {}",
                location.name,
                name,
                slots.len(),
                n
            )));
        }
    }

    for (i, axis) in pop.iter().enumerate() {
        let start_time = parse_timestamp(&axis.start_time)?;
        let end_time = parse_timestamp(&axis.end_time)?;

        for (name, slots) in [
            (ElementName::Wx, wx),
            (ElementName::CI, ci),
            (ElementName::MinT, min_t),
            (ElementName::MaxT, max_t),
        ] {
            check_aligned(&location.name, name, i, &slots[i], start_time, end_time)?;
        }

        rows.push(ForecastRow {
            location: location.name.clone(),
            start_time,
            end_time,
            pop: coerce_number(&location.name, ElementName::PoP, axis.value()),
            wx: wx[i].value().to_string(),
            ci: ci[i].value().to_string(),
            min_t: coerce_number(&location.name, ElementName::MinT, min_t[i].value()),
            max_t: coerce_number(&location.name, ElementName::MaxT, max_t[i].value()),
        });
    }

    Ok(())
}

fn series<'a>(
    elements: &HashMap<&str, &'a [TimeSlot]>,
    location: &str,
    name: ElementName,
) -> Result<&'a [TimeSlot]> {
    elements.get(name.as_str()).copied().ok_or_else(|| {
        ForecastError::Schema(format!("location '{location}' has no '{name}' element"))
    })
}

fn check_aligned(
    location: &str,
    name: ElementName,
    index: usize,
    slot: &TimeSlot,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
) -> Result<()> {
    let slot_start = parse_timestamp(&slot.start_time)?;
    let slot_end = parse_timestamp(&slot.end_time)?;

    if slot_start != start_time || slot_end != end_time {
        return Err(ForecastError::Schema(format!(
            "location '{location}': element '{name}' slot {index} covers {slot_start} ~ {slot_end}, \
             PoP covers {start_time} ~ {end_time}"
        )));
    }

    Ok(())
}

/// Strict timestamp parsing; no fallback layout is tried.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIME_FORMAT)
        .map_err(|e| ForecastError::Parse(format!("'{raw}' is not a '{TIME_FORMAT}' timestamp: {e}")))
}

/// Lenient numeric coercion: anything that is not a finite number is missing.
pub fn to_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn coerce_number(location: &str, name: ElementName, raw: &str) -> Option<f64> {
    let value = to_number(raw);
    if value.is_none() {
        tracing::warn!(location, element = %name, raw, "non-numeric value, treating as missing");
    }
    value
}
