//! Text rendering of one city's forecast: header, charts and detail table.
//!
//! Every function returns a `String` so the layout can be tested without a
//! terminal.

use chrono::NaiveDateTime;
use tw_weather_core::LocationForecast;

const BAR_WIDTH: usize = 30;
const MISSING: &str = "-";

pub fn header(dataset_description: Option<&str>) -> String {
    let mut out = String::from(
        "Taiwan 36-hour weather dashboard\n\
         Source: Central Weather Administration open data, F-C0032-001\n",
    );
    if let Some(desc) = dataset_description.filter(|d| !d.is_empty()) {
        out.push_str(&format!("Dataset: {desc}\n"));
    }
    out
}

pub fn summary(city: &str, view: &LocationForecast<'_>) -> String {
    let mut out = format!("{city} 36-hour forecast\n");
    if let Some((from, to)) = view.time_range() {
        out.push_str(&format!("Time range: {} ~ {}\n", minute(from), minute(to)));
    }
    out.push_str(
        "Wx = weather phenomenon, CI = comfort index. Charts show temperature and chance of rain.\n",
    );
    out
}

/// MinT and MaxT per window, scaled between the coldest and warmest value shown.
pub fn temperature_chart(view: &LocationForecast<'_>) -> String {
    let series = view.temperature_series();
    let values = series.iter().flat_map(|(_, lo, hi)| [*lo, *hi]).flatten();
    let (floor, ceil) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    let mut out = String::from("Temperature (°C)\n");
    for (start, min_t, max_t) in &series {
        out.push_str(&format!(
            "{}  min {} {:>5}  max {} {:>5}\n",
            short(*start),
            bar(scaled(*min_t, floor, ceil)),
            number(*min_t),
            bar(scaled(*max_t, floor, ceil)),
            number(*max_t),
        ));
    }
    out
}

/// PoP per window, bars scaled to 100 %.
pub fn pop_chart(view: &LocationForecast<'_>) -> String {
    let mut out = String::from("Chance of rain PoP (%)\n");
    for (start, pop) in view.pop_series() {
        let fraction = pop.map(|p| (p / 100.0).clamp(0.0, 1.0));
        out.push_str(&format!("{}  {} {:>5}\n", short(start), bar(fraction), number(pop)));
    }
    out
}

pub const DETAIL_COLUMNS: [&str; 7] = [
    "startTime",
    "endTime",
    "Wx",
    "CI",
    "MinT(°C)",
    "MaxT(°C)",
    "PoP(%)",
];

pub fn detail_table(view: &LocationForecast<'_>) -> String {
    let body: Vec<[String; 7]> = view
        .rows()
        .iter()
        .map(|r| {
            [
                minute(r.start_time),
                minute(r.end_time),
                r.wx.clone(),
                r.ci.clone(),
                number(r.min_t),
                number(r.max_t),
                number(r.pop),
            ]
        })
        .collect();

    let mut widths = DETAIL_COLUMNS.map(display_width);
    for cells in &body {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(display_width(cell));
        }
    }

    let mut out = String::new();
    push_line(&mut out, &DETAIL_COLUMNS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for cells in &body {
        push_line(&mut out, cells, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{cell}{}", " ".repeat(w - display_width(cell))))
        .collect();
    out.push_str(line.join(" | ").trim_end());
    out.push('\n');
}

fn scaled(value: Option<f64>, floor: f64, ceil: f64) -> Option<f64> {
    let v = value?;
    if ceil > floor {
        Some((v - floor) / (ceil - floor))
    } else {
        Some(1.0)
    }
}

fn bar(fraction: Option<f64>) -> String {
    let filled = fraction
        .map(|f| (f * BAR_WIDTH as f64).round() as usize)
        .unwrap_or(0)
        .clamp(0, BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "·".repeat(BAR_WIDTH - filled))
}

fn number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Some(v) => format!("{v:.1}"),
        None => MISSING.to_string(),
    }
}

fn minute(t: NaiveDateTime) -> String {
    t.format("%Y-%m-%d %H:%M").to_string()
}

fn short(t: NaiveDateTime) -> String {
    t.format("%m-%d %H:%M").to_string()
}

/// Terminal columns taken by `s`; CJK and full-width forms count as two.
fn display_width(s: &str) -> usize {
    s.chars()
        .map(|c| match c as u32 {
            0x1100..=0x115F
            | 0x2E80..=0x303E
            | 0x3041..=0x33FF
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xA000..=0xA4CF
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6 => 2,
            _ => 1,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tw_weather_core::{ForecastResponse, ForecastTable, to_dataframe};

    fn slot(start: &str, end: &str, value: &str) -> serde_json::Value {
        serde_json::json!({ "startTime": start, "endTime": end, "parameter": { "parameterName": value } })
    }

    fn table() -> ForecastTable {
        let windows = [
            ("2024-06-13 18:00:00", "2024-06-14 06:00:00"),
            ("2024-06-14 06:00:00", "2024-06-14 18:00:00"),
        ];
        let element = |name: &str, values: [&str; 2]| {
            serde_json::json!({
                "elementName": name,
                "time": windows
                    .iter()
                    .zip(values)
                    .map(|((s, e), v)| slot(s, e, v))
                    .collect::<Vec<_>>()
            })
        };

        let resp: ForecastResponse = serde_json::from_value(serde_json::json!({
            "records": {
                "location": [{
                    "locationName": "臺北市",
                    "weatherElement": [
                        element("Wx", ["多雲時晴", "晴時多雲"]),
                        element("PoP", ["50", "NA"]),
                        element("CI", ["舒適至悶熱", "悶熱"]),
                        element("MinT", ["24", "26"]),
                        element("MaxT", ["30", "34"]),
                    ]
                }]
            }
        }))
        .expect("fixture matches schema");

        to_dataframe(&resp).expect("valid fixture")
    }

    #[test]
    fn summary_shows_city_and_time_range() {
        let table = table();
        let out = summary("臺北市", &table.for_location("臺北市"));

        assert!(out.starts_with("臺北市 36-hour forecast\n"));
        assert!(out.contains("Time range: 2024-06-13 18:00 ~ 2024-06-14 18:00"));
    }

    #[test]
    fn header_includes_dataset_description_when_present() {
        assert!(header(Some("三十六小時天氣預報")).contains("Dataset: 三十六小時天氣預報"));
        assert!(!header(None).contains("Dataset:"));
        assert!(header(None).contains("F-C0032-001"));
    }

    #[test]
    fn rendered_blocks_are_whole_lines() {
        let table = table();
        let view = table.for_location("臺北市");

        assert_eq!(
            header(Some("三十六小時天氣預報")),
            "Taiwan 36-hour weather dashboard\n\
             Source: Central Weather Administration open data, F-C0032-001\n\
             Dataset: 三十六小時天氣預報\n"
        );
        for block in [summary("臺北市", &view), temperature_chart(&view), pop_chart(&view), detail_table(&view)] {
            assert!(block.ends_with('\n'), "{block:?}");
            assert!(!block.contains("\n\n"), "{block:?}");
        }
    }

    #[test]
    fn pop_chart_scales_to_hundred_and_marks_missing() {
        let table = table();
        let out = pop_chart(&table.for_location("臺北市"));
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].matches('█').count(), BAR_WIDTH / 2);
        assert!(lines[1].ends_with("   50"));
        assert_eq!(lines[2].matches('█').count(), 0);
        assert!(lines[2].ends_with("    -"));
    }

    #[test]
    fn temperature_chart_spans_coldest_to_warmest() {
        let table = table();
        let out = temperature_chart(&table.for_location("臺北市"));
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "Temperature (°C)");
        // 24 is the floor, 34 the ceiling.
        assert!(lines[1].contains(&format!("min {} ", "·".repeat(BAR_WIDTH))));
        assert!(lines[2].contains(&format!("max {} ", "█".repeat(BAR_WIDTH))));
    }

    #[test]
    fn detail_table_has_contract_columns_and_aligned_rows() {
        let table = table();
        let out = detail_table(&table.for_location("臺北市"));
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("startTime"));
        assert!(lines[0].ends_with("PoP(%)"));
        assert!(lines[2].contains("多雲時晴 | 舒適至悶熱"));

        let pipe_cols = |line: &str| -> Vec<usize> {
            let mut col = 0;
            let mut at = Vec::new();
            for c in line.chars() {
                if c == '|' {
                    at.push(col);
                }
                col += display_width(&c.to_string());
            }
            at
        };
        assert_eq!(pipe_cols(lines[0]), pipe_cols(lines[2]));
        assert_eq!(pipe_cols(lines[2]), pipe_cols(lines[3]));
    }

    #[test]
    fn numbers_render_compactly() {
        assert_eq!(number(Some(30.0)), "30");
        assert_eq!(number(Some(-2.5)), "-2.5");
        assert_eq!(number(None), "-");
    }

    #[test]
    fn cjk_counts_double_width() {
        assert_eq!(display_width("臺北市"), 6);
        assert_eq!(display_width("PoP(%)"), 6);
    }
}
