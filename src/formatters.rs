use crate::history::HistoryEntry;
use crate::models::{Conditions, SearchOutcome, UnitMode};

/// Formats one set of conditions as an indented card body
fn format_conditions(conditions: &Conditions, units: UnitMode, icon_base: &str) -> String {
    format!(
        "  Temperature: {}{}\n  Wind: {} {}\n  Humidity: {}%\n  Icon: {}\n",
        conditions.display_temperature(),
        units.temperature_suffix(),
        conditions.display_wind_speed(),
        units.wind_suffix(),
        conditions.humidity_percent,
        conditions.icon_url(icon_base)
    )
}

/// Formats a search result as a current-weather card followed by daily cards
pub fn format_outcome(outcome: &SearchOutcome, units: UnitMode, icon_base: &str) -> String {
    let observed = outcome.current.local_time();
    let mut output = format!(
        "{} ({})\n",
        outcome.display_name,
        observed.format("%-m/%-d/%Y")
    );
    output.push_str(&format_conditions(&outcome.current, units, icon_base));

    if outcome.daily.is_empty() {
        output.push_str("\nNo daily forecast available.\n");
        return output;
    }

    output.push_str(&format!("\n{}-Day Forecast:\n\n", outcome.daily.len()));
    for entry in &outcome.daily {
        output.push_str(&format!("{}:\n", entry.day.format("%a %-m/%-d/%Y")));
        output.push_str(&format_conditions(&entry.sample, units, icon_base));
        output.push('\n');
    }
    output
}

/// Formats the saved city list
pub fn format_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No saved cities.".to_string();
    }

    let mut output = String::from("Saved cities:\n");
    for (i, entry) in entries.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, entry.display_name));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, DailyForecastEntry};
    use chrono::NaiveDate;

    fn conditions(temperature: f64) -> Conditions {
        Conditions {
            observed_at_ms: 1_700_000_000_000,
            utc_offset_seconds: 0,
            icon_code: "01d".to_string(),
            temperature,
            wind_speed: 5.1,
            humidity_percent: 40,
        }
    }

    #[test]
    fn test_format_outcome() {
        let outcome = SearchOutcome {
            display_name: "Tokyo".to_string(),
            coordinates: Coordinates::new(35.68, 139.69),
            current: conditions(65.4),
            daily: vec![DailyForecastEntry {
                day: NaiveDate::from_ymd_opt(2023, 11, 15).unwrap(),
                sample: conditions(70.6),
            }],
        };

        let text = format_outcome(&outcome, UnitMode::Imperial, "https://icons/");
        assert!(text.starts_with("Tokyo (11/14/2023)"));
        assert!(text.contains("Temperature: 65\u{00b0}F"));
        assert!(text.contains("Wind: 5 mph"));
        assert!(text.contains("Humidity: 40%"));
        assert!(text.contains("https://icons/01d.png"));
        assert!(text.contains("1-Day Forecast"));
        assert!(text.contains("Temperature: 71\u{00b0}F"));
    }

    #[test]
    fn test_format_outcome_metric_without_daily() {
        let outcome = SearchOutcome {
            display_name: "Oslo".to_string(),
            coordinates: Coordinates::new(59.91, 10.75),
            current: conditions(3.2),
            daily: Vec::new(),
        };

        let text = format_outcome(&outcome, UnitMode::Metric, "https://icons/");
        assert!(text.contains("3\u{00b0}C"));
        assert!(text.contains("m/s"));
        assert!(text.contains("No daily forecast available."));
    }

    #[test]
    fn test_format_history() {
        assert_eq!(format_history(&[]), "No saved cities.");

        let entries = vec![
            HistoryEntry::new("Tokyo").unwrap(),
            HistoryEntry::new("Paris").unwrap(),
        ];
        let text = format_history(&entries);
        assert!(text.contains("1. Tokyo"));
        assert!(text.contains("2. Paris"));
    }
}
