//! Collapses the 3-hour forecast series into one sample per future day.

use chrono::{NaiveDate, Timelike};

use crate::constants::{PEAK_WINDOW_END_HOUR, PEAK_WINDOW_START_HOUR};
use crate::models::{DailyForecastEntry, ForecastSample};

fn in_peak_window(sample: &ForecastSample) -> bool {
    (PEAK_WINDOW_START_HOUR..PEAK_WINDOW_END_HOUR).contains(&sample.local_time().hour())
}

/// Picks, for every day after `reference_day`, the earliest sample whose local
/// hour falls in the afternoon peak window.
///
/// Days with no sample in the window yield no entry. The result is ascending
/// by day with no day repeated.
pub fn reduce_to_daily(samples: &[ForecastSample], reference_day: NaiveDate) -> Vec<DailyForecastEntry> {
    let mut ordered: Vec<&ForecastSample> = samples.iter().collect();
    ordered.sort_by_key(|sample| sample.observed_at_ms);

    let mut daily: Vec<DailyForecastEntry> = Vec::new();
    for sample in ordered {
        let day = sample.local_day();
        if day <= reference_day || !in_peak_window(sample) {
            continue;
        }
        if daily.last().is_some_and(|entry| entry.day >= day) {
            continue;
        }
        daily.push(DailyForecastEntry {
            day,
            sample: sample.clone(),
        });
    }
    daily
}
