//! Shared time axis ticks.

use crate::models::{TimeWindow, Timestamp};

/// `n` instants evenly spaced over the window, both ends included.
///
/// `tick_i = min + span * i / (n - 1)`. One tick yields the window start and
/// zero ticks yield nothing.
pub fn tick_timestamps(window: &TimeWindow, n: usize) -> Vec<Timestamp> {
    match n {
        0 => vec![],
        1 => vec![window.min_time],
        _ => {
            let min = window.min_time.millis() as i128;
            let span = window.span_millis() as i128;
            let steps = (n - 1) as i128;
            (0..n)
                .map(|i| {
                    let offset = span * i as i128 / steps;
                    Timestamp::from_millis((min + offset) as i64).unwrap_or(window.max_time)
                })
                .collect()
        }
    }
}

/// Tick labels truncated to `YYYY-MM-DD`. Dates may repeat on short windows.
pub fn axis_ticks(window: &TimeWindow, n: usize) -> Vec<String> {
    tick_timestamps(window, n)
        .iter()
        .map(Timestamp::date_label)
        .collect()
}
