//! One rendering pass of the treatment timeline.
//!
//! Normalizes raw records, builds per-flag series, ranks them by activity,
//! assigns the palette in render order and segments every series against the
//! window shared by all of them.

use log::debug;
use serde_json::Value;

use crate::config::{PaletteConfig, TimelineConfig};
use crate::models::Impression;
use crate::routes::timeline::{FlagTimeline, TimelineData};
use crate::services::activity::rank_by_activity;
use crate::services::axis::axis_ticks;
use crate::services::normalizer::normalize_batch;
use crate::services::palette::PaletteAssignment;
use crate::services::segmentation::segment_series;
use crate::services::series::SeriesSet;

/// Build the timeline dataset from raw export records.
pub fn build_timeline(
    records: &[Value],
    timeline: &TimelineConfig,
    palette: &PaletteConfig,
) -> TimelineData {
    let batch = normalize_batch(records);
    let mut data = build_timeline_from_impressions(&batch.impressions, timeline, palette);
    data.rejected = batch.rejected;
    data
}

/// Build the timeline dataset from already normalized impressions.
pub fn build_timeline_from_impressions(
    impressions: &[Impression],
    timeline: &TimelineConfig,
    palette: &PaletteConfig,
) -> TimelineData {
    let set = SeriesSet::build(impressions);
    let window = match set.window() {
        Some(window) => window,
        None => return TimelineData::empty(),
    };

    let ranked = rank_by_activity(&set);

    // Treatments are discovered in the order rows are drawn.
    let assignment = PaletteAssignment::build(
        ranked.iter().flat_map(|r| r.series.treatments()),
        palette,
    );

    let rows: Vec<FlagTimeline> = ranked
        .iter()
        .map(|r| FlagTimeline {
            flag: r.series.flag().to_string(),
            transitions: r.transitions,
            impression_count: r.series.len(),
            segments: segment_series(r.series, &window, &assignment, timeline.change_point),
        })
        .collect();

    debug!(
        "Built timeline: {} flags, {} impressions, {} treatments ({} overflow), window {}..{}",
        rows.len(),
        set.impression_count(),
        assignment.len(),
        assignment.overflow_count(),
        window.min_time.date_label(),
        window.max_time.date_label()
    );

    TimelineData {
        window: Some(window),
        ticks: axis_ticks(&window, timeline.tick_count),
        rows,
        legend: assignment.legend(),
        rejected: vec![],
    }
}
