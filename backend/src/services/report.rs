//! Full dashboard report for a batch of records.

use log::debug;
use serde_json::Value;

use crate::config::DashboardConfig;
use crate::routes::report::DashboardReport;
use crate::services::normalizer::normalize_batch;
use crate::services::step_chart::build_step_chart;
use crate::services::table_sort::{SortState, TableRow};
use crate::services::timeline::build_timeline_from_impressions;

/// Normalize `records` once and derive every view from the result.
///
/// The journey table holds the raw object records sorted by the configured
/// default column.
pub fn build_report(records: &[Value], config: &DashboardConfig) -> DashboardReport {
    let batch = normalize_batch(records);

    let mut timeline =
        build_timeline_from_impressions(&batch.impressions, &config.timeline, &config.palette);
    timeline.rejected = batch.rejected;

    let step_chart = build_step_chart(&batch.impressions);

    let rows: Vec<TableRow> = records
        .iter()
        .filter_map(|record| record.as_object().cloned())
        .collect();
    let table = SortState::from_config(&config.table).table(&rows);

    debug!(
        "Built report: {} timeline rows, {} table rows, {} rejected",
        timeline.rows.len(),
        table.rows.len(),
        timeline.rejected.len()
    );

    DashboardReport {
        timeline,
        step_chart,
        table,
    }
}
