//! Public API surface of the impression timeline engine.
//!
//! This file consolidates the DTO types produced by the services.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::error::{RecordError, RejectedRecord};
pub use crate::models::{Impression, TimeWindow, Timestamp};
pub use crate::routes::daily::DailyChartData;
pub use crate::routes::daily::DailyPoint;
pub use crate::routes::daily::DailySeries;
pub use crate::routes::journey::JourneyTable;
pub use crate::routes::journey::SortDirection;
pub use crate::routes::journey::SortSpec;
pub use crate::routes::report::DashboardReport;
pub use crate::routes::step_chart::StepChartData;
pub use crate::routes::step_chart::StepPoint;
pub use crate::routes::step_chart::StepSeries;
pub use crate::routes::summary::ControlCount;
pub use crate::routes::summary::EnvironmentSummary;
pub use crate::routes::summary::SummarySlice;
pub use crate::routes::timeline::ColorSpec;
pub use crate::routes::timeline::FlagTimeline;
pub use crate::routes::timeline::LegendEntry;
pub use crate::routes::timeline::Pattern;
pub use crate::routes::timeline::Segment;
pub use crate::routes::timeline::TimelineData;
pub use crate::services::query::JourneyQuery;
pub use crate::services::segmentation::ChangePoint;
pub use crate::services::table_sort::TableRow;
