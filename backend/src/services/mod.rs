//! Service layer: the impression timeline computations.
//!
//! Raw records enter through the normalizer; every other service works on
//! normalized impressions or on the raw rows of the journey table. All of
//! them are pure functions of their input except `state`, which holds the
//! latest applied lookup.

pub mod activity;
pub mod axis;
pub mod daily;
pub mod normalizer;
pub mod palette;
pub mod query;
pub mod report;
pub mod segmentation;
pub mod series;
pub mod state;
pub mod step_chart;
pub mod summary;
pub mod table_sort;
pub mod timeline;

pub use daily::build_daily_chart;
pub use normalizer::{normalize_batch, parse_records};
pub use report::build_report;
pub use state::{DashboardState, ImpressionSource, StaticSource};
pub use step_chart::build_step_chart;
pub use summary::{build_environment_summary, normalize_control_counts};
pub use timeline::build_timeline;
