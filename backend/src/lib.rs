//! # Impression Timeline
//!
//! Data engine behind the feature-flag impressions dashboard.
//!
//! The crate turns raw impression exports (JSON records of which treatment a user
//! was shown for a split, and when) into the data contracts consumed by the
//! dashboard's rendering layer: per-flag treatment timelines, shared axis ticks,
//! sortable tables, daily volume series and environment summaries.
//!
//! ## Architecture
//!
//! - [`models`]: core domain types ([`models::Impression`], [`models::Timestamp`],
//!   [`models::TimeWindow`])
//! - [`routes`]: view payloads handed to the rendering collaborator
//! - [`services`]: the computations (normalization, series building,
//!   segmentation, palette, ranking, axis ticks, table sorting, aggregation)
//! - [`api`]: flat re-exports of every payload type
//! - [`config`]: TOML configuration with environment overrides
//!
//! Everything in [`services`] is a deterministic function of its input. The only
//! shared state is [`services::state::DashboardState`], which guards the latest
//! applied load against stale responses.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

pub use config::DashboardConfig;
pub use error::{DashboardError, DashboardResult};
