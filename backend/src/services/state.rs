//! Dashboard state shared between concurrent journey lookups.
//!
//! Every refresh draws a token from the [`RequestSequencer`] before it starts
//! fetching. A finished fetch is committed only when its token is newer than
//! the one already applied, so a slow stale response can never overwrite the
//! result of a later lookup.

use async_trait::async_trait;
use log::{debug, warn};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::error::{DashboardResult, RejectedRecord};
use crate::models::Impression;
use crate::routes::journey::{JourneyTable, SortSpec};
use crate::routes::timeline::TimelineData;
use crate::services::normalizer::normalize_batch;
use crate::services::query::JourneyQuery;
use crate::services::table_sort::{SortState, TableRow};
use crate::services::timeline::build_timeline_from_impressions;

/// Asynchronous provider of raw impression records for a journey lookup.
#[async_trait]
pub trait ImpressionSource: Send + Sync {
    async fn fetch(&self, query: &JourneyQuery) -> DashboardResult<Vec<Value>>;
}

/// In-memory source returning the same records for every query.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<Value>,
}

impl StaticSource {
    pub fn new(records: Vec<Value>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl ImpressionSource for StaticSource {
    async fn fetch(&self, _query: &JourneyQuery) -> DashboardResult<Vec<Value>> {
        Ok(self.records.clone())
    }
}

/// Position of a request in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Hands out strictly increasing request tokens.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    last: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_token(&self) -> RequestToken {
        RequestToken(self.last.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// The result of one committed lookup.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub token: RequestToken,
    pub query: JourneyQuery,
    /// Raw object records, in fetch order, for the journey table
    pub rows: Vec<TableRow>,
    pub impressions: Vec<Impression>,
    pub rejected: Vec<RejectedRecord>,
}

#[derive(Debug)]
struct StateInner {
    loaded: Option<LoadedData>,
    sort: SortState,
}

/// Latest applied lookup plus the journey table's sort state.
#[derive(Clone)]
pub struct DashboardState {
    config: Arc<DashboardConfig>,
    sequencer: Arc<RequestSequencer>,
    inner: Arc<RwLock<StateInner>>,
}

impl DashboardState {
    pub fn new(config: DashboardConfig) -> Self {
        let sort = SortState::from_config(&config.table);
        Self {
            config: Arc::new(config),
            sequencer: Arc::new(RequestSequencer::new()),
            inner: Arc::new(RwLock::new(StateInner { loaded: None, sort })),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Reserve a token for a lookup that is about to start.
    pub fn begin(&self) -> RequestToken {
        self.sequencer.next_token()
    }

    /// Apply the records fetched under `token`.
    ///
    /// Returns `false` and leaves the state untouched when a newer lookup has
    /// already been applied. A successful commit resets the table sort to the
    /// configured default.
    pub fn commit(&self, token: RequestToken, query: JourneyQuery, records: Vec<Value>) -> bool {
        let batch = normalize_batch(&records);
        let rows: Vec<TableRow> = records
            .into_iter()
            .filter_map(|record| match record {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();

        let mut inner = self.inner.write();
        if let Some(current) = &inner.loaded {
            if current.token >= token {
                warn!(
                    "Discarding stale response #{} for '{}' (already showing #{})",
                    token.value(),
                    query.key(),
                    current.token.value()
                );
                return false;
            }
        }

        debug!(
            "Applied response #{} for '{}': {} rows, {} impressions",
            token.value(),
            query.key(),
            rows.len(),
            batch.impressions.len()
        );
        inner.loaded = Some(LoadedData {
            token,
            query,
            rows,
            impressions: batch.impressions,
            rejected: batch.rejected,
        });
        inner.sort = SortState::from_config(&self.config.table);
        true
    }

    /// Fetch `query` from `source` and commit the result if it is still the
    /// freshest. Returns whether it was applied.
    pub async fn refresh<S>(&self, source: &S, query: JourneyQuery) -> DashboardResult<bool>
    where
        S: ImpressionSource + ?Sized,
    {
        let token = self.begin();
        let records = source.fetch(&query).await?;
        Ok(self.commit(token, query, records))
    }

    pub fn snapshot(&self) -> Option<LoadedData> {
        self.inner.read().loaded.clone()
    }

    /// Timeline of the applied lookup; empty before the first commit.
    pub fn timeline(&self) -> TimelineData {
        let inner = self.inner.read();
        match &inner.loaded {
            Some(loaded) => {
                let mut data = build_timeline_from_impressions(
                    &loaded.impressions,
                    &self.config.timeline,
                    &self.config.palette,
                );
                data.rejected = loaded.rejected.clone();
                data
            }
            None => TimelineData::empty(),
        }
    }

    /// Header click on the journey table.
    pub fn toggle_sort(&self, column: &str) -> SortSpec {
        let mut inner = self.inner.write();
        inner.sort.toggle(column);
        inner.sort.spec().clone()
    }

    pub fn table(&self) -> JourneyTable {
        let inner = self.inner.read();
        let rows = inner
            .loaded
            .as_ref()
            .map(|loaded| loaded.rows.as_slice())
            .unwrap_or(&[]);
        inner.sort.table(rows)
    }
}
