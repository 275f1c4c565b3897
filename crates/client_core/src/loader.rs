//! Read-only history and usage-counter loaders.

use std::fmt;

use shared::protocol::{HistoryEntry, StatsSnapshot};
use tracing::warn;

use crate::{render::format_percent, GovanshApi};

pub const NO_PREDICTIONS: &str = "No predictions yet.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub breed: String,
    pub prediction_id: String,
    pub confidence: String,
    pub timestamp: String,
}

impl From<&HistoryEntry> for HistoryRow {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            breed: entry.breed.clone(),
            prediction_id: entry
                .prediction_id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            confidence: format_percent(entry.confidence),
            timestamp: entry.timestamp.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryView {
    Empty,
    Rows(Vec<HistoryRow>),
}

impl HistoryView {
    pub fn from_entries(entries: &[HistoryEntry]) -> Self {
        if entries.is_empty() {
            Self::Empty
        } else {
            Self::Rows(entries.iter().map(HistoryRow::from).collect())
        }
    }

    pub fn rows(&self) -> &[HistoryRow] {
        match self {
            Self::Empty => &[],
            Self::Rows(rows) => rows,
        }
    }
}

impl fmt::Display for HistoryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => writeln!(f, "{NO_PREDICTIONS}"),
            Self::Rows(rows) => {
                for row in rows {
                    write!(f, "{}", row.breed)?;
                    if !row.prediction_id.is_empty() {
                        write!(f, " [{}]", row.prediction_id)?;
                    }
                    writeln!(f, "  {} • {}", row.confidence, row.timestamp)?;
                }
                Ok(())
            }
        }
    }
}

/// Failures collapse into the empty view, same as an empty history.
pub async fn load_history(api: &dyn GovanshApi) -> HistoryView {
    match api.history().await {
        Ok(entries) => HistoryView::from_entries(&entries),
        Err(err) => {
            warn!(error = %err, "failed to load prediction history");
            HistoryView::Empty
        }
    }
}

/// Failures read as all-zero counters.
pub async fn load_stats(api: &dyn GovanshApi) -> StatsSnapshot {
    match api.stats().await {
        Ok(stats) => stats,
        Err(err) => {
            warn!(error = %err, "failed to load usage stats");
            StatsSnapshot::default()
        }
    }
}

/// Both loaders, concurrently and independently.
pub async fn refresh(api: &dyn GovanshApi) -> (HistoryView, StatsSnapshot) {
    futures::join!(load_history(api), load_stats(api))
}
