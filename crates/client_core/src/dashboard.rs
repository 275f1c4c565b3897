//! Dashboard summary: usage KPIs, top breeds, recent predictions.

use std::fmt;

use shared::protocol::StatsSnapshot;

use crate::{
    loader::{load_history, load_stats, HistoryView},
    render::PLACEHOLDER,
    session::{sync_session, NavView},
    GovanshApi,
};

pub const NO_TOP_BREEDS: &str = "No data yet";
pub const NO_DASHBOARD_ROWS: &str = "No predictions yet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiCards {
    pub my_predictions: String,
    pub total_users: String,
    pub total_predictions: String,
    pub top_breed: String,
}

impl KpiCards {
    pub fn from_stats(stats: &StatsSnapshot) -> Self {
        Self {
            my_predictions: stats.my_predictions.to_string(),
            total_users: stats.total_users.to_string(),
            total_predictions: stats.total_predictions.to_string(),
            top_breed: stats.top_breed().unwrap_or(PLACEHOLDER).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub nav: NavView,
    pub kpis: KpiCards,
    /// `(breed, "<n> predictions")`, or empty when nothing has been predicted.
    pub top_breeds: Vec<(String, String)>,
    pub history: HistoryView,
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.nav)?;
        writeln!(f)?;
        writeln!(f, "My predictions:    {}", self.kpis.my_predictions)?;
        writeln!(f, "Total users:       {}", self.kpis.total_users)?;
        writeln!(f, "Total predictions: {}", self.kpis.total_predictions)?;
        writeln!(f, "Top breed:         {}", self.kpis.top_breed)?;
        writeln!(f)?;
        writeln!(f, "Top breeds")?;
        if self.top_breeds.is_empty() {
            writeln!(f, "  {NO_TOP_BREEDS}")?;
        }
        for (breed, count) in &self.top_breeds {
            writeln!(f, "  {breed}: {count}")?;
        }
        writeln!(f)?;
        writeln!(f, "Recent predictions")?;
        match &self.history {
            HistoryView::Empty => writeln!(f, "  {NO_DASHBOARD_ROWS}  {PLACEHOLDER}  {PLACEHOLDER}"),
            HistoryView::Rows(rows) => {
                for row in rows {
                    writeln!(
                        f,
                        "  {} {}  {}  {}",
                        row.breed, row.prediction_id, row.confidence, row.timestamp
                    )?;
                }
                Ok(())
            }
        }
    }
}

pub struct DashboardController<'a> {
    api: &'a dyn GovanshApi,
}

impl<'a> DashboardController<'a> {
    pub fn new(api: &'a dyn GovanshApi) -> Self {
        Self { api }
    }

    /// Session first, then stats and history.
    pub async fn load(&self) -> DashboardView {
        let nav = sync_session(self.api).await;
        let stats = load_stats(self.api).await;
        let history = load_history(self.api).await;

        DashboardView {
            nav,
            kpis: KpiCards::from_stats(&stats),
            top_breeds: stats
                .top_breeds
                .iter()
                .map(|entry| (entry.breed.clone(), format!("{} predictions", entry.count)))
                .collect(),
            history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{history_entry, FakeApi};

    #[tokio::test]
    async fn dashboard_loads_session_before_stats_and_history() {
        let api = FakeApi::logged_in("ramesh").with_history(vec![history_entry("Gir", "GVS00001")]);
        let view = DashboardController::new(&api).load().await;

        assert_eq!(api.calls(), ["me", "stats", "history"]);
        assert_eq!(view.kpis.my_predictions, "3");
        assert_eq!(view.kpis.total_users, "10");
        assert_eq!(view.kpis.top_breed, "Gir");
        assert_eq!(view.top_breeds, [("Gir".to_string(), "12 predictions".to_string())]);
        assert_eq!(view.history.rows().len(), 1);
    }

    #[tokio::test]
    async fn empty_stats_fall_back_to_placeholders() {
        let api = FakeApi::default();
        let view = DashboardController::new(&api).load().await;

        assert!(!view.nav.is_authenticated());
        assert_eq!(view.kpis.my_predictions, "0");
        assert_eq!(view.kpis.top_breed, PLACEHOLDER);
        let text = view.to_string();
        assert!(text.contains(NO_TOP_BREEDS));
        assert!(text.contains(NO_DASHBOARD_ROWS));
    }
}
