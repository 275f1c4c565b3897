//! The prediction page: session + loaders + workflow controller + exporter.
//!
//! This is where the controller's suspension points actually run. File reads
//! and preview encoding happen on blocking tasks, classification requests on a
//! spawned task bounded by the configured timeout.

use std::{path::PathBuf, sync::Arc, time::Duration};

use shared::protocol::{SessionStatus, StatsSnapshot};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::{
    config::ClientSettings,
    error::{ClientError, ClientResult},
    intake::{acquire, preview_data_uri, IntakeSource},
    loader::{refresh, HistoryView},
    render::ResultTab,
    report::ReportExporter,
    session::{sync_session, NavView},
    workflow::{PendingSubmission, WorkflowController, WorkflowEffect},
    GovanshApi, PredictOutcome,
};

/// A classification request that has left the page but not come back yet.
pub struct InFlightRequest {
    pending: PendingSubmission,
    handle: JoinHandle<ClientResult<PredictOutcome>>,
}

pub struct PredictionPage<A: GovanshApi + 'static> {
    api: Arc<A>,
    controller: WorkflowController,
    exporter: ReportExporter,
    request_timeout: Duration,
    nav: NavView,
    history: HistoryView,
    stats: StatsSnapshot,
    redirected_to: Option<String>,
}

impl<A: GovanshApi + 'static> PredictionPage<A> {
    pub fn new(api: Arc<A>, settings: &ClientSettings) -> Self {
        Self {
            api,
            controller: WorkflowController::new(settings.login_url()),
            exporter: ReportExporter::new(settings.report_dir.clone()),
            request_timeout: settings.request_timeout(),
            nav: NavView::from_status(&SessionStatus::anonymous()),
            history: HistoryView::Empty,
            stats: StatsSnapshot::default(),
            redirected_to: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn controller(&self) -> &WorkflowController {
        &self.controller
    }

    /// Switches the visible result panel.
    pub fn select_tab(&mut self, tab: ResultTab) {
        self.controller.select_tab(tab);
    }

    /// Text of the active panel, once a result is on screen.
    pub fn active_panel_text(&self) -> Option<String> {
        self.controller
            .rendered()
            .map(|rendered| rendered.tab_text(self.controller.active_tab()))
    }

    pub fn nav(&self) -> &NavView {
        &self.nav
    }

    pub fn history(&self) -> &HistoryView {
        &self.history
    }

    pub fn stats(&self) -> &StatsSnapshot {
        &self.stats
    }

    /// Set once the server has asked for a login; the page is dead after that.
    pub fn redirected_to(&self) -> Option<&str> {
        self.redirected_to.as_deref()
    }

    /// Page load: session check and both loaders, concurrently.
    pub async fn load(&mut self) {
        let api: &dyn GovanshApi = self.api.as_ref();
        let (nav, (history, stats)) = futures::join!(sync_session(api), refresh(api));
        self.nav = nav;
        self.apply_loaders(history, stats);
    }

    pub async fn refresh_loaders(&mut self) {
        let (history, stats) = refresh(self.api.as_ref()).await;
        self.apply_loaders(history, stats);
    }

    fn apply_loaders(&mut self, history: HistoryView, stats: StatsSnapshot) {
        self.history = history;
        self.stats = stats;
    }

    /// Intake from any source. Returns `false` when nothing was selected
    /// (an empty drop).
    pub async fn select(&mut self, source: IntakeSource) -> ClientResult<bool> {
        let Some(file) = acquire(source).await? else {
            return Ok(false);
        };
        let ticket = self.controller.select_file(file);

        let file = ticket.file.clone();
        match tokio::task::spawn_blocking(move || preview_data_uri(&file)).await {
            Ok(data_uri) => {
                self.controller.preview_ready(&ticket, data_uri);
            }
            Err(err) => {
                warn!(error = %err, "preview encoding failed");
                self.controller
                    .preview_failed(&ticket, format!("Could not preview image: {err}"));
            }
        }
        Ok(true)
    }

    /// Starts a classification request without waiting for it.
    pub fn dispatch(&mut self) -> ClientResult<InFlightRequest> {
        let pending = self
            .controller
            .begin_submit()
            .map_err(|err| ClientError::Selection(err.to_string()))?;

        let api = Arc::clone(&self.api);
        let image = pending.image.clone();
        let limit = self.request_timeout;
        let handle = tokio::spawn(async move {
            match tokio::time::timeout(limit, api.predict(image)).await {
                Ok(response) => response,
                Err(_) => Err(ClientError::Timeout(limit)),
            }
        });
        Ok(InFlightRequest { pending, handle })
    }

    /// Applies a finished request and runs whatever the controller asks for.
    pub async fn complete(&mut self, request: InFlightRequest) -> WorkflowEffect {
        let response = match request.handle.await {
            Ok(response) => response,
            Err(err) => Err(ClientError::Task(err)),
        };
        let effect = self.controller.apply_response(&request.pending, response);
        match &effect {
            WorkflowEffect::RefreshLoaders => self.refresh_loaders().await,
            WorkflowEffect::Redirect(url) => self.redirected_to = Some(url.clone()),
            WorkflowEffect::Discarded | WorkflowEffect::ShowMessage(_) => {}
        }
        effect
    }

    pub async fn submit(&mut self) -> ClientResult<WorkflowEffect> {
        let request = self.dispatch()?;
        Ok(self.complete(request).await)
    }

    /// Writes the last result as a report; `Ok(None)` when there is nothing to export.
    pub fn export(&self) -> ClientResult<Option<PathBuf>> {
        self.exporter.export(self.controller.result_snapshot())
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
