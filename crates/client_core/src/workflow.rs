//! Intake → submit → result state machine for the prediction page.
//!
//! The controller never awaits. Callers perform the suspension points (file
//! read, preview encoding, network round trip) and feed the outcomes back in
//! through tickets tagged with the selection they belong to; outcomes for a
//! superseded selection are discarded.

use shared::protocol::PredictionResult;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    error::ClientError,
    intake::ImageFile,
    render::{render, RenderedResult, ResultTab},
    PredictOutcome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SelectionVersion(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// No file, or a file whose preview is still being prepared.
    Idle,
    Previewing,
    Submitting,
    ResultReady,
}

#[derive(Debug, Clone, Default)]
pub struct UploadState {
    pub selected_file: Option<ImageFile>,
    pub preview_data_uri: Option<String>,
    pub submission_in_flight: bool,
}

/// Handed out by [`WorkflowController::select_file`]; redeemed by the preview callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTicket {
    pub version: SelectionVersion,
    pub file: ImageFile,
}

/// A dispatched classification request and the selection it was sent for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub version: SelectionVersion,
    pub image: ImageFile,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("select an image first")]
    NoImageSelected,
    #[error("image preview is still loading")]
    PreviewPending,
    #[error("a prediction is already in progress")]
    SubmissionInFlight,
}

/// What the page must do after a response has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEffect {
    /// Leave the page for the login boundary; nothing in-page was touched.
    Redirect(String),
    /// The response belonged to a replaced selection and was dropped.
    Discarded,
    ShowMessage(String),
    /// A new result is on screen; history and stats must be reloaded.
    RefreshLoaders,
}

#[derive(Debug)]
pub struct WorkflowController {
    upload: UploadState,
    selection: SelectionVersion,
    last_result: Option<PredictionResult>,
    rendered: Option<RenderedResult>,
    active_tab: ResultTab,
    message: Option<String>,
    login_url: String,
}

impl WorkflowController {
    pub fn new(login_url: impl Into<String>) -> Self {
        Self {
            upload: UploadState::default(),
            selection: SelectionVersion::default(),
            last_result: None,
            rendered: None,
            active_tab: ResultTab::default(),
            message: None,
            login_url: login_url.into(),
        }
    }

    pub fn state(&self) -> WorkflowState {
        if self.upload.submission_in_flight {
            WorkflowState::Submitting
        } else if self.rendered.is_some() {
            WorkflowState::ResultReady
        } else if self.upload.selected_file.is_some() && self.upload.preview_data_uri.is_some() {
            WorkflowState::Previewing
        } else {
            WorkflowState::Idle
        }
    }

    pub fn upload(&self) -> &UploadState {
        &self.upload
    }

    pub fn selection(&self) -> SelectionVersion {
        self.selection
    }

    /// Depends on nothing but the in-flight flag.
    pub fn submit_enabled(&self) -> bool {
        !self.upload.submission_in_flight
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn rendered(&self) -> Option<&RenderedResult> {
        self.rendered.as_ref()
    }

    pub fn active_tab(&self) -> ResultTab {
        self.active_tab
    }

    pub fn select_tab(&mut self, tab: ResultTab) {
        self.active_tab = tab;
    }

    /// Owned copy of the last successful result, for export. Survives a new
    /// selection hiding the result card.
    pub fn result_snapshot(&self) -> Option<PredictionResult> {
        self.last_result.clone()
    }

    /// Single entry point for picker and drop intake. Allowed in every state;
    /// an outstanding request keeps running but can no longer update the page.
    pub fn select_file(&mut self, file: ImageFile) -> SelectionTicket {
        self.selection = SelectionVersion(self.selection.0 + 1);
        debug!(
            selection = self.selection.0,
            file = %file.name,
            size_bytes = file.len(),
            "image selected"
        );
        self.upload.selected_file = Some(file.clone());
        self.upload.preview_data_uri = None;
        self.hide_result();
        self.message = None;
        SelectionTicket {
            version: self.selection,
            file,
        }
    }

    pub fn preview_ready(&mut self, ticket: &SelectionTicket, data_uri: String) -> bool {
        if ticket.version != self.selection {
            debug!(selection = ticket.version.0, "dropping stale preview");
            return false;
        }
        self.upload.preview_data_uri = Some(data_uri);
        true
    }

    pub fn preview_failed(&mut self, ticket: &SelectionTicket, reason: impl Into<String>) -> bool {
        if ticket.version != self.selection {
            return false;
        }
        self.upload.selected_file = None;
        self.upload.preview_data_uri = None;
        self.message = Some(reason.into());
        true
    }

    pub fn begin_submit(&mut self) -> Result<PendingSubmission, WorkflowError> {
        if self.upload.submission_in_flight {
            return Err(WorkflowError::SubmissionInFlight);
        }
        let image = self
            .upload
            .selected_file
            .clone()
            .ok_or(WorkflowError::NoImageSelected)?;
        if self.upload.preview_data_uri.is_none() {
            return Err(WorkflowError::PreviewPending);
        }

        self.upload.submission_in_flight = true;
        self.hide_result();
        self.message = None;
        info!(selection = self.selection.0, file = %image.name, "submission started");
        Ok(PendingSubmission {
            version: self.selection,
            image,
        })
    }

    pub fn apply_response(
        &mut self,
        pending: &PendingSubmission,
        response: Result<PredictOutcome, ClientError>,
    ) -> WorkflowEffect {
        match response {
            Ok(PredictOutcome::Unauthorized) => {
                info!(login_url = %self.login_url, "prediction requires login; redirecting");
                WorkflowEffect::Redirect(self.login_url.clone())
            }
            Ok(PredictOutcome::Ready(result)) => {
                if !self.release(pending) {
                    return WorkflowEffect::Discarded;
                }
                self.rendered = Some(render(&result));
                self.last_result = Some(*result);
                self.active_tab = ResultTab::Overview;
                WorkflowEffect::RefreshLoaders
            }
            Ok(PredictOutcome::Rejected(message)) => {
                if !self.release(pending) {
                    return WorkflowEffect::Discarded;
                }
                warn!(%message, "prediction rejected by server");
                self.show_message(message)
            }
            Err(err) => {
                if !self.release(pending) {
                    return WorkflowEffect::Discarded;
                }
                warn!(error = %err, "prediction request failed");
                self.show_message(format!("Prediction failed: {}", err.user_message()))
            }
        }
    }

    /// Clears the in-flight gate; `false` when `pending` belongs to a replaced selection.
    fn release(&mut self, pending: &PendingSubmission) -> bool {
        self.upload.submission_in_flight = false;
        if pending.version != self.selection {
            debug!(
                sent_for = pending.version.0,
                current = self.selection.0,
                "discarding response for replaced selection"
            );
            return false;
        }
        true
    }

    fn show_message(&mut self, message: String) -> WorkflowEffect {
        self.message = Some(message.clone());
        WorkflowEffect::ShowMessage(message)
    }

    fn hide_result(&mut self) {
        self.rendered = None;
    }
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
