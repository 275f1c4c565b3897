use super::*;

use std::io;

use crate::{
    intake::preview_data_uri,
    test_support::{gir_result, sample_image, minimal_gir_result},
};

const LOGIN: &str = "http://govansh.test/login";

fn previewing(file: &str) -> WorkflowController {
    let mut controller = WorkflowController::new(LOGIN);
    let ticket = controller.select_file(sample_image(file));
    assert!(controller.preview_ready(&ticket, preview_data_uri(&ticket.file)));
    controller
}

fn ready(result: PredictionResult) -> PredictOutcome {
    PredictOutcome::Ready(Box::new(result))
}

fn assert_gate_matches_flag(controller: &WorkflowController) {
    assert_eq!(
        controller.submit_enabled(),
        !controller.upload().submission_in_flight
    );
}

#[test]
fn starts_idle_with_nothing_selected() {
    let mut controller = WorkflowController::new(LOGIN);
    assert_eq!(controller.state(), WorkflowState::Idle);
    assert!(controller.submit_enabled());
    assert_eq!(
        controller.begin_submit(),
        Err(WorkflowError::NoImageSelected)
    );
    assert!(controller.result_snapshot().is_none());
}

#[test]
fn selection_waits_for_preview_before_submit() {
    let mut controller = WorkflowController::new(LOGIN);
    let ticket = controller.select_file(sample_image("cow.jpg"));

    assert_eq!(controller.state(), WorkflowState::Idle);
    assert_eq!(controller.begin_submit(), Err(WorkflowError::PreviewPending));
    assert!(!controller.upload().submission_in_flight);

    controller.preview_ready(&ticket, "data:image/jpeg;base64,AA==".into());
    assert_eq!(controller.state(), WorkflowState::Previewing);
}

#[test]
fn stale_preview_is_ignored() {
    let mut controller = WorkflowController::new(LOGIN);
    let first = controller.select_file(sample_image("first.jpg"));
    let second = controller.select_file(sample_image("second.jpg"));

    assert!(!controller.preview_ready(&first, "data:first".into()));
    assert_eq!(controller.state(), WorkflowState::Idle);
    assert!(controller.preview_ready(&second, "data:second".into()));
    assert_eq!(
        controller.upload().preview_data_uri.as_deref(),
        Some("data:second")
    );
}

#[test]
fn failed_preview_drops_the_selection() {
    let mut controller = WorkflowController::new(LOGIN);
    let ticket = controller.select_file(sample_image("broken.jpg"));
    assert!(controller.preview_failed(&ticket, "could not read image"));
    assert_eq!(controller.state(), WorkflowState::Idle);
    assert_eq!(controller.message(), Some("could not read image"));
    assert!(controller.upload().selected_file.is_none());
}

#[test]
fn successful_submission_reaches_result_ready() {
    let mut controller = previewing("gir.jpg");
    let pending = controller.begin_submit().expect("submit");

    assert_eq!(controller.state(), WorkflowState::Submitting);
    assert!(!controller.submit_enabled());
    assert_eq!(pending.image.name, "gir.jpg");

    let effect = controller.apply_response(&pending, Ok(ready(minimal_gir_result())));
    assert_eq!(effect, WorkflowEffect::RefreshLoaders);
    assert_eq!(controller.state(), WorkflowState::ResultReady);
    assert!(controller.submit_enabled());
    assert_eq!(
        controller.rendered().expect("rendered").headline.confidence,
        "87.3%"
    );
    assert_eq!(controller.active_tab(), ResultTab::Overview);
    assert_eq!(
        controller.result_snapshot().expect("snapshot").prediction_id.as_str(),
        "p1"
    );
}

#[test]
fn second_submit_while_in_flight_is_rejected() {
    let mut controller = previewing("gir.jpg");
    let _pending = controller.begin_submit().expect("submit");
    assert_eq!(
        controller.begin_submit(),
        Err(WorkflowError::SubmissionInFlight)
    );
}

#[test]
fn domain_error_returns_to_previewing() {
    let mut controller = previewing("tiny.jpg");
    let selected_before = controller.upload().selected_file.clone();
    let pending = controller.begin_submit().expect("submit");

    let effect = controller.apply_response(
        &pending,
        Ok(PredictOutcome::Rejected("Image too small".into())),
    );

    assert_eq!(effect, WorkflowEffect::ShowMessage("Image too small".into()));
    assert_eq!(controller.message(), Some("Image too small"));
    assert_eq!(controller.state(), WorkflowState::Previewing);
    assert!(controller.submit_enabled());
    assert_eq!(controller.upload().selected_file, selected_before);
    assert!(controller.begin_submit().is_ok(), "retry is permitted");
}

#[test]
fn unauthorized_redirects_without_touching_state() {
    let mut controller = previewing("gir.jpg");
    let pending = controller.begin_submit().expect("submit");
    let upload_before = controller.upload().clone();

    let effect = controller.apply_response(&pending, Ok(PredictOutcome::Unauthorized));

    assert_eq!(effect, WorkflowEffect::Redirect(LOGIN.into()));
    assert!(controller.rendered().is_none());
    assert!(controller.result_snapshot().is_none());
    assert!(controller.message().is_none());
    assert_eq!(
        controller.upload().submission_in_flight,
        upload_before.submission_in_flight
    );
    assert_eq!(controller.upload().selected_file, upload_before.selected_file);
}

#[test]
fn transport_failure_clears_in_flight_and_surfaces_message() {
    let mut controller = previewing("gir.jpg");
    let pending = controller.begin_submit().expect("submit");

    let effect = controller.apply_response(
        &pending,
        Err(ClientError::Io(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "connection refused",
        ))),
    );

    match effect {
        WorkflowEffect::ShowMessage(message) => {
            assert!(message.starts_with("Prediction failed:"), "{message}");
            assert!(message.contains("connection refused"), "{message}");
        }
        other => panic!("unexpected effect: {other:?}"),
    }
    assert!(controller.submit_enabled());
    assert_eq!(controller.state(), WorkflowState::Previewing);
}

#[test]
fn selecting_a_new_file_hides_the_previous_result() {
    let mut controller = previewing("gir.jpg");
    let pending = controller.begin_submit().expect("submit");
    controller.apply_response(&pending, Ok(ready(gir_result())));
    assert_eq!(controller.state(), WorkflowState::ResultReady);

    controller.select_file(sample_image("sahiwal.jpg"));

    assert!(controller.rendered().is_none());
    assert_eq!(controller.state(), WorkflowState::Idle);
    assert_eq!(
        controller.result_snapshot().expect("last result kept for export").breed,
        "Gir"
    );
}

#[test]
fn resubmitting_from_result_ready_hides_result_while_in_flight() {
    let mut controller = previewing("gir.jpg");
    let pending = controller.begin_submit().expect("submit");
    controller.apply_response(&pending, Ok(ready(gir_result())));

    let retry = controller.begin_submit().expect("retry from result");
    assert!(controller.rendered().is_none());
    assert_eq!(controller.state(), WorkflowState::Submitting);
    assert_eq!(retry.version, pending.version);
}

#[test]
fn response_for_replaced_selection_is_discarded() {
    let mut controller = previewing("first.jpg");
    let pending = controller.begin_submit().expect("submit");

    let ticket = controller.select_file(sample_image("second.jpg"));
    assert!(!controller.submit_enabled(), "the dispatched request is not aborted");
    controller.preview_ready(&ticket, preview_data_uri(&ticket.file));

    let effect = controller.apply_response(&pending, Ok(ready(gir_result())));

    assert_eq!(effect, WorkflowEffect::Discarded);
    assert!(controller.rendered().is_none());
    assert!(controller.result_snapshot().is_none());
    assert_eq!(controller.state(), WorkflowState::Previewing);
    assert!(controller.submit_enabled());
    assert_eq!(
        controller
            .upload()
            .selected_file
            .as_ref()
            .map(|f| f.name.as_str()),
        Some("second.jpg")
    );
}

#[test]
fn stale_error_response_does_not_surface_message() {
    let mut controller = previewing("first.jpg");
    let pending = controller.begin_submit().expect("submit");
    controller.select_file(sample_image("second.jpg"));

    let effect = controller.apply_response(&pending, Ok(PredictOutcome::Rejected("nope".into())));
    assert_eq!(effect, WorkflowEffect::Discarded);
    assert!(controller.message().is_none());
}

#[test]
fn submit_gate_tracks_in_flight_flag_across_every_transition() {
    let mut controller = WorkflowController::new(LOGIN);
    assert_gate_matches_flag(&controller);

    let ticket = controller.select_file(sample_image("a.jpg"));
    assert_gate_matches_flag(&controller);
    controller.preview_ready(&ticket, "data:a".into());
    assert_gate_matches_flag(&controller);

    let pending = controller.begin_submit().expect("submit");
    assert_gate_matches_flag(&controller);
    assert!(!controller.submit_enabled());

    controller.select_tab(ResultTab::Care);
    assert_gate_matches_flag(&controller);

    controller.apply_response(&pending, Ok(PredictOutcome::Rejected("bad".into())));
    assert_gate_matches_flag(&controller);

    let pending = controller.begin_submit().expect("retry");
    controller.apply_response(&pending, Ok(ready(gir_result())));
    assert_gate_matches_flag(&controller);
    assert!(controller.submit_enabled());
}

#[test]
fn selecting_never_sets_in_flight() {
    let mut controller = WorkflowController::new(LOGIN);
    for idx in 0..5 {
        let ticket = controller.select_file(sample_image(&format!("{idx}.jpg")));
        controller.preview_ready(&ticket, "data:x".into());
        assert!(!controller.upload().submission_in_flight);
    }
}

#[test]
fn new_result_resets_active_tab() {
    let mut controller = previewing("gir.jpg");
    controller.select_tab(ResultTab::Top5);
    let pending = controller.begin_submit().expect("submit");
    controller.apply_response(&pending, Ok(ready(gir_result())));
    assert_eq!(controller.active_tab(), ResultTab::Overview);
}
