//! Check-in submission: shape validation, the server round-trip and the
//! decision on whether scanning continues.

use std::sync::Arc;

use yup_core::checkin::{CheckInCode, GENERIC_ERROR_MESSAGE, INVALID_CODE_MESSAGE};
use yup_core::types::EventId;

use crate::api::CheckInTransport;
use crate::feedback::{AlertBoard, CheckInView};

/// What the scan loop does after a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitDecision {
    /// Recoverable failure: keep scanning.
    ResumeScanning,
    /// The payload is not a check-in code. Camera scanning stops here;
    /// malformed input is a dead end, not a transient error.
    HaltScanning,
    /// Presence recorded.
    CheckedIn,
}

pub struct CheckInSubmitter {
    transport: Arc<dyn CheckInTransport>,
    event_id: EventId,
    alerts: Arc<AlertBoard>,
    view: Arc<dyn CheckInView>,
}

impl CheckInSubmitter {
    pub fn new(
        transport: Arc<dyn CheckInTransport>,
        event_id: EventId,
        alerts: Arc<AlertBoard>,
        view: Arc<dyn CheckInView>,
    ) -> Self {
        Self {
            transport,
            event_id,
            alerts,
            view,
        }
    }

    pub fn alerts(&self) -> &Arc<AlertBoard> {
        &self.alerts
    }

    /// Normalise and validate `raw`, submit it, and surface the result.
    pub async fn submit(&self, raw: &str) -> SubmitDecision {
        let code = match CheckInCode::parse(raw) {
            Ok(code) => code,
            Err(e) => {
                tracing::info!(error = %e, "Rejected malformed check-in code");
                self.alerts.show(INVALID_CODE_MESSAGE);
                return SubmitDecision::HaltScanning;
            }
        };

        tracing::info!(%code, event_id = %self.event_id, "Submitting check-in");

        let outcome = match self.transport.check_qr_code(&code, self.event_id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(%code, error = %e, "Check-in request failed");
                self.alerts.show(GENERIC_ERROR_MESSAGE);
                return SubmitDecision::ResumeScanning;
            }
        };

        match outcome.alert_message() {
            None => {
                tracing::info!(%code, "Check-in recorded");
                self.view.clear_text_input();
                self.view.show_confirmation(&code);
                SubmitDecision::CheckedIn
            }
            Some(message) => {
                tracing::info!(%code, ?outcome, "Check-in refused");
                self.alerts.show(message);
                SubmitDecision::ResumeScanning
            }
        }
    }
}
