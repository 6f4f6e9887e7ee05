//! User-facing feedback: the shared alert slot and the success view.

use tokio::sync::watch;
use yup_core::checkin::CheckInCode;

/// The single user-visible alert.
///
/// Holds at most one message. A new alert overwrites the current one and
/// the user may dismiss it. Front ends follow changes through
/// [`AlertBoard::subscribe`].
pub struct AlertBoard {
    current: watch::Sender<Option<String>>,
}

impl AlertBoard {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self { current }
    }

    /// Replace the active alert with `message`.
    pub fn show(&self, message: &str) {
        tracing::warn!(alert = message, "Showing alert");
        self.current.send_replace(Some(message.to_string()));
    }

    pub fn dismiss(&self) {
        self.current.send_replace(None);
    }

    pub fn current(&self) -> Option<String> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.current.subscribe()
    }
}

impl Default for AlertBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Success-path presentation of a check-in front end.
pub trait CheckInView: Send + Sync {
    /// Play the confirmation (checkmark) for a recorded check-in.
    fn show_confirmation(&self, code: &CheckInCode);

    /// Empty the manual code entry field.
    fn clear_text_input(&self);
}
