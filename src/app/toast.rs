//! Toast notifier - at most one transient message on screen

use std::time::Duration;

use crate::models::ToastStatus;

/// Sink for user feedback, handed to components that raise toasts
pub trait Notify {
    fn notify(&mut self, message: &str, status: ToastStatus);
}

/// Current toast, owned by the root state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToastState {
    pub message: String,
    pub status: ToastStatus,
    pub visible: bool,
}

impl ToastState {
    /// Show a toast for `timeout`.
    ///
    /// While another toast is visible the call is a no-op: the new message is
    /// dropped, neither queued nor swapped in. Returns the timeout the caller
    /// must schedule an expiry for, or `None` when suppressed.
    pub fn show(
        &mut self,
        message: impl Into<String>,
        status: ToastStatus,
        timeout: Duration,
    ) -> Option<Duration> {
        let message = message.into();
        if self.visible {
            tracing::debug!(dropped = %message, "Toast suppressed");
            return None;
        }

        tracing::debug!(status = status.as_str(), message = %message, "Toast shown");
        self.message = message;
        self.status = status;
        self.visible = true;
        Some(timeout)
    }

    /// Timer callback. Hides whatever is showing.
    pub fn expire(&mut self) {
        self.visible = false;
    }
}
