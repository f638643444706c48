//! App state - pure data structure with no I/O logic

use std::time::Duration;

use crate::app::options::OptionsForm;
use crate::app::toast::{Notify, ToastState};
use crate::config::Config;
use crate::messages::ui_events::{Field, InputMode};
use crate::messages::{RenderState, ResultView};
use crate::models::ToastStatus;

/// Main application state - pure data, no I/O
pub struct AppState {
    pub config: Config,

    // Options form (selections, file, submission phase)
    pub form: OptionsForm,

    // Toast
    pub toast: ToastState,
    /// Expiry timers requested since the actor last drained them
    pub scheduled_timers: Vec<Duration>,

    // Result
    pub enhanced_image: Option<String>,
    pub pending_download: Option<u64>,

    // UI state
    pub focus: Field,
    pub input_mode: InputMode,
    pub show_help: bool,

    pub next_request_id: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Borrowed toast notifier handed to the options form
pub struct ToastHandle<'a> {
    toast: &'a mut ToastState,
    timers: &'a mut Vec<Duration>,
    timeout: Duration,
}

impl Notify for ToastHandle<'_> {
    fn notify(&mut self, message: &str, status: ToastStatus) {
        if let Some(timeout) = self.toast.show(message, status, self.timeout) {
            self.timers.push(timeout);
        }
    }
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState {
            config,
            form: OptionsForm::new(),
            toast: ToastState::default(),
            scheduled_timers: Vec::new(),
            enhanced_image: None,
            pending_download: None,
            focus: Field::Model,
            input_mode: InputMode::Normal,
            show_help: false,
            next_request_id: 1,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn is_loading(&self) -> bool {
        self.form.is_loading()
    }

    /// Split borrow: the form plus a notifier over the toast fields
    pub fn form_and_notifier(&mut self) -> (&mut OptionsForm, ToastHandle<'_>) {
        let timeout = self.config.toast_timeout();
        (
            &mut self.form,
            ToastHandle {
                toast: &mut self.toast,
                timers: &mut self.scheduled_timers,
                timeout,
            },
        )
    }

    pub fn show_toast(&mut self, message: &str, status: ToastStatus) {
        let (_, mut notifier) = self.form_and_notifier();
        notifier.notify(message, status);
    }

    /// Drain expiry timers for the actor to schedule
    pub fn take_scheduled_timers(&mut self) -> Vec<Duration> {
        std::mem::take(&mut self.scheduled_timers)
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            focus: self.focus,
            input_mode: self.input_mode,
            show_help: self.show_help,
            model: self.form.model,
            use_gpu: self.form.use_gpu,
            use_cpu_egpu: self.form.use_cpu_egpu,
            file_name: self.form.file_name().to_string(),
            path_input: self.form.path_input.clone(),
            path_cursor: self.form.path_cursor,
            is_loading: self.is_loading(),
            submit_disabled: self.form.submit_disabled(),
            result: ResultView::from_image_ref(self.enhanced_image.as_deref(), &self.config),
            is_downloading: self.pending_download.is_some(),
            toast: self.toast.clone(),
        }
    }
}
