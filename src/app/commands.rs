//! Command handlers - business logic for processing UI events

use crate::app::AppState;
use crate::constants::{MSG_DOWNLOAD_FAILED, MSG_ENHANCED, MSG_ENHANCE_FAILED, MSG_NO_IMAGE_UPLOADED};
use crate::messages::ui_events::InputMode;
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{SelectedImage, SubmissionRequest, ToastStatus, UpscaleModel};

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn next_field(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn prev_field(&mut self) {
        self.focus = self.focus.prev();
    }

    // ========================
    // Options
    // ========================

    pub fn cycle_model(&mut self) {
        self.form.cycle_model();
    }

    pub fn toggle_gpu(&mut self) {
        self.form.toggle_gpu();
    }

    pub fn toggle_cpu_egpu(&mut self) {
        self.form.toggle_cpu_egpu();
    }

    // ========================
    // File path input
    // ========================

    pub fn start_file_input(&mut self) {
        // the picker is locked while an upload is running
        if self.is_loading() {
            return;
        }
        self.input_mode = InputMode::Editing;
        self.form.path_cursor_to_end();
    }

    pub fn file_input_char(&mut self, c: char) {
        self.form.path_char(c);
    }

    pub fn file_input_backspace(&mut self) {
        self.form.path_backspace();
    }

    pub fn file_input_cursor_left(&mut self) {
        self.form.path_cursor_left();
    }

    pub fn file_input_cursor_right(&mut self) {
        self.form.path_cursor_right();
    }

    pub fn file_input_autocomplete(&mut self) {
        self.form.path_autocomplete();
    }

    pub fn confirm_file_input(&mut self) {
        self.input_mode = InputMode::Normal;
        let (form, mut notifier) = self.form_and_notifier();
        form.confirm_path_input(&mut notifier);
    }

    pub fn cancel_file_input(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Hand a picked file straight to the form
    pub fn select_file(&mut self, file: Option<SelectedImage>) {
        let (form, mut notifier) = self.form_and_notifier();
        form.on_file_change(file, &mut notifier);
    }

    // ========================
    // Submission
    // ========================

    /// Form submit: validate in the form, then delegate to the orchestration
    pub fn submit_form(&mut self) -> Option<NetworkCommand> {
        let (form, mut notifier) = self.form_and_notifier();
        let SubmissionRequest {
            model,
            use_gpu,
            use_cpu_egpu,
            image,
        } = form.on_submit(&mut notifier)?;
        self.submit_enhancement(model, use_gpu, use_cpu_egpu, Some(image))
    }

    /// Start one enhancement call. Nothing here deduplicates in-flight work:
    /// a second call supersedes the pending id.
    pub fn submit_enhancement(
        &mut self,
        model: UpscaleModel,
        use_gpu: bool,
        use_cpu_egpu: bool,
        file: Option<SelectedImage>,
    ) -> Option<NetworkCommand> {
        let Some(image) = file else {
            self.show_toast(MSG_NO_IMAGE_UPLOADED, ToastStatus::Fail);
            return None;
        };

        let id = self.next_id();
        tracing::info!(id, model = model.as_str(), use_gpu, use_cpu_egpu, file = %image.name, "Submitting enhancement");
        self.form.begin_submission(image.clone(), id);

        Some(NetworkCommand::Enhance {
            id,
            endpoint: self.config.endpoint.clone(),
            request: SubmissionRequest {
                model,
                use_gpu,
                use_cpu_egpu,
                image,
            },
        })
    }

    // ========================
    // Download
    // ========================

    pub fn download(&mut self) -> Option<NetworkCommand> {
        if self.pending_download.is_some() {
            return None;
        }
        let path = self.enhanced_image.as_deref()?;
        let url = self.config.asset_url(path);

        let id = self.next_id();
        self.pending_download = Some(id);
        tracing::info!(id, url = %url, "Downloading enhanced image");

        Some(NetworkCommand::Download {
            id,
            url,
            dest_dir: self.config.download_dir.clone(),
        })
    }

    // ========================
    // Response handling
    // ========================

    pub fn handle_response(&mut self, response: NetworkResponse) {
        match response {
            NetworkResponse::Enhanced { id, output_path, time_ms } => {
                if self.form.phase.pending_request_id() != Some(id) {
                    tracing::debug!(id, "Ignoring stale enhancement response");
                    return;
                }
                match servable_path(&output_path, &self.config.storage_root_marker) {
                    Some(path) => {
                        tracing::info!(id, time_ms, path = %path, "Enhancement succeeded");
                        self.form.settle(id, true);
                        self.enhanced_image = Some(path);
                        self.show_toast(MSG_ENHANCED, ToastStatus::Success);
                    }
                    None => {
                        tracing::warn!(id, output_path = %output_path, "Output path outside storage root");
                        self.form.settle(id, false);
                        self.show_toast(MSG_ENHANCE_FAILED, ToastStatus::Fail);
                    }
                }
            }
            NetworkResponse::EnhanceFailed { id, message, time_ms } => {
                if self.form.settle(id, false) {
                    tracing::warn!(id, time_ms, error = %message, "Enhancement failed");
                    self.show_toast(MSG_ENHANCE_FAILED, ToastStatus::Fail);
                }
            }
            NetworkResponse::Downloaded { id, path } => {
                if self.pending_download == Some(id) {
                    self.pending_download = None;
                    tracing::info!(id, path = %path.display(), "Download saved");
                    self.show_toast(&format!("Saved to {}", path.display()), ToastStatus::Success);
                }
            }
            NetworkResponse::DownloadFailed { id, message } => {
                if self.pending_download == Some(id) {
                    self.pending_download = None;
                    tracing::warn!(id, error = %message, "Download failed");
                    self.show_toast(MSG_DOWNLOAD_FAILED, ToastStatus::Fail);
                }
            }
        }
    }

    // ========================
    // Toast timer
    // ========================

    pub fn expire_toast(&mut self) {
        self.toast.expire();
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}

/// Turn a server-local output path into a web-servable one.
///
/// Separators are normalised to `/` first, so a `public\` marker also matches
/// POSIX paths. Everything after the first marker becomes the path, with a
/// leading `/`. Returns `None` when the marker is absent.
pub fn servable_path(output_path: &str, marker: &str) -> Option<String> {
    let normalized = output_path.replace('\\', "/");
    let marker = marker.replace('\\', "/");
    let (_, rest) = normalized.split_once(marker.as_str())?;
    Some(format!("/{}", rest.trim_start_matches('/')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FormPhase;
    use crate::config::Config;
    use crate::constants::{MSG_FILE_UPLOADED, MSG_SELECT_IMAGE_FIRST};
    use std::fs::File;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn png(name: &str) -> SelectedImage {
        SelectedImage {
            path: PathBuf::from(name),
            name: name.to_string(),
            mime: String::from("image/png"),
        }
    }

    fn enhanced(id: u64, output_path: &str) -> NetworkResponse {
        NetworkResponse::Enhanced {
            id,
            output_path: output_path.to_string(),
            time_ms: 12,
        }
    }

    fn failed(id: u64) -> NetworkResponse {
        NetworkResponse::EnhanceFailed {
            id,
            message: String::from("HTTP status server error (500)"),
            time_ms: 3,
        }
    }

    fn command_id(cmd: &NetworkCommand) -> u64 {
        match cmd {
            NetworkCommand::Enhance { id, .. } | NetworkCommand::Download { id, .. } => *id,
            NetworkCommand::Shutdown => panic!("unexpected shutdown"),
        }
    }

    #[test]
    fn test_servable_path_from_windows_output() {
        assert_eq!(
            servable_path("C:\\app\\public\\images\\out.png", "public\\").as_deref(),
            Some("/images/out.png")
        );
    }

    #[test]
    fn test_servable_path_posix_and_missing_marker() {
        assert_eq!(
            servable_path("/srv/app/public/images/out.png", "public\\").as_deref(),
            Some("/images/out.png")
        );
        assert_eq!(
            servable_path("C:\\a\\public\\b\\public\\c.png", "public\\").as_deref(),
            Some("/b/public/c.png")
        );
        assert_eq!(servable_path("C:\\tmp\\out.png", "public\\"), None);
    }

    #[test]
    fn test_submit_without_file_issues_no_command() {
        let mut state = AppState::default();
        assert!(state.submit_form().is_none());
        assert!(!state.is_loading());
        assert_eq!(state.toast.message, MSG_SELECT_IMAGE_FIRST);
        assert_eq!(state.toast.status, ToastStatus::Fail);
    }

    #[test]
    fn test_orchestration_without_file_leaves_loading_off() {
        let mut state = AppState::default();
        let cmd = state.submit_enhancement(UpscaleModel::X2, false, false, None);
        assert!(cmd.is_none());
        assert!(!state.is_loading());
        assert_eq!(state.toast.message, MSG_NO_IMAGE_UPLOADED);
    }

    #[test]
    fn test_submit_builds_enhance_command() {
        let mut state = AppState::default();
        state.select_file(Some(png("a.png")));
        state.toggle_gpu();
        state.cycle_model();

        let cmd = state.submit_form().unwrap();
        match cmd {
            NetworkCommand::Enhance { endpoint, request, .. } => {
                assert_eq!(endpoint, state.config.endpoint);
                assert_eq!(request.model, UpscaleModel::X3);
                assert!(request.use_gpu);
                assert!(!request.use_cpu_egpu);
                assert_eq!(request.image, png("a.png"));
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(state.is_loading());
        assert!(state.to_render_state().submit_disabled);
    }

    #[test]
    fn test_failure_keeps_previous_image() {
        let mut state = AppState::default();
        state.select_file(Some(png("a.png")));

        let first = state.submit_form().unwrap();
        state.handle_response(enhanced(command_id(&first), "C:\\app\\public\\images\\one.png"));
        assert_eq!(state.enhanced_image.as_deref(), Some("/images/one.png"));

        let second = state.submit_form().unwrap();
        state.handle_response(failed(command_id(&second)));

        assert_eq!(state.enhanced_image.as_deref(), Some("/images/one.png"));
        assert!(!state.is_loading());
        assert!(matches!(&state.form.phase, FormPhase::Failed(_)));
    }

    #[test]
    fn test_missing_marker_counts_as_failure() {
        let mut state = AppState::default();
        state.select_file(Some(png("a.png")));
        state.expire_toast();

        let cmd = state.submit_form().unwrap();
        state.handle_response(enhanced(command_id(&cmd), "C:\\tmp\\out.png"));

        assert_eq!(state.enhanced_image, None);
        assert!(!state.is_loading());
        assert_eq!(state.toast.message, MSG_ENHANCE_FAILED);
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let mut state = AppState::default();
        state.select_file(Some(png("a.png")));
        let cmd = state.submit_form().unwrap();
        let id = command_id(&cmd);

        state.handle_response(enhanced(id + 100, "C:\\app\\public\\x.png"));
        assert!(state.is_loading());
        assert_eq!(state.enhanced_image, None);
    }

    #[test]
    fn test_toasts_are_suppressed_and_timers_scheduled_once() {
        let mut state = AppState::default();
        state.select_file(Some(png("a.png")));
        state.submit_enhancement(UpscaleModel::X2, false, false, None);

        assert_eq!(state.toast.message, MSG_FILE_UPLOADED);
        let timers = state.take_scheduled_timers();
        assert_eq!(timers, vec![state.config.toast_timeout()]);
        assert!(state.take_scheduled_timers().is_empty());
    }

    #[test]
    fn test_download_requires_image_and_single_flight() {
        let mut state = AppState::new(Config {
            asset_base_url: String::from("http://assets.local"),
            ..Config::default()
        });
        assert!(state.download().is_none());

        state.enhanced_image = Some(String::from("/images/out.png"));
        let cmd = state.download().unwrap();
        match &cmd {
            NetworkCommand::Download { url, .. } => {
                assert_eq!(url, "http://assets.local/images/out.png");
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(state.download().is_none());

        state.handle_response(NetworkResponse::DownloadFailed {
            id: command_id(&cmd),
            message: String::from("404"),
        });
        assert!(state.pending_download.is_none());
        assert_eq!(state.toast.message, MSG_DOWNLOAD_FAILED);
    }

    #[test]
    fn test_end_to_end_select_submit_succeed() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("girl.png");
        File::create(&file).unwrap();

        let mut state = AppState::default();
        state.start_file_input();
        for c in file.to_string_lossy().chars() {
            state.file_input_char(c);
        }
        state.confirm_file_input();

        let render = state.to_render_state();
        assert_eq!(render.file_name, "girl.png");
        assert!(render.toast.visible);
        assert_eq!(render.toast.message, MSG_FILE_UPLOADED);
        assert_eq!(render.toast.status, ToastStatus::Success);
        assert!(!render.submit_disabled);

        // the upload toast's timer fires before the service answers
        state.expire_toast();

        let cmd = state.submit_form().unwrap();
        assert!(state.to_render_state().is_loading);

        state.handle_response(enhanced(command_id(&cmd), "C:\\app\\public\\images\\out.png"));

        let render = state.to_render_state();
        assert!(!render.is_loading);
        assert_eq!(
            render.result,
            crate::messages::ResultView::Image {
                path: String::from("/images/out.png"),
                url: state.config.asset_url("/images/out.png"),
            }
        );
        assert_eq!(render.toast.message, MSG_ENHANCED);
        assert_eq!(render.toast.status, ToastStatus::Success);
    }
}
