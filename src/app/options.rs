//! Options form - model, acceleration, file selection and submission guard

use std::fs;
use std::path::PathBuf;

use crate::app::toast::Notify;
use crate::constants::{
    ACCEPTED_EXTENSIONS, ACCEPTED_MIME_TYPES, MSG_FILE_UPLOADED, MSG_INVALID_FILE_TYPE,
    MSG_SELECT_IMAGE_FIRST,
};
use crate::models::{SelectedImage, SubmissionRequest, ToastStatus, UpscaleModel};

/// Where the form is in its lifecycle. Every phase past `Idle` carries the
/// selected image, so a submission without a file cannot be represented.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Idle,
    FileSelected(SelectedImage),
    Submitting {
        image: SelectedImage,
        request_id: u64,
    },
    Succeeded(SelectedImage),
    Failed(SelectedImage),
}

impl FormPhase {
    pub fn image(&self) -> Option<&SelectedImage> {
        match self {
            FormPhase::Idle => None,
            FormPhase::FileSelected(image)
            | FormPhase::Submitting { image, .. }
            | FormPhase::Succeeded(image)
            | FormPhase::Failed(image) => Some(image),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FormPhase::Submitting { .. })
    }

    pub fn pending_request_id(&self) -> Option<u64> {
        match self {
            FormPhase::Submitting { request_id, .. } => Some(*request_id),
            _ => None,
        }
    }
}

/// Local selections of the options form
#[derive(Clone, Debug, Default)]
pub struct OptionsForm {
    pub model: UpscaleModel,
    pub use_gpu: bool,
    pub use_cpu_egpu: bool,
    pub phase: FormPhase,
    /// Path being typed into the file input
    pub path_input: String,
    pub path_cursor: usize,
}

impl OptionsForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }

    /// Display name of the selected file, empty when none
    pub fn file_name(&self) -> &str {
        self.phase.image().map(|i| i.name.as_str()).unwrap_or("")
    }

    pub fn submit_disabled(&self) -> bool {
        self.phase.image().is_none() || self.is_loading()
    }

    // ========================
    // Selections
    // ========================

    pub fn cycle_model(&mut self) {
        self.model = self.model.next();
    }

    pub fn set_use_gpu(&mut self, checked: bool) {
        self.use_gpu = checked;
        if checked {
            self.use_cpu_egpu = false;
        }
    }

    pub fn set_use_cpu_egpu(&mut self, checked: bool) {
        self.use_cpu_egpu = checked;
        if checked {
            self.use_gpu = false;
        }
    }

    pub fn toggle_gpu(&mut self) {
        self.set_use_gpu(!self.use_gpu);
    }

    pub fn toggle_cpu_egpu(&mut self) {
        self.set_use_cpu_egpu(!self.use_cpu_egpu);
    }

    // ========================
    // File selection
    // ========================

    /// Validate and store a newly picked file. `None` means the picker was
    /// dismissed and changes nothing.
    pub fn on_file_change(&mut self, file: Option<SelectedImage>, notifier: &mut impl Notify) {
        let Some(file) = file else {
            return;
        };
        if self.is_loading() {
            return;
        }

        if !ACCEPTED_MIME_TYPES.contains(&file.mime.as_str()) {
            tracing::info!(name = %file.name, mime = %file.mime, "Rejected file type");
            notifier.notify(MSG_INVALID_FILE_TYPE, ToastStatus::Fail);
            self.clear_path_input();
            self.phase = FormPhase::Idle;
            return;
        }

        tracing::info!(name = %file.name, mime = %file.mime, "File selected");
        self.phase = FormPhase::FileSelected(file);
        notifier.notify(MSG_FILE_UPLOADED, ToastStatus::Success);
    }

    /// Resolve the typed path and feed it through `on_file_change`
    pub fn confirm_path_input(&mut self, notifier: &mut impl Notify) {
        let input = self.path_input.trim();
        if input.is_empty() {
            self.on_file_change(None, notifier);
            return;
        }

        let path = expand_home(input);
        match SelectedImage::from_path(&path) {
            Ok(image) => self.on_file_change(Some(image), notifier),
            Err(e) => {
                tracing::info!(path = %path.display(), error = %e, "Cannot open file");
                notifier.notify(&format!("Could not open {}", input), ToastStatus::Fail);
                self.clear_path_input();
            }
        }
    }

    // ========================
    // Submission
    // ========================

    /// Collect the parameters for the parent, or report why not.
    pub fn on_submit(&mut self, notifier: &mut impl Notify) -> Option<SubmissionRequest> {
        if self.is_loading() {
            return None;
        }

        let Some(image) = self.phase.image() else {
            notifier.notify(MSG_SELECT_IMAGE_FIRST, ToastStatus::Fail);
            return None;
        };

        Some(SubmissionRequest {
            model: self.model,
            use_gpu: self.use_gpu,
            use_cpu_egpu: self.use_cpu_egpu,
            image: image.clone(),
        })
    }

    pub fn begin_submission(&mut self, image: SelectedImage, request_id: u64) {
        self.phase = FormPhase::Submitting { image, request_id };
    }

    /// Leave `Submitting` if `request_id` is the pending one. Returns whether
    /// it was.
    pub fn settle(&mut self, request_id: u64, succeeded: bool) -> bool {
        match std::mem::take(&mut self.phase) {
            FormPhase::Submitting { image, request_id: pending } if pending == request_id => {
                self.phase = if succeeded {
                    FormPhase::Succeeded(image)
                } else {
                    FormPhase::Failed(image)
                };
                true
            }
            other => {
                self.phase = other;
                false
            }
        }
    }

    // ========================
    // Path input editing
    // ========================

    pub fn clear_path_input(&mut self) {
        self.path_input.clear();
        self.path_cursor = 0;
    }

    pub fn path_cursor_to_end(&mut self) {
        self.path_cursor = self.path_input.len();
    }

    pub fn path_char(&mut self, c: char) {
        if self.path_cursor <= self.path_input.len() {
            self.path_input.insert(self.path_cursor, c);
            self.path_cursor += c.len_utf8();
        }
    }

    pub fn path_backspace(&mut self) {
        if self.path_cursor > 0 {
            let prev = self.path_input[..self.path_cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.path_input.remove(prev);
            self.path_cursor = prev;
        }
    }

    pub fn path_cursor_left(&mut self) {
        if self.path_cursor > 0 {
            self.path_cursor = self.path_input[..self.path_cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn path_cursor_right(&mut self) {
        if self.path_cursor < self.path_input.len() {
            self.path_cursor = self.path_input[self.path_cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.path_cursor + i)
                .unwrap_or(self.path_input.len());
        }
    }

    /// Complete the typed path against directories and accepted image files
    pub fn path_autocomplete(&mut self) {
        let input = expand_home(&self.path_input).to_string_lossy().to_string();
        let path = PathBuf::from(&input);

        if path.is_dir() && !input.ends_with('/') {
            self.path_input = format!("{}/", input);
            self.path_cursor_to_end();
            return;
        }

        let (parent, prefix) = if input.ends_with('/') {
            (PathBuf::from(&input), String::new())
        } else if let Some(parent) = path.parent() {
            let prefix = path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let parent = if parent.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                parent.to_path_buf()
            };
            (parent, prefix)
        } else {
            return;
        };

        let Ok(entries) = fs::read_dir(&parent) else {
            return;
        };

        let mut matches: Vec<(String, bool)> = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let is_dir = e.path().is_dir();
                let name = e.file_name().into_string().ok()?;
                (is_dir || has_accepted_extension(&name)).then_some((name, is_dir))
            })
            .filter(|(name, _)| name.starts_with(&prefix) && !name.starts_with('.'))
            .collect();
        matches.sort();

        if let [(name, is_dir)] = matches.as_slice() {
            let completed = parent.join(name).to_string_lossy().to_string();
            self.path_input = if *is_dir {
                format!("{}/", completed)
            } else {
                completed
            };
        } else if matches.len() > 1 {
            let names: Vec<String> = matches.into_iter().map(|(n, _)| n).collect();
            if let Some(common) = common_prefix(&names) {
                if common.len() > prefix.len() {
                    self.path_input = parent.join(&common).to_string_lossy().to_string();
                }
            }
        }
        self.path_cursor_to_end();
    }
}

fn has_accepted_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| ACCEPTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Expand a leading `~` to the home directory
fn expand_home(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return PathBuf::from(format!("{}{}", home.to_string_lossy(), rest));
        }
    }
    PathBuf::from(input)
}

/// Find common prefix among strings
fn common_prefix(strings: &[String]) -> Option<String> {
    let first = strings.first()?;
    let mut prefix_len = first.len();

    for s in &strings[1..] {
        prefix_len = first
            .char_indices()
            .zip(s.chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map(|((i, a), _)| i + a.len_utf8())
            .unwrap_or(0)
            .min(prefix_len);
    }

    (prefix_len > 0).then(|| first[..prefix_len].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::path::Path;
    use tempfile::tempdir;

    #[derive(Default)]
    struct Recorder(Vec<(String, ToastStatus)>);

    impl Notify for Recorder {
        fn notify(&mut self, message: &str, status: ToastStatus) {
            self.0.push((message.to_string(), status));
        }
    }

    fn image(name: &str, mime: &str) -> SelectedImage {
        SelectedImage {
            path: PathBuf::from(name),
            name: name.to_string(),
            mime: mime.to_string(),
        }
    }

    #[test]
    fn test_rejects_types_outside_accepted_set() {
        for mime in ["image/gif", "image/webp", "text/plain", "application/octet-stream"] {
            let mut form = OptionsForm::new();
            let mut toasts = Recorder::default();
            form.path_input = String::from("some/path");

            form.on_file_change(Some(image("bad", mime)), &mut toasts);

            assert_eq!(form.phase, FormPhase::Idle, "{mime} was stored");
            assert!(form.path_input.is_empty());
            assert_eq!(
                toasts.0,
                vec![(MSG_INVALID_FILE_TYPE.to_string(), ToastStatus::Fail)]
            );
        }
    }

    #[test]
    fn test_rejection_discards_previous_selection() {
        let mut form = OptionsForm::new();
        let mut toasts = Recorder::default();
        form.on_file_change(Some(image("a.png", "image/png")), &mut toasts);
        form.on_file_change(Some(image("b.gif", "image/gif")), &mut toasts);
        assert_eq!(form.file_name(), "");
        assert!(form.submit_disabled());
    }

    #[test]
    fn test_accepts_jpeg_png_jpg() {
        for mime in ACCEPTED_MIME_TYPES {
            let mut form = OptionsForm::new();
            let mut toasts = Recorder::default();
            form.on_file_change(Some(image("ok", mime)), &mut toasts);
            assert_eq!(form.file_name(), "ok");
            assert_eq!(
                toasts.0,
                vec![(MSG_FILE_UPLOADED.to_string(), ToastStatus::Success)]
            );
        }
    }

    #[test]
    fn test_absent_file_is_noop() {
        let mut form = OptionsForm::new();
        let mut toasts = Recorder::default();
        form.on_file_change(Some(image("a.png", "image/png")), &mut toasts);
        form.on_file_change(None, &mut toasts);
        assert_eq!(form.file_name(), "a.png");
        assert_eq!(toasts.0.len(), 1);
    }

    #[test]
    fn test_submit_without_file_reports_and_returns_nothing() {
        let mut form = OptionsForm::new();
        let mut toasts = Recorder::default();
        assert!(form.on_submit(&mut toasts).is_none());
        assert_eq!(
            toasts.0,
            vec![(MSG_SELECT_IMAGE_FIRST.to_string(), ToastStatus::Fail)]
        );
    }

    #[test]
    fn test_submit_collects_selections() {
        let mut form = OptionsForm::new();
        let mut toasts = Recorder::default();
        form.cycle_model();
        form.toggle_cpu_egpu();
        form.on_file_change(Some(image("a.png", "image/png")), &mut toasts);

        let request = form.on_submit(&mut toasts).unwrap();
        assert_eq!(request.model, UpscaleModel::X3);
        assert!(!request.use_gpu);
        assert!(request.use_cpu_egpu);
        assert_eq!(request.image.name, "a.png");
    }

    #[test]
    fn test_acceleration_toggles_are_exclusive() {
        let mut form = OptionsForm::new();
        form.set_use_cpu_egpu(true);
        form.set_use_gpu(true);
        assert!(form.use_gpu && !form.use_cpu_egpu);

        form.set_use_cpu_egpu(true);
        assert!(!form.use_gpu && form.use_cpu_egpu);

        // unchecking leaves the other alone
        form.set_use_cpu_egpu(false);
        assert!(!form.use_gpu && !form.use_cpu_egpu);
    }

    #[test]
    fn test_submit_disabled_while_loading() {
        let mut form = OptionsForm::new();
        let mut toasts = Recorder::default();
        form.on_file_change(Some(image("a.png", "image/png")), &mut toasts);
        assert!(!form.submit_disabled());

        form.begin_submission(image("a.png", "image/png"), 7);
        assert!(form.is_loading());
        assert!(form.submit_disabled());
        assert!(form.on_submit(&mut toasts).is_none());

        assert!(!form.settle(6, true));
        assert!(form.is_loading());
        assert!(form.settle(7, false));
        assert!(matches!(form.phase, FormPhase::Failed(_)));
        assert!(!form.submit_disabled());
    }

    #[test]
    fn test_confirm_path_input_resolves_files() {
        let dir = tempdir().unwrap();
        let png = dir.path().join("art.png");
        File::create(&png).unwrap();

        let mut form = OptionsForm::new();
        let mut toasts = Recorder::default();
        form.path_input = png.to_string_lossy().to_string();
        form.confirm_path_input(&mut toasts);
        assert_eq!(form.file_name(), "art.png");

        form.path_input = dir.path().join("nope.png").to_string_lossy().to_string();
        form.confirm_path_input(&mut toasts);
        assert_eq!(toasts.0.last().unwrap().1, ToastStatus::Fail);
        assert!(form.path_input.is_empty());
        assert_eq!(form.file_name(), "art.png");
    }

    #[test]
    fn test_autocomplete_only_offers_images_and_dirs() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("picture.png")).unwrap();
        File::create(dir.path().join("picture.txt")).unwrap();

        let mut form = OptionsForm::new();
        form.path_input = format!("{}/pic", dir.path().display());
        form.path_autocomplete();
        assert_eq!(
            Path::new(&form.path_input),
            dir.path().join("picture.png").as_path()
        );
        assert_eq!(form.path_cursor, form.path_input.len());
    }

    #[test]
    fn test_path_editing_handles_multibyte() {
        let mut form = OptionsForm::new();
        for c in "añb".chars() {
            form.path_char(c);
        }
        form.path_cursor_left();
        form.path_backspace();
        assert_eq!(form.path_input, "ab");
        assert_eq!(form.path_cursor, 1);
    }

    #[test]
    fn test_common_prefix() {
        let names = vec![String::from("shot_01.png"), String::from("shot_02.png")];
        assert_eq!(common_prefix(&names).as_deref(), Some("shot_0"));
        assert_eq!(common_prefix(&[]), None);
    }
}
