//! Render state - data structure sent from App layer to UI for rendering

use crate::app::toast::ToastState;
use crate::config::Config;
use crate::messages::ui_events::{Field, InputMode};
use crate::models::UpscaleModel;

/// What the Result panel shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultView {
    /// Nothing enhanced yet
    #[default]
    Placeholder,
    /// An enhanced image reference and where it can be fetched from
    Image { path: String, url: String },
}

impl ResultView {
    /// Pure function of the current image reference. The reference is not
    /// checked for reachability.
    pub fn from_image_ref(image: Option<&str>, config: &Config) -> Self {
        match image {
            Some(path) => ResultView::Image {
                path: path.to_string(),
                url: config.asset_url(path),
            },
            None => ResultView::Placeholder,
        }
    }
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // UI state
    pub focus: Field,
    pub input_mode: InputMode,
    pub show_help: bool,

    // Options form
    pub model: UpscaleModel,
    pub use_gpu: bool,
    pub use_cpu_egpu: bool,
    /// Name of the selected file, empty when none
    pub file_name: String,
    pub path_input: String,
    pub path_cursor: usize,

    // Submission
    pub is_loading: bool,
    pub submit_disabled: bool,

    // Result
    pub result: ResultView,
    pub is_downloading: bool,

    // Toast
    pub toast: ToastState,
}
