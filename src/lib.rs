//! # Anime Image Enhancer TUI
//!
//! A terminal front-end for an image upscaling service.
//!
//! ## Features
//! - Upscaling models: 2x, 3x
//! - Optional CUDA or OpenCL acceleration (mutually exclusive)
//! - Image picker with path completion, JPEG/PNG only
//! - Multipart upload to the enhancement endpoint
//! - Result panel with download
//! - Auto-dismissing toast notifications
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod config;
pub mod constants;
pub mod models;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use config::Config;
pub use models::{SelectedImage, SubmissionRequest, ToastStatus, UpscaleModel};
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use app::{AppActor, AppState};
pub use network::NetworkActor;
