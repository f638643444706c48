//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Enhancement endpoint used when no config file overrides it
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/enhance";

/// Origin serving the enhancement service's public directory
pub const DEFAULT_ASSET_BASE_URL: &str = "http://127.0.0.1:5173";

/// Server-side storage root; everything after it is web-servable
pub const DEFAULT_STORAGE_ROOT_MARKER: &str = "public\\";

/// How long a toast stays on screen
pub const DEFAULT_TOAST_TIMEOUT_MS: u64 = 3000;

/// Config directory name under $HOME
pub const CONFIG_DIR_NAME: &str = ".enhancer-tui";

/// Log file written in the working directory
pub const LOG_FILE_NAME: &str = "enhancer.log";

/// MIME types accepted by the file picker
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

/// Extensions offered by path completion
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

// Toast messages
pub const MSG_INVALID_FILE_TYPE: &str = "Please select a valid image file (JPEG, PNG, or JPG)";
pub const MSG_FILE_UPLOADED: &str = "File uploaded successfully!";
pub const MSG_SELECT_IMAGE_FIRST: &str = "Please select an image first";
pub const MSG_NO_IMAGE_UPLOADED: &str = "You didn't upload an image!";
pub const MSG_ENHANCED: &str = "Your image has been enhanced!";
pub const MSG_ENHANCE_FAILED: &str = "Fail to enhance your image!";
pub const MSG_DOWNLOAD_FAILED: &str = "Fail to download your image!";

/// Application name
pub const APP_NAME: &str = "Anime Image Enhancer";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
