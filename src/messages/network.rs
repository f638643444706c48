//! Network messages - communication between App and Network layers

use std::path::PathBuf;

use crate::models::SubmissionRequest;

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Upload an image to the enhancement endpoint
    Enhance {
        id: u64,
        endpoint: String,
        request: SubmissionRequest,
    },
    /// Fetch an enhanced image and save it under `dest_dir`
    Download {
        id: u64,
        url: String,
        dest_dir: PathBuf,
    },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// The service accepted the image and reported where it stored the result
    Enhanced {
        id: u64,
        output_path: String,
        time_ms: u64,
    },
    /// Transport error, non-2xx status or unreadable payload
    EnhanceFailed {
        id: u64,
        message: String,
        time_ms: u64,
    },
    Downloaded {
        id: u64,
        path: PathBuf,
    },
    DownloadFailed {
        id: u64,
        message: String,
    },
}
