//! HTTP client wrapper - uploads images for enhancement and fetches results

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use tokio::io::AsyncWriteExt;

use crate::messages::NetworkResponse;
use crate::models::{EnhanceResponse, SubmissionRequest};

/// Build the multipart body: `file`, `model`, `use_gpu`, `use_cpu_egpu`
async fn build_form(request: &SubmissionRequest) -> Result<Form> {
    let bytes = tokio::fs::read(&request.image.path)
        .await
        .with_context(|| format!("reading {}", request.image.path.display()))?;

    let file = Part::bytes(bytes)
        .file_name(request.image.name.clone())
        .mime_str(&request.image.mime)?;

    Ok(Form::new()
        .part("file", file)
        .text("model", request.model.as_str())
        .text("use_gpu", request.use_gpu.to_string())
        .text("use_cpu_egpu", request.use_cpu_egpu.to_string()))
}

/// POST the image and decode the service's answer
pub async fn enhance(
    client: &reqwest::Client,
    endpoint: &str,
    request: &SubmissionRequest,
) -> Result<EnhanceResponse> {
    let form = build_form(request).await?;
    let resp = client
        .post(endpoint)
        .multipart(form)
        .send()
        .await?
        .error_for_status()?;

    Ok(resp.json::<EnhanceResponse>().await?)
}

/// Execute an enhancement and wrap the outcome as a response message
pub async fn execute_enhance(
    client: &reqwest::Client,
    endpoint: String,
    request: SubmissionRequest,
    request_id: u64,
) -> NetworkResponse {
    let start = Instant::now();
    let result = enhance(client, &endpoint, &request).await;
    let time_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(body) => NetworkResponse::Enhanced {
            id: request_id,
            output_path: body.output_path,
            time_ms,
        },
        Err(e) => NetworkResponse::EnhanceFailed {
            id: request_id,
            message: format!("{:#}", e),
            time_ms,
        },
    }
}

/// Stream an image into `dest_dir`, named after the last URL segment
pub async fn download(client: &reqwest::Client, url: &str, dest_dir: &Path) -> Result<PathBuf> {
    let resp = client.get(url).send().await?.error_for_status()?;

    let file_name = resp
        .url()
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .unwrap_or("enhanced.png")
        .to_string();

    tokio::fs::create_dir_all(dest_dir).await?;
    let dest = free_destination(dest_dir, &file_name);
    let mut file = tokio::fs::File::create_new(&dest)
        .await
        .with_context(|| format!("creating {}", dest.display()))?;

    let mut stream = resp.bytes_stream();
    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;

    Ok(dest)
}

/// First path in `dir` that does not exist yet: `name.ext`, then `name (1).ext`, ...
fn free_destination(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let ext = name.extension().map(|e| e.to_string_lossy().into_owned());

    (1u32..)
        .map(|n| match &ext {
            Some(ext) => dir.join(format!("{} ({}).{}", stem, n, ext)),
            None => dir.join(format!("{} ({})", stem, n)),
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

pub async fn execute_download(
    client: &reqwest::Client,
    url: String,
    dest_dir: PathBuf,
    request_id: u64,
) -> NetworkResponse {
    match download(client, &url, &dest_dir).await {
        Ok(path) => NetworkResponse::Downloaded {
            id: request_id,
            path,
        },
        Err(e) => NetworkResponse::DownloadFailed {
            id: request_id,
            message: format!("{:#}", e),
        },
    }
}

/// Create an HTTP client. No timeout is set: submissions wait as long as the
/// transport allows.
pub fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
