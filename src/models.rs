use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use serde::Deserialize;

/// Upscaling model offered by the enhancement service
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum UpscaleModel {
    #[default]
    X2,
    X3,
}

impl UpscaleModel {
    pub const ALL: [UpscaleModel; 2] = [UpscaleModel::X2, UpscaleModel::X3];

    /// Identifier sent over the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            UpscaleModel::X2 => "x2",
            UpscaleModel::X3 => "x3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UpscaleModel::X2 => "2x Upscale",
            UpscaleModel::X3 => "3x Upscale",
        }
    }

    pub fn next(&self) -> UpscaleModel {
        match self {
            UpscaleModel::X2 => UpscaleModel::X3,
            UpscaleModel::X3 => UpscaleModel::X2,
        }
    }
}

/// An image file picked by the user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedImage {
    pub path: PathBuf,
    /// File name shown in the picker
    pub name: String,
    /// MIME type declared by the file extension
    pub mime: String,
}

impl SelectedImage {
    /// Resolve a path to a regular file and declare its MIME type.
    ///
    /// The content is not sniffed: like a browser file input, the declared
    /// type comes from the extension alone.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let meta = fs::metadata(path)?;
        if !meta.is_file() {
            bail!("{} is not a regular file", path.display());
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(SelectedImage {
            path: path.to_path_buf(),
            name,
            mime: mime_from_extension(path).to_string(),
        })
    }
}

/// Map a file extension to the MIME type a browser would declare for it
pub fn mime_from_extension(path: &Path) -> mime::Mime {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "png" => mime::IMAGE_PNG,
        "gif" => mime::IMAGE_GIF,
        "bmp" => mime::IMAGE_BMP,
        "svg" => mime::IMAGE_SVG,
        "txt" => mime::TEXT_PLAIN,
        "webp" => "image/webp".parse().unwrap_or(mime::APPLICATION_OCTET_STREAM),
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

/// Parameters collected by the options form for one enhancement
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub model: UpscaleModel,
    pub use_gpu: bool,
    pub use_cpu_egpu: bool,
    pub image: SelectedImage,
}

/// Success payload returned by the enhancement service
#[derive(Clone, Debug, Deserialize)]
pub struct EnhanceResponse {
    pub output_path: String,
}

/// Visual style of a toast
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ToastStatus {
    #[default]
    Success,
    Fail,
}

impl ToastStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastStatus::Success => "success",
            ToastStatus::Fail => "fail",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_model_cycle_stays_in_range() {
        let mut model = UpscaleModel::default();
        assert_eq!(model, UpscaleModel::X2);
        for _ in 0..5 {
            model = model.next();
            assert!(UpscaleModel::ALL.contains(&model));
        }
        assert_eq!(model, UpscaleModel::X3);
    }

    #[test]
    fn test_model_wire_ids() {
        assert_eq!(UpscaleModel::X2.as_str(), "x2");
        assert_eq!(UpscaleModel::X3.as_str(), "x3");
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_from_extension(Path::new("a.PNG")), mime::IMAGE_PNG);
        assert_eq!(mime_from_extension(Path::new("a.jpeg")), mime::IMAGE_JPEG);
        assert_eq!(mime_from_extension(Path::new("a.jpg")), mime::IMAGE_JPEG);
        assert_eq!(mime_from_extension(Path::new("a.gif")), mime::IMAGE_GIF);
        assert_eq!(
            mime_from_extension(Path::new("noext")),
            mime::APPLICATION_OCTET_STREAM
        );
    }

    #[test]
    fn test_selected_image_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("waifu.png");
        File::create(&path).unwrap();

        let image = SelectedImage::from_path(&path).unwrap();
        assert_eq!(image.name, "waifu.png");
        assert_eq!(image.mime, "image/png");
    }

    #[test]
    fn test_selected_image_rejects_directories_and_missing() {
        let dir = tempdir().unwrap();
        assert!(SelectedImage::from_path(dir.path()).is_err());
        assert!(SelectedImage::from_path(dir.path().join("missing.png")).is_err());
    }
}
