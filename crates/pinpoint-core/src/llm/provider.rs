//! Generation model trait and request/response types.
//!
//! Defines the interface the workflows talk to, so they can run against the
//! real Gemini client or an in-process stub.

use crate::error::{LlmError, LlmResult};
use async_trait::async_trait;
use base64::Engine;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Infer an image MIME type from the file extension (case-insensitive).
///
/// Only JPEG and WebP are recognized; every other extension, including none,
/// falls back to `image/png` without inspecting the file contents.
pub fn mime_for_path(path: &Path) -> &'static str {
    let lower = path.to_string_lossy().to_lowercase();
    if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else {
        tracing::debug!("No recognized image extension on {path:?}, using image/png");
        "image/png"
    }
}

/// Image bytes plus their base64 encoding, ready to send inline or upload.
///
/// Both payloads sit behind `Arc`s, so cloning into several requests is cheap.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Path the bytes were read from
    pub path: PathBuf,
    /// Raw image bytes as read from disk
    pub bytes: Arc<[u8]>,
    /// Base64-encoded image bytes
    pub data: Arc<str>,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub mime_type: String,
    /// Raw byte length before encoding
    pub size: usize,
}

impl ImageInput {
    /// Create an `ImageInput` from raw bytes, inferring the MIME type from `path`.
    pub fn from_bytes(path: &Path, bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes: Arc<[u8]> = bytes.into();
        Self {
            path: path.to_path_buf(),
            data: base64::engine::general_purpose::STANDARD.encode(&bytes).into(),
            mime_type: mime_for_path(path).to_string(),
            size: bytes.len(),
            bytes,
        }
    }

    /// Read the whole image file into memory.
    pub async fn from_path(path: &Path) -> LlmResult<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| LlmError::ImageRead {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_bytes(path, bytes))
    }

    /// File name used as the display name for uploads.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string())
    }
}

/// A file previously uploaded to the service, referenced by URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Resource name (e.g., "files/abc123")
    pub name: String,
    /// URI to reference in generation requests
    pub uri: String,
    /// MIME type reported by the service
    pub mime_type: String,
}

/// Where the image part of a request comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Bytes sent inline with the request
    Inline(ImageInput),
    /// A previously uploaded file handle
    Remote(RemoteFile),
}

/// A single generation request: one image part followed by one text part.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// The image the model should look at
    pub image: ImageSource,
    /// Text prompt for the model
    pub prompt: String,
    /// Optional system-level framing
    pub system_instruction: Option<String>,
    /// Ask the service to constrain output to JSON
    pub json_output: bool,
}

impl GenerateRequest {
    /// Plain image + prompt request with no extra framing.
    pub fn new(image: ImageSource, prompt: impl Into<String>) -> Self {
        Self {
            image,
            prompt: prompt.into(),
            system_instruction: None,
            json_output: false,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// The response from a generation call.
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    /// Generated text, trimmed; empty if the service returned none
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that generation backends implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the workflows hold a `Box<dyn GenerativeModel>`).
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Backend name for logging (e.g., "gemini").
    fn name(&self) -> &str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Generate text for the given request.
    async fn generate(&self, request: &GenerateRequest) -> LlmResult<GenerateResponse>;

    /// Upload an image and return a reusable remote handle.
    async fn upload(&self, image: &ImageInput) -> LlmResult<RemoteFile>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_jpeg_case_insensitive() {
        assert_eq!(mime_for_path(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a.JPEG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("dir/photo.JpG")), "image/jpeg");
    }

    #[test]
    fn test_mime_webp() {
        assert_eq!(mime_for_path(Path::new("a.webp")), "image/webp");
        assert_eq!(mime_for_path(Path::new("a.WEBP")), "image/webp");
    }

    #[test]
    fn test_mime_fallback_png() {
        assert_eq!(mime_for_path(Path::new("a.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("a.gif")), "image/png");
        assert_eq!(mime_for_path(Path::new("no_extension")), "image/png");
        assert_eq!(mime_for_path(Path::new("jpg")), "image/png");
    }

    #[test]
    fn test_image_input_from_bytes() {
        let input = ImageInput::from_bytes(Path::new("shot.jpeg"), vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(input.mime_type, "image/jpeg");
        assert_eq!(&*input.data, "/9j/");
        assert_eq!(input.size, 3);
        assert_eq!(&*input.bytes, &[0xFF, 0xD8, 0xFF]);
        assert_eq!(input.display_name(), "shot.jpeg");
    }

    #[tokio::test]
    async fn test_image_input_from_missing_path() {
        let err = ImageInput::from_path(Path::new("/definitely/not/here.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::ImageRead { .. }));
    }

    #[tokio::test]
    async fn test_image_input_from_path_reads_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("party.png");
        std::fs::write(&path, vec![7u8; 4096]).unwrap();

        let input = ImageInput::from_path(&path).await.unwrap();
        assert_eq!(input.size, 4096);
        assert_eq!(input.mime_type, "image/png");
    }

    #[test]
    fn test_clone_shares_payload() {
        let input = ImageInput::from_bytes(Path::new("a.png"), vec![9u8; 1024]);
        let copy = input.clone();
        assert!(Arc::ptr_eq(&input.bytes, &copy.bytes));
        assert!(Arc::ptr_eq(&input.data, &copy.data));
    }

    #[test]
    fn test_request_builders() {
        let image = ImageInput::from_bytes(Path::new("a.png"), vec![1, 2, 3]);
        let request = GenerateRequest::new(ImageSource::Inline(image), "describe")
            .with_system_instruction("only the image")
            .with_json_output();
        assert_eq!(request.prompt, "describe");
        assert_eq!(request.system_instruction.as_deref(), Some("only the image"));
        assert!(request.json_output);
    }
}
