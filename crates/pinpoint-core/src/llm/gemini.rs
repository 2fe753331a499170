//! Gemini provider using the `generateContent` REST API.
//!
//! Images are sent either inline (base64 `inlineData` part) or by reference to
//! a file uploaded through the resumable Files API (`fileData` part).

use super::provider::{
    GenerateRequest, GenerateResponse, GenerativeModel, ImageInput, ImageSource, RemoteFile,
};
use crate::config::Config;
use crate::error::{ConfigError, LlmError, LlmResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Everything the client needs, passed in explicitly.
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// Base URL, without a trailing slash
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl GeminiSettings {
    /// Build settings from config, resolving the API key.
    ///
    /// `model_override` (CLI flag or `GEMINI_MODEL`) wins over `llm.model`.
    pub fn from_config(config: &Config, model_override: Option<&str>) -> Result<Self, ConfigError> {
        let api_key = config.api_key()?;
        let model = model_override
            .filter(|m| !m.trim().is_empty())
            .map(String::from)
            .unwrap_or_else(|| config.llm.model.clone());
        Ok(Self {
            endpoint: config.llm.endpoint.trim_end_matches('/').to_string(),
            api_key,
            model,
            timeout: config.llm.timeout_ms.map(Duration::from_millis),
        })
    }
}

/// Gemini provider.
pub struct GeminiClient {
    settings: GeminiSettings,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings) -> Self {
        Self {
            settings,
            client: reqwest::Client::new(),
        }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.endpoint, self.settings.model
        )
    }

    fn upload_url(&self) -> String {
        format!("{}/upload/v1beta/files", self.settings.endpoint)
    }

    fn with_timeout(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.settings.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    fn request_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout {
                timeout_ms: self
                    .settings
                    .timeout
                    .map(|t| t.as_millis() as u64)
                    .unwrap_or_default(),
            }
        } else {
            LlmError::Request {
                message: format!("Gemini request failed: {e}"),
            }
        }
    }

    async fn check_status(resp: reqwest::Response) -> LlmResult<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(LlmError::Http {
            status: status.as_u16(),
            body,
        })
    }

    /// Start a resumable upload session and return the session URL.
    async fn start_upload(&self, image: &ImageInput) -> LlmResult<String> {
        let metadata = UploadMetadata {
            file: UploadFileMetadata {
                display_name: image.display_name(),
            },
        };

        let builder = self
            .client
            .post(self.upload_url())
            .header("x-goog-api-key", &self.settings.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", image.size)
            .header("X-Goog-Upload-Header-Content-Type", &image.mime_type)
            .json(&metadata);

        let resp = self
            .with_timeout(builder)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        let resp = Self::check_status(resp).await?;

        resp.headers()
            .get("X-Goog-Upload-URL")
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .ok_or_else(|| LlmError::MissingHeader {
                header: "X-Goog-Upload-URL".to_string(),
            })
    }
}

// --- Request types ---

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: Blob<'a>,
    },
    File {
        #[serde(rename = "fileData")]
        file_data: FileData<'a>,
    },
}

#[derive(Serialize)]
struct Blob<'a> {
    #[serde(rename = "mimeType")]
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
struct FileData<'a> {
    #[serde(rename = "mimeType")]
    mime_type: &'a str,
    #[serde(rename = "fileUri")]
    file_uri: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Serialize)]
struct UploadMetadata {
    file: UploadFileMetadata,
}

#[derive(Serialize)]
struct UploadFileMetadata {
    display_name: String,
}

// --- Response types ---

#[derive(Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
    #[serde(rename = "modelVersion")]
    model_version: Option<String>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct UsageMetadata {
    #[serde(rename = "totalTokenCount")]
    total_token_count: Option<u32>,
}

#[derive(Deserialize)]
struct UploadResponse {
    file: UploadedFile,
}

#[derive(Deserialize)]
struct UploadedFile {
    name: String,
    uri: String,
    #[serde(rename = "mimeType")]
    mime_type: Option<String>,
}

/// Text of the first candidate, parts concatenated and trimmed.
///
/// Blocked or empty responses carry no text; that yields an empty string.
fn extract_text(response: &GenerateContentResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<String>()
        })
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn build_body(request: &GenerateRequest) -> GenerateContentRequest<'_> {
    let image_part = match &request.image {
        ImageSource::Inline(image) => Part::Inline {
            inline_data: Blob {
                mime_type: &image.mime_type,
                data: &image.data,
            },
        },
        ImageSource::Remote(file) => Part::File {
            file_data: FileData {
                mime_type: &file.mime_type,
                file_uri: &file.uri,
            },
        },
    };

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user"),
            parts: vec![
                image_part,
                Part::Text {
                    text: &request.prompt,
                },
            ],
        }],
        system_instruction: request.system_instruction.as_deref().map(|text| Content {
            role: None,
            parts: vec![Part::Text { text }],
        }),
        generation_config: request.json_output.then(|| GenerationConfig {
            response_mime_type: "application/json".to_string(),
        }),
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn generate(&self, request: &GenerateRequest) -> LlmResult<GenerateResponse> {
        let start = Instant::now();
        let body = build_body(request);

        let builder = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.settings.api_key)
            .json(&body);

        let resp = self
            .with_timeout(builder)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        let resp = Self::check_status(resp).await?;

        let gen_resp: GenerateContentResponse =
            resp.json().await.map_err(|e| LlmError::Decode {
                message: format!("Failed to parse Gemini response: {e}"),
            })?;

        let text = extract_text(&gen_resp);
        if text.is_empty() {
            tracing::debug!("Gemini returned no text, using empty string");
        }

        Ok(GenerateResponse {
            text,
            model: gen_resp
                .model_version
                .unwrap_or_else(|| self.settings.model.clone()),
            tokens_used: gen_resp.usage_metadata.and_then(|u| u.total_token_count),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn upload(&self, image: &ImageInput) -> LlmResult<RemoteFile> {
        let session_url = self.start_upload(image).await?;
        let builder = self
            .client
            .post(&session_url)
            .header("X-Goog-Upload-Command", "upload, finalize")
            .header("X-Goog-Upload-Offset", "0")
            .body(image.bytes.to_vec());

        let resp = self
            .with_timeout(builder)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        let resp = Self::check_status(resp).await?;

        let upload: UploadResponse = resp.json().await.map_err(|e| LlmError::Decode {
            message: format!("Failed to parse upload response: {e}"),
        })?;

        tracing::debug!("Uploaded {:?} as {}", image.path, upload.file.name);

        Ok(RemoteFile {
            name: upload.file.name,
            uri: upload.file.uri,
            mime_type: upload
                .file
                .mime_type
                .unwrap_or_else(|| image.mime_type.clone()),
        })
    }
}
