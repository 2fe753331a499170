//! Model API integration.
//!
//! Provides a small trait over the generation service plus the Gemini REST
//! client that implements it, and optional retry with exponential backoff.

pub(crate) mod gemini;
pub(crate) mod provider;
pub(crate) mod retry;

pub use gemini::{GeminiClient, GeminiSettings};
pub use provider::{
    mime_for_path, GenerateRequest, GenerateResponse, GenerativeModel, ImageInput, ImageSource,
    RemoteFile,
};
pub use retry::{backoff_duration, generate_with_retry, is_retryable, RetryPolicy};
