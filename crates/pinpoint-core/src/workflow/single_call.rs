//! Single-call workflow: upload once, then one JSON-constrained request.

use crate::error::SingleCallError;
use crate::llm::{
    generate_with_retry, GenerateRequest, GenerativeModel, ImageInput, ImageSource, RetryPolicy,
};
use crate::prompts::{single_call_prompt, single_call_system_instruction};
use crate::types::SingleCallReport;
use std::path::Path;

/// Uploads the image and asks the model to describe and judge in one request.
///
/// The response is requested as JSON but returned as raw text.
pub struct SingleCallOrchestrator {
    model: Box<dyn GenerativeModel>,
    retry: RetryPolicy,
}

impl SingleCallOrchestrator {
    pub fn new(model: Box<dyn GenerativeModel>) -> Self {
        Self {
            model,
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn run(&self, image_path: &Path) -> Result<SingleCallReport, SingleCallError> {
        let image = ImageInput::from_path(image_path)
            .await
            .map_err(SingleCallError::Upload)?;
        let file = self
            .model
            .upload(&image)
            .await
            .map_err(SingleCallError::Upload)?;
        tracing::info!(file = %file.name, "Uploaded {:?}", image_path);

        let request = GenerateRequest::new(ImageSource::Remote(file), single_call_prompt())
            .with_system_instruction(single_call_system_instruction())
            .with_json_output();
        let response = generate_with_retry(self.model.as_ref(), &request, self.retry)
            .await
            .map_err(SingleCallError::Generate)?;
        tracing::info!(
            model = %response.model,
            latency_ms = response.latency_ms,
            tokens = ?response.tokens_used,
            "{} call complete",
            self.model.name()
        );

        Ok(SingleCallReport {
            image_path: image_path.to_path_buf(),
            output: response.text,
        })
    }
}
