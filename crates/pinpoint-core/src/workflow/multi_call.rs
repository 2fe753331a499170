//! Multi-call workflow: generate(1) → generate(2) → generate(3) → judge.

use crate::error::Result;
use crate::llm::{
    generate_with_retry, GenerateRequest, GenerativeModel, ImageInput, ImageSource, RetryPolicy,
};
use crate::prompts::{description_prompt, judge_prompt, DESCRIPTION_PROMPTS};
use crate::types::{Description, MultiCallReport};
use std::path::Path;

/// Runs three independent description calls followed by one judge call.
///
/// Each description call sees only the image and its own prompt. Calls are
/// awaited one at a time; the first failure aborts the run.
pub struct JudgeOrchestrator {
    model: Box<dyn GenerativeModel>,
    retry: RetryPolicy,
}

impl JudgeOrchestrator {
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

    async fn ask(&self, image: &ImageInput, prompt: String, step: &str) -> Result<String> {
        let request = GenerateRequest::new(ImageSource::Inline(image.clone()), prompt);
        let response = generate_with_retry(self.model.as_ref(), &request, self.retry).await?;
        tracing::info!(
            step,
            model = %response.model,
            latency_ms = response.latency_ms,
            tokens = ?response.tokens_used,
            "{} call complete",
            self.model.name()
        );
        Ok(response.text)
    }

    /// Generate the descriptions, judge them, and return the unwritten report.
    pub async fn run(&self, image_path: &Path) -> Result<MultiCallReport> {
        let image = ImageInput::from_path(image_path).await?;
        tracing::debug!(
            "Loaded {:?} ({} bytes, {})",
            image_path,
            image.size,
            image.mime_type
        );

        let mut descriptions = Vec::with_capacity(DESCRIPTION_PROMPTS.len());
        for (i, task) in DESCRIPTION_PROMPTS.iter().enumerate() {
            let index = i + 1;
            let step = format!("describe-{index}");
            let text = self.ask(&image, description_prompt(task), &step).await?;
            descriptions.push(Description::new(index, text));
        }

        let judgment = self
            .ask(&image, judge_prompt(&descriptions), "judge")
            .await?;

        Ok(MultiCallReport {
            image_path: image_path.to_path_buf(),
            descriptions,
            judgment,
        })
    }
}
