//! Pinpoint Core - describe and rank a marked person in an image.
//!
//! Sends an image and prompts to Gemini, collects one-sentence descriptions of
//! the bounded (highlighted) individual, asks the same model to rank them, and
//! writes the raw results to a timestamped text report.
//!
//! # Workflows
//!
//! ```text
//! multi-call:  describe(1) → describe(2) → describe(3) → judge → report
//! single-call: upload → describe+judge (JSON mode) → report
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use pinpoint_core::{Config, GeminiClient, GeminiSettings, JudgeOrchestrator, ReportWriter};
//!
//! #[tokio::main]
//! async fn main() -> pinpoint_core::Result<()> {
//!     let config = Config::load()?;
//!     let client = GeminiClient::new(GeminiSettings::from_config(&config, None)?);
//!
//!     let report = JudgeOrchestrator::new(Box::new(client))
//!         .run("party.png".as_ref())
//!         .await?;
//!     let path = ReportWriter::new(config.output_dir()).write_multi(&report)?;
//!     println!("Results saved to {}", path.display());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod judgment;
pub mod llm;
pub mod output;
pub mod prompts;
pub mod types;
pub mod workflow;

// Re-exports for convenient access
pub use config::Config;
pub use error::{
    ConfigError, JudgmentError, LlmError, PinpointError, Result, SingleCallError,
};
pub use judgment::{parse_judgment, parse_single_call_output, Judgment};
pub use llm::{GeminiClient, GeminiSettings, GenerativeModel, RetryPolicy};
pub use output::{ReportKind, ReportWriter};
pub use types::{Description, MultiCallReport, SingleCallReport};
pub use workflow::{JudgeOrchestrator, SingleCallOrchestrator};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
