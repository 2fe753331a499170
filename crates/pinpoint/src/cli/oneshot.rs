//! The `pinpoint oneshot` command: single-call workflow.
//!
//! Upload and model-call failures come back as a `SingleCallError`, and a
//! rejected `--strict` check as a `JudgmentError`; `main` reports both as a
//! single line on stderr with exit code 1.

use super::RunArgs;
use pinpoint_core::{
    parse_single_call_output, Config, GeminiClient, GeminiSettings, ReportWriter, RetryPolicy,
    SingleCallOrchestrator,
};

/// Execute the oneshot command.
pub async fn execute(args: RunArgs, config: &Config) -> anyhow::Result<()> {
    let settings = GeminiSettings::from_config(config, args.model.as_deref())?;
    tracing::info!("Describing {:?} with {} (single call)", args.image, settings.model);

    let orchestrator = SingleCallOrchestrator::new(Box::new(GeminiClient::new(settings)))
        .with_retry(RetryPolicy::from(&config.llm));

    let report = orchestrator.run(&args.image).await?;

    if args.strict {
        parse_single_call_output(&report.output)?;
    }

    let path = ReportWriter::new(args.report_dir(config)).write_single(&report)?;
    println!("\nResults saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinpoint_core::{JudgmentError, SingleCallError};
    use std::path::{Path, PathBuf};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/v1beta/models/gemini-test:generateContent";

    fn config(server: &MockServer) -> Config {
        let mut config = Config::default();
        config.llm.endpoint = server.uri();
        config.llm.api_key = "test-key".to_string();
        config
    }

    fn args(image: &Path, out: &Path, strict: bool) -> RunArgs {
        RunArgs {
            image: image.to_path_buf(),
            model: Some("gemini-test".to_string()),
            output_dir: Some(out.to_path_buf()),
            strict,
        }
    }

    fn party_png(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("party.png");
        std::fs::write(&path, [0x89, 0x50, 0x4E, 0x47]).unwrap();
        path
    }

    fn report_count(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    async fn mount_upload(server: &MockServer) {
        let session_url = format!("{}/upload-session/1", server.uri());
        Mock::given(method("POST"))
            .and(path("/upload/v1beta/files"))
            .respond_with(
                ResponseTemplate::new(200).insert_header("X-Goog-Upload-URL", session_url.as_str()),
            )
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/upload-session/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "file": {
                    "name": "files/xyz",
                    "uri": "https://files.test/v1beta/files/xyz",
                    "mimeType": "image/png"
                }
            })))
            .mount(server)
            .await;
    }

    fn text_response(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}]}}]
        }))
    }

    #[tokio::test]
    async fn test_upload_rejected_writes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload/v1beta/files"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad upload"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(text_response("{}"))
            .expect(0)
            .mount(&server)
            .await;

        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let err = execute(args(&party_png(&input), out.path(), false), &config(&server))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<SingleCallError>(),
            Some(SingleCallError::Upload(_))
        ));
        assert!(err.to_string().starts_with("Upload failed:"));
        assert_eq!(report_count(out.path()), 0);
    }

    #[tokio::test]
    async fn test_model_call_error_writes_nothing() {
        let server = MockServer::start().await;
        mount_upload(&server).await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .expect(1)
            .mount(&server)
            .await;

        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let err = execute(args(&party_png(&input), out.path(), false), &config(&server))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<SingleCallError>(),
            Some(SingleCallError::Generate(_))
        ));
        assert!(err.to_string().starts_with("Model call failed:"));
        assert_eq!(report_count(out.path()), 0);
    }

    #[tokio::test]
    async fn test_strict_rejects_non_json_output() {
        let server = MockServer::start().await;
        mount_upload(&server).await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(text_response("The woman in the red dress."))
            .expect(1)
            .mount(&server)
            .await;

        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let err = execute(args(&party_png(&input), out.path(), true), &config(&server))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<JudgmentError>(),
            Some(JudgmentError::Parse(_))
        ));
        assert_eq!(report_count(out.path()), 0);
    }

    #[tokio::test]
    async fn test_raw_output_saved_without_strict() {
        let server = MockServer::start().await;
        mount_upload(&server).await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(text_response("not json at all"))
            .expect(1)
            .mount(&server)
            .await;

        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        execute(args(&party_png(&input), out.path(), false), &config(&server))
            .await
            .unwrap();

        let entries: Vec<_> = std::fs::read_dir(out.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries.len(), 1);
        let name = entries[0].file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("party_"));
        assert!(std::fs::read_to_string(&entries[0])
            .unwrap()
            .contains("not json at all"));
    }
}
