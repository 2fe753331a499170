//! Plain-text report rendering and timestamped report files.
//!
//! The two workflows name their files differently: the multi-call report is
//! `<timestamp>_<stem>.txt`, the single-call report is `<stem>_<timestamp>.txt`.

use crate::types::{MultiCallReport, SingleCallReport};
use chrono::{DateTime, Local, TimeZone};
use std::io;
use std::path::{Path, PathBuf};

/// Timestamp format used in report file names (second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Which workflow produced a report; decides the file name layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Timestamp first: `20250101_120000_party.txt`
    MultiCall,
    /// Name first: `party_20250101_120000.txt`
    SingleCall,
}

/// Render the multi-call report.
pub fn render_multi(report: &MultiCallReport) -> String {
    let mut lines = vec![format!("Image: {}", report.image_path.display())];
    lines.push("\n=== DESCRIPTIONS ===".to_string());
    for d in &report.descriptions {
        lines.push(format!("\n[{}] {}", d.index, d.text));
    }
    lines.push("\n=== JUDGMENTS ===".to_string());
    lines.push(format!("\n{}", report.judgment));
    lines.join("\n")
}

/// Render the single-call report.
pub fn render_single(report: &SingleCallReport) -> String {
    [
        format!("Image: {}", report.image_path.display()),
        "\n=== MODEL OUTPUT ===".to_string(),
        format!("\n{}", report.output),
    ]
    .join("\n")
}

/// Image base name with the extension stripped.
fn image_stem(image_path: &Path) -> String {
    image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Build the report file name for an image at a given time.
pub fn report_file_name<Tz: TimeZone>(kind: ReportKind, image_path: &Path, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let timestamp = at.format(TIMESTAMP_FORMAT);
    let stem = image_stem(image_path);
    match kind {
        ReportKind::MultiCall => format!("{timestamp}_{stem}.txt"),
        ReportKind::SingleCall => format!("{stem}_{timestamp}.txt"),
    }
}

/// Writes rendered reports into a directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write the multi-call report, returning the path written.
    pub fn write_multi(&self, report: &MultiCallReport) -> io::Result<PathBuf> {
        self.write_at(
            ReportKind::MultiCall,
            &report.image_path,
            &render_multi(report),
            &Local::now(),
        )
    }

    /// Write the single-call report, returning the path written.
    pub fn write_single(&self, report: &SingleCallReport) -> io::Result<PathBuf> {
        self.write_at(
            ReportKind::SingleCall,
            &report.image_path,
            &render_single(report),
            &Local::now(),
        )
    }

    fn write_at<Tz: TimeZone>(
        &self,
        kind: ReportKind,
        image_path: &Path,
        contents: &str,
        at: &DateTime<Tz>,
    ) -> io::Result<PathBuf>
    where
        Tz::Offset: std::fmt::Display,
    {
        let path = self.dir.join(report_file_name(kind, image_path, at));
        std::fs::write(&path, contents)?;
        tracing::debug!("Wrote {} bytes to {:?}", contents.len(), path);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Description;
    use chrono::Utc;

    fn party_report() -> MultiCallReport {
        MultiCallReport {
            image_path: PathBuf::from("party.png"),
            descriptions: vec![
                Description::new(1, "D1"),
                Description::new(2, "D2"),
                Description::new(3, "D3"),
            ],
            judgment: r#"{"items":[...]}"#.to_string(),
        }
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 2).unwrap()
    }

    #[test]
    fn test_render_multi_exact() {
        let text = render_multi(&party_report());
        let expected = "Image: party.png\n\
                        \n=== DESCRIPTIONS ===\n\
                        \n[1] D1\n\
                        \n[2] D2\n\
                        \n[3] D3\n\
                        \n=== JUDGMENTS ===\n\
                        \n{\"items\":[...]}";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_multi_section_order() {
        let text = render_multi(&party_report());
        let desc = text.find("=== DESCRIPTIONS ===").unwrap();
        let judg = text.find("=== JUDGMENTS ===").unwrap();
        assert!(desc < text.find("[1] D1").unwrap());
        assert!(text.find("[3] D3").unwrap() < judg);
        assert!(judg < text.find(r#"{"items":[...]}"#).unwrap());
    }

    #[test]
    fn test_render_single() {
        let report = SingleCallReport {
            image_path: PathBuf::from("imgs/party.jpg"),
            output: "{\"items\": []}".to_string(),
        };
        assert_eq!(
            render_single(&report),
            "Image: imgs/party.jpg\n\n=== MODEL OUTPUT ===\n\n{\"items\": []}"
        );
    }

    #[test]
    fn test_file_name_order_differs_by_workflow() {
        let at = fixed_time();
        let path = Path::new("photos/party.png");
        assert_eq!(
            report_file_name(ReportKind::MultiCall, path, &at),
            "20250307_090502_party.txt"
        );
        assert_eq!(
            report_file_name(ReportKind::SingleCall, path, &at),
            "party_20250307_090502.txt"
        );
    }

    #[test]
    fn test_file_name_strips_only_last_extension() {
        let at = fixed_time();
        assert_eq!(
            report_file_name(ReportKind::MultiCall, Path::new("a.b.webp"), &at),
            "20250307_090502_a.b.txt"
        );
        assert_eq!(
            report_file_name(ReportKind::SingleCall, Path::new("noext"), &at),
            "noext_20250307_090502.txt"
        );
    }

    #[test]
    fn test_writer_creates_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path());

        let path = writer.write_multi(&party_report()).unwrap();
        assert!(path.starts_with(dir.path()));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.ends_with("_party.txt"));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("=== JUDGMENTS ==="));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_writer_missing_dir_errors() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path().join("does/not/exist"));
        let report = SingleCallReport {
            image_path: PathBuf::from("party.png"),
            output: String::new(),
        };
        assert!(writer.write_single(&report).is_err());
    }
}
