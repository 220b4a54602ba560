//! Outcome of a pipeline entry point.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use handson_core::Error;

pub const NO_ACTIVITIES: &str = "No activities found in the PDF.";
pub const NO_MATCHES: &str = "No matches found in the provided JSON files.";
pub const NOTHING_GENERATED: &str = "No new activities were generated.";
pub const INVALID_TWO_PATHS: &str = "Invalid input. Please provide two valid JSON file paths.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Success,
    InvalidInput,
    NotFound,
    SchemaError,
    /// The stage ran but produced nothing to write.
    Empty,
    Failed,
}

/// What a stage did. `Display` is the human-readable status line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    pub status: ReportStatus,
    pub message: String,
    pub output_path: Option<PathBuf>,
    pub count: usize,
    pub finished_at: DateTime<Utc>,
}

impl PipelineReport {
    fn new(status: ReportStatus, message: String, output_path: Option<PathBuf>, count: usize) -> Self {
        Self {
            status,
            message,
            output_path,
            count,
            finished_at: Utc::now(),
        }
    }

    /// `what` reads as "Matched activities", giving "Matched activities saved to <path>".
    pub fn saved(what: &str, path: &Path, count: usize) -> Self {
        Self::new(
            ReportStatus::Success,
            format!("{} saved to {}", what, path.display()),
            Some(path.to_path_buf()),
            count,
        )
    }

    pub fn empty(message: &str) -> Self {
        Self::new(ReportStatus::Empty, message.to_string(), None, 0)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ReportStatus::InvalidInput, message.into(), None, 0)
    }

    pub fn from_error(err: &Error) -> Self {
        let (status, message) = match err {
            Error::InvalidInput(m) => (ReportStatus::InvalidInput, m.clone()),
            Error::NotFound(m) => (ReportStatus::NotFound, m.clone()),
            Error::Schema(m) => (ReportStatus::SchemaError, m.clone()),
            Error::Json(e) => (ReportStatus::SchemaError, format!("Invalid JSON: {}", e)),
            Error::Ocr(m) | Error::Pdf(m) | Error::Llm(m) | Error::Config(m) => {
                (ReportStatus::Failed, m.clone())
            }
            other => (ReportStatus::Failed, other.to_string()),
        };
        Self::new(status, message, None, 0)
    }

    pub fn is_success(&self) -> bool {
        self.status == ReportStatus::Success
    }
}

impl From<Error> for PipelineReport {
    fn from(err: Error) -> Self {
        Self::from_error(&err)
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let report = PipelineReport::from(Error::NotFound("Master JSON file not found: a.json".into()));
        assert_eq!(report.status, ReportStatus::NotFound);
        assert_eq!(report.to_string(), "Master JSON file not found: a.json");

        let report = PipelineReport::from(Error::Schema("bad".into()));
        assert_eq!(report.status, ReportStatus::SchemaError);

        let report = PipelineReport::from(Error::Http("timeout".into()));
        assert_eq!(report.status, ReportStatus::Failed);
        assert!(report.to_string().contains("timeout"));
    }

    #[test]
    fn test_saved_report_serializes_camel_case() {
        let report = PipelineReport::saved("Filtered activities", Path::new("/tmp/x_filtered.json"), 3);
        assert!(report.is_success());
        assert_eq!(report.to_string(), "Filtered activities saved to /tmp/x_filtered.json");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["outputPath"], "/tmp/x_filtered.json");
        assert_eq!(json["count"], 3);
        assert!(json["finishedAt"].is_string());
    }

    #[test]
    fn test_empty_report() {
        let report = PipelineReport::empty(NO_MATCHES);
        assert_eq!(report.status, ReportStatus::Empty);
        assert!(!report.is_success());
        assert!(report.output_path.is_none());
        assert_eq!(report.to_string(), NO_MATCHES);
    }
}
