//! Agent-facing tools: one free-form string in, one status line out.
//!
//! Path scanning happens only here. Everything past this layer takes typed
//! requests.

use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use handson_pipeline::{
    spawn_filter, FilterRequest, MatchRequest, Pipeline, PipelineReport, INVALID_TWO_PATHS,
};

static JSON_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"]?([^,'"\s]+\.json)['"]?"#).unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Extractor,
    Matcher,
    Filter,
    Generator,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Extractor, Tool::Matcher, Tool::Filter, Tool::Generator];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Extractor => "TextbookActivityExtractor",
            Tool::Matcher => "ActivityMatcher",
            Tool::Filter => "ActivityFilter",
            Tool::Generator => "ActivityGenerator",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Tool::Extractor => {
                "Use ONLY when asked to find, extract, or list classroom activities, experiments, \
                 'let us do' or 'let us explore' sections from a PDF textbook given by its LOCAL \
                 FILE PATH. Input MUST be the exact path to an existing PDF. The tool reads the PDF \
                 (running OCR automatically when it has no text layer), identifies activities with \
                 their name, concept, materials, description and page numbers, and saves them to \
                 '<name>_activities.json' beside the PDF. Returns a status message with the output \
                 path, or an error message. Do NOT use for web URLs or non-PDF files."
            }
            Tool::Matcher => {
                "Use ONLY to compare activities between TWO JSON files: a master JSON (usually the \
                 output of TextbookActivityExtractor) and a second JSON listing unit activities. \
                 Saves the matching activities to 'matched_activities.json' beside the master file \
                 and returns its path. Input MUST provide BOTH paths (e.g. '/path/master.json, \
                 /path/user.json')."
            }
            Tool::Filter => {
                "Use to remove already matched activities from a master JSON file. Input MUST \
                 provide BOTH the master JSON path and the matched activities JSON path (e.g. \
                 '/path/master.json, /path/matched_activities.json'). Saves the remaining \
                 activities to '<master>_filtered.json' and returns its path."
            }
            Tool::Generator => {
                "Use to create new hands-on activities by combining the activities of a filtered \
                 master JSON file. Input MUST be the path to that JSON file. Saves the new \
                 activities to 'new_activities.json' beside it and returns its path."
            }
        }
    }

    pub fn from_name(name: &str) -> Option<Tool> {
        Tool::ALL.into_iter().find(|t| t.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn info(self) -> ToolInfo {
        ToolInfo {
            name: self.name(),
            description: self.description(),
        }
    }

    pub fn needs_llm(self) -> bool {
        self != Tool::Filter
    }
}

/// Strip surrounding whitespace and quotes from a single path argument.
pub fn clean_path(input: &str) -> PathBuf {
    PathBuf::from(input.trim().trim_matches(|c| c == '"' || c == '\'').trim())
}

/// First two `.json` paths in a free-form string.
pub fn parse_json_paths(input: &str) -> Option<(PathBuf, PathBuf)> {
    let mut paths = JSON_PATH_RE
        .captures_iter(input.trim())
        .filter_map(|c| c.get(1))
        .map(|m| PathBuf::from(m.as_str()));

    let first = paths.next()?;
    let second = paths.next()?;
    debug!(
        "Parsed paths {} and {}",
        first.display(),
        second.display()
    );
    Some((first, second))
}

/// Run the filter tool. Needs no model.
pub async fn run_filter_tool(input: &str) -> PipelineReport {
    match parse_json_paths(input) {
        Some((master_path, match_path)) => {
            spawn_filter(FilterRequest {
                master_path,
                match_path,
            })
            .await
        }
        None => PipelineReport::invalid_input(INVALID_TWO_PATHS),
    }
}

pub async fn run_tool(pipeline: &Pipeline, tool: Tool, input: &str) -> PipelineReport {
    match tool {
        Tool::Extractor => pipeline.extract(&clean_path(input)).await,
        Tool::Matcher => match parse_json_paths(input) {
            Some((master_path, secondary_path)) => {
                pipeline
                    .match_activities(&MatchRequest {
                        master_path,
                        secondary_path,
                    })
                    .await
            }
            None => PipelineReport::invalid_input(INVALID_TWO_PATHS),
        },
        Tool::Filter => run_filter_tool(input).await,
        Tool::Generator => pipeline.generate(&clean_path(input)).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handson_pipeline::ReportStatus;

    #[test]
    fn test_parse_json_paths_formats() {
        let expected = Some((PathBuf::from("/a/master.json"), PathBuf::from("/b/user.json")));
        assert_eq!(parse_json_paths("/a/master.json, /b/user.json"), expected);
        assert_eq!(parse_json_paths("'/a/master.json' '/b/user.json'"), expected);
        assert_eq!(parse_json_paths("\"/a/master.json\",\"/b/user.json\""), expected);
        assert_eq!(
            parse_json_paths("compare /a/master.json with /b/user.json please"),
            expected
        );
    }

    #[test]
    fn test_parse_json_paths_needs_two() {
        assert_eq!(parse_json_paths("/a/master.json"), None);
        assert_eq!(parse_json_paths("master.txt, user.csv"), None);
        assert_eq!(parse_json_paths("   "), None);
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("  'books/science.pdf' \n"), PathBuf::from("books/science.pdf"));
        assert_eq!(clean_path("\"a b.pdf\""), PathBuf::from("a b.pdf"));
    }

    #[test]
    fn test_tool_lookup() {
        assert_eq!(Tool::from_name("ActivityMatcher"), Some(Tool::Matcher));
        assert_eq!(Tool::from_name("activityfilter"), Some(Tool::Filter));
        assert_eq!(Tool::from_name("Summarizer"), None);
        assert!(!Tool::Filter.needs_llm());
        assert!(Tool::Extractor.needs_llm());
    }

    #[tokio::test]
    async fn test_filter_tool_rejects_single_path_before_io() {
        let report = run_filter_tool("/does/not/exist.json").await;
        assert_eq!(report.status, ReportStatus::InvalidInput);
        assert_eq!(report.to_string(), INVALID_TWO_PATHS);
    }
}
