//! Entry points: typed requests in, [`PipelineReport`] out.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::{error, info};

use handson_core::{Error, PipelineOptions, Result};
use handson_ingest::{ExtractionMethod, PdfTextExtractor};
use handson_llm::{ChatBackend, OcrBackend};

use crate::filter::{filter_unmatched, parse_match_records, validate_master};
use crate::generator::ActivityGenerator;
use crate::matcher::ActivityMatcher;
use crate::recognizer::ActivityRecognizer;
use crate::report::{PipelineReport, NOTHING_GENERATED, NO_ACTIVITIES, NO_MATCHES};
use crate::store::{self, file_stem, load_json_array, sibling_path, write_json};

pub const MATCHED_FILE: &str = "matched_activities.json";
pub const GENERATED_FILE: &str = "new_activities.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub master_path: PathBuf,
    pub secondary_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    pub master_path: PathBuf,
    pub match_path: PathBuf,
}

/// Filter a master list by a match list. Needs no model.
pub fn filter(request: &FilterRequest) -> PipelineReport {
    report("filter", run_filter(request))
}

/// [`filter`] on the blocking pool, for callers on an async runtime.
pub async fn spawn_filter(request: FilterRequest) -> PipelineReport {
    match tokio::task::spawn_blocking(move || filter(&request)).await {
        Ok(report) => report,
        Err(e) => report("filter", Err(Error::Internal(format!("filter task failed: {}", e)))),
    }
}

fn run_filter(request: &FilterRequest) -> Result<PipelineReport> {
    let master = load_json_array(&request.master_path, "Master JSON file")?;
    let matches = load_json_array(&request.match_path, "Match JSON file")?;
    validate_master(&master)?;
    let matches = parse_match_records(matches)?;

    let kept = filter_unmatched(&master, &matches);
    info!(
        "Filter kept {} of {} activities ({} matches)",
        kept.len(),
        master.len(),
        matches.len()
    );

    let name = format!("{}_filtered.json", file_stem(&request.master_path, "activities"));
    let output = sibling_path(&request.master_path, &name)?;
    write_json(&output, &kept)?;
    Ok(PipelineReport::saved("Filtered activities", &output, kept.len()))
}

/// The model-backed stages sharing one chat backend.
pub struct Pipeline {
    chat: Arc<dyn ChatBackend>,
    extractor: PdfTextExtractor,
    options: PipelineOptions,
    ocr_output_dir: Option<PathBuf>,
}

impl Pipeline {
    pub fn new(
        chat: Arc<dyn ChatBackend>,
        ocr: Option<Arc<dyn OcrBackend>>,
        options: PipelineOptions,
        ocr_output_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            chat,
            extractor: PdfTextExtractor::new(ocr, &options),
            options,
            ocr_output_dir,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn ocr_available(&self) -> bool {
        self.extractor.ocr_available()
    }

    /// PDF → `<stem>_activities.json`.
    pub async fn extract(&self, pdf_path: &Path) -> PipelineReport {
        report("extract", self.run_extract(pdf_path).await)
    }

    async fn run_extract(&self, pdf_path: &Path) -> Result<PipelineReport> {
        let extraction = self.extractor.extract(pdf_path).await?;
        info!(
            "Extracted {} pages from {} ({:?})",
            extraction.pages.len(),
            pdf_path.display(),
            extraction.method
        );

        let activities = ActivityRecognizer::new(self.chat.clone(), &self.options)
            .recognize(&extraction.pages)
            .await;
        if activities.is_empty() {
            return Ok(PipelineReport::empty(NO_ACTIVITIES));
        }
        info!("Found {} activities in the PDF", activities.len());

        let name = format!("{}_activities.json", file_stem(pdf_path, "document"));
        let output = match (&self.ocr_output_dir, extraction.method) {
            (Some(dir), ExtractionMethod::Ocr) => dir.join(name),
            _ => sibling_path(pdf_path, &name)?,
        };
        store::save_activities(&output, &activities)?;
        Ok(PipelineReport::saved("Results", &output, activities.len()))
    }

    /// Master + second list → `matched_activities.json`.
    pub async fn match_activities(&self, request: &MatchRequest) -> PipelineReport {
        report("match", self.run_match(request).await)
    }

    async fn run_match(&self, request: &MatchRequest) -> Result<PipelineReport> {
        let master = load_json_array(&request.master_path, "Master JSON file")?;
        let secondary = load_json_array(&request.secondary_path, "Second JSON file")?;

        let matches = ActivityMatcher::new(self.chat.clone(), &self.options)
            .match_lists(&master, &secondary)
            .await;
        if matches.is_empty() {
            return Ok(PipelineReport::empty(NO_MATCHES));
        }

        let output = sibling_path(&request.master_path, MATCHED_FILE)?;
        write_json(&output, &matches)?;
        Ok(PipelineReport::saved("Matched activities", &output, matches.len()))
    }

    /// Filter, sharing the pipeline's surface.
    pub async fn filter(&self, request: &FilterRequest) -> PipelineReport {
        spawn_filter(request.clone()).await
    }

    /// Filtered list → `new_activities.json`.
    pub async fn generate(&self, path: &Path) -> PipelineReport {
        report("generate", self.run_generate(path).await)
    }

    async fn run_generate(&self, path: &Path) -> Result<PipelineReport> {
        let records = load_json_array(path, "Filtered master JSON file")?;

        let generated = ActivityGenerator::new(self.chat.clone(), &self.options)
            .generate(&records)
            .await;
        if generated.is_empty() {
            return Ok(PipelineReport::empty(NOTHING_GENERATED));
        }

        let output = sibling_path(path, GENERATED_FILE)?;
        store::save_activities(&output, &generated)?;
        Ok(PipelineReport::saved("Generated activities", &output, generated.len()))
    }
}

fn report(stage: &str, result: Result<PipelineReport>) -> PipelineReport {
    match result {
        Ok(report) => {
            info!("{}: {}", stage, report);
            report
        }
        Err(e) => {
            error!("{} failed: {}", stage, e);
            PipelineReport::from(e)
        }
    }
}
