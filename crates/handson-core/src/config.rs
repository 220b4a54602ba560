//! Configuration and data directory management.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Paths to HandsOn data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// LLM provider configuration (`data/llm-config.json`).
    pub llm_config_file: PathBuf,
    /// Output directory for results of OCR-path extractions. `None` keeps
    /// them beside the source PDF.
    pub ocr_output_dir: Option<PathBuf>,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>, ocr_output_dir: Option<PathBuf>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        if let Some(dir) = &ocr_output_dir {
            std::fs::create_dir_all(dir)?;
        }
        Ok(Self {
            llm_config_file: root.join("llm-config.json"),
            ocr_output_dir,
            root,
        })
    }
}

/// Tuning knobs for the extraction and matching stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Pages per recognizer chunk.
    pub pages_per_chunk: usize,
    /// Master records per matcher chunk.
    pub match_batch_size: usize,
    /// Filtered records per generator batch.
    pub generate_batch_size: usize,
    /// Leading pages sampled by the OCR-need heuristic.
    pub ocr_sample_pages: usize,
    /// A sampled page with more trimmed characters than this has a usable text layer.
    pub ocr_min_chars: usize,
    /// Skip recognizer chunks that contain no activity keyword.
    pub keyword_prefilter: bool,
    /// Sampling temperature for every LLM call.
    pub temperature: f64,
    /// Completion token cap per LLM call.
    pub max_tokens: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            pages_per_chunk: 10,
            match_batch_size: 10,
            generate_batch_size: 20,
            ocr_sample_pages: 5,
            ocr_min_chars: 50,
            keyword_prefilter: true,
            temperature: 0.0,
            max_tokens: 4096,
        }
    }
}

impl PipelineOptions {
    /// Defaults overridden by `HANDSON_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            pages_per_chunk: env_or("HANDSON_PAGES_PER_CHUNK", defaults.pages_per_chunk).max(1),
            match_batch_size: env_or("HANDSON_MATCH_BATCH", defaults.match_batch_size).max(1),
            generate_batch_size: env_or("HANDSON_GENERATE_BATCH", defaults.generate_batch_size)
                .max(1),
            ocr_sample_pages: env_or("HANDSON_OCR_SAMPLE_PAGES", defaults.ocr_sample_pages).max(1),
            ocr_min_chars: env_or("HANDSON_OCR_MIN_CHARS", defaults.ocr_min_chars),
            keyword_prefilter: env_flag("HANDSON_KEYWORD_PREFILTER", defaults.keyword_prefilter),
            temperature: defaults.temperature,
            max_tokens: env_or("HANDSON_MAX_TOKENS", defaults.max_tokens),
        }
    }
}

/// Top-level HandsOn configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandsOnConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Stage tuning.
    pub pipeline: PipelineOptions,
    /// Per-request timeout for LLM and OCR calls.
    pub http_timeout_secs: u64,
}

impl HandsOnConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = env_or("PORT", 5000u16);
        let ocr_output_dir = std::env::var("HANDSON_OCR_OUTPUT_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let data_paths = DataPaths::new(data_dir, ocr_output_dir)?;

        Ok(Self {
            port,
            data_paths,
            pipeline: PipelineOptions::from_env(),
            http_timeout_secs: env_or("HANDSON_HTTP_TIMEOUT_SECS", 300),
        })
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => parse_flag(&v).unwrap_or(default),
        Err(_) => default,
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
