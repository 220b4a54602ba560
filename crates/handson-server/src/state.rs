//! Shared application state and client construction.

use std::sync::Arc;

use tracing::{info, warn};

use handson_core::{HandsOnConfig, Result};
use handson_llm::{
    build_http_client, ChatBackend, HttpChatBackend, LLMConfig, MistralOcr, OcrBackend,
    ProviderStatus,
};
use handson_pipeline::Pipeline;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: HandsOnConfig,
    pub provider_status: ProviderStatus,
    pub pipeline: Pipeline,
}

impl AppState {
    pub fn new(config: HandsOnConfig, provider_status: ProviderStatus, pipeline: Pipeline) -> Self {
        Self {
            config,
            provider_status,
            pipeline,
        }
    }
}

/// Build the model-backed pipeline from configuration.
///
/// Fails with a configuration error when no LLM credential is available.
/// A missing OCR credential only disables image-based PDFs.
pub fn build_pipeline(config: &HandsOnConfig, llm_config: &LLMConfig) -> Result<Pipeline> {
    let client = build_http_client(config.http_timeout_secs)?;

    let chat = HttpChatBackend::from_config(client.clone(), llm_config)?;
    info!("LLM provider: {} ({})", chat.provider(), chat.model());

    let ocr: Option<Arc<dyn OcrBackend>> = match MistralOcr::from_config(client, llm_config) {
        Some(ocr) => {
            info!("OCR enabled with {}", llm_config.ocr_model);
            Some(Arc::new(ocr))
        }
        None => {
            warn!("MISTRAL_API_KEY not set; image-based PDFs cannot be processed");
            None
        }
    };

    Ok(Pipeline::new(
        Arc::new(chat),
        ocr,
        config.pipeline.clone(),
        config.data_paths.ocr_output_dir.clone(),
    ))
}
