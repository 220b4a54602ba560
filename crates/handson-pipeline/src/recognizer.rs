//! Activity recognition over chunks of page text.

use std::sync::Arc;

use tracing::{debug, info, warn};

use handson_core::{Activity, PageTextMap, PipelineOptions, Result};
use handson_ingest::{chunk_pages, contains_activity_keyword, PageChunk};
use handson_llm::{ChatBackend, CompletionRequest};

use crate::prompts;
use crate::reply::activities_from_reply;

/// Asks the model for structured activities, one page chunk at a time.
pub struct ActivityRecognizer {
    chat: Arc<dyn ChatBackend>,
    pages_per_chunk: usize,
    keyword_prefilter: bool,
    temperature: f64,
    max_tokens: usize,
}

impl ActivityRecognizer {
    pub fn new(chat: Arc<dyn ChatBackend>, options: &PipelineOptions) -> Self {
        Self {
            chat,
            pages_per_chunk: options.pages_per_chunk,
            keyword_prefilter: options.keyword_prefilter,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        }
    }

    /// Activities from every qualifying chunk, in chunk order.
    ///
    /// A chunk whose call or reply fails is logged and skipped.
    pub async fn recognize(&self, pages: &PageTextMap) -> Vec<Activity> {
        let chunks = chunk_pages(pages, self.pages_per_chunk);
        let mut activities = Vec::new();

        for chunk in &chunks {
            info!("Processing chunk for pages {:?}", chunk.pages);

            if self.keyword_prefilter && !contains_activity_keyword(&chunk.text) {
                debug!("No activity keywords in pages {:?}, skipping", chunk.pages);
                continue;
            }

            match self.extract_chunk(chunk).await {
                Ok(found) => {
                    debug!("{} activities on pages {:?}", found.len(), chunk.pages);
                    activities.extend(found);
                }
                Err(e) => warn!("Skipping pages {:?}: {}", chunk.pages, e),
            }
        }

        info!(
            "Recognized {} activities across {} chunks via {}",
            activities.len(),
            chunks.len(),
            self.chat.model()
        );
        activities
    }

    async fn extract_chunk(&self, chunk: &PageChunk) -> Result<Vec<Activity>> {
        let request = CompletionRequest::new(
            prompts::extraction_system(),
            prompts::extraction_prompt(&chunk.text, &chunk.pages),
            self.temperature,
            self.max_tokens,
        );
        let reply = self.chat.complete(request).await?;
        activities_from_reply(&reply, &chunk.pages)
    }
}
