//! Composite activity generation from filtered records.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use handson_core::{Activity, PipelineOptions, Result};
use handson_llm::{ChatBackend, CompletionRequest};

use crate::prompts;
use crate::reply::{activities_from_reply, page_list};
use crate::store::Record;

/// New activities allowed per batch.
pub const MAX_NEW_PER_BATCH: usize = 4;

pub struct ActivityGenerator {
    chat: Arc<dyn ChatBackend>,
    batch_size: usize,
    temperature: f64,
    max_tokens: usize,
}

impl ActivityGenerator {
    pub fn new(chat: Arc<dyn ChatBackend>, options: &PipelineOptions) -> Self {
        Self {
            chat,
            batch_size: options.generate_batch_size.max(1),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        }
    }

    /// New activities from every batch, in batch order.
    pub async fn generate(&self, records: &[Record]) -> Vec<Activity> {
        let total = records.len().div_ceil(self.batch_size);
        let mut generated = Vec::new();

        for (i, batch) in records.chunks(self.batch_size).enumerate() {
            info!("Sending chunk {}/{}", i + 1, total);
            match self.generate_batch(batch).await {
                Ok(mut found) => {
                    if found.len() > MAX_NEW_PER_BATCH {
                        debug!(
                            "Chunk {} returned {} activities, keeping {}",
                            i + 1,
                            found.len(),
                            MAX_NEW_PER_BATCH
                        );
                        found.truncate(MAX_NEW_PER_BATCH);
                    }
                    generated.extend(found);
                }
                Err(e) => warn!("Skipping chunk {}: {}", i + 1, e),
            }
        }

        generated
    }

    async fn generate_batch(&self, batch: &[Record]) -> Result<Vec<Activity>> {
        let request = CompletionRequest::new(
            prompts::generator_system(),
            prompts::generator_prompt(batch, MAX_NEW_PER_BATCH),
            self.temperature,
            self.max_tokens,
        );
        let reply = self.chat.complete(request).await?;
        activities_from_reply(&reply, &source_pages(batch))
    }
}

/// Sorted union of the pages referenced by a batch.
pub fn source_pages(batch: &[Record]) -> Vec<u32> {
    batch
        .iter()
        .filter_map(|r| page_list(r.get("page")))
        .flatten()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
