//! Scripted chat backend for stage tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use handson_core::Result;
use handson_llm::{ChatBackend, CompletionRequest};

/// Replays queued replies in order and records every request.
/// Once the queue runs dry it answers `[]`.
pub struct ScriptedChat {
    replies: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedChat {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    /// User prompt of the `n`th request.
    pub fn prompt(&self, n: usize) -> String {
        self.requests.lock()[n]
            .messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }

    pub fn temperature(&self, n: usize) -> f64 {
        self.requests.lock()[n].temperature
    }
}

#[async_trait]
impl ChatBackend for ScriptedChat {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.requests.lock().push(request);
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok("[]".into()))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
