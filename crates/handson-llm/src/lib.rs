//! LLM completion and OCR clients.
//!
//! Chat completions go to OpenAI-compatible APIs (OpenAI, Groq) or Anthropic.
//! Image-only PDFs are read through Mistral's OCR API. Both sit behind traits
//! so pipeline stages take injected clients.

pub mod config;
pub mod ocr;
pub mod providers;
pub mod types;

pub use config::LLMConfig;
pub use ocr::{MistralOcr, OcrBackend, OcrPage};
pub use providers::{build_http_client, ChatBackend, HttpChatBackend};
pub use types::*;
