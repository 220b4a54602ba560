//! LLM configuration loading and provider selection.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::types::{LLMProvider, ProviderStatus};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_OCR_MODEL: &str = "mistral-ocr-latest";

/// Stored LLM configuration (read from llm-config.json, env vars fill gaps).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default)]
    pub mistral_api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
    #[serde(default = "default_ocr_model")]
    pub ocr_model: String,
    /// Path the config was loaded from.
    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_preferred() -> String {
    "auto".into()
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_anthropic_model() -> String {
    DEFAULT_ANTHROPIC_MODEL.into()
}
fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.into()
}
fn default_ocr_model() -> String {
    DEFAULT_OCR_MODEL.into()
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            preferred_provider: "auto".into(),
            openai_api_key: None,
            anthropic_api_key: None,
            groq_api_key: None,
            mistral_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.into(),
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.into(),
            groq_model: DEFAULT_GROQ_MODEL.into(),
            ocr_model: DEFAULT_OCR_MODEL.into(),
            config_path: PathBuf::new(),
        }
    }
}

impl LLMConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        let mut config: LLMConfig = match std::fs::read_to_string(config_path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
                warn!("Ignoring malformed {}: {}", config_path.display(), e);
                LLMConfig::default()
            }),
            Err(_) => LLMConfig::default(),
        };

        config.config_path = config_path.to_path_buf();
        config.apply_env();

        if config.config_path.exists() {
            info!("Loaded LLM config from {}", config.config_path.display());
        }
        config
    }

    /// Fill missing keys from env vars and apply provider/model overrides.
    fn apply_env(&mut self) {
        fill_from_env(&mut self.openai_api_key, "OPENAI_API_KEY");
        fill_from_env(&mut self.anthropic_api_key, "ANTHROPIC_API_KEY");
        fill_from_env(&mut self.groq_api_key, "GROQ_API_KEY");
        fill_from_env(&mut self.mistral_api_key, "MISTRAL_API_KEY");

        if let Some(p) = non_empty_env("HANDSON_LLM_PROVIDER") {
            self.preferred_provider = p.to_lowercase();
        }
        if let Some(m) = non_empty_env("HANDSON_OCR_MODEL") {
            self.ocr_model = m;
        }
        if let Some(m) = non_empty_env("HANDSON_LLM_MODEL") {
            match self.resolve_provider() {
                Some((LLMProvider::OpenAI, _, _)) => self.openai_model = m,
                Some((LLMProvider::Anthropic, _, _)) => self.anthropic_model = m,
                Some((LLMProvider::Groq, _, _)) => self.groq_model = m,
                None => {}
            }
        }
    }

    /// Resolve which provider, model and key to use.
    pub fn resolve_provider(&self) -> Option<(LLMProvider, String, String)> {
        if self.preferred_provider != "auto" {
            return match self.preferred_provider.as_str() {
                "openai" => self
                    .openai_api_key
                    .as_ref()
                    .map(|k| (LLMProvider::OpenAI, self.openai_model.clone(), k.clone())),
                "anthropic" => self
                    .anthropic_api_key
                    .as_ref()
                    .map(|k| (LLMProvider::Anthropic, self.anthropic_model.clone(), k.clone())),
                "groq" => self
                    .groq_api_key
                    .as_ref()
                    .map(|k| (LLMProvider::Groq, self.groq_model.clone(), k.clone())),
                _ => None,
            };
        }

        // Auto mode: OpenAI > Anthropic > Groq
        if let Some(k) = &self.openai_api_key {
            return Some((LLMProvider::OpenAI, self.openai_model.clone(), k.clone()));
        }
        if let Some(k) = &self.anthropic_api_key {
            return Some((LLMProvider::Anthropic, self.anthropic_model.clone(), k.clone()));
        }
        if let Some(k) = &self.groq_api_key {
            return Some((LLMProvider::Groq, self.groq_model.clone(), k.clone()));
        }

        None
    }

    pub fn ocr_configured(&self) -> bool {
        self.mistral_api_key.is_some()
    }

    /// Public status (no API keys exposed).
    pub fn to_status(&self) -> ProviderStatus {
        let resolved = self.resolve_provider();
        ProviderStatus {
            preferred_provider: self.preferred_provider.clone(),
            active_provider: resolved.as_ref().map(|(p, _, _)| p.to_string()),
            active_model: resolved.map(|(_, m, _)| m),
            ocr_configured: self.ocr_configured(),
            ocr_model: self.ocr_model.clone(),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn fill_from_env(slot: &mut Option<String>, key: &str) {
    if slot.as_deref().map_or(true, |k| k.trim().is_empty()) {
        *slot = non_empty_env(key);
    }
}
