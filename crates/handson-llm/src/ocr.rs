//! Mistral OCR client for image-only PDFs.
//!
//! Flow: upload the file (purpose=ocr) → fetch a signed URL → run OCR on the URL.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use handson_core::{Error, Result};

use crate::config::LLMConfig;

const MISTRAL_API: &str = "https://api.mistral.ai/v1";

/// One page returned by the OCR provider. `index` is 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OcrPage {
    pub index: u32,
    #[serde(default)]
    pub markdown: Option<String>,
}

/// Something that can OCR a whole PDF.
#[async_trait]
pub trait OcrBackend: Send + Sync {
    async fn ocr_pdf(&self, pdf_path: &Path) -> Result<Vec<OcrPage>>;
}

/// Mistral OCR over HTTP.
pub struct MistralOcr {
    client: Client,
    api_key: String,
    model: String,
}

impl MistralOcr {
    pub fn new(client: Client, api_key: String, model: String) -> Self {
        Self {
            client,
            api_key,
            model,
        }
    }

    /// Build from configuration; `None` when no Mistral key is configured.
    pub fn from_config(client: Client, config: &LLMConfig) -> Option<Self> {
        config
            .mistral_api_key
            .as_ref()
            .map(|key| Self::new(client, key.clone(), config.ocr_model.clone()))
    }

    async fn upload(&self, pdf_path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(pdf_path).await?;
        let file_name = pdf_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document.pdf")
            .to_string();

        info!("Uploading {} to Mistral's file store for OCR", file_name);

        let form = Form::new()
            .text("purpose", "ocr")
            .part("file", Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(format!("{}/files", MISTRAL_API))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Upload failed: {}", e)))?;

        let body = check_response(response).await?;
        body["id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::Ocr("Upload response has no file id".into()))
    }

    async fn signed_url(&self, file_id: &str) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/files/{}/url", MISTRAL_API, file_id))
            .query(&[("expiry", "24")])
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Signed URL request failed: {}", e)))?;

        let body = check_response(response).await?;
        body["url"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::Ocr("Signed URL response has no url".into()))
    }

    async fn process(&self, document_url: &str) -> Result<Vec<OcrPage>> {
        let body = json!({
            "model": self.model,
            "document": {"type": "document_url", "document_url": document_url},
        });

        let response = self
            .client
            .post(format!("{}/ocr", MISTRAL_API))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Http(format!("OCR request failed: {}", e)))?;

        let body = check_response(response).await?;
        parse_ocr_response(&body)
    }
}

#[async_trait]
impl OcrBackend for MistralOcr {
    async fn ocr_pdf(&self, pdf_path: &Path) -> Result<Vec<OcrPage>> {
        let file_id = self.upload(pdf_path).await?;
        let url = self.signed_url(&file_id).await?;
        debug!("Signed URL obtained for file {}", file_id);
        self.process(&url).await
    }
}

async fn check_response(response: reqwest::Response) -> Result<Value> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Ocr(format!("API error {}: {}", status, body)));
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| Error::Http(format!("Invalid response body: {}", e)))
}

/// Pull the page list out of an OCR response.
pub fn parse_ocr_response(body: &Value) -> Result<Vec<OcrPage>> {
    let pages = body
        .get("pages")
        .cloned()
        .ok_or_else(|| Error::Ocr("OCR response has no pages".into()))?;
    Ok(serde_json::from_value(pages)?)
}
