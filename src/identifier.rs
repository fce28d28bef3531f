//! Gemini API連携（reqwest）

use scan_ledger_common::gemini::{endpoint_url, parse_response_text, GeminiRequest};
use scan_ledger_common::{Identifier, ServiceError};

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model: model.into(),
        }
    }
}

impl Identifier for GeminiClient {
    async fn identify(&self, code: &str) -> Result<String, ServiceError> {
        let api_key = self.api_key.as_deref().ok_or(ServiceError::MissingApiKey)?;

        tracing::debug!(model = %self.model, "Gemini API呼び出し");
        // URLにキーが含まれるのでエラー表示からは除く
        let response = self
            .http
            .post(endpoint_url(&self.model, api_key))
            .json(&GeminiRequest::identify(code))
            .send()
            .await
            .map_err(|e| ServiceError::Http(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::Http(e.without_url().to_string()))?;
        parse_response_text(&body)
    }
}
