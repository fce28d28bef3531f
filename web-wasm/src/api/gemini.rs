//! Gemini API連携（fetch）

use scan_ledger_common::gemini::{endpoint_url, parse_response_text, GeminiRequest};
use scan_ledger_common::{Identifier, ServiceError};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

pub struct GeminiFetchClient {
    api_key: String,
    model: String,
}

impl GeminiFetchClient {
    pub fn new(api_key: String, model: impl Into<String>) -> Self {
        Self {
            api_key,
            model: model.into(),
        }
    }
}

impl Identifier for GeminiFetchClient {
    async fn identify(&self, code: &str) -> Result<String, ServiceError> {
        if self.api_key.trim().is_empty() {
            return Err(ServiceError::MissingApiKey);
        }

        let body = serde_json::to_string(&GeminiRequest::identify(code))
            .map_err(|e| ServiceError::Parse(e.to_string()))?;
        let url = endpoint_url(&self.model, self.api_key.trim());

        let (status, text) = post_json(&url, &body)
            .await
            .map_err(|e| ServiceError::Http(format!("{:?}", e)))?;
        if !(200..300).contains(&status) {
            return Err(ServiceError::Status(status));
        }

        parse_response_text(&text)
    }
}

/// JSONをPOSTしてステータスと本文を返す
async fn post_json(url: &str, body: &str) -> Result<(u16, String), JsValue> {
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(body));

    let request = Request::new_with_str_and_init(url, &opts)?;
    request.headers().set("Content-Type", "application/json")?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window not available"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;

    let text = JsFuture::from(resp.text()?).await?;
    Ok((resp.status(), text.as_string().unwrap_or_default()))
}
