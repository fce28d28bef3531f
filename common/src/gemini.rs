//! Gemini API のリクエスト/レスポンス型
//!
//! CLI(reqwest)とWeb(fetch)の両クライアントで共有する。送受信はそれぞれの側で行う。

use crate::identify::{build_identify_prompt, ServiceError};
use serde::{Deserialize, Serialize};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// generateContent エンドポイントURL（キーはクエリで渡す）
pub fn endpoint_url(model: &str, api_key: &str) -> String {
    format!("{}/{}:generateContent?key={}", GEMINI_API_BASE, model, api_key)
}

/// Gemini APIリクエスト
#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

impl GeminiRequest {
    /// 商品識別リクエスト
    pub fn identify(code: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_identify_prompt(code),
                }],
            }],
            generation_config: GenerationConfig { temperature: 0.2 },
        }
    }
}

/// Gemini APIレスポンス
#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GeminiResponse {
    /// 最初の候補のテキスト。空なら `EmptyResponse`
    pub fn first_text(&self) -> Result<String, ServiceError> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(ServiceError::EmptyResponse)
    }
}

/// レスポンス本文をパースして説明文を取り出す
pub fn parse_response_text(body: &str) -> Result<String, ServiceError> {
    let response: GeminiResponse =
        serde_json::from_str(body).map_err(|e| ServiceError::Parse(e.to_string()))?;
    response.first_text()
}
