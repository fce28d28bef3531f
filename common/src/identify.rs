//! 商品識別サービスの契約
//!
//! スキャンしたコード文字列を外部AIに送り、自然文の説明を受け取る。
//! リトライ・タイムアウト制御はしない（1回の往復のみ）。

use thiserror::Error;

/// 識別に失敗したときにアイテムへ設定する説明文
pub const FALLBACK_DESCRIPTION: &str = "Analysis failed.";

/// 識別サービスのエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("APIキーが設定されていません")]
    MissingApiKey,

    #[error("API呼び出しエラー: {0}")]
    Http(String),

    #[error("APIエラー: status {0}")]
    Status(u16),

    #[error("APIレスポンスが空です")]
    EmptyResponse,

    #[error("APIレスポンスのパースに失敗: {0}")]
    Parse(String),
}

/// コード文字列から商品説明を得る能力
#[allow(async_fn_in_trait)]
pub trait Identifier {
    async fn identify(&self, code: &str) -> Result<String, ServiceError>;
}

/// 識別用プロンプトを生成
pub fn build_identify_prompt(code: &str) -> String {
    format!(
        "Identify the product or content associated with this scanned barcode/QR code: \"{}\". \
         If it is a product barcode (EAN, UPC), name the product and brand if known. \
         If it is a URL or text, briefly summarize what it points to. \
         Reply in at most two short sentences. \
         If you cannot identify it, say so plainly.",
        code.trim()
    )
}
