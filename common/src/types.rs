//! スキャン結果の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - ScannedItem: 1回のスキャンとユーザー/AIによる注釈
//! - DateKey: ローカル日付（フォルダ表示のグループキー）

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// スキャン済みアイテム
///
/// 保存形式は `id`, `code`, `format`, `timestamp` に加えて、
/// 設定済みの任意フィールドのみ（`name`, `manualCode`, `description`, `isLoading`）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedItem {
    pub id: String,
    pub code: String,
    pub format: String,

    /// 作成時刻（エポックからのミリ秒）
    pub timestamp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,         // ユーザー入力の名前

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_code: Option<String>,  // ユーザー入力のコード

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,  // AI生成の説明

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_loading: Option<bool>,
}

impl ScannedItem {
    /// 識別リクエスト実行中か
    pub fn is_loading(&self) -> bool {
        self.is_loading == Some(true)
    }

    /// 表示用コード（手入力コードがあれば優先）
    pub fn effective_code(&self) -> &str {
        match self.manual_code.as_deref() {
            Some(code) if !code.trim().is_empty() => code,
            _ => &self.code,
        }
    }

    /// 作成日のローカル日付キー
    pub fn date_key(&self) -> DateKey {
        DateKey::from_timestamp(self.timestamp)
    }

    /// 作成時刻のローカル時刻表示 (HH:MM:SS)
    pub fn time_label(&self) -> String {
        local_datetime(self.timestamp).format("%H:%M:%S").to_string()
    }
}

/// ローカル日付キー（`YYYY-MM-DD`）
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    /// タイムスタンプ（ミリ秒）からローカル日付キーを作る
    pub fn from_timestamp(timestamp_ms: i64) -> Self {
        Self::from_date(local_datetime(timestamp_ms).date_naive())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        DateKey(date.format("%Y-%m-%d").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for DateKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self::from_date)
            .map_err(|_| format!("Invalid date: {}. Use YYYY-MM-DD", s))
    }
}

/// 範囲外のタイムスタンプはエポックとして扱う
fn local_datetime(timestamp_ms: i64) -> DateTime<Local> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .unwrap_or_default()
        .with_timezone(&Local)
}
