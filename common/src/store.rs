//! 永続化アダプタ
//!
//! スキャン履歴は1つのストレージスロットにJSON配列として丸ごと保存する。
//! スロットの実体はプラットフォームごとに異なる:
//! - CLI: データディレクトリ内のJSONファイル
//! - Web: `localStorage`
//! - テスト: メモリ

use crate::error::{Error, Result};
use crate::types::ScannedItem;
use std::cell::RefCell;
use std::rc::Rc;

/// 保存スロットのキー
pub const STORAGE_KEY: &str = "scannedItems";

/// 文字列1つを保持するキー・バリュー型ストレージスロット
pub trait StorageSlot {
    /// 保存済みの内容。未保存なら `Ok(None)`
    fn read(&self) -> Result<Option<String>>;

    /// 内容を丸ごと置き換える
    fn write(&mut self, contents: &str) -> Result<()>;
}

/// メモリ上のスロット
///
/// クローンは同じ内容を共有するので、テストでリポジトリに渡した後も中身を確認できる。
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    contents: Rc<RefCell<Option<String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Rc::new(RefCell::new(Some(contents.into()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl StorageSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.contents.borrow().clone())
    }

    fn write(&mut self, contents: &str) -> Result<()> {
        *self.contents.borrow_mut() = Some(contents.to_string());
        Ok(())
    }
}

/// スキャン履歴の読み書き
pub struct ItemStore<S> {
    slot: S,
}

impl<S: StorageSlot> ItemStore<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    /// 保存済みの履歴を読み込む
    ///
    /// 未保存・読み込み失敗・JSON不正のいずれも空の履歴として扱う（エラーはログのみ）。
    pub fn load(&self) -> Vec<ScannedItem> {
        match self.try_load() {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, "保存済み履歴を読み込めません。空の履歴で開始します");
                Vec::new()
            }
        }
    }

    fn try_load(&self) -> Result<Vec<ScannedItem>> {
        let Some(contents) = self.slot.read()? else {
            return Ok(Vec::new());
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&contents).map_err(|e| Error::StorageRead(e.to_string()))
    }

    /// 履歴全体を書き込む（前の内容は置き換え）
    pub fn save(&mut self, items: &[ScannedItem]) {
        let result = serde_json::to_string(items)
            .map_err(Error::from)
            .and_then(|json| self.slot.write(&json));

        if let Err(e) = result {
            tracing::error!(error = %e, count = items.len(), "履歴の保存に失敗しました");
        }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }
}
