//! スキャン履歴リポジトリ
//!
//! 履歴コレクションを所有し、変更のたびにストレージへ書き戻す。
//! ビュー側は読み取り専用の投影のみを受け取り、変更は必ずこの型のメソッドを経由する。
//!
//! 識別（analyze）は非同期。同時に複数アイテムを識別する呼び出し側は
//! `begin_analysis` / `finish_analysis` を使い、await中にリポジトリを借用し続けない。

use crate::folders::{folder_groups, items_for_date, FolderGroup};
use crate::identify::{Identifier, ServiceError, FALLBACK_DESCRIPTION};
use crate::store::{ItemStore, StorageSlot};
use crate::types::{DateKey, ScannedItem};

/// 一括削除の対象（確認コールバックに渡す）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearScope {
    All { count: usize },
    Date { date_key: DateKey, count: usize },
}

impl ClearScope {
    pub fn count(&self) -> usize {
        match self {
            ClearScope::All { count } | ClearScope::Date { count, .. } => *count,
        }
    }

    /// 確認メッセージ
    pub fn prompt(&self) -> String {
        match self {
            ClearScope::All { .. } => "Are you sure you want to delete all data?".to_string(),
            ClearScope::Date { date_key, .. } => format!("Delete all scans from {}?", date_key),
        }
    }
}

pub struct Repository<S> {
    items: Vec<ScannedItem>,
    store: ItemStore<S>,
    last_id: i64,
}

impl<S: StorageSlot> Repository<S> {
    /// ストレージから履歴を読み込んで開く
    ///
    /// 前回のセッションで実行中だった識別は継続しないので、残っているローディング状態は解除する。
    pub fn open(slot: S) -> Self {
        let mut store = ItemStore::new(slot);
        let mut items = store.load();

        let mut stale = 0;
        for item in items.iter_mut().filter(|i| i.is_loading()) {
            item.is_loading = Some(false);
            stale += 1;
        }
        if stale > 0 {
            tracing::info!(count = stale, "前回の識別中状態を解除しました");
            store.save(&items);
        }

        // 上限値のIDは次の採番に使えないので無視する
        let last_id = items
            .iter()
            .filter_map(|i| i.id.parse::<i64>().ok())
            .filter(|id| *id < i64::MAX)
            .max()
            .unwrap_or(0);

        tracing::debug!(count = items.len(), "履歴を読み込みました");
        Self { items, store, last_id }
    }

    /// 全アイテム（新しい順）
    pub fn items(&self) -> &[ScannedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ScannedItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// 指定日付のアイテム（新しい順）
    pub fn items_for_date(&self, date_key: &DateKey) -> Vec<ScannedItem> {
        items_for_date(&self.items, date_key).cloned().collect()
    }

    pub fn folder_groups(&self) -> Vec<FolderGroup> {
        folder_groups(&self.items)
    }

    /// スキャン結果を先頭に追加する
    pub fn add_item(&mut self, code: &str, format: &str) -> ScannedItem {
        let now = chrono::Utc::now().timestamp_millis();
        self.add_item_at(code, format, now)
    }

    /// 作成時刻を指定して追加する
    pub fn add_item_at(&mut self, code: &str, format: &str, timestamp: i64) -> ScannedItem {
        let item = ScannedItem {
            id: self.next_id(timestamp),
            code: code.to_string(),
            format: format.to_string(),
            timestamp,
            ..Default::default()
        };
        tracing::debug!(id = %item.id, format = %item.format, "スキャンを追加");

        self.items.insert(0, item.clone());
        self.persist();
        item
    }

    /// ミリ秒時刻ベースのID。同一ミリ秒や時計の巻き戻りでも重複しない
    fn next_id(&mut self, timestamp: i64) -> String {
        let numeric = self
            .last_id
            .checked_add(1)
            .map(|next| timestamp.max(next))
            .filter(|id| *id < i64::MAX && self.get(&id.to_string()).is_none());
        if let Some(id) = numeric {
            self.last_id = id;
            return id.to_string();
        }

        // 数値IDを使い切ったら時刻に連番を付ける
        let mut seq = 1u64;
        loop {
            let id = format!("{}-{}", timestamp, seq);
            if self.get(&id).is_none() {
                return id;
            }
            seq += 1;
        }
    }

    /// アイテムを削除する。存在しなければ何もしない
    pub fn delete_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.persist();
        } else {
            tracing::debug!(id, "削除対象が見つかりません");
        }
        removed
    }

    pub fn update_name(&mut self, id: &str, name: &str) -> bool {
        self.modify(id, |item| item.name = Some(name.to_string()))
    }

    pub fn update_manual_code(&mut self, id: &str, code: &str) -> bool {
        self.modify(id, |item| item.manual_code = Some(code.to_string()))
    }

    /// 全件削除。`confirm` が false を返したら何もしない
    ///
    /// 削除件数を返す。
    pub fn clear_all<F>(&mut self, confirm: F) -> usize
    where
        F: FnOnce(&ClearScope) -> bool,
    {
        let scope = ClearScope::All { count: self.items.len() };
        if scope.count() == 0 || !confirm(&scope) {
            return 0;
        }

        self.items.clear();
        self.persist();
        tracing::info!(count = scope.count(), "全履歴を削除しました");
        scope.count()
    }

    /// 指定日付（ローカル日付）のアイテムを一括削除
    pub fn clear_group<F>(&mut self, date_key: &DateKey, confirm: F) -> usize
    where
        F: FnOnce(&ClearScope) -> bool,
    {
        let count = items_for_date(&self.items, date_key).count();
        let scope = ClearScope::Date {
            date_key: date_key.clone(),
            count,
        };
        if count == 0 || !confirm(&scope) {
            return 0;
        }

        self.items.retain(|i| &i.date_key() != date_key);
        self.persist();
        tracing::info!(date = %date_key, count, "日付フォルダを削除しました");
        count
    }

    /// AIでアイテムを識別し、説明を設定する
    ///
    /// 失敗しても呼び出し側にはエラーを返さず、固定の説明文を設定する。
    pub async fn analyze<I: Identifier>(&mut self, id: &str, identifier: &I) {
        let Some(code) = self.begin_analysis(id) else {
            return;
        };
        let result = identifier.identify(&code).await;
        self.finish_analysis(id, result);
    }

    /// 識別開始: ローディング状態にして識別対象のコードを返す
    ///
    /// アイテムが無い、または既に識別中なら `None`。
    pub fn begin_analysis(&mut self, id: &str) -> Option<String> {
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            tracing::debug!(id, "識別対象が見つかりません");
            return None;
        };
        if item.is_loading() {
            tracing::debug!(id, "識別中のため再実行しません");
            return None;
        }

        item.is_loading = Some(true);
        let code = item.code.clone();
        self.persist();
        Some(code)
    }

    /// 識別完了: 結果（または失敗時の固定文）を設定してローディングを解除
    pub fn finish_analysis(&mut self, id: &str, result: Result<String, ServiceError>) {
        let description = match result {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(id, error = %e, "識別に失敗しました");
                FALLBACK_DESCRIPTION.to_string()
            }
        };

        // 識別中に削除されていれば何もしない
        self.modify(id, |item| {
            item.description = Some(description);
            item.is_loading = Some(false);
        });
    }

    fn modify<F>(&mut self, id: &str, f: F) -> bool
    where
        F: FnOnce(&mut ScannedItem),
    {
        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                f(item);
                self.persist();
                true
            }
            None => {
                tracing::debug!(id, "更新対象が見つかりません");
                false
            }
        }
    }

    fn persist(&mut self) {
        self.store.save(&self.items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySlot;
    use chrono::{Local, TimeZone};
    use std::cell::Cell;

    struct StubIdentifier(Result<String, ServiceError>);

    impl Identifier for StubIdentifier {
        async fn identify(&self, _code: &str) -> Result<String, ServiceError> {
            self.0.clone()
        }
    }

    /// 呼び出された時点のローディング状態を記録する
    struct ObservingIdentifier {
        slot: MemorySlot,
        saw_loading: Cell<bool>,
    }

    impl Identifier for ObservingIdentifier {
        async fn identify(&self, code: &str) -> Result<String, ServiceError> {
            let items = ItemStore::new(self.slot.clone()).load();
            self.saw_loading.set(items.iter().any(|i| i.code == code && i.is_loading()));
            Ok(format!("identified {}", code))
        }
    }

    fn local_ms(y: i32, m: u32, d: u32, h: u32) -> i64 {
        Local
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .earliest()
            .expect("valid local time")
            .timestamp_millis()
    }

    fn persisted(slot: &MemorySlot) -> Vec<ScannedItem> {
        ItemStore::new(slot.clone()).load()
    }

    #[test]
    fn test_add_item_prepends_and_persists() {
        let slot = MemorySlot::new();
        let mut repo = Repository::open(slot.clone());

        let first = repo.add_item_at("111", "EAN_13", 1_000);
        let second = repo.add_item_at("222", "QR_CODE", 2_000);

        let ids: Vec<&str> = repo.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
        assert_eq!(persisted(&slot), repo.items());
    }

    #[test]
    fn test_add_item_ids_unique_within_same_millisecond() {
        let mut repo = Repository::open(MemorySlot::new());
        let ids: Vec<String> = (0..5).map(|_| repo.add_item_at("x", "QR_CODE", 1_000).id).collect();

        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 5);

        // 新しい順に並び、IDは作成順に単調増加
        let numeric: Vec<i64> = repo.items().iter().map(|i| i.id.parse().unwrap()).collect();
        assert!(numeric.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_add_item_ids_survive_reopen() {
        let slot = MemorySlot::new();
        let existing = {
            let mut repo = Repository::open(slot.clone());
            repo.add_item_at("a", "QR_CODE", 5_000).id
        };

        let mut repo = Repository::open(slot);
        // 時計が巻き戻っても既存IDとは重複しない
        let added = repo.add_item_at("b", "QR_CODE", 10);
        assert_ne!(added.id, existing);
        assert_eq!(added.timestamp, 10);
    }

    #[test]
    fn test_add_item_ignores_unusable_persisted_id() {
        let slot = MemorySlot::with_contents(
            r#"[{"id":"9223372036854775807","code":"a","format":"QR_CODE","timestamp":1}]"#,
        );
        let mut repo = Repository::open(slot);

        let added = repo.add_item_at("b", "QR_CODE", 5_000);
        assert_ne!(added.id, "9223372036854775807");
        assert_eq!(added.id, "5000");
    }

    #[test]
    fn test_add_item_ids_stay_unique_at_numeric_limit() {
        let slot = MemorySlot::with_contents(
            r#"[{"id":"9223372036854775806","code":"a","format":"QR_CODE","timestamp":1}]"#,
        );
        let mut repo = Repository::open(slot);

        let ids: Vec<String> = (0..3).map(|_| repo.add_item_at("b", "QR_CODE", 7).id).collect();
        assert_eq!(ids, vec!["7-1", "7-2", "7-3"]);
        assert!(repo.get("9223372036854775806").is_some());
        assert_eq!(repo.len(), 4);
    }

    #[test]
    fn test_add_item_ids_unique_across_reopens() {
        let slot = MemorySlot::new();
        {
            let mut repo = Repository::open(slot.clone());
            for _ in 0..50 {
                repo.add_item_at("a", "QR_CODE", 1_000);
            }
        }
        let mut repo = Repository::open(slot);
        for _ in 0..50 {
            repo.add_item_at("b", "QR_CODE", 1_000);
        }

        let mut ids: Vec<&str> = repo.items().iter().map(|i| i.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_new_item_has_no_annotations() {
        let mut repo = Repository::open(MemorySlot::new());
        let item = repo.add_item("123", "EAN_13");

        assert_eq!(item.code, "123");
        assert_eq!(item.format, "EAN_13");
        assert!(item.name.is_none());
        assert!(item.manual_code.is_none());
        assert!(item.description.is_none());
        assert!(item.is_loading.is_none());
    }

    #[test]
    fn test_delete_item_idempotent() {
        let mut repo = Repository::open(MemorySlot::new());
        let keep = repo.add_item_at("1", "QR_CODE", 1);
        let gone = repo.add_item_at("2", "QR_CODE", 2);

        assert!(repo.delete_item(&gone.id));
        let after_first = repo.items().to_vec();

        assert!(!repo.delete_item(&gone.id));
        assert_eq!(repo.items(), after_first.as_slice());
        assert_eq!(repo.items(), &[keep]);
    }

    #[test]
    fn test_update_fields_do_not_reorder() {
        let slot = MemorySlot::new();
        let mut repo = Repository::open(slot.clone());
        let older = repo.add_item_at("1", "QR_CODE", 1);
        let newer = repo.add_item_at("2", "QR_CODE", 2);

        assert!(repo.update_name(&older.id, "Milk"));
        assert!(repo.update_manual_code(&older.id, "M-1"));

        assert_eq!(repo.items()[0].id, newer.id);
        assert_eq!(repo.items()[1].name.as_deref(), Some("Milk"));
        assert_eq!(repo.items()[1].manual_code.as_deref(), Some("M-1"));
        assert_eq!(repo.items()[1].code, "1");
        assert_eq!(persisted(&slot), repo.items());
    }

    #[test]
    fn test_update_missing_id_is_noop() {
        let mut repo = Repository::open(MemorySlot::new());
        repo.add_item_at("1", "QR_CODE", 1);
        let before = repo.items().to_vec();

        assert!(!repo.update_name("missing", "x"));
        assert!(!repo.update_manual_code("missing", "x"));
        assert_eq!(repo.items(), before.as_slice());
    }

    #[test]
    fn test_clear_all_requires_confirmation() {
        let slot = MemorySlot::new();
        let mut repo = Repository::open(slot.clone());
        repo.add_item_at("1", "QR_CODE", 1);
        repo.add_item_at("2", "QR_CODE", 2);

        assert_eq!(repo.clear_all(|_| false), 0);
        assert_eq!(repo.len(), 2);

        let mut seen = None;
        let removed = repo.clear_all(|scope| {
            seen = Some(scope.clone());
            true
        });
        assert_eq!(removed, 2);
        assert_eq!(seen, Some(ClearScope::All { count: 2 }));
        assert!(repo.is_empty());
        assert!(persisted(&slot).is_empty());
    }

    #[test]
    fn test_clear_all_on_empty_skips_confirmation() {
        let mut repo = Repository::open(MemorySlot::new());
        let removed = repo.clear_all(|_| panic!("確認は不要"));
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_clear_group_removes_only_that_date() {
        let mut repo = Repository::open(MemorySlot::new());
        let day_a = local_ms(2024, 6, 1, 10);
        let day_b = local_ms(2024, 6, 2, 10);

        let a1 = repo.add_item_at("A1", "QR_CODE", day_a);
        let b = repo.add_item_at("B", "EAN_13", day_b);
        let a2 = repo.add_item_at("A2", "QR_CODE", day_a + 60_000);
        repo.update_name(&b.id, "Keep me");
        let b_before = repo.get(&b.id).cloned();

        let removed = repo.clear_group(&a1.date_key(), |scope| {
            assert_eq!(scope.prompt(), "Delete all scans from 2024-06-01?");
            true
        });

        assert_eq!(removed, 2);
        assert!(repo.get(&a1.id).is_none());
        assert!(repo.get(&a2.id).is_none());
        assert_eq!(repo.get(&b.id).cloned(), b_before);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_clear_group_declined() {
        let mut repo = Repository::open(MemorySlot::new());
        let item = repo.add_item_at("A", "QR_CODE", local_ms(2024, 6, 1, 10));

        assert_eq!(repo.clear_group(&item.date_key(), |_| false), 0);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_open_resets_stale_loading() {
        let slot = MemorySlot::with_contents(
            r#"[{"id":"1","code":"123","format":"EAN_13","timestamp":1,"isLoading":true}]"#,
        );
        let repo = Repository::open(slot.clone());

        assert!(!repo.items()[0].is_loading());
        assert!(!persisted(&slot)[0].is_loading());
    }

    #[test]
    fn test_open_corrupted_storage_starts_empty() {
        let repo = Repository::open(MemorySlot::with_contents("not json"));
        assert!(repo.is_empty());
    }

    #[test]
    fn test_folder_projection() {
        let mut repo = Repository::open(MemorySlot::new());
        repo.add_item_at("A", "QR_CODE", local_ms(2024, 6, 1, 10));
        repo.add_item_at("B", "QR_CODE", local_ms(2024, 6, 2, 10));
        repo.add_item_at("C", "QR_CODE", local_ms(2024, 6, 2, 11));

        let groups = repo.folder_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].count, 2);

        let day: DateKey = "2024-06-02".parse().unwrap();
        let codes: Vec<String> = repo.items_for_date(&day).into_iter().map(|i| i.code).collect();
        assert_eq!(codes, vec!["C", "B"]);
    }

    #[tokio::test]
    async fn test_analyze_success_then_failure() {
        let slot = MemorySlot::new();
        let mut repo = Repository::open(slot.clone());
        let item = repo.add_item("123", "EAN13");
        assert_eq!(repo.len(), 1);

        repo.analyze(&item.id, &StubIdentifier(Ok("A candy bar".to_string()))).await;
        let analyzed = repo.get(&item.id).unwrap();
        assert_eq!(analyzed.description.as_deref(), Some("A candy bar"));
        assert_eq!(analyzed.is_loading, Some(false));

        repo.analyze(&item.id, &StubIdentifier(Err(ServiceError::Status(500)))).await;
        let failed = repo.get(&item.id).unwrap();
        assert_eq!(failed.description.as_deref(), Some(FALLBACK_DESCRIPTION));
        assert_eq!(failed.is_loading, Some(false));
        assert_eq!(persisted(&slot), repo.items());
    }

    #[tokio::test]
    async fn test_analyze_persists_loading_before_request() {
        let slot = MemorySlot::new();
        let mut repo = Repository::open(slot.clone());
        let item = repo.add_item("777", "UPC_A");

        let identifier = ObservingIdentifier {
            slot: slot.clone(),
            saw_loading: Cell::new(false),
        };
        repo.analyze(&item.id, &identifier).await;

        assert!(identifier.saw_loading.get());
        assert_eq!(
            repo.get(&item.id).unwrap().description.as_deref(),
            Some("identified 777")
        );
    }

    #[tokio::test]
    async fn test_analyze_missing_id_is_noop() {
        let mut repo = Repository::open(MemorySlot::new());
        repo.add_item("1", "QR_CODE");
        let before = repo.items().to_vec();

        repo.analyze("missing", &StubIdentifier(Ok("x".to_string()))).await;
        assert_eq!(repo.items(), before.as_slice());
    }

    #[test]
    fn test_begin_analysis_ignored_while_loading() {
        let mut repo = Repository::open(MemorySlot::new());
        let item = repo.add_item("123", "EAN_13");

        assert_eq!(repo.begin_analysis(&item.id), Some("123".to_string()));
        assert!(repo.get(&item.id).unwrap().is_loading());
        assert_eq!(repo.begin_analysis(&item.id), None);

        repo.finish_analysis(&item.id, Ok("done".to_string()));
        assert_eq!(repo.begin_analysis(&item.id), Some("123".to_string()));
    }

    #[test]
    fn test_concurrent_analyses_are_independent() {
        let mut repo = Repository::open(MemorySlot::new());
        let a = repo.add_item_at("A", "QR_CODE", 1);
        let b = repo.add_item_at("B", "QR_CODE", 2);

        assert!(repo.begin_analysis(&a.id).is_some());
        assert!(repo.begin_analysis(&b.id).is_some());

        repo.finish_analysis(&b.id, Err(ServiceError::EmptyResponse));
        assert!(repo.get(&a.id).unwrap().is_loading());
        assert_eq!(repo.get(&b.id).unwrap().description.as_deref(), Some(FALLBACK_DESCRIPTION));

        repo.finish_analysis(&a.id, Ok("Item A".to_string()));
        assert!(!repo.get(&a.id).unwrap().is_loading());
        assert_eq!(repo.items()[0].id, b.id);
    }

    #[test]
    fn test_finish_analysis_after_delete() {
        let mut repo = Repository::open(MemorySlot::new());
        let item = repo.add_item("123", "EAN_13");
        repo.begin_analysis(&item.id);
        repo.delete_item(&item.id);

        repo.finish_analysis(&item.id, Ok("late".to_string()));
        assert!(repo.is_empty());
    }
}
