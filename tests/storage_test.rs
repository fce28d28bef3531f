//! ファイル保存の統合テスト
//!
//! FileSlot とリポジトリを組み合わせ、履歴がディスク上で保持されることを検証

use chrono::{Local, TimeZone};
use scan_ledger::storage::FileSlot;
use scan_ledger_common::{
    Identifier, ItemStore, Repository, ScannedItem, ServiceError, StorageSlot, FALLBACK_DESCRIPTION,
};
use tempfile::tempdir;

struct StubIdentifier(Result<String, ServiceError>);

impl Identifier for StubIdentifier {
    async fn identify(&self, _code: &str) -> Result<String, ServiceError> {
        self.0.clone()
    }
}

fn local_ms(y: i32, m: u32, d: u32, h: u32) -> i64 {
    Local
        .with_ymd_and_hms(y, m, d, h, 0, 0)
        .earliest()
        .expect("valid local time")
        .timestamp_millis()
}

/// 未保存のスロット
#[test]
fn test_file_slot_missing_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let slot = FileSlot::in_dir(dir.path());

    assert!(slot.read().expect("読み込み失敗").is_none());
    assert!(ItemStore::new(slot).load().is_empty());
}

/// 書き込みでディレクトリを作成し、内容を置き換える
#[test]
fn test_file_slot_write_creates_dir() {
    let dir = tempdir().expect("Failed to create temp dir");
    let nested = dir.path().join("a").join("b");
    let mut slot = FileSlot::in_dir(&nested);

    slot.write("[1]").expect("書き込み失敗");
    slot.write("[]").expect("書き込み失敗");

    assert_eq!(slot.read().unwrap().as_deref(), Some("[]"));
    assert!(FileSlot::slot_path(&nested).ends_with("scannedItems.json"));
}

/// 置き換え後に一時ファイルが残らない
#[test]
fn test_file_slot_write_leaves_only_slot_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut slot = FileSlot::in_dir(dir.path());

    for i in 0..3 {
        slot.write(&format!("[{}]", i)).expect("書き込み失敗");
    }

    let names: Vec<_> = std::fs::read_dir(dir.path())
        .expect("ディレクトリ読み込み失敗")
        .map(|e| e.expect("エントリ").file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("scannedItems.json")]);
    assert_eq!(slot.read().unwrap().as_deref(), Some("[2]"));
}

/// load → save → load で同じ内容になる
#[test]
fn test_item_store_roundtrip_on_disk() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut store = ItemStore::new(FileSlot::in_dir(dir.path()));
    assert!(store.load().is_empty());

    let items = vec![
        ScannedItem {
            id: "1717000000001".to_string(),
            code: "5901234123457".to_string(),
            format: "EAN_13".to_string(),
            timestamp: 1_717_000_000_001,
            name: Some("Chocolate".to_string()),
            manual_code: Some("CH-01".to_string()),
            description: Some("A chocolate bar".to_string()),
            is_loading: Some(false),
        },
        ScannedItem {
            id: "1717000000000".to_string(),
            code: "https://example.com".to_string(),
            format: "QR_CODE".to_string(),
            timestamp: 1_717_000_000_000,
            ..Default::default()
        },
    ];
    store.save(&items);

    let reloaded = ItemStore::new(FileSlot::in_dir(dir.path())).load();
    assert_eq!(reloaded, items);
}

/// 破損したファイルは空の履歴として扱われる
#[test]
fn test_corrupted_file_starts_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(FileSlot::slot_path(dir.path()), "{ invalid json }").unwrap();

    let repo = Repository::open(FileSlot::in_dir(dir.path()));
    assert!(repo.is_empty());
}

/// リポジトリを開き直しても履歴が残る
#[test]
fn test_repository_persists_across_reopen() {
    let dir = tempdir().expect("Failed to create temp dir");

    let (first, second) = {
        let mut repo = Repository::open(FileSlot::in_dir(dir.path()));
        let first = repo.add_item("111", "EAN_13");
        let second = repo.add_item("222", "QR_CODE");
        repo.update_name(&first.id, "Water");
        (first, second)
    };

    let repo = Repository::open(FileSlot::in_dir(dir.path()));
    assert_eq!(repo.len(), 2);
    assert_eq!(repo.items()[0].id, second.id);
    assert_eq!(repo.get(&first.id).unwrap().name.as_deref(), Some("Water"));
}

/// 日付フォルダ削除は他の日付に影響しない
#[test]
fn test_clear_group_on_disk() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut repo = Repository::open(FileSlot::in_dir(dir.path()));

    let a = repo.add_item_at("A", "QR_CODE", local_ms(2024, 2, 10, 9));
    let b = repo.add_item_at("B", "EAN_13", local_ms(2024, 2, 11, 9));
    let b_before = repo.get(&b.id).cloned();

    assert_eq!(repo.clear_group(&a.date_key(), |_| true), 1);

    let reopened = Repository::open(FileSlot::in_dir(dir.path()));
    assert!(reopened.get(&a.id).is_none());
    assert_eq!(reopened.get(&b.id).cloned(), b_before);
}

/// 識別結果も保存される
#[tokio::test]
async fn test_analyze_result_persisted() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut repo = Repository::open(FileSlot::in_dir(dir.path()));
    let item = repo.add_item("123", "EAN13");

    repo.analyze(&item.id, &StubIdentifier(Ok("A candy bar".to_string()))).await;
    let reopened = Repository::open(FileSlot::in_dir(dir.path()));
    let saved = reopened.get(&item.id).unwrap();
    assert_eq!(saved.description.as_deref(), Some("A candy bar"));
    assert!(!saved.is_loading());

    repo.analyze(&item.id, &StubIdentifier(Err(ServiceError::MissingApiKey))).await;
    let reopened = Repository::open(FileSlot::in_dir(dir.path()));
    assert_eq!(
        reopened.get(&item.id).unwrap().description.as_deref(),
        Some(FALLBACK_DESCRIPTION)
    );
}
