//! 日付フォルダ（ローカル日付ごとのグループ）

use crate::types::{DateKey, ScannedItem};
use std::collections::HashMap;

/// 1日分のスキャンをまとめたフォルダ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderGroup {
    pub date_key: DateKey,
    pub count: usize,
    /// グループ内で最も新しいタイムスタンプ
    pub latest_timestamp: i64,
}

/// 履歴を日付フォルダに分ける（新しい日付が先頭）
pub fn folder_groups(items: &[ScannedItem]) -> Vec<FolderGroup> {
    let mut groups: Vec<FolderGroup> = Vec::new();
    let mut index: HashMap<DateKey, usize> = HashMap::new();

    for item in items {
        let key = item.date_key();
        match index.get(&key) {
            Some(&i) => {
                let group = &mut groups[i];
                group.count += 1;
                group.latest_timestamp = group.latest_timestamp.max(item.timestamp);
            }
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(FolderGroup {
                    date_key: key,
                    count: 1,
                    latest_timestamp: item.timestamp,
                });
            }
        }
    }

    groups.sort_by(|a, b| {
        b.latest_timestamp
            .cmp(&a.latest_timestamp)
            .then_with(|| b.date_key.cmp(&a.date_key))
    });
    groups
}

/// 指定日付のアイテムのみ（順序は保持）
pub fn items_for_date<'a>(
    items: &'a [ScannedItem],
    date_key: &'a DateKey,
) -> impl Iterator<Item = &'a ScannedItem> + 'a {
    items.iter().filter(move |item| &item.date_key() == date_key)
}
