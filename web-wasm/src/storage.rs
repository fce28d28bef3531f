//! localStorage スロット

use gloo::storage::{LocalStorage, Storage};
use scan_ledger_common::{Error, Result, StorageSlot, STORAGE_KEY};

/// `window.localStorage["scannedItems"]`
pub struct LocalStorageSlot;

impl StorageSlot for LocalStorageSlot {
    fn read(&self) -> Result<Option<String>> {
        LocalStorage::raw()
            .get_item(STORAGE_KEY)
            .map_err(|e| Error::StorageRead(format!("{:?}", e)))
    }

    fn write(&mut self, contents: &str) -> Result<()> {
        LocalStorage::raw()
            .set_item(STORAGE_KEY, contents)
            .map_err(|e| Error::StorageWrite(format!("{:?}", e)))
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use scan_ledger_common::Repository;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_corrupted_local_storage_opens_empty() {
        crate::logging::init_logging();
        LocalStorage::raw()
            .set_item(STORAGE_KEY, "not json")
            .expect("localStorage書き込み失敗");

        let repo = Repository::open(LocalStorageSlot);
        assert!(repo.is_empty());

        LocalStorage::raw().remove_item(STORAGE_KEY).expect("削除失敗");
    }

    #[wasm_bindgen_test]
    fn wasm_items_survive_reopen() {
        LocalStorage::raw().remove_item(STORAGE_KEY).expect("削除失敗");
        let added = Repository::open(LocalStorageSlot).add_item("4901234567894", "EAN_13");

        let repo = Repository::open(LocalStorageSlot);
        assert_eq!(repo.items(), std::slice::from_ref(&added));

        LocalStorage::raw().remove_item(STORAGE_KEY).expect("削除失敗");
    }
}
