//! ファイルベースのストレージスロット
//!
//! データディレクトリ内の `scannedItems.json` に履歴を保存する。
//! 書き込みは一時ファイル経由で置き換えるので、途中で落ちても前の内容が残る。

use scan_ledger_common::{Error, StorageSlot, STORAGE_KEY};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// データディレクトリ内の標準スロット
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(Self::slot_path(dir))
    }

    pub fn slot_path(dir: &Path) -> PathBuf {
        dir.join(format!("{}.json", STORAGE_KEY))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageSlot for FileSlot {
    fn read(&self) -> scan_ledger_common::Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&self.path)
            .map(Some)
            .map_err(|e| Error::StorageRead(format!("{}: {}", self.path.display(), e)))
    }

    fn write(&mut self, contents: &str) -> scan_ledger_common::Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        std::fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(contents.as_bytes())?;
        // 置き換えより先に内容をディスクへ
        file.as_file().sync_all()?;
        file.persist(&self.path)
            .map_err(|e| Error::StorageWrite(format!("{}: {}", self.path.display(), e)))?;
        Ok(())
    }
}
