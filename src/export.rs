//! 履歴のエクスポート（Excel / JSON）

use crate::error::{Result, ScanLedgerError};
use scan_ledger_common::export::excel_core::generate_history_excel;
use scan_ledger_common::ScannedItem;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Excel,
    Json,
}

impl ExportFormat {
    /// 拡張子から推定
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        ext.parse().ok()
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!("Unknown format: {}. Use excel or json", s)),
        }
    }
}

pub fn export_items(items: &[ScannedItem], format: ExportFormat, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    match format {
        ExportFormat::Excel => {
            let buffer = generate_history_excel(items).map_err(ScanLedgerError::ExcelGeneration)?;
            std::fs::write(output, buffer)?;
        }
        ExportFormat::Json => {
            let json = serde_json::to_string_pretty(items)?;
            std::fs::write(output, json)?;
        }
    }

    tracing::info!(path = %output.display(), count = items.len(), "エクスポート完了");
    Ok(())
}
