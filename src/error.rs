use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanLedgerError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("データディレクトリが見つかりません")]
    DataDirNotFound,

    #[error("不正な引数: {0}")]
    InvalidArgument(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] scan_ledger_common::Error),
}

pub type Result<T> = std::result::Result<T, ScanLedgerError>;
