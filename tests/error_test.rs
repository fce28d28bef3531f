//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use scan_ledger::error::ScanLedgerError;
use scan_ledger_common::ServiceError;

/// ScanLedgerErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        ScanLedgerError::Config("テスト設定エラー".to_string()),
        ScanLedgerError::DataDirNotFound,
        ScanLedgerError::InvalidArgument("format".to_string()),
        ScanLedgerError::ExcelGeneration("Excel生成エラー".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: ScanLedgerError = io_err.into();

    assert!(matches!(err, ScanLedgerError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: ScanLedgerError = json_err.into();

    assert!(matches!(err, ScanLedgerError::JsonParse(_)));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_conversion() {
    let common_err = scan_ledger_common::Error::StorageWrite("disk full".to_string());
    let err: ScanLedgerError = common_err.into();

    assert!(matches!(err, ScanLedgerError::Common(_)));
    assert_eq!(format!("{}", err), "Storage write error: disk full");
}

/// ServiceErrorはクローン可能で比較できる
#[test]
fn test_service_error_equality() {
    let err = ServiceError::Http("connection refused".to_string());
    assert_eq!(err.clone(), err);
    assert_ne!(err, ServiceError::EmptyResponse);
}
