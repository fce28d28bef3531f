//! Scan Ledger CLI
//!
//! スキャン履歴の管理とAI商品識別（ネイティブ側アダプタ）

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod identifier;
pub mod logging;
pub mod storage;
