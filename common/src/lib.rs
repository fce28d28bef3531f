//! Scan Ledger Common Library
//!
//! CLIとWeb(WASM)で共有される型・永続化・リポジトリ

pub mod types;
pub mod error;
pub mod store;
pub mod identify;
pub mod gemini;
pub mod folders;
pub mod repository;
pub mod navigation;
pub mod export;

pub use types::{DateKey, ScannedItem};
pub use error::{Error, Result};
pub use store::{ItemStore, MemorySlot, StorageSlot, STORAGE_KEY};
pub use identify::{build_identify_prompt, Identifier, ServiceError, FALLBACK_DESCRIPTION};
pub use folders::{folder_groups, items_for_date, FolderGroup};
pub use repository::{ClearScope, Repository};
pub use navigation::{AppTab, Navigation, View};
