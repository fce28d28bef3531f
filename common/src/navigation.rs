//! タブとドリルダウン選択から表示ビューを決める

use crate::types::DateKey;

/// 下部ナビゲーションのタブ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppTab {
    #[default]
    Scanner,
    History,
    Files,
}

impl AppTab {
    pub const ALL: [AppTab; 3] = [AppTab::Scanner, AppTab::History, AppTab::Files];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppTab::Scanner => "scanner",
            AppTab::History => "data",
            AppTab::Files => "files",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AppTab::Scanner => "Scan",
            AppTab::History => "History",
            AppTab::Files => "File",
        }
    }

    /// 不明な値はスキャナータブとして扱う
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "data" | "history" => AppTab::History,
            "files" | "file" => AppTab::Files,
            _ => AppTab::Scanner,
        }
    }
}

/// 表示するビュー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Scanner,
    /// 全履歴テーブル
    History,
    /// 日付フォルダ一覧
    Folders,
    /// 指定日付で絞り込んだ履歴テーブル
    FolderDetail(DateKey),
}

/// ナビゲーション状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
    tab: AppTab,
    selected_date: Option<DateKey>,
}

impl Navigation {
    pub fn tab(&self) -> AppTab {
        self.tab
    }

    pub fn selected_date(&self) -> Option<&DateKey> {
        self.selected_date.as_ref()
    }

    /// タブ切り替え。ドリルダウンは常にリセットする
    pub fn select_tab(&mut self, tab: AppTab) {
        self.tab = tab;
        self.selected_date = None;
    }

    /// 日付フォルダを開く（ファイルタブ以外では無視）
    pub fn open_group(&mut self, date_key: DateKey) {
        if self.tab == AppTab::Files {
            self.selected_date = Some(date_key);
        }
    }

    /// フォルダ一覧に戻る
    pub fn close_group(&mut self) {
        self.selected_date = None;
    }

    pub fn view(&self) -> View {
        match (self.tab, &self.selected_date) {
            (AppTab::Scanner, _) => View::Scanner,
            (AppTab::History, _) => View::History,
            (AppTab::Files, Some(date_key)) => View::FolderDetail(date_key.clone()),
            (AppTab::Files, None) => View::Folders,
        }
    }
}
