//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use leptos::task::spawn_local;
use crate::api::gemini::GeminiFetchClient;
use crate::components::{
    bottom_nav::BottomNav,
    folder_view::FolderView,
    header::Header,
    scanner_view::ScannerView,
    table_view::TableView,
};
use crate::storage::LocalStorageSlot;
use scan_ledger_common::gemini::DEFAULT_MODEL;
use scan_ledger_common::{AppTab, DateKey, Identifier, Navigation, Repository, View};

/// ブラウザの確認ダイアログ（取得できなければ削除しない）
fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// URLハッシュ（`#files` など）から開くタブ
fn tab_from_location() -> AppTab {
    web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .map(|hash| AppTab::parse_lenient(hash.trim_start_matches('#')))
        .unwrap_or_default()
}

fn write_tab_to_location(tab: AppTab) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_hash(tab.as_str());
    }
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    // アプリケーション状態
    let repo = RwSignal::new(Repository::open(LocalStorageSlot));
    let nav = RwSignal::new({
        let mut nav = Navigation::default();
        nav.select_tab(tab_from_location());
        nav
    });
    Effect::new(move |_| write_tab_to_location(nav.with(|n| n.tab())));
    let (api_key, set_api_key) = signal(String::new());

    let items = Signal::derive(move || repo.with(|r| r.items().to_vec()));
    let groups = Signal::derive(move || repo.with(|r| r.folder_groups()));

    // スキャンハンドラ
    let on_scan = move |code: String, format: String| {
        repo.update(|r| {
            r.add_item(&code, &format);
        });
    };

    let on_delete = move |id: String| {
        repo.update(|r| {
            r.delete_item(&id);
        });
    };

    let on_rename = move |id: String, name: String| {
        repo.update(|r| {
            r.update_name(&id, &name);
        });
    };

    let on_set_code = move |id: String, code: String| {
        repo.update(|r| {
            r.update_manual_code(&id, &code);
        });
    };

    // 識別ハンドラ: ローディング設定 → API呼び出し → 結果反映
    let on_analyze = move |id: String| {
        let Some(code) = repo.try_update(|r| r.begin_analysis(&id)).flatten() else {
            return;
        };
        let client = GeminiFetchClient::new(api_key.get_untracked(), DEFAULT_MODEL);
        spawn_local(async move {
            let result = client.identify(&code).await;
            if let Err(e) = &result {
                gloo::console::warn!(format!("識別失敗: {}", e));
            }
            repo.update(|r| r.finish_analysis(&id, result));
        });
    };

    let on_clear_all = move |_: ()| {
        repo.update(|r| {
            r.clear_all(|scope| confirm(&scope.prompt()));
        });
    };

    let on_clear_group = move |date_key: DateKey| {
        let removed = repo
            .try_update(|r| r.clear_group(&date_key, |scope| confirm(&scope.prompt())))
            .unwrap_or(0);
        if removed > 0 {
            nav.update(|n| n.close_group());
        }
    };

    let content = move || match nav.with(|n| n.view()) {
        View::Scanner => view! {
            <ScannerView on_scan=on_scan api_key=api_key set_api_key=set_api_key />
        }
        .into_any(),
        View::History => view! {
            <TableView
                items=items
                on_delete=on_delete
                on_rename=on_rename
                on_set_code=on_set_code
                on_analyze=on_analyze
                on_clear=on_clear_all
            />
        }
        .into_any(),
        View::Folders => view! {
            <FolderView groups=groups on_select=move |key| nav.update(|n| n.open_group(key)) />
        }
        .into_any(),
        View::FolderDetail(date_key) => {
            let filtered = Signal::derive({
                let date_key = date_key.clone();
                move || repo.with(|r| r.items_for_date(&date_key))
            });
            let title = date_key.to_string();
            view! {
                <div class="folder-detail">
                    <div class="folder-detail-header">
                        <button
                            class="btn btn-tertiary btn-small"
                            on:click=move |_| nav.update(|n| n.close_group())
                        >
                            "← Back"
                        </button>
                        <h2>{title}</h2>
                    </div>
                    <TableView
                        items=filtered
                        on_delete=on_delete
                        on_rename=on_rename
                        on_set_code=on_set_code
                        on_analyze=on_analyze
                        on_clear=move |_| on_clear_group(date_key.clone())
                    />
                </div>
            }
            .into_any()
        }
    };

    view! {
        <div class="container">
            <Header />
            <main class="content">{content}</main>
            <BottomNav nav=nav />
        </div>
    }
}
