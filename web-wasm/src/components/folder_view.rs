//! 日付フォルダ一覧

use leptos::prelude::*;
use scan_ledger_common::{DateKey, FolderGroup};

#[component]
pub fn FolderView<F>(groups: Signal<Vec<FolderGroup>>, on_select: F) -> impl IntoView
where
    F: Fn(DateKey) + 'static + Clone + Send + Sync,
{
    view! {
        <div class="folder-view">
            {move || {
                let groups = groups.get();
                if groups.is_empty() {
                    return view! { <p class="text-muted">"No folders yet"</p> }.into_any();
                }
                groups
                    .into_iter()
                    .map(|group| {
                        let on_select = on_select.clone();
                        let key = group.date_key.clone();
                        view! {
                            <button class="folder-row" on:click=move |_| on_select(key.clone())>
                                <span class="folder-name">{group.date_key.to_string()}</span>
                                <span class="folder-count">{format!("{} scans", group.count)}</span>
                            </button>
                        }
                    })
                    .collect_view()
                    .into_any()
            }}
        </div>
    }
}
