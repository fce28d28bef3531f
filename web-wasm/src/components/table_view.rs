//! 履歴テーブルコンポーネント
//!
//! 全履歴と日付フォルダ内の両方で使う。変更はすべてコールバック経由。

use leptos::prelude::*;
use scan_ledger_common::ScannedItem;

#[component]
pub fn TableView<FD, FN, FC, FA, FX>(
    items: Signal<Vec<ScannedItem>>,
    on_delete: FD,
    on_rename: FN,
    on_set_code: FC,
    on_analyze: FA,
    on_clear: FX,
) -> impl IntoView
where
    FD: Fn(String) + 'static + Clone + Send + Sync,
    FN: Fn(String, String) + 'static + Clone + Send + Sync,
    FC: Fn(String, String) + 'static + Clone + Send + Sync,
    FA: Fn(String) + 'static + Clone + Send + Sync,
    FX: Fn(()) + 'static + Clone + Send + Sync,
{
    let is_empty = move || items.with(|i| i.is_empty());

    view! {
        <div class="table-view">
            <div class="table-toolbar">
                <span class="item-count">{move || format!("{} items", items.with(|i| i.len()))}</span>
                <button
                    class="btn btn-tertiary btn-small"
                    disabled=is_empty
                    on:click=move |_| on_clear(())
                >
                    "Clear"
                </button>
            </div>

            {move || {
                if is_empty() {
                    return view! { <p class="text-muted">"No scans yet"</p> }.into_any();
                }
                items
                    .get()
                    .into_iter()
                    .map(|item| view! {
                        <ItemRow
                            item=item
                            on_delete=on_delete.clone()
                            on_rename=on_rename.clone()
                            on_set_code=on_set_code.clone()
                            on_analyze=on_analyze.clone()
                        />
                    })
                    .collect_view()
                    .into_any()
            }}
        </div>
    }
}

#[component]
fn ItemRow<FD, FN, FC, FA>(
    item: ScannedItem,
    on_delete: FD,
    on_rename: FN,
    on_set_code: FC,
    on_analyze: FA,
) -> impl IntoView
where
    FD: Fn(String) + 'static + Clone + Send + Sync,
    FN: Fn(String, String) + 'static + Clone + Send + Sync,
    FC: Fn(String, String) + 'static + Clone + Send + Sync,
    FA: Fn(String) + 'static + Clone + Send + Sync,
{
    let loading = item.is_loading();
    let description = if loading {
        "Analyzing...".to_string()
    } else {
        item.description.clone().unwrap_or_default()
    };

    view! {
        <div class="item-row" class:loading=loading>
            <div class="item-main">
                <span class="item-format">{item.format.clone()}</span>
                <span class="item-code">{item.code.clone()}</span>
                <span class="item-time">{format!("{} {}", item.date_key(), item.time_label())}</span>
            </div>

            <div class="item-fields">
                <input
                    type="text"
                    placeholder="Name"
                    prop:value=item.name.clone().unwrap_or_default()
                    on:change={
                        let id = item.id.clone();
                        move |ev| on_rename(id.clone(), event_target_value(&ev))
                    }
                />
                <input
                    type="text"
                    placeholder="Manual code"
                    prop:value=item.manual_code.clone().unwrap_or_default()
                    on:change={
                        let id = item.id.clone();
                        move |ev| on_set_code(id.clone(), event_target_value(&ev))
                    }
                />
            </div>

            <p class="item-description">{description}</p>

            <div class="item-actions">
                <button
                    class="btn btn-primary btn-small"
                    disabled=loading
                    on:click={
                        let id = item.id.clone();
                        move |_| on_analyze(id.clone())
                    }
                >
                    {if loading { "Analyzing..." } else { "AI Identify" }}
                </button>
                <button
                    class="btn btn-tertiary btn-small"
                    on:click={
                        let id = item.id.clone();
                        move |_| on_delete(id.clone())
                    }
                >
                    "Delete"
                </button>
            </div>
        </div>
    }
}
