//! 下部ナビゲーション

use leptos::prelude::*;
use scan_ledger_common::{AppTab, Navigation};

#[component]
pub fn BottomNav(nav: RwSignal<Navigation>) -> impl IntoView {
    view! {
        <nav class="bottom-nav">
            {AppTab::ALL
                .into_iter()
                .map(|tab| {
                    view! {
                        <button
                            class=format!("nav-button nav-{}", tab.as_str())
                            class:active=move || nav.with(|n| n.tab() == tab)
                            on:click=move |_| nav.update(|n| n.select_tab(tab))
                        >
                            <span class="nav-label">{tab.label()}</span>
                        </button>
                    }
                })
                .collect_view()}
        </nav>
    }
}
