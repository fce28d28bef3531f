//! スキャナービュー
//!
//! カメラ読み取りと手入力のどちらも同じ `on_scan(コード, 形式)` に渡す。

use leptos::prelude::*;
use leptos::task::spawn_local;
use crate::camera;
use crate::components::settings_panel::SettingsPanel;

const VIEWPORT_ID: &str = "scanner-viewport";

const FORMATS: &[&str] = &["QR_CODE", "EAN_13", "EAN_8", "UPC_A", "UPC_E", "CODE_128", "CODE_39"];

#[component]
pub fn ScannerView<F>(
    on_scan: F,
    api_key: ReadSignal<String>,
    set_api_key: WriteSignal<String>,
) -> impl IntoView
where
    F: Fn(String, String) + 'static + Clone + Send + Sync,
{
    let (code, set_code) = signal(String::new());
    let (format, set_format) = signal(FORMATS[0].to_string());
    let (camera_status, set_camera_status) = signal("Starting camera...".to_string());
    let (last_scan, set_last_scan) = signal(None::<(String, String)>);

    let record = move |code: String, format: String| {
        set_last_scan.set(Some((code.clone(), format.clone())));
        on_scan(code, format);
    };

    // 描画後にカメラを開始
    {
        let record = record.clone();
        Effect::new(move |_| {
            let record = record.clone();
            spawn_local(async move {
                // 開始待ちの間にビューが破棄されていることがある
                match camera::start(VIEWPORT_ID, record).await {
                    Ok(()) => {
                        set_camera_status.try_set(String::new());
                    }
                    Err(msg) => {
                        gloo::console::warn!(msg.clone());
                        set_camera_status
                            .try_set("Camera unavailable. Enter the code manually.".to_string());
                    }
                }
            });
        });
    }

    on_cleanup(|| spawn_local(camera::stop()));

    let submit = {
        let record = record.clone();
        move || {
            let value = code.get_untracked();
            if value.trim().is_empty() {
                return;
            }
            record(value.trim().to_string(), format.get_untracked());
            set_code.set(String::new());
        }
    };

    view! {
        <div class="scanner-view">
            <div id=VIEWPORT_ID class="scanner-viewport"></div>
            <p class="camera-status">{move || camera_status.get()}</p>

            {move || last_scan.get().map(|(code, format)| view! {
                <div class="last-scan">
                    <span class="item-format">{format}</span>
                    <span class="item-code">{code}</span>
                </div>
            })}

            <div class="manual-entry">
                <input
                    type="text"
                    placeholder="Code"
                    prop:value=move || code.get()
                    on:input=move |ev| set_code.set(event_target_value(&ev))
                    on:keydown={
                        let submit = submit.clone();
                        move |ev| {
                            if ev.key() == "Enter" {
                                submit();
                            }
                        }
                    }
                />
                <select on:change=move |ev| set_format.set(event_target_value(&ev))>
                    {FORMATS
                        .iter()
                        .map(|f| view! {
                            <option value=*f selected=move || format.get() == *f>{*f}</option>
                        })
                        .collect_view()}
                </select>
                <button
                    class="btn btn-primary"
                    disabled=move || code.get().trim().is_empty()
                    on:click=move |_| submit()
                >
                    "Add"
                </button>
            </div>

            <SettingsPanel api_key=api_key set_api_key=set_api_key />
        </div>
    }
}
