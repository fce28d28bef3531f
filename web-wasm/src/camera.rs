//! カメラスキャナー（html5-qrcode）へのブリッジ
//!
//! デコード処理はJS側ライブラリが行い、読み取った (コード, 形式) だけを受け取る。
//! JS側は開始・停止を順番に処理するので、開始待ちの間に停止しても同じカメラが止まる。

use std::cell::{Cell, RefCell};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// 同じコードを連続で読み取ったときに無視する間隔
const DUPLICATE_WINDOW_MS: f64 = 2000.0;

type ScanCallback = Closure<dyn FnMut(String, String)>;

thread_local! {
    /// JS側に渡したコールバック（世代番号つき）。停止後に解放する
    static CALLBACKS: RefCell<Vec<(u64, ScanCallback)>> = const { RefCell::new(Vec::new()) };
    static NEXT_GENERATION: Cell<u64> = const { Cell::new(0) };
}

#[wasm_bindgen(module = "/js/scanner-bridge.js")]
extern "C" {
    #[wasm_bindgen(js_name = "startScanner", catch)]
    async fn start_scanner_js(
        element_id: &str,
        on_scan: &js_sys::Function,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = "stopScanner", catch)]
    async fn stop_scanner_js() -> Result<JsValue, JsValue>;
}

/// 指定要素でカメラ読み取りを開始
pub async fn start<F>(element_id: &str, on_scan: F) -> Result<(), String>
where
    F: Fn(String, String) + 'static,
{
    let mut last: Option<(String, f64)> = None;
    let callback = ScanCallback::new(move |code: String, format: String| {
        let now = js_sys::Date::now();
        if let Some((prev, at)) = &last {
            if *prev == code && now - at < DUPLICATE_WINDOW_MS {
                return;
            }
        }
        last = Some((code.clone(), now));
        on_scan(code, format);
    });
    let function = callback.as_ref().unchecked_ref::<js_sys::Function>().clone();

    let generation = NEXT_GENERATION.with(|next| {
        let generation = next.get();
        next.set(generation + 1);
        generation
    });
    CALLBACKS.with(|callbacks| callbacks.borrow_mut().push((generation, callback)));

    match start_scanner_js(element_id, &function).await {
        Ok(_) => Ok(()),
        Err(e) => {
            CALLBACKS.with(|callbacks| callbacks.borrow_mut().retain(|(g, _)| *g != generation));
            Err(format!("カメラを開始できません: {:?}", e))
        }
    }
}

/// カメラを停止し、それまでに開始したぶんのコールバックを解放する
pub async fn stop() {
    let cutoff = NEXT_GENERATION.with(Cell::get);
    if let Err(e) = stop_scanner_js().await {
        gloo::console::warn!(format!("カメラ停止エラー: {:?}", e));
    }
    CALLBACKS.with(|callbacks| {
        callbacks
            .borrow_mut()
            .retain(|(generation, _)| *generation >= cutoff)
    });
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen(module = "/js/scanner-bridge.js")]
    extern "C" {
        #[wasm_bindgen(js_name = "startScanner")]
        fn start_scanner_promise(element_id: &str, on_scan: &js_sys::Function) -> js_sys::Promise;

        #[wasm_bindgen(js_name = "stopScanner")]
        fn stop_scanner_promise() -> js_sys::Promise;
    }

    /// 開始に時間がかかり、未開始のまま stop すると失敗する擬似スキャナー
    fn install_fake_scanner() {
        js_sys::eval(
            r#"
            globalThis.fakeScannersRunning = 0;
            globalThis.Html5Qrcode = class {
              constructor(elementId) { this.running = false; }
              start(camera, config, onSuccess) {
                return new Promise((resolve) => setTimeout(resolve, 20)).then(() => {
                  this.running = true;
                  globalThis.fakeScannersRunning += 1;
                });
              }
              stop() {
                if (!this.running) {
                  return Promise.reject(new Error('not running'));
                }
                this.running = false;
                globalThis.fakeScannersRunning -= 1;
                return Promise.resolve();
              }
              clear() {}
            };
            "#,
        )
        .expect("擬似スキャナーの登録失敗");
    }

    fn running_scanners() -> f64 {
        js_sys::Reflect::get(&js_sys::global(), &"fakeScannersRunning".into())
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(-1.0)
    }

    fn callback_count() -> usize {
        CALLBACKS.with(|callbacks| callbacks.borrow().len())
    }

    #[wasm_bindgen_test]
    async fn wasm_stop_while_starting_stops_camera() {
        install_fake_scanner();
        let noop = js_sys::Function::new_no_args("");

        let started = start_scanner_promise("viewport", &noop);
        let stopped = stop_scanner_promise();

        JsFuture::from(stopped).await.expect("停止失敗");
        JsFuture::from(started).await.expect("開始失敗");
        assert_eq!(running_scanners(), 0.0);
    }

    #[wasm_bindgen_test]
    async fn wasm_restart_keeps_single_camera() {
        install_fake_scanner();
        let noop = js_sys::Function::new_no_args("");

        let first = start_scanner_promise("viewport", &noop);
        let second = start_scanner_promise("viewport", &noop);
        JsFuture::from(first).await.expect("開始失敗");
        JsFuture::from(second).await.expect("開始失敗");
        assert_eq!(running_scanners(), 1.0);

        JsFuture::from(stop_scanner_promise()).await.expect("停止失敗");
        assert_eq!(running_scanners(), 0.0);
    }

    #[wasm_bindgen_test]
    async fn wasm_stop_releases_callbacks() {
        install_fake_scanner();

        start("viewport", |_, _| {}).await.expect("開始失敗");
        start("viewport", |_, _| {}).await.expect("開始失敗");
        assert_eq!(callback_count(), 2);

        stop().await;
        assert_eq!(callback_count(), 0);
        assert_eq!(running_scanners(), 0.0);
    }
}
