//! tracing のログをブラウザコンソールへ出す
//!
//! `common` 側のストレージ読み書き失敗などは tracing で記録されるので、
//! 購読者が無いとブラウザでは何も表示されない。

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_web::MakeWebConsoleWriter;

/// コンソール出力を初期化（二度目以降は何もしない）
pub fn init_logging() {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_writer(MakeWebConsoleWriter::new());

    let _ = tracing_subscriber::registry()
        .with(LevelFilter::INFO)
        .with(console_layer)
        .try_init();
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_init_logging_installs_global_subscriber() {
        init_logging();
        init_logging();
        assert!(tracing::dispatcher::has_been_set());
    }
}
