use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "scan_ledger=info,scan_ledger_common=info";
const VERBOSE_LOG_FILTER: &str = "scan_ledger=debug,scan_ledger_common=debug";

/// stderr へのログ出力を初期化（`RUST_LOG` があればそちらを優先）
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { VERBOSE_LOG_FILTER } else { DEFAULT_LOG_FILTER };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
