use clap::Parser;
use dialoguer::Confirm;
use scan_ledger::{cli, config, error, export, identifier, logging, storage};
use scan_ledger_common::{ClearScope, Repository, ScannedItem};
use cli::{Cli, Commands};
use config::Config;
use error::{Result, ScanLedgerError};
use identifier::GeminiClient;
use storage::FileSlot;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    // --data-dir は設定ファイルには書き込まない
    let mut config = Config::load()?;
    let data_dir_override = cli.data_dir.clone();

    let open_repository = || -> Result<Repository<FileSlot>> {
        let slot = FileSlot::in_dir(&config.resolve_data_dir(data_dir_override.as_deref())?);
        tracing::debug!(path = %slot.path().display(), "履歴ファイル");
        Ok(Repository::open(slot))
    };

    match cli.command {
        Commands::Scan { code, format } => {
            if code.trim().is_empty() {
                return Err(ScanLedgerError::InvalidArgument("コードが空です".into()));
            }
            let mut repo = open_repository()?;
            let item = repo.add_item(&code, &format);
            println!("✔ 追加しました: {} ({} / {})", item.id, item.code, item.format);
        }

        Commands::List { date, json } => {
            let repo = open_repository()?;
            let items = match &date {
                Some(key) => repo.items_for_date(key),
                None => repo.items().to_vec(),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else if items.is_empty() {
                println!("履歴がありません");
            } else {
                print_items(&items);
            }
        }

        Commands::Folders => {
            let repo = open_repository()?;
            let groups = repo.folder_groups();
            if groups.is_empty() {
                println!("履歴がありません");
            }
            for group in groups {
                println!("📁 {}  {}件", group.date_key, group.count);
            }
        }

        Commands::Delete { id } => {
            let mut repo = open_repository()?;
            if repo.delete_item(&id) {
                println!("✔ 削除しました: {}", id);
            } else {
                println!("アイテムが見つかりません: {}", id);
            }
        }

        Commands::Rename { id, name } => {
            let mut repo = open_repository()?;
            report_update(repo.update_name(&id, &name), &id);
        }

        Commands::SetCode { id, code } => {
            let mut repo = open_repository()?;
            report_update(repo.update_manual_code(&id, &code), &id);
        }

        Commands::Analyze { ids } => {
            let api_key = config.api_key();
            if api_key.is_none() {
                tracing::warn!("APIキー未設定: `scan-ledger config --set-api-key YOUR_KEY` で設定してください");
            }
            let client = GeminiClient::new(api_key, config.model.clone());
            let mut repo = open_repository()?;

            for id in &ids {
                if repo.get(id).is_none() {
                    println!("アイテムが見つかりません: {}", id);
                    continue;
                }
                println!("🔍 識別中: {}", id);
                repo.analyze(id, &client).await;
                if let Some(item) = repo.get(id) {
                    println!("  {}", item.description.as_deref().unwrap_or("-"));
                }
            }
        }

        Commands::Clear { date, yes } => {
            let mut repo = open_repository()?;
            let confirm = |scope: &ClearScope| yes || confirm_clear(scope);
            let removed = match &date {
                Some(key) => repo.clear_group(key, confirm),
                None => repo.clear_all(confirm),
            };
            println!("✔ {}件削除しました", removed);
        }

        Commands::Export { output, format, date } => {
            let format = match format.or_else(|| export::ExportFormat::from_path(&output)) {
                Some(f) => f,
                None => {
                    return Err(ScanLedgerError::InvalidArgument(
                        "出力形式を判定できません。--format excel|json を指定してください".into(),
                    ))
                }
            };

            let repo = open_repository()?;
            let items = match &date {
                Some(key) => repo.items_for_date(key),
                None => repo.items().to_vec(),
            };
            export::export_items(&items, format, &output)?;
            println!("✔ {}件を出力しました: {}", items.len(), output.display());
        }

        Commands::Config { set_api_key, set_model, show } => {
            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(model) = set_model {
                config.model = model;
                config.save()?;
                println!("✔ モデルを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                match config.resolve_data_dir(data_dir_override.as_deref()) {
                    Ok(dir) => println!("  保存先: {}", dir.display()),
                    Err(e) => println!("  保存先: {}", e),
                }
                println!("  APIキー: {}", if config.api_key().is_some() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}

fn confirm_clear(scope: &ClearScope) -> bool {
    let prompt = format!("{} ({}件)", scope.prompt(), scope.count());
    match Confirm::new().with_prompt(prompt).default(false).interact() {
        Ok(answer) => answer,
        Err(e) => {
            tracing::warn!(error = %e, "確認入力を取得できません。削除を中止します");
            false
        }
    }
}

fn report_update(updated: bool, id: &str) {
    if updated {
        println!("✔ 更新しました: {}", id);
    } else {
        println!("アイテムが見つかりません: {}", id);
    }
}

fn print_items(items: &[ScannedItem]) {
    for item in items {
        let name = item.name.as_deref().unwrap_or("-");
        let status = if item.is_loading() { " (識別中)" } else { "" };
        println!(
            "{}  {} {}  {:<10} {}  {}{}",
            item.id,
            item.date_key(),
            item.time_label(),
            item.format,
            item.effective_code(),
            name,
            status,
        );
        if let Some(description) = &item.description {
            println!("    {}", description);
        }
    }
}
