use crate::export::ExportFormat;
use clap::{Parser, Subcommand};
use scan_ledger_common::DateKey;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scan-ledger")]
#[command(about = "バーコード/QRスキャン履歴とAI商品識別", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 履歴の保存先ディレクトリ（設定より優先）
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// スキャン結果を履歴に追加
    Scan {
        /// 読み取ったコード
        #[arg(required = true)]
        code: String,

        /// コード形式 (QR_CODE/EAN_13/...)
        #[arg(short, long, default_value = "QR_CODE")]
        format: String,
    },

    /// 履歴を表示
    List {
        /// 日付で絞り込み (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<DateKey>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 日付フォルダ一覧を表示
    Folders,

    /// アイテムを削除
    Delete {
        #[arg(required = true)]
        id: String,
    },

    /// 名前を設定
    Rename {
        #[arg(required = true)]
        id: String,

        #[arg(required = true)]
        name: String,
    },

    /// 手入力コードを設定
    SetCode {
        #[arg(required = true)]
        id: String,

        #[arg(required = true)]
        code: String,
    },

    /// AIで商品を識別
    Analyze {
        /// 対象ID（複数可）
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// 履歴を一括削除
    Clear {
        /// 指定日付のみ削除 (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<DateKey>,

        /// 確認をスキップ
        #[arg(short, long)]
        yes: bool,
    },

    /// 履歴をExcel/JSONに出力
    Export {
        /// 出力ファイル
        #[arg(required = true)]
        output: PathBuf,

        /// 出力形式 (excel/json)。省略時は拡張子から判定
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// 日付で絞り込み (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<DateKey>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// モデルを設定
        #[arg(long)]
        set_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
