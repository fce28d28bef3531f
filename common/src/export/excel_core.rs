//! Excel生成（共通ライブラリ）
//!
//! 履歴テーブルを1シートの一覧形式で出力する

use crate::types::ScannedItem;
use rust_xlsxwriter::*;

/// 列定義（ラベル, 列幅）
pub const HISTORY_COLUMNS: &[(&str, f64)] = &[
    ("Date", 12.0),
    ("Time", 10.0),
    ("Code", 24.0),
    ("Format", 12.0),
    ("Name", 20.0),
    ("Manual Code", 18.0),
    ("Description", 60.0),
];

fn row_values(item: &ScannedItem) -> [String; 7] {
    [
        item.date_key().to_string(),
        item.time_label(),
        item.code.clone(),
        item.format.clone(),
        item.name.clone().unwrap_or_default(),
        item.manual_code.clone().unwrap_or_default(),
        item.description.clone().unwrap_or_default(),
    ]
}

/// 履歴をExcelバッファに生成
pub fn generate_history_excel(items: &[ScannedItem]) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0x555555))
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xAAAAAA));

    let value_format = Format::new()
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("History")
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    for (col, (label, width)) in HISTORY_COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, *width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
        worksheet.write_string_with_format(0, col, *label, &header_format)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
    }
    worksheet.set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;

    for (i, item) in items.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, value) in row_values(item).iter().enumerate() {
            worksheet.write_string_with_format(row, col as u16, value, &value_format)
                .map_err(|e| format!("値書き込みエラー: {}", e))?;
        }
    }

    workbook.save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
