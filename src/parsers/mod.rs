mod builder;
mod csv;
mod excel;

use std::path::Path;

use crate::models::{AppError, RowRecord};

pub use builder::build_row_records;
pub use self::csv::parse_csv_text;
pub use excel::parse_spreadsheet_bytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetKind {
    Xlsx,
    Xls,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Delimited,
    Spreadsheet(SpreadsheetKind),
}

impl FileFormat {
    /// ファイル名の拡張子から形式を判定する（対象外の拡張子は `None`）
    pub fn detect(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())?;

        match ext.as_str() {
            "csv" => Some(FileFormat::Delimited),
            "xlsx" => Some(FileFormat::Spreadsheet(SpreadsheetKind::Xlsx)),
            "xls" => Some(FileFormat::Spreadsheet(SpreadsheetKind::Xls)),
            _ => None,
        }
    }
}

/// 1回のアップロードで受け取る生データ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    Text(String),
    Binary { kind: SpreadsheetKind, bytes: Vec<u8> },
}

pub fn parse_records(input: RawInput) -> Result<Vec<RowRecord>, AppError> {
    match input {
        RawInput::Text(text) => Ok(parse_csv_text(&text)),
        RawInput::Binary { kind, bytes } => parse_spreadsheet_bytes(kind, bytes),
    }
}
