use std::io::Cursor;

use calamine::{DataType, Reader, Xls, Xlsx};

use crate::models::{AppError, RowRecord};

use super::{build_row_records, SpreadsheetKind};

/// Excelのバイナリを解析し、先頭シートを行レコードに変換する
pub fn parse_spreadsheet_bytes(
    kind: SpreadsheetKind,
    bytes: Vec<u8>,
) -> Result<Vec<RowRecord>, AppError> {
    let rows = match kind {
        SpreadsheetKind::Xlsx => read_first_sheet::<Xlsx<Cursor<Vec<u8>>>>(bytes)?,
        SpreadsheetKind::Xls => read_first_sheet::<Xls<Cursor<Vec<u8>>>>(bytes)?,
    };

    Ok(build_row_records(rows))
}

fn read_first_sheet<R>(bytes: Vec<u8>) -> Result<Vec<Vec<String>>, AppError>
where
    R: Reader<Cursor<Vec<u8>>>,
{
    let mut workbook = R::new(Cursor::new(bytes))
        .map_err(|err| AppError::malformed(format!("Excelファイルの読み込みに失敗しました: {err:?}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::malformed("ワークシートが見つかりませんでした。"))?
        .map_err(|err| AppError::malformed(format!("ワークシートの解析に失敗しました: {err:?}")))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(data_type_to_string).collect())
        .collect())
}

fn data_type_to_string(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        DataType::String(s) => s.trim().to_string(),
        DataType::Float(f) => {
            if f.fract().abs() < f64::EPSILON {
                format!("{:.0}", f)
            } else {
                f.to_string()
            }
        }
        DataType::Int(v) => v.to_string(),
        DataType::Bool(v) => v.to_string(),
        DataType::Error(_) => String::new(),
        _ => cell.to_string(),
    }
}
