use crate::models::RowRecord;
use crate::utils::text::is_blank_row;

/// セル文字列の2次元配列から行レコードを組み立てる
///
/// 最初の空白でない行をヘッダーとみなし、以降の空白でない行を
/// ヘッダーの位置に合わせて列名に対応付ける。
/// 不足するセルは空文字列、ヘッダーより多いセルは無視する。
pub fn build_row_records(rows: Vec<Vec<String>>) -> Vec<RowRecord> {
    let mut header: Option<Vec<String>> = None;
    let mut records = Vec::new();

    for row in rows {
        if is_blank_row(&row) {
            continue;
        }

        let Some(columns) = header.as_ref() else {
            header = Some(row.iter().map(|name| name.trim().to_string()).collect());
            continue;
        };

        let record: RowRecord = columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let value = row.get(idx).map(|cell| cell.trim()).unwrap_or("");
                (column.as_str(), value)
            })
            .collect();
        records.push(record);
    }

    records
}
