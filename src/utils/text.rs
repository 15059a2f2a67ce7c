/// 前後の空白を削除し、先頭と末尾の `"` を1文字ずつ取り除く
pub fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_leading = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let without_trailing = without_leading
        .strip_suffix('"')
        .unwrap_or(without_leading);
    without_trailing.to_string()
}

/// 先頭のUTF-8 BOMを削除
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{FEFF}').unwrap_or(text)
}

/// 全セルが空白のみの行かどうか判定
pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// 数値として解釈できる文字列かどうか判定
///
/// ブラウザの数値変換と同じ範囲を受け付ける:
/// 符号付き10進数・指数表記・`0x`/`0o`/`0b` 整数・`Infinity`。
/// `NaN`、`inf`、桁区切りのカンマは数値として扱わない。
pub fn is_numeric_string(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }

    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        let lower = value.get(..2).map(|head| head.to_ascii_lowercase());
        if lower.as_deref() == Some(prefix) {
            let digits = &value[2..];
            return !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
        }
    }

    let unsigned = value
        .strip_prefix('+')
        .or_else(|| value.strip_prefix('-'))
        .unwrap_or(value);
    if unsigned == "Infinity" {
        return true;
    }

    // f64のパースは "inf" や "nan" も受け付けるため、指数以外の英字を先に除外する
    if unsigned
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return false;
    }

    value.parse::<f64>().is_ok()
}

/// 末尾の `/` 以降が数字のみであれば、その数字列を返す
pub fn trailing_digits_after_slash(value: &str) -> Option<&str> {
    let (_, tail) = value.rsplit_once('/')?;
    if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) {
        Some(tail)
    } else {
        None
    }
}
