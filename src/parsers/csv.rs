use crate::models::RowRecord;
use crate::utils::text::{clean_field, strip_bom};

use super::build_row_records;

/// CSVテキストを行レコードに変換する
///
/// クォートの状態は1行ごとにリセットする。
/// 閉じられていないクォートを含む行は、クォートを通常の文字として扱い
/// 後続の行を巻き込まない。
pub fn parse_csv_text(text: &str) -> Vec<RowRecord> {
    let rows = strip_bom(text).lines().map(split_line).collect();
    build_row_records(rows)
}

fn split_line(line: &str) -> Vec<String> {
    tokenize_quoted(line).unwrap_or_else(|| line.split(',').map(clean_field).collect())
}

/// 1行をカンマで分割する（クォート内のカンマは区切りとみなさない）
///
/// 開きクォートの前の空白は許容し、クォート内の `""` は `"` 1文字として扱う。
/// 行末でクォートが閉じていなければ `None` を返す。
fn tokenize_quoted(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            ',' => {
                fields.push(finish_field(&field, quoted));
                field.clear();
                quoted = false;
            }
            '"' if !quoted && field.trim().is_empty() => {
                field.clear();
                quoted = true;
                in_quotes = true;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return None;
    }
    fields.push(finish_field(&field, quoted));
    Some(fields)
}

fn finish_field(field: &str, quoted: bool) -> String {
    if quoted {
        field.trim().to_string()
    } else {
        clean_field(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_csv() {
        let text = "Variant ID,Quantity\ngid://shopify/ProductVariant/42649849659629,3\ngid://shopify/ProductVariant/7,0\n";
        let records = parse_csv_text(text);

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].get("Variant ID"),
            "gid://shopify/ProductVariant/42649849659629"
        );
        assert_eq!(records[0].get("Quantity"), "3");
        assert_eq!(records[1].get("Quantity"), "0");
    }

    #[test]
    fn test_comma_inside_quotes() {
        let text = "Name,Variant ID,Quantity\n\"Acme, Inc\",gid://shopify/ProductVariant/111,5\n";
        let records = parse_csv_text(text);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Name"), "Acme, Inc");
        assert_eq!(records[0].get("Variant ID"), "gid://shopify/ProductVariant/111");
        assert_eq!(records[0].get("Quantity"), "5");
    }

    #[test]
    fn test_space_before_opening_quote() {
        let text = "SKU, Name, Variant ID, Quantity\nA1, \"Acme, Inc\", gid://shopify/ProductVariant/111, 5\n";
        let records = parse_csv_text(text);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("SKU"), "A1");
        assert_eq!(records[0].get("Name"), "Acme, Inc");
        assert_eq!(records[0].get("Variant ID"), "gid://shopify/ProductVariant/111");
        assert_eq!(records[0].get("Quantity"), "5");
    }

    #[test]
    fn test_unterminated_quote_stays_on_its_line() {
        let text = "Name,Variant ID,Quantity\n\"Acme,gid://shopify/ProductVariant/1,2\nWidget,gid://shopify/ProductVariant/2,3\nGadget,gid://shopify/ProductVariant/3,4\n";
        let records = parse_csv_text(text);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].get("Name"), "Acme");
        assert_eq!(records[0].get("Variant ID"), "gid://shopify/ProductVariant/1");
        assert_eq!(records[0].get("Quantity"), "2");
        assert_eq!(records[2].get("Name"), "Gadget");
        assert_eq!(records[2].get("Quantity"), "4");
    }

    #[test]
    fn test_escaped_quote_inside_quotes() {
        let text = "Name,Quantity\n\"The \"\"Big\"\" One, XL\",2\n";
        let records = parse_csv_text(text);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Name"), "The \"Big\" One, XL");
        assert_eq!(records[0].get("Quantity"), "2");
    }

    #[test]
    fn test_literal_quotes_in_unquoted_fields_are_stripped() {
        let records = parse_csv_text("Variant ID,Quantity\ngid://shopify/ProductVariant/4,5\"\n");
        assert_eq!(records[0].get("Quantity"), "5");
    }

    #[test]
    fn test_blank_lines_crlf_and_bom() {
        let text = "\u{FEFF}Variant ID , Quantity\r\n\r\n  gid://shopify/ProductVariant/9 , 4 \r\n   \r\n";
        let records = parse_csv_text(text);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Variant ID"), "gid://shopify/ProductVariant/9");
        assert_eq!(records[0].get("Quantity"), "4");
    }

    #[test]
    fn test_short_rows_pad_with_empty() {
        let records = parse_csv_text("Variant ID,Quantity,Note\ngid://x/1,2\n");
        assert_eq!(records[0].get("Note"), "");
        assert_eq!(records[0].get("Quantity"), "2");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_csv_text("").is_empty());
        assert!(parse_csv_text("Variant ID,Quantity\n").is_empty());
    }
}
