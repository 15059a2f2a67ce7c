use crate::models::{AppError, CartItem, RowRecord};
use crate::utils::text::{is_numeric_string, trailing_digits_after_slash};

pub const VARIANT_ID_COLUMN: &str = "Variant ID";
pub const QUANTITY_COLUMN: &str = "Quantity";

/// 行レコードからカート投入用のバリアントと数量を取り出す
///
/// 1. 数量が空・`"0"`・数値でない行は除外する
/// 2. 残った行のバリアントIDから末尾の数字列を取り出し、取れない行は除外する
///
/// 行の順序は元のまま保持する。
pub fn normalize_cart_items(records: &[RowRecord]) -> Result<Vec<CartItem>, AppError> {
    let with_quantity: Vec<(usize, &RowRecord, &str)> = records
        .iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            let quantity = row.get(QUANTITY_COLUMN).trim();
            if is_valid_quantity(quantity) {
                Some((idx, row, quantity))
            } else {
                tracing::debug!(row = idx + 1, quantity, "skipping row without a usable quantity");
                None
            }
        })
        .collect();

    if with_quantity.is_empty() {
        return Err(AppError::NoValidQuantities);
    }

    let items: Vec<CartItem> = with_quantity
        .into_iter()
        .filter_map(|(idx, row, quantity)| {
            let raw_variant = row.get(VARIANT_ID_COLUMN);
            match trailing_digits_after_slash(raw_variant) {
                Some(variant_id) => Some(CartItem {
                    variant_id: variant_id.to_string(),
                    quantity: quantity.to_string(),
                }),
                None => {
                    tracing::debug!(row = idx + 1, raw_variant, "skipping row without a variant id");
                    None
                }
            }
        })
        .collect();

    if items.is_empty() {
        return Err(AppError::NoValidVariantIds);
    }

    Ok(items)
}

fn is_valid_quantity(quantity: &str) -> bool {
    !quantity.is_empty() && quantity != "0" && is_numeric_string(quantity)
}
