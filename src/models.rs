use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub const DROP_REJECTED_MESSAGE: &str =
    "Only CSV or Excel (.xlsx, .xls) files are accepted. Please upload a valid file.";
pub const NO_VALID_QUANTITIES_MESSAGE: &str = "No valid products found with quantity > 0";
pub const NO_VALID_VARIANT_IDS_MESSAGE: &str =
    "Could not extract valid variant IDs from CSV/Excel file";
pub const MALFORMED_FILE_MESSAGE: &str =
    "Error processing CSV/Excel file. Please check the format.";

/// 1行分の表データ（列名 → 値）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRecord {
    values: HashMap<String, String>,
}

impl RowRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同名の列が既にあれば上書きする（右側の列が優先）
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.values.insert(column.into(), value.into());
    }

    /// 列が存在しない場合は空文字列を返す
    pub fn get(&self, column: &str) -> &str {
        self.values.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RowRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RowRecord::new();
        for (column, value) in iter {
            record.insert(column, value);
        }
        record
    }
}

/// カートに追加するバリアントと数量の組
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub variant_id: String,
    pub quantity: String,
}

impl fmt::Display for CartItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.variant_id, self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinkResult {
    pub url: String,
    pub item_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    DropRejected,
    NoValidQuantities,
    NoValidVariantIds,
    MalformedFile,
}

/// アップロード処理のエラー
///
/// `Display` はそのまま利用者に表示できるメッセージを返す。
/// `MalformedFile` の `detail` はログ用で、表示はしない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AppError {
    #[error("{}", DROP_REJECTED_MESSAGE)]
    DropRejected,
    #[error("{}", NO_VALID_QUANTITIES_MESSAGE)]
    NoValidQuantities,
    #[error("{}", NO_VALID_VARIANT_IDS_MESSAGE)]
    NoValidVariantIds,
    #[error("{}", MALFORMED_FILE_MESSAGE)]
    MalformedFile { detail: String },
}

impl AppError {
    pub fn malformed(detail: impl Into<String>) -> Self {
        AppError::MalformedFile {
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::DropRejected => ErrorKind::DropRejected,
            AppError::NoValidQuantities => ErrorKind::NoValidQuantities,
            AppError::NoValidVariantIds => ErrorKind::NoValidVariantIds,
            AppError::MalformedFile { .. } => ErrorKind::MalformedFile,
        }
    }
}

/// 表示層に渡すエラー情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFailure {
    pub kind: ErrorKind,
    pub error_message: String,
}

impl From<&AppError> for UploadFailure {
    fn from(err: &AppError) -> Self {
        Self {
            kind: err.kind(),
            error_message: err.to_string(),
        }
    }
}

/// 1回のアップロードの最終結果
///
/// JSONでは `{ "url", "itemCount" }` か `{ "kind", "errorMessage" }` のどちらかになる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UploadOutcome {
    Ready(CartLinkResult),
    Failed(UploadFailure),
}

impl UploadOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, UploadOutcome::Ready(_))
    }
}

impl From<Result<CartLinkResult, AppError>> for UploadOutcome {
    fn from(result: Result<CartLinkResult, AppError>) -> Self {
        match result {
            Ok(link) => UploadOutcome::Ready(link),
            Err(err) => UploadOutcome::Failed(UploadFailure::from(&err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_record_missing_column_is_empty() {
        let row: RowRecord = [("Quantity", "3")].into_iter().collect();
        assert_eq!(row.get("Quantity"), "3");
        assert_eq!(row.get("Variant ID"), "");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AppError::NoValidQuantities.to_string(),
            "No valid products found with quantity > 0"
        );
        assert_eq!(
            AppError::malformed("zip header").to_string(),
            "Error processing CSV/Excel file. Please check the format."
        );
    }

    #[test]
    fn test_outcome_json_shape() {
        let ready = UploadOutcome::Ready(CartLinkResult {
            url: "https://shop.example/cart/1:2".to_string(),
            item_count: 1,
        });
        let json = serde_json::to_value(&ready).unwrap();
        assert_eq!(json["url"], "https://shop.example/cart/1:2");
        assert_eq!(json["itemCount"], 1);

        let failed = UploadOutcome::from(Err(AppError::NoValidVariantIds));
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["kind"], "noValidVariantIds");
        assert_eq!(
            json["errorMessage"],
            "Could not extract valid variant IDs from CSV/Excel file"
        );
    }
}
