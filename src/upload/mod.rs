mod session;
mod source;

use crate::config::ShopConfig;
use crate::models::{AppError, CartLinkResult, RowRecord};
use crate::parsers::{self, FileFormat, RawInput};
use crate::processors::{build_cart_link, normalize_cart_items};

pub use session::{SubmitResult, UploadSession, UploadState};
pub use source::{InMemoryUpload, LocalFileUpload, UploadSource};

/// アップロードされたファイルからカートリンクを生成する
///
/// 形式判定 → 読み込み → 解析 → 正規化 → リンク生成の順に処理する。
/// 途中のエラーはすべて `AppError` のいずれかに変換して返す。
pub async fn process_upload<S>(source: &S, shop: &ShopConfig) -> Result<CartLinkResult, AppError>
where
    S: UploadSource + ?Sized,
{
    let file_name = source.name();
    let format = FileFormat::detect(file_name).ok_or_else(|| {
        tracing::info!(file_name, "rejected upload with unsupported extension");
        AppError::DropRejected
    })?;

    let result = run_pipeline(source, format, shop).await;
    match &result {
        Ok(link) => tracing::info!(file_name, item_count = link.item_count, "cart link ready"),
        Err(AppError::MalformedFile { detail }) => {
            tracing::warn!(file_name, detail = detail.as_str(), "failed to process upload")
        }
        Err(err) => tracing::info!(file_name, kind = ?err.kind(), "upload produced no cart items"),
    }
    result
}

async fn run_pipeline<S>(
    source: &S,
    format: FileFormat,
    shop: &ShopConfig,
) -> Result<CartLinkResult, AppError>
where
    S: UploadSource + ?Sized,
{
    let input = match format {
        FileFormat::Delimited => {
            let text = source
                .text()
                .await
                .map_err(|err| AppError::malformed(format!("ファイルの読み込みに失敗しました: {err}")))?;
            RawInput::Text(text)
        }
        FileFormat::Spreadsheet(kind) => {
            let bytes = source
                .bytes()
                .await
                .map_err(|err| AppError::malformed(format!("ファイルの読み込みに失敗しました: {err}")))?;
            RawInput::Binary { kind, bytes }
        }
    };
    let records = parse_on_worker(move || parsers::parse_records(input)).await?;

    tracing::debug!(rows = records.len(), "parsed upload");

    let items = normalize_cart_items(&records)?;
    Ok(build_cart_link(&items, shop))
}

/// 解析処理をブロッキング用スレッドで実行する（パニックは `MalformedFile` に変換）
async fn parse_on_worker<F>(parse: F) -> Result<Vec<RowRecord>, AppError>
where
    F: FnOnce() -> Result<Vec<RowRecord>, AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(parse)
        .await
        .map_err(|err| AppError::malformed(format!("ファイルの解析処理が異常終了しました: {err}")))?
}
