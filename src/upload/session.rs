use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::Mutex;

use crate::config::ShopConfig;
use crate::models::{CartLinkResult, UploadFailure, UploadOutcome};

use super::{process_upload, UploadSource};

/// 表示層から参照する現在の状態
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum UploadState {
    Idle,
    #[serde(rename_all = "camelCase")]
    Processing { generation: u64, file_name: String },
    #[serde(rename_all = "camelCase")]
    Succeeded {
        generation: u64,
        file_name: String,
        result: CartLinkResult,
    },
    #[serde(rename_all = "camelCase")]
    Failed {
        generation: u64,
        file_name: String,
        failure: UploadFailure,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitResult {
    /// 最新のアップロードとして結果を反映した
    Committed(UploadOutcome),
    /// 処理中に新しいアップロードが始まったため、結果を破棄した
    Superseded { generation: u64, outcome: UploadOutcome },
}

/// 現在の結果を1つだけ保持するアップロード窓口
///
/// アップロードごとに単調増加する世代番号を発行し、
/// 完了時点で最新の世代である場合のみ結果を反映する。
pub struct UploadSession {
    shop: ShopConfig,
    generation: AtomicU64,
    state: Mutex<UploadState>,
}

impl UploadSession {
    pub fn new(shop: ShopConfig) -> Self {
        Self {
            shop,
            generation: AtomicU64::new(0),
            state: Mutex::new(UploadState::Idle),
        }
    }

    /// 最後に発行した世代番号（未発行なら0）
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub async fn state(&self) -> UploadState {
        self.state.lock().await.clone()
    }

    /// 状態をIdleに戻し、処理中のアップロードの結果も反映させない
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        *state = UploadState::Idle;
    }

    pub async fn submit<S>(&self, source: &S) -> SubmitResult
    where
        S: UploadSource + ?Sized,
    {
        let file_name = source.name().to_string();
        let generation = {
            let mut state = self.state.lock().await;
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = UploadState::Processing {
                generation,
                file_name: file_name.clone(),
            };
            generation
        };

        let outcome = UploadOutcome::from(process_upload(source, &self.shop).await);

        let mut state = self.state.lock().await;
        let latest = self.generation.load(Ordering::SeqCst);
        if latest != generation {
            tracing::warn!(
                generation,
                latest,
                file_name = file_name.as_str(),
                "discarding result of superseded upload"
            );
            return SubmitResult::Superseded {
                generation,
                outcome,
            };
        }

        *state = match &outcome {
            UploadOutcome::Ready(result) => UploadState::Succeeded {
                generation,
                file_name,
                result: result.clone(),
            },
            UploadOutcome::Failed(failure) => UploadState::Failed {
                generation,
                file_name,
                failure: failure.clone(),
            },
        };
        SubmitResult::Committed(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorKind;
    use crate::upload::InMemoryUpload;
    use async_trait::async_trait;
    use std::io;
    use std::sync::Arc;
    use tokio::sync::oneshot;

    const SLOW_CSV: &str = "Variant ID,Quantity\ngid://shopify/ProductVariant/1,1\n";
    const FAST_CSV: &str = "Variant ID,Quantity\ngid://shopify/ProductVariant/2,2\n";

    /// 合図を受け取るまで読み込みを完了しないファイル
    struct GatedUpload {
        inner: InMemoryUpload,
        gate: Mutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait]
    impl UploadSource for GatedUpload {
        fn name(&self) -> &str {
            self.inner.name()
        }

        async fn bytes(&self) -> io::Result<Vec<u8>> {
            if let Some(gate) = self.gate.lock().await.take() {
                let _ = gate.await;
            }
            self.inner.bytes().await
        }
    }

    fn session() -> UploadSession {
        UploadSession::new(ShopConfig::new("shop.example").unwrap())
    }

    #[tokio::test]
    async fn test_submit_commits_result() {
        let session = session();
        assert_eq!(session.state().await, UploadState::Idle);

        let result = session
            .submit(&InMemoryUpload::new("fast.csv", FAST_CSV))
            .await;

        let SubmitResult::Committed(UploadOutcome::Ready(link)) = result else {
            panic!("expected committed cart link");
        };
        assert_eq!(link.url, "https://shop.example/cart/2:2");
        assert_eq!(
            session.state().await,
            UploadState::Succeeded {
                generation: 1,
                file_name: "fast.csv".to_string(),
                result: link,
            }
        );
    }

    #[tokio::test]
    async fn test_failure_replaces_previous_result() {
        let session = session();
        session
            .submit(&InMemoryUpload::new("fast.csv", FAST_CSV))
            .await;
        session
            .submit(&InMemoryUpload::new("order.txt", FAST_CSV))
            .await;

        match session.state().await {
            UploadState::Failed {
                generation,
                failure,
                ..
            } => {
                assert_eq!(generation, 2);
                assert_eq!(failure.kind, ErrorKind::DropRejected);
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_superseded_upload_does_not_overwrite_newer_result() {
        let session = Arc::new(session());
        let (release, gate) = oneshot::channel();
        let slow = GatedUpload {
            inner: InMemoryUpload::new("slow.csv", SLOW_CSV),
            gate: Mutex::new(Some(gate)),
        };

        let first = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.submit(&slow).await })
        };
        while session.generation() < 1 {
            tokio::task::yield_now().await;
        }

        let second = session
            .submit(&InMemoryUpload::new("fast.csv", FAST_CSV))
            .await;
        assert!(matches!(second, SubmitResult::Committed(UploadOutcome::Ready(_))));

        release.send(()).unwrap();
        let first = first.await.unwrap();
        assert!(matches!(
            first,
            SubmitResult::Superseded { generation: 1, .. }
        ));

        match session.state().await {
            UploadState::Succeeded {
                generation,
                file_name,
                result,
            } => {
                assert_eq!(generation, 2);
                assert_eq!(file_name, "fast.csv");
                assert_eq!(result.url, "https://shop.example/cart/2:2");
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        let session = session();
        session
            .submit(&InMemoryUpload::new("fast.csv", FAST_CSV))
            .await;
        session.reset().await;
        assert_eq!(session.state().await, UploadState::Idle);
        assert_eq!(session.generation(), 2);
    }
}
