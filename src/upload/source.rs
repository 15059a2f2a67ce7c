use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// アップロードされたファイル
///
/// 形式判定には `name()` の拡張子を使い、CSVは `text()`、Excelは `bytes()` で読み込む。
#[async_trait]
pub trait UploadSource: Send + Sync {
    fn name(&self) -> &str;

    async fn bytes(&self) -> io::Result<Vec<u8>>;

    /// 不正なUTF-8は置換文字に置き換える
    async fn text(&self) -> io::Result<String> {
        let bytes = self.bytes().await?;
        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        })
    }
}

/// メモリ上に保持済みのファイル
#[derive(Debug, Clone)]
pub struct InMemoryUpload {
    name: String,
    content: Vec<u8>,
}

impl InMemoryUpload {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

#[async_trait]
impl UploadSource for InMemoryUpload {
    fn name(&self) -> &str {
        &self.name
    }

    async fn bytes(&self) -> io::Result<Vec<u8>> {
        Ok(self.content.clone())
    }
}

/// ディスク上のファイル
#[derive(Debug, Clone)]
pub struct LocalFileUpload {
    path: PathBuf,
    name: String,
}

impl LocalFileUpload {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl UploadSource for LocalFileUpload {
    fn name(&self) -> &str {
        &self.name
    }

    async fn bytes(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}
