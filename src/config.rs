use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const SHOP_DOMAIN_ENV: &str = "CARTLINK_SHOP_DOMAIN";

/// バイナリに埋め込む既定の設定
const DEFAULT_CONFIG: &str = r#"
[shop]
domain = "example.myshopify.com"
"#;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid shop domain {0:?}: expected a bare host name such as example.myshopify.com")]
    InvalidDomain(String),
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub shop: ShopConfig,
}

/// カートリンクの出力先ストア
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(try_from = "RawShopConfig")]
pub struct ShopConfig {
    domain: String,
}

#[derive(Deserialize)]
struct RawShopConfig {
    domain: String,
}

impl TryFrom<RawShopConfig> for ShopConfig {
    type Error = ConfigError;

    fn try_from(raw: RawShopConfig) -> Result<Self, Self::Error> {
        ShopConfig::new(raw.domain)
    }
}

impl ShopConfig {
    /// ドメインを検証して生成する（前後の空白と末尾の `/` は除去）
    pub fn new(domain: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = domain.into();
        let domain = raw.trim().trim_end_matches('/');

        let invalid = domain.is_empty()
            || domain.contains("://")
            || domain.contains('/')
            || domain.chars().any(char::is_whitespace);
        if invalid {
            return Err(ConfigError::InvalidDomain(raw));
        }

        Ok(Self {
            domain: domain.to_string(),
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }
}

/// 設定を読み込む
///
/// 探索順:
/// 1. 引数で指定されたパス
/// 2. 実行ファイルと同じディレクトリの `config.toml`
/// 3. 埋め込みの既定設定
///
/// 読み込み後、`CARTLINK_SHOP_DOMAIN` が設定されていればストアのドメインを上書きする。
pub fn load_config(explicit_path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match explicit_path {
        Some(path) => read_config_file(path)?,
        None => match config_next_to_exe() {
            Some(path) => read_config_file(&path)?,
            None => {
                tracing::info!("Using default embedded configuration");
                toml::from_str(DEFAULT_CONFIG)?
            }
        },
    };

    if let Ok(domain) = std::env::var(SHOP_DOMAIN_ENV) {
        tracing::info!("Shop domain overridden by {}", SHOP_DOMAIN_ENV);
        config.shop = ShopConfig::new(domain)?;
    }

    Ok(config)
}

fn read_config_file(path: &Path) -> Result<Config, ConfigError> {
    tracing::info!("Loading config from: {}", path.display());
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&contents)?)
}

fn config_next_to_exe() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let config_path = exe_path.parent()?.join("config.toml");
    if config_path.exists() {
        Some(config_path)
    } else {
        tracing::debug!("config.toml not found at: {}", config_path.display());
        None
    }
}
