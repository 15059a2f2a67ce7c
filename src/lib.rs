pub mod config;
pub mod logging;
pub mod models;
pub mod parsers;
pub mod processors;
pub mod upload;

mod utils;

pub use config::{load_config, Config, ConfigError, ShopConfig};
pub use models::{AppError, CartItem, CartLinkResult, ErrorKind, RowRecord, UploadFailure, UploadOutcome};
pub use upload::{
    process_upload, InMemoryUpload, LocalFileUpload, SubmitResult, UploadSession, UploadSource,
    UploadState,
};
