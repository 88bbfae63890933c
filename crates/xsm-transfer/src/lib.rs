#![warn(clippy::pedantic)]

pub mod body;
pub mod config;
pub mod error;
pub mod headers;
pub mod validation;

pub use body::RetryableBody;
pub use config::TransferConfig;
pub use error::TransferError;
pub use headers::{RequestHeaders, ResponseHeaders};
pub use validation::{
    DownloadBody, PreparedUpload, TransferValidation, UploadBody, prepare_upload, verify_download,
};
