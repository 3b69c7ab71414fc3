#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("{0}")]
    Generic(String),
    #[error("Infer error: {0}")]
    InferError(#[from] forseti_core::forseti_infer::Error),
    #[error("Verification error: {0}")]
    VerifyError(#[from] forseti_core::Error),
    #[error("Config error: {0}")]
    ConfigError(#[from] forseti_config::error::Error),
}
