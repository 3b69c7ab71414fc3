/// Error type for the Infer module
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The target bytecode could not be read
    #[error("Failed to read bytecode: {0}")]
    BytecodeError(String),
    /// The target contained no bytecode
    #[error("Bytecode is empty")]
    EmptyBytecode,
    /// Serializing the result failed
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Generic internal error
    #[error("Internal error: {0}")]
    Eyre(#[from] eyre::Report),
}
