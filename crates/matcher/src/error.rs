use alloy::primitives::Address;

/// Error type for the Matcher module
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// More than one artifact matched the deployed bytecode
    #[error("Bytecode matches multiple artifacts: {}", .names.join(", "))]
    AmbiguousArtifactMatch {
        /// Fully qualified names of every matching artifact, sorted
        names: Vec<String>,
    },
    /// The link spans of one library hold different addresses in the deployed bytecode
    #[error("Library '{library}' is linked at conflicting addresses {first} and {second}")]
    LibraryAddressInconsistency {
        /// Fully qualified library name
        library: String,
        /// Address found at the first span
        first: Address,
        /// Conflicting address found at a later span
        second: Address,
    },
    /// A link reference is not 20 bytes long or lies outside its bytecode
    #[error("Invalid link reference for '{library}' in '{artifact}' at {start}:{length}")]
    InvalidLinkReference {
        /// Fully qualified artifact name
        artifact: String,
        /// Fully qualified library name
        library: String,
        /// Offset of the span
        start: usize,
        /// Length of the span
        length: usize,
    },
    /// An immutable reference lies outside its bytecode
    #[error("Invalid immutable reference '{id}' in '{artifact}' at {start}:{length}")]
    InvalidImmutableReference {
        /// Fully qualified artifact name
        artifact: String,
        /// AST id of the immutable
        id: String,
        /// Offset of the span
        start: usize,
        /// Length of the span
        length: usize,
    },
    /// An artifact's bytecode object is not valid hex
    #[error("Invalid bytecode for '{artifact}': {reason}")]
    InvalidBytecode {
        /// Fully qualified artifact name
        artifact: String,
        /// Why decoding failed
        reason: String,
    },
    /// Compiler output could not be parsed
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Failed to read an input
    #[error("Failed to read input: {0}")]
    ReadError(String),
    /// Generic internal error
    #[error("Internal error: {0}")]
    Eyre(#[from] eyre::Report),
}
