use forseti_common::utils::version::SolcVersion;
use forseti_infer::VersionRange;

/// Error type for the Core module
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The deployed bytecode is empty, so there is no contract to identify
    #[error("Deployed bytecode is empty")]
    EmptyBytecode,
    /// The configured compiler version cannot have produced the bytecode
    #[error("Compiler version {version} is outside the inferred range {range}")]
    NoCompilerVersionInRange {
        /// The configured compiler version
        version: SolcVersion,
        /// The range inferred from the bytecode
        range: VersionRange,
    },
    /// No artifact matches the deployed bytecode
    #[error("No artifact matches the deployed bytecode (inferred compiler range {range})")]
    NoArtifactMatch {
        /// The range inferred from the bytecode
        range: VersionRange,
    },
    /// Matching failed, e.g. on an ambiguous match or inconsistent library links
    #[error(transparent)]
    Matcher(#[from] forseti_matcher::Error),
    /// Serializing a report failed
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
}
