use forseti_metadata::SolcMetadata;
use serde::Serialize;

use crate::{error::Error, interfaces::VersionRange};

/// The result of an infer operation.
#[derive(Debug, Clone, Serialize)]
pub struct InferResult {
    /// The inferred version range.
    pub range: VersionRange,
    /// The decoded metadata block, if the bytecode carries one.
    pub metadata: Option<SolcMetadata>,
}

impl InferResult {
    /// Serializes the result as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
