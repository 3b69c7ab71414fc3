use std::collections::BTreeMap;

use alloy::primitives::{Address, Bytes};
use serde::Serialize;

use crate::{error::Error, interfaces::CompiledArtifact};

/// The artifact which produced a piece of deployed bytecode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult<'a> {
    /// The matching artifact.
    pub artifact: &'a CompiledArtifact,
    /// Fully qualified library name to the address linked into the deployed bytecode.
    pub libraries: BTreeMap<String, Address>,
    /// Immutable id to the values found at each of its spans in the deployed bytecode.
    pub immutables: BTreeMap<String, Vec<Bytes>>,
}

/// An owned summary of a [`MatchResult`], detached from the compiler output it borrows from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    /// Fully qualified name of the matching artifact.
    pub artifact: String,
    /// Fully qualified library name to linked address.
    pub libraries: BTreeMap<String, Address>,
    /// Immutable id to the values found in the deployed bytecode.
    pub immutables: BTreeMap<String, Vec<Bytes>>,
}

impl From<MatchResult<'_>> for MatchReport {
    fn from(result: MatchResult<'_>) -> Self {
        Self {
            artifact: result.artifact.fully_qualified_name(),
            libraries: result.libraries,
            immutables: result.immutables,
        }
    }
}

impl MatchReport {
    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
