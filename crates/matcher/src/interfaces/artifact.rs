use std::{collections::BTreeMap, ops::Range};

use alloy::primitives::Bytes;
use alloy_json_abi::JsonAbi;
use forseti_common::utils::{
    io::file::read_file, strings::decode_unlinked_hex, version::SolcVersion,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;

/// A byte region within a bytecode object, as used by solc's `linkReferences` and
/// `immutableReferences` tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Offset of the first byte.
    pub start: usize,
    /// Number of bytes.
    pub length: usize,
}

impl Span {
    /// Creates a new span.
    pub const fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Offset one past the last byte, saturating at `usize::MAX`.
    pub const fn end(&self) -> usize {
        self.start.saturating_add(self.length)
    }

    /// Returns whether the span fits in a buffer of `len` bytes without saturating.
    pub const fn is_within(&self, len: usize) -> bool {
        self.start <= len && self.length <= len - self.start
    }

    /// Returns the span as a range, clamped to a buffer of `len` bytes.
    pub fn clamped(&self, len: usize) -> Range<usize> {
        self.start.min(len)..self.end().min(len)
    }
}

/// The places where a library's address is substituted at link time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReference {
    /// Fully qualified library name, `source:Library`.
    pub library: String,
    /// The 20-byte holes holding the library address.
    pub spans: Vec<Span>,
}

/// The places where an immutable's value is substituted at deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImmutableReference {
    /// AST id of the immutable variable.
    pub id: String,
    /// The 32-byte holes holding the value.
    pub spans: Vec<Span>,
}

/// A decoded bytecode object together with its reference tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactBytecode {
    /// The bytecode, with unlinked library placeholders replaced by zero bytes.
    pub object: Bytes,
    /// Library link holes.
    pub link_references: Vec<LinkReference>,
    /// Immutable value holes. Always empty for creation bytecode.
    pub immutable_references: Vec<ImmutableReference>,
}

impl ArtifactBytecode {
    /// Creates bytecode without any references.
    pub fn new(object: impl Into<Bytes>) -> Self {
        Self { object: object.into(), ..Default::default() }
    }

    /// Adds a library link reference.
    pub fn with_link_reference(mut self, library: impl Into<String>, spans: Vec<Span>) -> Self {
        self.link_references.push(LinkReference { library: library.into(), spans });
        self
    }

    /// Adds an immutable reference.
    pub fn with_immutable_reference(mut self, id: impl Into<String>, spans: Vec<Span>) -> Self {
        self.immutable_references.push(ImmutableReference { id: id.into(), spans });
        self
    }
}

/// A single compiled contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledArtifact {
    /// Source unit the contract is defined in.
    pub source: String,
    /// Contract name.
    pub name: String,
    /// Contract ABI.
    pub abi: JsonAbi,
    /// Creation bytecode.
    pub creation: ArtifactBytecode,
    /// Deployed (runtime) bytecode.
    pub deployed: ArtifactBytecode,
}

impl CompiledArtifact {
    /// Creates an artifact with an empty ABI and no creation bytecode.
    pub fn new(
        source: impl Into<String>,
        name: impl Into<String>,
        deployed: ArtifactBytecode,
    ) -> Self {
        Self {
            source: source.into(),
            name: name.into(),
            abi: JsonAbi::default(),
            creation: ArtifactBytecode::default(),
            deployed,
        }
    }

    /// Returns `source:name`.
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source, self.name)
    }
}

/// The artifacts produced by one compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerOutput {
    /// Compiled contracts, ordered by source and name.
    pub artifacts: Vec<CompiledArtifact>,
    /// The compiler version, when the input recorded it.
    pub solc_version: Option<SolcVersion>,
}

#[derive(Debug, Deserialize)]
struct RawBuildInfo {
    #[serde(rename = "solcVersion")]
    solc_version: SolcVersion,
    #[serde(default, rename = "solcLongVersion")]
    solc_long_version: Option<SolcVersion>,
    output: RawOutput,
}

#[derive(Debug, Default, Deserialize)]
struct RawOutput {
    #[serde(default)]
    contracts: BTreeMap<String, BTreeMap<String, RawContract>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawContract {
    #[serde(default)]
    abi: JsonAbi,
    #[serde(default)]
    evm: RawEvm,
}

#[derive(Debug, Default, Deserialize)]
struct RawEvm {
    #[serde(default)]
    bytecode: RawBytecode,
    #[serde(default, rename = "deployedBytecode")]
    deployed_bytecode: RawBytecode,
}

#[derive(Debug, Default, Deserialize)]
struct RawBytecode {
    #[serde(default)]
    object: String,
    #[serde(default, rename = "linkReferences")]
    link_references: BTreeMap<String, BTreeMap<String, Vec<Span>>>,
    #[serde(default, rename = "immutableReferences")]
    immutable_references: BTreeMap<String, Vec<Span>>,
}

impl RawBytecode {
    fn decode(self, artifact: &str) -> Result<ArtifactBytecode, Error> {
        let object = decode_unlinked_hex(&self.object).map_err(|e| Error::InvalidBytecode {
            artifact: artifact.to_string(),
            reason: e.to_string(),
        })?;

        let link_references = self
            .link_references
            .into_iter()
            .flat_map(|(source, libraries)| {
                libraries.into_iter().map(move |(name, spans)| LinkReference {
                    library: format!("{source}:{name}"),
                    spans,
                })
            })
            .collect();

        let immutable_references = self
            .immutable_references
            .into_iter()
            .map(|(id, spans)| ImmutableReference { id, spans })
            .collect();

        Ok(ArtifactBytecode { object: object.into(), link_references, immutable_references })
    }
}

impl RawOutput {
    fn into_artifacts(self) -> Result<Vec<CompiledArtifact>, Error> {
        let mut artifacts = Vec::new();

        for (source, contracts) in self.contracts {
            for (name, contract) in contracts {
                let fully_qualified_name = format!("{source}:{name}");
                let creation = contract.evm.bytecode.decode(&fully_qualified_name)?;
                let deployed = contract.evm.deployed_bytecode.decode(&fully_qualified_name)?;

                artifacts.push(CompiledArtifact {
                    source: source.clone(),
                    name,
                    abi: contract.abi,
                    creation,
                    deployed,
                });
            }
        }

        Ok(artifacts)
    }
}

impl CompilerOutput {
    /// Parses solc standard JSON output.
    pub fn from_standard_json(json: &str) -> Result<Self, Error> {
        let output: RawOutput = serde_json::from_str(json)?;
        Ok(Self { artifacts: output.into_artifacts()?, solc_version: None })
    }

    /// Parses a hardhat build-info file, which wraps the standard JSON output together with the
    /// compiler version.
    pub fn from_build_info(json: &str) -> Result<Self, Error> {
        let build_info: RawBuildInfo = serde_json::from_str(json)?;
        let solc_version = build_info.solc_long_version.unwrap_or(build_info.solc_version);

        Ok(Self {
            artifacts: build_info.output.into_artifacts()?,
            solc_version: Some(solc_version),
        })
    }

    /// Parses either format, telling them apart by the build-info `solcVersion` key.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if value.get("solcVersion").is_some() && value.get("output").is_some() {
            debug!("compiler output is a build-info file");
            Self::from_build_info(json)
        } else {
            debug!("compiler output is solc standard json");
            Self::from_standard_json(json)
        }
    }

    /// Reads compiler output from a file.
    pub fn from_file(path: &str) -> Result<Self, Error> {
        let contents = read_file(path).map_err(|e| Error::ReadError(e.to_string()))?;
        Self::from_json(&contents)
    }

    /// Returns the artifact with the given fully qualified name.
    pub fn get(&self, fully_qualified_name: &str) -> Option<&CompiledArtifact> {
        self.artifacts
            .iter()
            .find(|artifact| artifact.fully_qualified_name() == fully_qualified_name)
    }
}

impl FromIterator<CompiledArtifact> for CompilerOutput {
    fn from_iter<I: IntoIterator<Item = CompiledArtifact>>(iter: I) -> Self {
        Self { artifacts: iter.into_iter().collect(), solc_version: None }
    }
}
