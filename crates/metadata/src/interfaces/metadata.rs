use std::fmt::Display;

use alloy::primitives::Bytes;
use forseti_common::utils::version::SolcVersion;
use serde::Serialize;

/// The content-hash encoding of a metadata block. The variant tells which generation of solc
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataFormat {
    /// Swarm hash, first generation (`bzzr0`).
    Bzzr0,
    /// Swarm hash, second generation (`bzzr1`).
    Bzzr1,
    /// IPFS multihash (`ipfs`).
    Ipfs,
    /// No content hash at all, only the compiler version (`--metadata-hash none`).
    HashNone,
}

impl Display for MetadataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetadataFormat::Bzzr0 => write!(f, "bzzr0"),
            MetadataFormat::Bzzr1 => write!(f, "bzzr1"),
            MetadataFormat::Ipfs => write!(f, "ipfs"),
            MetadataFormat::HashNone => write!(f, "none"),
        }
    }
}

/// A decoded solc metadata block.
///
/// Details can be found here: https://docs.soliditylang.org/en/latest/metadata.html
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SolcMetadata {
    /// IPFS multihash of the metadata JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipfs: Option<Bytes>,
    /// Swarm (bzzr0) hash of the metadata JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bzzr0: Option<Bytes>,
    /// Swarm (bzzr1) hash of the metadata JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bzzr1: Option<Bytes>,
    /// Whether the source used experimental features.
    pub experimental: bool,
    /// The compiler version, when solc embedded it (0.5.9 and later).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solc: Option<SolcVersion>,
    /// Keys present in the block which solc does not document.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown_keys: Vec<String>,
    /// Length of the whole metadata section, including the two trailing length bytes.
    pub section_length: usize,
}

impl SolcMetadata {
    /// Returns the content-hash encoding of this block.
    pub fn format(&self) -> MetadataFormat {
        if self.ipfs.is_some() {
            MetadataFormat::Ipfs
        } else if self.bzzr1.is_some() {
            MetadataFormat::Bzzr1
        } else if self.bzzr0.is_some() {
            MetadataFormat::Bzzr0
        } else {
            MetadataFormat::HashNone
        }
    }

    /// Returns the content hash, if any.
    pub fn content_hash(&self) -> Option<&Bytes> {
        self.ipfs.as_ref().or(self.bzzr1.as_ref()).or(self.bzzr0.as_ref())
    }
}
