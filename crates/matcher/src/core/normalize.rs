use std::fmt::Display;

use forseti_common::constants::ADDRESS_SIZE;
use forseti_metadata::metadata_section_range;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::interfaces::{ArtifactBytecode, Span};

/// `PUSH20`, which opens the call protection prefix of library runtime code.
const PUSH20: u8 = 0x73;

/// How the metadata section takes part in a comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataPolicy {
    /// Strip the metadata section. Differing content hashes never prevent a match.
    #[default]
    Ignore,
    /// Keep the metadata section; it must match byte for byte.
    Compare,
}

impl Display for MetadataPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetadataPolicy::Ignore => write!(f, "ignore"),
            MetadataPolicy::Compare => write!(f, "compare"),
        }
    }
}

impl std::str::FromStr for MetadataPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" => Ok(MetadataPolicy::Ignore),
            "compare" => Ok(MetadataPolicy::Compare),
            _ => Err(format!("invalid metadata policy: {s}")),
        }
    }
}

/// Bytecode with every substitution hole blanked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBytecode {
    /// The executable section with every hole zero-filled. Under [`MetadataPolicy::Compare`]
    /// the metadata section is kept.
    pub code: Vec<u8>,
    /// The spans that were zero-filled, clamped to the bytecode, in ascending order.
    pub zeroed: Vec<Span>,
    /// The metadata section that was stripped, if any.
    pub stripped_metadata: Option<Span>,
}

impl NormalizedBytecode {
    /// Length of the section taking part in the comparison.
    pub fn executable_length(&self) -> usize {
        self.code.len()
    }
}

/// Returns whether `bytecode` opens with the call protection of an undeployed library, i.e.
/// `PUSH20` followed by the zero address.
pub fn has_call_protection(bytecode: &[u8]) -> bool {
    bytecode.first() == Some(&PUSH20) &&
        bytecode.get(1..=ADDRESS_SIZE).is_some_and(|address| address.iter().all(|b| *b == 0))
}

/// Collects every span an artifact's bytecode leaves open for substitution: library links,
/// immutables and, for libraries, the call protection address.
pub fn reference_spans(bytecode: &ArtifactBytecode) -> Vec<Span> {
    let mut spans: Vec<Span> = bytecode
        .link_references
        .iter()
        .flat_map(|reference| reference.spans.iter().copied())
        .chain(
            bytecode
                .immutable_references
                .iter()
                .flat_map(|reference| reference.spans.iter().copied()),
        )
        .collect();

    if has_call_protection(&bytecode.object) {
        trace!("bytecode carries library call protection");
        spans.push(Span::new(1, ADDRESS_SIZE));
    }

    spans.sort();
    spans.dedup();
    spans
}

/// Normalizes `bytecode` by zero-filling `spans` and applying `policy` to the metadata section.
///
/// Spans are clamped to the executable section; a span entirely outside it is skipped. With
/// nothing to zero and no metadata the output equals the input.
pub fn normalize(bytecode: &[u8], spans: &[Span], policy: MetadataPolicy) -> NormalizedBytecode {
    let stripped_metadata = match policy {
        MetadataPolicy::Ignore => metadata_section_range(bytecode)
            .map(|range| Span::new(range.start, range.end - range.start)),
        MetadataPolicy::Compare => None,
    };

    let executable_length = stripped_metadata.map_or(bytecode.len(), |metadata| metadata.start);
    let mut code = bytecode[..executable_length].to_vec();

    let mut zeroed = Vec::with_capacity(spans.len());
    for span in spans {
        let range = span.clamped(code.len());
        if range.is_empty() {
            continue;
        }

        code[range.clone()].fill(0);
        zeroed.push(Span::new(range.start, range.len()));
    }
    zeroed.sort();
    zeroed.dedup();

    NormalizedBytecode { code, zeroed, stripped_metadata }
}
