use std::ops::Range;

use alloy::primitives::Bytes;
use ciborium::Value;
use forseti_common::{constants::METADATA_LENGTH_SIZE, utils::version::SolcVersion};
use tracing::{debug, trace};

use crate::interfaces::SolcMetadata;

/// Decodes the CBOR metadata block at the end of `bytecode`.
///
/// The last two bytes hold the big-endian length of the CBOR map which precedes them. Returns
/// `None` whenever the suffix is not a well-formed solc metadata block.
pub fn decode_metadata(bytecode: &[u8]) -> Option<SolcMetadata> {
    let (rest, length) = bytecode.split_last_chunk::<METADATA_LENGTH_SIZE>()?;
    let cbor_length = u16::from_be_bytes(*length) as usize;

    if cbor_length == 0 || cbor_length > rest.len() {
        trace!("metadata length {} does not fit bytecode of {} bytes", cbor_length, rest.len());
        return None;
    }

    let mut cbor = &rest[rest.len() - cbor_length..];
    let value: Value = match ciborium::de::from_reader(&mut cbor) {
        Ok(value) => value,
        Err(e) => {
            trace!("failed to decode metadata cbor: {}", e);
            return None;
        }
    };

    // the map must consume the whole section
    if !cbor.is_empty() {
        trace!("metadata cbor has {} trailing bytes", cbor.len());
        return None;
    }

    let Value::Map(entries) = value else {
        trace!("metadata cbor is not a map");
        return None;
    };

    let mut metadata =
        SolcMetadata { section_length: cbor_length + METADATA_LENGTH_SIZE, ..Default::default() };
    let mut known_keys = 0;

    for (key, value) in entries {
        let Value::Text(key) = key else {
            trace!("metadata cbor has a non-text key");
            return None;
        };

        match (key.as_str(), value) {
            ("ipfs", Value::Bytes(hash)) => metadata.ipfs = Some(Bytes::from(hash)),
            ("bzzr0", Value::Bytes(hash)) => metadata.bzzr0 = Some(Bytes::from(hash)),
            ("bzzr1", Value::Bytes(hash)) => metadata.bzzr1 = Some(Bytes::from(hash)),
            ("experimental", Value::Bool(flag)) => metadata.experimental = flag,
            ("solc", Value::Bytes(version)) => {
                let &[major, minor, patch] = version.as_slice() else {
                    trace!("embedded solc version has {} bytes", version.len());
                    return None;
                };
                metadata.solc = Some(SolcVersion::new(major.into(), minor.into(), patch.into()));
            }
            ("solc", Value::Text(version)) => {
                // prerelease builds embed the full version string
                let version: SolcVersion = version.parse().ok()?;
                if version.next_patch().is_none() {
                    trace!("embedded solc version {} is out of range", version);
                    return None;
                }
                metadata.solc = Some(version);
            }
            ("ipfs" | "bzzr0" | "bzzr1" | "experimental" | "solc", _) => {
                trace!("metadata key '{}' has an unexpected type", key);
                return None;
            }
            _ => {
                metadata.unknown_keys.push(key);
                continue;
            }
        }

        known_keys += 1;
    }

    if known_keys == 0 {
        trace!("metadata cbor contains no known solc keys");
        return None;
    }

    debug!(
        "found {} metadata ({} bytes), solc version: {}",
        metadata.format(),
        metadata.section_length,
        metadata.solc.as_ref().map(ToString::to_string).unwrap_or_else(|| "unknown".to_string())
    );

    Some(metadata)
}

/// Returns the byte range of the metadata section (CBOR map plus length suffix), if any.
pub fn metadata_section_range(bytecode: &[u8]) -> Option<Range<usize>> {
    decode_metadata(bytecode)
        .map(|metadata| bytecode.len() - metadata.section_length..bytecode.len())
}

/// Returns the length of `bytecode` without its metadata section. Bytecode without metadata is
/// executable in full.
pub fn executable_section_length(bytecode: &[u8]) -> usize {
    metadata_section_range(bytecode).map(|range| range.start).unwrap_or(bytecode.len())
}
