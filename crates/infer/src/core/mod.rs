pub(crate) mod era;
pub(crate) mod formats;

use std::time::Instant;

use forseti_common::utils::version::SolcVersion;
use forseti_metadata::{decode_metadata, SolcMetadata};
use tracing::{debug, info, warn};

use crate::{
    error::Error,
    interfaces::{InferArgs, InferResult, InferralType, VersionRange},
};

/// The earliest solc release.
pub const EARLIEST_RELEASE: SolcVersion = SolcVersion::new(0, 1, 0);

/// The first solc release which appended a metadata block to bytecode.
pub const METADATA_INTRODUCED: SolcVersion = SolcVersion::new(0, 4, 7);

/// The first solc release which embedded its own version in the metadata block.
pub const VERSION_EMBEDDED_SINCE: SolcVersion = SolcVersion::new(0, 5, 9);

/// Infers a version range from an already decoded metadata block.
///
/// `bytecode` is only inspected when `metadata` is `None`.
pub fn infer_from_metadata(metadata: Option<&SolcMetadata>, bytecode: &[u8]) -> VersionRange {
    let Some(metadata) = metadata else {
        let (lower, upper) = era::era_range(bytecode);
        debug!("no metadata found, estimated range from opcodes: {} - {:?}", lower, upper);
        return VersionRange::new(lower, upper, InferralType::BytecodeEra);
    };

    if let Some(range) = metadata.solc.as_ref().and_then(VersionRange::exact) {
        return range;
    }

    let format = metadata.format();
    match formats::format_range(format) {
        Some((lower, upper)) => VersionRange::new(lower, upper, InferralType::Metadata),
        None => {
            warn!("no release span known for metadata format '{}'", format);
            VersionRange::new(METADATA_INTRODUCED, None, InferralType::Metadata)
        }
    }
}

/// Infers the range of solc versions which may have produced `bytecode`.
pub fn infer_version_range(bytecode: &[u8]) -> VersionRange {
    infer_from_metadata(decode_metadata(bytecode).as_ref(), bytecode)
}

/// Reads the target bytecode and infers its compiler version range.
pub fn infer(args: InferArgs) -> Result<InferResult, Error> {
    let start_time = Instant::now();

    let bytecode = args.get_bytecode().map_err(|e| Error::BytecodeError(e.to_string()))?;
    if bytecode.is_empty() {
        return Err(Error::EmptyBytecode);
    }

    let metadata = decode_metadata(&bytecode);
    let range = infer_from_metadata(metadata.as_ref(), &bytecode);

    info!("inferred solc version range {}", range);
    debug!("inference took {:?}", start_time.elapsed());

    Ok(InferResult { range, metadata })
}
