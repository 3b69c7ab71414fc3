use forseti_common::{
    ether::{bytecode::instructions, opcodes::*},
    utils::version::SolcVersion,
};

use tracing::trace;

use super::{EARLIEST_RELEASE, METADATA_INTRODUCED};

/// An opcode and the first solc release able to emit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpcodeEra {
    /// The opcode byte.
    pub opcode: u8,
    /// The first solc release which can emit the opcode.
    pub since: SolcVersion,
}

const fn era(opcode: u8, major: u32, minor: u32, patch: u32) -> OpcodeEra {
    OpcodeEra { opcode, since: SolcVersion::new(major, minor, patch) }
}

/// Opcodes whose presence dates the compiler, ordered by release.
pub static OPCODE_ERAS: [OpcodeEra; 18] = [
    era(DELEGATECALL, 0, 2, 0),
    era(REVERT, 0, 4, 10),
    era(SHL, 0, 4, 21),
    era(SHR, 0, 4, 21),
    era(SAR, 0, 4, 21),
    era(RETURNDATASIZE, 0, 4, 22),
    era(RETURNDATACOPY, 0, 4, 22),
    era(STATICCALL, 0, 5, 0),
    era(CHAINID, 0, 5, 12),
    era(SELFBALANCE, 0, 5, 12),
    era(CREATE2, 0, 6, 2),
    era(BASEFEE, 0, 8, 7),
    era(PUSH0, 0, 8, 20),
    era(TLOAD, 0, 8, 24),
    era(TSTORE, 0, 8, 24),
    era(MCOPY, 0, 8, 24),
    era(BLOBHASH, 0, 8, 24),
    era(BLOBBASEFEE, 0, 8, 24),
];

/// Estimates the `[lower, upper)` release span of bytecode which carries no metadata.
///
/// This is a heuristic. The lower bound is the newest release able to emit an opcode found in
/// the instruction stream. If nothing newer than the metadata feature shows up, the code most
/// likely predates it and the upper bound is [`METADATA_INTRODUCED`]; otherwise the metadata was
/// stripped and the range stays open.
pub fn era_range(bytecode: &[u8]) -> (SolcVersion, Option<SolcVersion>) {
    let mut present = [false; 256];
    for instruction in instructions(bytecode) {
        present[instruction.opcode as usize] = true;
    }

    let lower = OPCODE_ERAS
        .iter()
        .filter(|era| present[era.opcode as usize])
        .inspect(|era| {
            trace!(
                "found {} ({:?}), emitted since solc {}",
                opcode_name(era.opcode),
                introduced_in(era.opcode),
                era.since
            )
        })
        .map(|era| &era.since)
        .max()
        .cloned()
        .unwrap_or(EARLIEST_RELEASE);

    let upper = if lower > METADATA_INTRODUCED { None } else { Some(METADATA_INTRODUCED) };

    (lower, upper)
}
