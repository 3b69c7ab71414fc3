use crate::{
    constants::BYTECODE_REGEX,
    ether::opcodes::push_size,
    utils::{io::file::read_file, strings::decode_hex},
};
use eyre::{bail, eyre, Result};
use tracing::{debug, error};

/// Given a target, determines whether it is raw bytecode or a file path, and returns the
/// bytecode for the target.
///
/// Fetching code for an address is the caller's business; forseti only works with bytes it is
/// handed.
pub fn get_bytecode_from_target(target: &str) -> Result<Vec<u8>> {
    if BYTECODE_REGEX.is_match(target).unwrap_or(false) {
        debug!("target is raw bytecode");
        return decode_hex(target);
    }

    // Target is a file path, so we need to read the bytecode from the file.
    let contents = read_file(target).map_err(|e| {
        error!("failed to open file '{}' .", &target);
        eyre!("failed to read bytecode from '{}': {}", target, e)
    })?;

    let contents: String = contents.chars().filter(|c| !c.is_whitespace()).collect();
    if BYTECODE_REGEX.is_match(&contents).unwrap_or(false) {
        decode_hex(&contents)
    } else {
        error!("file '{}' doesn't contain valid bytecode.", &target);
        bail!("file '{}' doesn't contain valid bytecode.", &target)
    }
}

/// A single decoded EVM instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction<'a> {
    /// The offset of the opcode within the bytecode.
    pub pc: usize,
    /// The opcode byte.
    pub opcode: u8,
    /// The immediate bytes of a `PUSHn`. Shorter than `n` if the bytecode is truncated.
    pub push_data: &'a [u8],
}

/// Iterator over the instructions of a bytecode, skipping over push data.
#[derive(Debug, Clone)]
pub struct Instructions<'a> {
    bytecode: &'a [u8],
    pc: usize,
}

impl<'a> Iterator for Instructions<'a> {
    type Item = Instruction<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let opcode = *self.bytecode.get(self.pc)?;
        let data_start = self.pc + 1;
        let data_end = (data_start + push_size(opcode)).min(self.bytecode.len());

        let instruction =
            Instruction { pc: self.pc, opcode, push_data: &self.bytecode[data_start..data_end] };
        self.pc = data_end;

        Some(instruction)
    }
}

/// Returns an iterator over the instructions of `bytecode`.
///
/// For example, `0x60806040` yields `PUSH1 0x80` at pc 0 and `PUSH1 0x40` at pc 2.
pub fn instructions(bytecode: &[u8]) -> Instructions<'_> {
    Instructions { bytecode, pc: 0 }
}
