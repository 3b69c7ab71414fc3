//! EVM opcodes and the hard fork that introduced each of them.
//!
//! Only the information forseti needs is kept here: the opcode byte, its mnemonic, and the
//! first [`HardFork`] in which it is valid.

/// Ethereum hard forks in chronological order.
///
/// Only forks which introduced new opcodes are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum HardFork {
    /// Initial Ethereum release (July 2015)
    #[default]
    Frontier = 0,
    /// First planned hard fork (March 2016)
    Homestead = 1,
    /// First of Metropolis series (October 2017)
    Byzantium = 2,
    /// Second of Metropolis series (February 2019)
    Constantinople = 3,
    /// October 2019 fork
    Istanbul = 4,
    /// August 2021 fork
    London = 5,
    /// March 2023 fork
    Shanghai = 6,
    /// March 2024 fork
    Cancun = 7,
}

macro_rules! opcodes {
    ($($val:literal => $name:ident => $fork:ident);* $(;)?) => {
        // create a constant for each opcode
        $(
            #[doc = concat!("The `", stringify!($val), "` (\"", stringify!($name),"\") opcode.")]
            pub const $name: u8 = $val;
        )*

        /// Maps each opcode to its name.
        pub const OPCODE_NAME_TABLE: [&'static str; 256] = {
            let mut map = ["unknown"; 256];
            $(
                map[$val] = stringify!($name);
            )*
            map
        };

        /// Maps each opcode to the hard fork which introduced it, or `None` if undefined.
        pub const OPCODE_FORK_TABLE: [Option<HardFork>; 256] = {
            let mut map = [None; 256];
            $(
                map[$val] = Some(HardFork::$fork);
            )*
            map
        };
    }
}

/// Get the name of an opcode.
#[inline]
pub fn opcode_name(opcode: u8) -> &'static str {
    OPCODE_NAME_TABLE[opcode as usize]
}

/// Get the hard fork that introduced an opcode, or `None` if the byte is not a defined opcode.
#[inline]
pub fn introduced_in(opcode: u8) -> Option<HardFork> {
    OPCODE_FORK_TABLE[opcode as usize]
}

/// Returns the number of immediate bytes following the opcode (`PUSH1`..`PUSH32`).
#[inline]
pub const fn push_size(opcode: u8) -> usize {
    if opcode >= PUSH1 && opcode <= PUSH32 {
        (opcode - PUSH1) as usize + 1
    } else {
        0
    }
}

opcodes! {
    0x00 => STOP => Frontier;
    0x01 => ADD => Frontier;
    0x02 => MUL => Frontier;
    0x03 => SUB => Frontier;
    0x04 => DIV => Frontier;
    0x05 => SDIV => Frontier;
    0x06 => MOD => Frontier;
    0x07 => SMOD => Frontier;
    0x08 => ADDMOD => Frontier;
    0x09 => MULMOD => Frontier;
    0x0a => EXP => Frontier;
    0x0b => SIGNEXTEND => Frontier;

    0x10 => LT => Frontier;
    0x11 => GT => Frontier;
    0x12 => SLT => Frontier;
    0x13 => SGT => Frontier;
    0x14 => EQ => Frontier;
    0x15 => ISZERO => Frontier;
    0x16 => AND => Frontier;
    0x17 => OR => Frontier;
    0x18 => XOR => Frontier;
    0x19 => NOT => Frontier;
    0x1a => BYTE => Frontier;
    0x1b => SHL => Constantinople;
    0x1c => SHR => Constantinople;
    0x1d => SAR => Constantinople;

    0x20 => SHA3 => Frontier;

    0x30 => ADDRESS => Frontier;
    0x31 => BALANCE => Frontier;
    0x32 => ORIGIN => Frontier;
    0x33 => CALLER => Frontier;
    0x34 => CALLVALUE => Frontier;
    0x35 => CALLDATALOAD => Frontier;
    0x36 => CALLDATASIZE => Frontier;
    0x37 => CALLDATACOPY => Frontier;
    0x38 => CODESIZE => Frontier;
    0x39 => CODECOPY => Frontier;
    0x3a => GASPRICE => Frontier;
    0x3b => EXTCODESIZE => Frontier;
    0x3c => EXTCODECOPY => Frontier;
    0x3d => RETURNDATASIZE => Byzantium;
    0x3e => RETURNDATACOPY => Byzantium;
    0x3f => EXTCODEHASH => Constantinople;

    0x40 => BLOCKHASH => Frontier;
    0x41 => COINBASE => Frontier;
    0x42 => TIMESTAMP => Frontier;
    0x43 => NUMBER => Frontier;
    0x44 => DIFFICULTY => Frontier;
    0x45 => GASLIMIT => Frontier;
    0x46 => CHAINID => Istanbul;
    0x47 => SELFBALANCE => Istanbul;
    0x48 => BASEFEE => London;
    0x49 => BLOBHASH => Cancun;
    0x4a => BLOBBASEFEE => Cancun;

    0x50 => POP => Frontier;
    0x51 => MLOAD => Frontier;
    0x52 => MSTORE => Frontier;
    0x53 => MSTORE8 => Frontier;
    0x54 => SLOAD => Frontier;
    0x55 => SSTORE => Frontier;
    0x56 => JUMP => Frontier;
    0x57 => JUMPI => Frontier;
    0x58 => PC => Frontier;
    0x59 => MSIZE => Frontier;
    0x5a => GAS => Frontier;
    0x5b => JUMPDEST => Frontier;
    0x5c => TLOAD => Cancun;
    0x5d => TSTORE => Cancun;
    0x5e => MCOPY => Cancun;
    0x5f => PUSH0 => Shanghai;

    0x60 => PUSH1 => Frontier;
    0x61 => PUSH2 => Frontier;
    0x62 => PUSH3 => Frontier;
    0x63 => PUSH4 => Frontier;
    0x64 => PUSH5 => Frontier;
    0x65 => PUSH6 => Frontier;
    0x66 => PUSH7 => Frontier;
    0x67 => PUSH8 => Frontier;
    0x68 => PUSH9 => Frontier;
    0x69 => PUSH10 => Frontier;
    0x6a => PUSH11 => Frontier;
    0x6b => PUSH12 => Frontier;
    0x6c => PUSH13 => Frontier;
    0x6d => PUSH14 => Frontier;
    0x6e => PUSH15 => Frontier;
    0x6f => PUSH16 => Frontier;

    0x70 => PUSH17 => Frontier;
    0x71 => PUSH18 => Frontier;
    0x72 => PUSH19 => Frontier;
    0x73 => PUSH20 => Frontier;
    0x74 => PUSH21 => Frontier;
    0x75 => PUSH22 => Frontier;
    0x76 => PUSH23 => Frontier;
    0x77 => PUSH24 => Frontier;
    0x78 => PUSH25 => Frontier;
    0x79 => PUSH26 => Frontier;
    0x7a => PUSH27 => Frontier;
    0x7b => PUSH28 => Frontier;
    0x7c => PUSH29 => Frontier;
    0x7d => PUSH30 => Frontier;
    0x7e => PUSH31 => Frontier;
    0x7f => PUSH32 => Frontier;

    0x80 => DUP1 => Frontier;
    0x81 => DUP2 => Frontier;
    0x82 => DUP3 => Frontier;
    0x83 => DUP4 => Frontier;
    0x84 => DUP5 => Frontier;
    0x85 => DUP6 => Frontier;
    0x86 => DUP7 => Frontier;
    0x87 => DUP8 => Frontier;
    0x88 => DUP9 => Frontier;
    0x89 => DUP10 => Frontier;
    0x8a => DUP11 => Frontier;
    0x8b => DUP12 => Frontier;
    0x8c => DUP13 => Frontier;
    0x8d => DUP14 => Frontier;
    0x8e => DUP15 => Frontier;
    0x8f => DUP16 => Frontier;

    0x90 => SWAP1 => Frontier;
    0x91 => SWAP2 => Frontier;
    0x92 => SWAP3 => Frontier;
    0x93 => SWAP4 => Frontier;
    0x94 => SWAP5 => Frontier;
    0x95 => SWAP6 => Frontier;
    0x96 => SWAP7 => Frontier;
    0x97 => SWAP8 => Frontier;
    0x98 => SWAP9 => Frontier;
    0x99 => SWAP10 => Frontier;
    0x9a => SWAP11 => Frontier;
    0x9b => SWAP12 => Frontier;
    0x9c => SWAP13 => Frontier;
    0x9d => SWAP14 => Frontier;
    0x9e => SWAP15 => Frontier;
    0x9f => SWAP16 => Frontier;

    0xa0 => LOG0 => Frontier;
    0xa1 => LOG1 => Frontier;
    0xa2 => LOG2 => Frontier;
    0xa3 => LOG3 => Frontier;
    0xa4 => LOG4 => Frontier;

    0xf0 => CREATE => Frontier;
    0xf1 => CALL => Frontier;
    0xf2 => CALLCODE => Frontier;
    0xf3 => RETURN => Frontier;
    0xf4 => DELEGATECALL => Homestead;
    0xf5 => CREATE2 => Constantinople;
    0xfa => STATICCALL => Byzantium;
    0xfd => REVERT => Byzantium;
    0xfe => INVALID => Frontier;
    0xff => SELFDESTRUCT => Frontier;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_name() {
        assert_eq!(opcode_name(0x60), "PUSH1");
        assert_eq!(opcode_name(0x5f), "PUSH0");
        assert_eq!(opcode_name(0xfd), "REVERT");
        assert_eq!(opcode_name(0x0c), "unknown");
    }

    #[test]
    fn test_introduced_in() {
        assert_eq!(introduced_in(STOP), Some(HardFork::Frontier));
        assert_eq!(introduced_in(DELEGATECALL), Some(HardFork::Homestead));
        assert_eq!(introduced_in(REVERT), Some(HardFork::Byzantium));
        assert_eq!(introduced_in(CREATE2), Some(HardFork::Constantinople));
        assert_eq!(introduced_in(PUSH0), Some(HardFork::Shanghai));
        assert_eq!(introduced_in(MCOPY), Some(HardFork::Cancun));
        assert_eq!(introduced_in(0xef), None);
    }

    #[test]
    fn test_push_size() {
        assert_eq!(push_size(PUSH0), 0);
        assert_eq!(push_size(PUSH1), 1);
        assert_eq!(push_size(PUSH20), 20);
        assert_eq!(push_size(PUSH32), 32);
        assert_eq!(push_size(DUP1), 0);
    }

    #[test]
    fn test_hardfork_ordering() {
        assert!(HardFork::Frontier < HardFork::Byzantium);
        assert!(HardFork::Shanghai < HardFork::Cancun);
    }
}
