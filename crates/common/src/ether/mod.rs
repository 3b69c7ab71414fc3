/// Reading bytecode and walking its instructions.
pub mod bytecode;

/// Opcode constants and the hard forks which introduced them.
pub mod opcodes;
