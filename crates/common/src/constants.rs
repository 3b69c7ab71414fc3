use fancy_regex::Regex;
use lazy_static::lazy_static;

/// The size in bytes of an EVM address, and therefore of a library link placeholder.
pub const ADDRESS_SIZE: usize = 20;

/// The number of bytes solc uses to encode the length of the trailing CBOR metadata block.
pub const METADATA_LENGTH_SIZE: usize = 2;

lazy_static! {
    /// The following regex is used to validate raw bytecode
    pub static ref BYTECODE_REGEX: Regex = Regex::new(r"^(0x)?[0-9a-fA-F]*$").expect("failed to compile regex");

    /// The following regex is used to find unlinked library placeholders in a bytecode object.
    /// Both the `__$<34 hex chars>$__` form and the legacy `__<path:name>___` form are 40 chars.
    pub static ref LINK_PLACEHOLDER_REGEX: Regex = Regex::new(r"__[$_0-9a-zA-Z:./\-]{36}__").expect("failed to compile regex");
}
