//! The Metadata module locates and decodes the CBOR metadata block which solc appends to the
//! end of deployed bytecode.
//!
//! A missing or undecodable block is a normal outcome, not an error: contracts compiled before
//! solc 0.4.7, or with metadata stripped, simply have none.

mod core;
mod interfaces;

// re-export the public interface
pub use core::{decode_metadata, executable_section_length, metadata_section_range};
pub use interfaces::{MetadataFormat, SolcMetadata};
