//! The Infer module derives the range of solc versions which may have produced a piece of
//! deployed bytecode.
//!
//! The range is exact when the metadata block embeds the compiler version, bounded by the
//! metadata encoding when it does not, and a best-effort opcode heuristic when there is no
//! metadata block at all.

/// Error types for the infer module
pub mod error;

mod core;
mod interfaces;

// re-export the public interface
pub use core::{
    era::{era_range, OpcodeEra, OPCODE_ERAS},
    formats::{format_range, FormatIntroduction, METADATA_FORMATS},
    infer, infer_from_metadata, infer_version_range, EARLIEST_RELEASE, METADATA_INTRODUCED,
    VERSION_EMBEDDED_SINCE,
};
pub use error::Error;
pub use interfaces::{InferArgs, InferArgsBuilder, InferResult, InferralType, VersionRange};
