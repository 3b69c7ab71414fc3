//! The Matcher module finds the compiled artifact which produced a piece of deployed bytecode.
//!
//! Both sides are normalized first: library link holes, immutable holes, library call protection
//! and (by default) the metadata section are blanked out, so bytes which legitimately differ
//! between a local build and the deployed copy never prevent a match.

/// Error types for the matcher module
pub mod error;

mod core;
mod interfaces;

// re-export the public interface
pub use core::{
    find_matching_artifact, match_artifact,
    normalize::{
        has_call_protection, normalize, reference_spans, MetadataPolicy, NormalizedBytecode,
    },
    MatchOptions,
};
pub use error::Error;
pub use interfaces::{
    ArtifactBytecode, CompiledArtifact, CompilerOutput, ImmutableReference, LinkReference,
    MatchArgs, MatchArgsBuilder, MatchReport, MatchResult, Span,
};
