//! The Core module ties forseti's components together: it infers the compiler version range of
//! deployed bytecode, rejects a configured compiler version early when the range excludes it, and
//! only then searches the compiler output for the matching artifact.
//!
//! The component crates are re-exported for callers who need them individually.

/// Error types for the core module
pub mod error;

mod verify;

// Re-export all component modules
pub use forseti_infer;
pub use forseti_matcher;
pub use forseti_metadata;

pub use error::Error;
pub use verify::{verify, verify_target, Verification, VerificationReport};
