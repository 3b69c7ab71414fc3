use clap::Parser;
use derive_builder::Builder;
use eyre::Result;
use forseti_common::{ether::bytecode::get_bytecode_from_target, utils::version::SolcVersion};

use crate::core::{normalize::MetadataPolicy, MatchOptions};

#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Finds the compiled artifact which produced deployed bytecode",
    override_usage = "forseti match <TARGET> --artifacts <PATH> [OPTIONS]"
)]
/// Arguments for the match operation
pub struct MatchArgs {
    /// The deployed bytecode, either a file containing hex bytecode or a hex string.
    #[clap(required = true)]
    pub target: String,

    /// Path to solc standard JSON output or a hardhat build-info file.
    #[clap(long, short)]
    pub artifacts: String,

    /// The solc version the artifacts were compiled with. Defaults to the version recorded in a
    /// build-info file, then to the newest configured version the bytecode admits.
    #[clap(long = "solc-version", short = 's')]
    pub solc_version: Option<SolcVersion>,

    /// Require the metadata section to match byte for byte.
    #[clap(long = "compare-metadata")]
    pub compare_metadata: bool,

    /// Number of worker threads. Defaults to the configured value, or the number of CPUs.
    #[clap(long, short, default_value = "0", hide_default_value = true)]
    pub threads: usize,

    /// Candidate count at which matching switches to the worker pool.
    #[clap(long = "parallel-threshold", default_value = "0", hide_default_value = true)]
    pub parallel_threshold: usize,

    /// Print the result as JSON.
    #[clap(long, short)]
    pub json: bool,
}

impl MatchArgs {
    /// Reads the target bytecode.
    pub fn get_bytecode(&self) -> Result<Vec<u8>> {
        get_bytecode_from_target(&self.target)
    }

    /// The metadata policy selected by the flags.
    pub fn metadata_policy(&self) -> MetadataPolicy {
        if self.compare_metadata {
            MetadataPolicy::Compare
        } else {
            MetadataPolicy::Ignore
        }
    }

    /// Builds match options from the flags. Unset (zero) values fall back to `defaults`.
    pub fn options(&self, defaults: MatchOptions) -> MatchOptions {
        MatchOptions {
            metadata_policy: self.metadata_policy(),
            threads: if self.threads == 0 { defaults.threads } else { self.threads },
            parallel_threshold: if self.parallel_threshold == 0 {
                defaults.parallel_threshold
            } else {
                self.parallel_threshold
            },
        }
    }
}

impl MatchArgsBuilder {
    /// Creates a new MatchArgsBuilder with default values
    pub fn new() -> Self {
        Self {
            target: Some(String::new()),
            artifacts: Some(String::new()),
            solc_version: Some(None),
            compare_metadata: Some(false),
            threads: Some(0),
            parallel_threshold: Some(0),
            json: Some(false),
        }
    }
}
