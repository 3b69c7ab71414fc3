use clap::Parser;
use derive_builder::Builder;
use eyre::Result;
use forseti_common::ether::bytecode::get_bytecode_from_target;

#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Infers the range of solc versions which may have produced EVM bytecode",
    override_usage = "forseti infer <TARGET> [OPTIONS]"
)]
/// Arguments for the infer operation
pub struct InferArgs {
    /// The target to inspect, either a file containing hex bytecode or a hex string.
    #[clap(required = true)]
    pub target: String,

    /// Print the result as JSON.
    #[clap(long, short)]
    pub json: bool,
}

impl InferArgs {
    /// Reads the target bytecode.
    pub fn get_bytecode(&self) -> Result<Vec<u8>> {
        get_bytecode_from_target(&self.target)
    }
}

impl InferArgsBuilder {
    /// Creates a new InferArgsBuilder with default values
    pub fn new() -> Self {
        Self { target: Some(String::new()), json: Some(false) }
    }
}
