pub(crate) mod error;
pub(crate) mod log_args;
pub(crate) mod output;

use error::Error;
use log_args::LogArgs;
use output::{display_inference, display_verification};
use tracing::debug;

use clap::{Parser, Subcommand};

use forseti_config::{config, ConfigArgs, Configuration};
use forseti_core::{
    forseti_infer::{infer, InferArgs},
    forseti_matcher::{MatchArgs, MatchOptions},
    verify_target,
};

#[derive(Debug, Parser)]
#[clap(name = "forseti", version)]
pub(crate) struct Arguments {
    #[clap(subcommand)]
    pub(crate) sub: Subcommands,

    #[clap(flatten)]
    logs: LogArgs,
}

#[derive(Debug, Subcommand)]
#[clap(
    about = "forseti identifies the compiled artifact and solc version behind deployed EVM bytecode."
)]
pub(crate) enum Subcommands {
    #[clap(name = "infer", about = "Infer the solc version range of deployed bytecode")]
    Infer(InferArgs),

    #[clap(name = "match", about = "Find the compiled artifact which produced deployed bytecode")]
    Match(MatchArgs),

    #[clap(name = "config", about = "Display and edit the current configuration")]
    Config(ConfigArgs),
}

fn main() -> Result<(), Error> {
    let args = Arguments::parse();

    // setup logging, keeping the file writer alive until exit
    let _guard = args.logs.init_tracing().ok().flatten();

    let configuration = Configuration::load()
        .map_err(|e| Error::Generic(format!("failed to load configuration: {}", e)))?;
    match args.sub {
        Subcommands::Infer(cmd) => {
            let json = cmd.json;
            let result = infer(cmd)?;

            if json {
                println!("{}", result.to_json()?);
            } else {
                display_inference(&result, &configuration.compiler_versions);
            }
        }

        Subcommands::Match(mut cmd) => {
            // either the flag or the configuration enables strict metadata comparison
            cmd.compare_metadata |= configuration.compare_metadata;
            let defaults = MatchOptions::default();
            let defaults = MatchOptions {
                threads: if configuration.threads == 0 {
                    defaults.threads
                } else {
                    configuration.threads
                },
                parallel_threshold: configuration.parallel_threshold,
                ..defaults
            };
            debug!("default match options: {:?}", defaults);

            let json = cmd.json;
            let report = verify_target(cmd, &configuration.compiler_versions, defaults)?;

            if json {
                println!("{}", report.to_json()?);
            } else {
                display_verification(&report);
            }
        }

        Subcommands::Config(cmd) => {
            config(cmd)?;
        }
    }

    Ok(())
}
