//! Configuration management for forseti
//!
//! This crate provides functionality for managing the forseti configuration,
//! including loading, saving, updating, and deleting configuration settings.

/// Error types for the configuration module
pub mod error;

use crate::error::Error;
use clap::Parser;
use forseti_common::utils::{
    io::file::{delete_path, read_file, write_file},
    version::SolcVersion,
};
use serde::{Deserialize, Serialize};
#[allow(deprecated)]
use std::env::home_dir;
use std::path::PathBuf;
use tracing::{error, info};

/// Command line arguments for the configuration command
#[derive(Debug, Clone, Parser)]
#[clap(
    about = "Display and edit the current configuration",
    override_usage = "forseti config [OPTIONS]"
)]
pub struct ConfigArgs {
    /// The target key to update.
    #[clap(required = false, default_value = "")]
    key: String,

    /// The value to set the key to.
    #[clap(required = false, default_value = "")]
    value: String,
}

/// The [`Configuration`] struct represents the configuration of the CLI. Command line flags take
/// precedence over these values.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Configuration {
    /// The solc versions to verify against when none is given explicitly
    pub compiler_versions: Vec<SolcVersion>,

    /// Whether the metadata section must match byte for byte
    pub compare_metadata: bool,

    /// Number of worker threads used for matching, 0 for one per CPU
    pub threads: usize,

    /// Candidate count at which matching switches to the worker pool
    pub parallel_threshold: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            compiler_versions: Vec::new(),
            compare_metadata: false,
            threads: 0,
            parallel_threshold: 32,
        }
    }
}

/// Returns the path of the configuration file, `$HOME/.forseti/config.toml`.
#[allow(deprecated)]
fn config_path() -> Result<String, Error> {
    let mut home: PathBuf = home_dir().ok_or_else(|| {
        Error::Generic(
            "failed to get home directory. does your os support `std::env::home_dir()`?"
                .to_string(),
        )
    })?;
    home.push(".forseti");
    home.push("config.toml");

    home.to_str()
        .map(str::to_string)
        .ok_or_else(|| Error::Generic("failed to convert path to string".to_string()))
}

/// Parses a comma separated list of solc versions, e.g. `0.8.19,0.5.17`.
fn parse_versions(value: &str) -> Result<Vec<SolcVersion>, Error> {
    value
        .split(',')
        .map(str::trim)
        .filter(|version| !version.is_empty())
        .map(|version| version.parse().map_err(|e| Error::ParseError(format!("{e}"))))
        .collect()
}

impl Configuration {
    /// Returns the current configuration.
    pub fn load() -> Result<Self, Error> {
        let path = config_path()?;

        // if the config file doesn't exist, create it
        if !std::path::Path::new(&path).exists() {
            let config = Configuration::default();
            config.save()?;
        }

        // read the config file
        let contents = read_file(&path)
            .map_err(|e| Error::Generic(format!("failed to read config file: {e}")))?;

        // parse the config file
        toml::from_str(&contents)
            .map_err(|e| Error::ParseError(format!("failed to parse config file: {e}")))
    }

    /// Saves the current configuration to disk.
    pub fn save(&self) -> Result<(), Error> {
        write_file(
            &config_path()?,
            &toml::to_string(&self)
                .map_err(|e| Error::ParseError(format!("failed to serialize config: {e}")))?,
        )
        .map_err(|e| Error::Generic(format!("failed to write config file: {e}")))?;

        Ok(())
    }

    /// Deletes the configuration file at `$HOME/.forseti/config.toml`.
    pub fn delete() -> Result<(), Error> {
        delete_path(&config_path()?);

        Ok(())
    }

    /// Update a single key/value pair in the configuration.
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), Error> {
        // update the key in the struct and ensure it's the correct type
        match key {
            "compiler_versions" => {
                self.compiler_versions = parse_versions(value)?;
            }
            "compare_metadata" => {
                self.compare_metadata = value.parse().map_err(|_| {
                    Error::ParseError(format!("'{value}' is not a boolean (true or false)."))
                })?;
            }
            "threads" => {
                self.threads = value
                    .parse()
                    .map_err(|_| Error::ParseError(format!("'{value}' is not a thread count.")))?;
            }
            "parallel_threshold" => {
                self.parallel_threshold = value
                    .parse()
                    .map_err(|_| Error::ParseError(format!("'{value}' is not a count.")))?;
            }
            _ => {
                return Err(Error::Generic(format!(
                    "invalid key: \'{key}\' is not a valid configuration key."
                )))
            }
        }

        // write the updated config to disk
        self.save()?;

        Ok(())
    }
}

/// The `config` command is used to display and edit the current configuration.
pub fn config(args: ConfigArgs) -> Result<(), Error> {
    if !args.key.is_empty() {
        if !args.value.is_empty() {
            // read the config file and update the key/value pair
            let mut config = Configuration::load()?;
            config.update(&args.key, &args.value)?;
            info!("updated configuration! Set \'{}\' = \'{}\' .", &args.key, &args.value);
        } else {
            // key is set, but no value is set
            error!("found key but no value to set. Please specify a value to set, use `forseti config --help` for more information.");
        }
    } else {
        // no key is set, print the config file
        println!("{:#?}", Configuration::load()?);
        info!("use `forseti config <KEY> <VALUE>` to set a key/value pair.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // Test default configuration
    #[test]
    #[serial]
    fn test_default_configuration() {
        let config = Configuration::default();
        assert!(config.compiler_versions.is_empty());
        assert!(!config.compare_metadata);
        assert_eq!(config.threads, 0);
        assert_eq!(config.parallel_threshold, 32);
    }

    // Test loading configuration from a file
    #[test]
    #[serial]
    fn test_load_configuration() {
        // delete config file if it exists
        Configuration::delete().expect("failed to delete config file");
        let config = Configuration::load().expect("failed to load config file");

        assert_eq!(config, Configuration::default());
    }

    // Test saving configuration to a file
    #[test]
    #[serial]
    fn test_save_configuration() {
        // delete config file if it exists
        Configuration::delete().expect("failed to delete config file");
        let mut config = Configuration::default();

        config
            .update("compiler_versions", "0.8.19, v0.5.17")
            .expect("failed to update compiler_versions");
        config.update("threads", "4").expect("failed to update threads");

        // load the config file
        let loaded_config = Configuration::load().expect("failed to load config file");

        // ensure the config file was saved correctly
        assert_eq!(
            loaded_config.compiler_versions,
            vec![SolcVersion::new(0, 8, 19), SolcVersion::new(0, 5, 17)]
        );
        assert_eq!(loaded_config.threads, 4);
        assert_eq!(loaded_config.parallel_threshold, 32);
    }

    // Test rejecting malformed values
    #[test]
    #[serial]
    fn test_update_rejects_invalid_values() {
        let mut config = Configuration::default();

        assert!(config.update("compare_metadata", "maybe").is_err());
        assert!(config.update("compiler_versions", "0.8").is_err());
        assert!(config.update("rpc_url", "http://localhost:8545").is_err());
        assert_eq!(config, Configuration::default());
    }

    // Test partial configuration files fall back to defaults
    #[test]
    #[serial]
    fn test_partial_configuration() {
        let config: Configuration =
            toml::from_str("compare_metadata = true\n").expect("failed to parse config");

        assert!(config.compare_metadata);
        assert_eq!(config.parallel_threshold, 32);
    }

    // Test deleting configuration file
    #[test]
    #[serial]
    fn test_delete_configuration() {
        // delete config file if it exists
        Configuration::delete().expect("failed to delete config file");
        let mut config = Configuration::load().expect("failed to load config file");

        // save some values to the config file
        config.update("compare_metadata", "true").expect("failed to update compare_metadata");

        // delete config file if it exists
        Configuration::delete().expect("failed to delete config file");
        let config = Configuration::load().expect("failed to load config file");

        assert!(!config.compare_metadata);
    }
}
