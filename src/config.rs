//! Settings for the Monte Carlo sampler, stored as YAML
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fs::{read_to_string, write};
use std::io;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

/// Name of the directory in the user's home directory which holds the configuration
pub const APP_DIR: &str = ".dicechess";

/// Name of the sampler configuration file
pub const CONFIG_FILE: &str = "simulate.yaml";

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Settings for a Monte Carlo run. Missing fields take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the random number generator
    pub seed: u64,
    /// Number of games to play
    pub games: usize,
    /// Maximum number of turns in a single game
    pub max_turns: usize,
    /// A game stops once the probability that it is still undecided drops to this value
    pub min_still_playing: f64,
    /// Factor by which the game count between progress reports grows
    pub report_growth: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            seed: 10,
            games: 1000,
            max_turns: 1000,
            min_still_playing: 1e-5,
            report_growth: 1.05,
        }
    }
}

impl SimulationConfig {
    /// Reads the settings from a YAML file.
    pub fn read(path: &Path) -> Result<SimulationConfig, ConfigError> {
        let s = read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Writes the settings to a YAML file.
    pub fn write(&self, path: &Path) -> Result<(), ConfigError> {
        let s = serde_yaml::to_string(self)?;
        write(path, s)?;
        Ok(())
    }

    /// Returns the default location of the configuration file, in the user's home directory if
    /// there is one.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_FILE)
    }

    /// Reads the settings from `path` if given, otherwise from the default location if a file
    /// exists there, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<SimulationConfig, ConfigError> {
        match path {
            Some(path) => SimulationConfig::read(path),
            None => {
                let path = SimulationConfig::default_path();
                if path.is_file() {
                    SimulationConfig::read(&path)
                } else {
                    Ok(SimulationConfig::default())
                }
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error reading or writing a configuration file
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read or written
    Io(io::Error),
    /// The file is not valid YAML for the settings
    Yaml(serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => err.fmt(f),
            ConfigError::Yaml(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ConfigError { }

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Yaml(err)
    }
}
