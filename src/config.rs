//! Configuration file parsing
//!
//! Parses the builder's TOML configuration using serde

use crate::error::{Error, Result};
use crate::hns::HnsVersion;
use crate::network::Network;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load configuration from a file
pub fn load(path: &Path) -> Result<PluginConfig> {
    let content = fs::read_to_string(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse(&content)
}

/// Parse and validate configuration from TOML text
pub fn parse(content: &str) -> Result<PluginConfig> {
    let config: PluginConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Root configuration structure
#[derive(Debug, Default, Deserialize)]
pub struct PluginConfig {
    /// Builder settings
    #[serde(default)]
    pub builder: BuilderConfig,

    /// Network definitions
    #[serde(default)]
    pub networks: Vec<Network>,
}

impl PluginConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for network in &self.networks {
            if !names.insert(&network.name) {
                return Err(Error::ConfigValidation(format!(
                    "Duplicate network name: {}",
                    network.name
                )));
            }

            if network.eni_ip_addresses.is_empty() {
                return Err(Error::ConfigValidation(format!(
                    "Network '{}' has no ENI address",
                    network.name
                )));
            }
        }

        Ok(())
    }

    /// Get a network definition by name
    pub fn get_network(&self, name: &str) -> Option<&Network> {
        self.networks.iter().find(|nw| nw.name == name)
    }
}

/// Which network builder implementation to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuilderKind {
    /// L2 bridge to a shared ENI through HNS
    #[default]
    Bridge,
}

/// Builder settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuilderConfig {
    #[serde(default)]
    pub kind: BuilderKind,

    /// Oldest HNS release the builder will talk to
    #[serde(default)]
    pub min_hns_version: HnsVersion,
}
