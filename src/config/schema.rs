//! Configuration schema definitions.
//!
//! Every field is a CLI flag with an environment fallback. Long flag names
//! double as the keys of the optional TOML config file.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::address::{Bech32Prefixes, PrefixOverrides};

/// What happened to `--config` while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigFile {
    #[default]
    NotSet,
    /// The file was read; `applied` values filled unset flags.
    Merged { path: PathBuf, applied: usize },
    /// The path was given but no file exists there.
    Missing(PathBuf),
}

/// Resolved settings for the exporter.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cosmos-exporter",
    version,
    about = "Prometheus exporter for Cosmos-SDK chains",
    long_about = "Scrape the data about the validators set, specific validators or wallets in the Cosmos network."
)]
pub struct ServiceConfig {
    /// Path to a TOML config file. Keys are the long flag names.
    #[arg(long = "config", env = "COSMOS_EXPORTER_CONFIG")]
    pub config_path: Option<PathBuf>,

    /// LCD endpoint
    #[arg(long, env = "COSMOS_EXPORTER_LCD", default_value = "http://localhost:1317")]
    pub lcd: String,

    /// Serve pryzm oracle info in the single call to /metrics
    #[arg(
        long,
        env = "COSMOS_EXPORTER_ORACLE",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub oracle: bool,

    /// The address this exporter binds to. A bare `:port` binds all interfaces.
    #[arg(long, env = "COSMOS_EXPORTER_LISTEN_ADDRESS", default_value = ":9300")]
    pub listen_address: String,

    /// Chain bech32 prefix; every other prefix derives from it unless set
    #[arg(long = "bech-prefix", env = "COSMOS_EXPORTER_BECH_PREFIX", default_value = "persistence")]
    pub prefix: String,

    #[arg(long = "bech-account-prefix", env = "COSMOS_EXPORTER_BECH_ACCOUNT_PREFIX")]
    pub account_prefix: Option<String>,

    #[arg(long = "bech-account-pubkey-prefix", env = "COSMOS_EXPORTER_BECH_ACCOUNT_PUBKEY_PREFIX")]
    pub account_pubkey_prefix: Option<String>,

    #[arg(long = "bech-validator-prefix", env = "COSMOS_EXPORTER_BECH_VALIDATOR_PREFIX")]
    pub validator_prefix: Option<String>,

    #[arg(long = "bech-validator-pubkey-prefix", env = "COSMOS_EXPORTER_BECH_VALIDATOR_PUBKEY_PREFIX")]
    pub validator_pubkey_prefix: Option<String>,

    #[arg(long = "bech-consensus-node-prefix", env = "COSMOS_EXPORTER_BECH_CONSENSUS_NODE_PREFIX")]
    pub consensus_node_prefix: Option<String>,

    #[arg(
        long = "bech-consensus-node-pubkey-prefix",
        env = "COSMOS_EXPORTER_BECH_CONSENSUS_NODE_PUBKEY_PREFIX"
    )]
    pub consensus_node_pubkey_prefix: Option<String>,

    /// Staking base denom; discovered from the chain when empty
    #[arg(long, env = "COSMOS_EXPORTER_DENOM", default_value = "")]
    pub denom: String,

    /// Divide base-denom amounts by this value
    #[arg(long, env = "COSMOS_EXPORTER_DENOM_COEFFICIENT", default_value_t = 1.0)]
    pub denom_coefficient: f64,

    /// When > 0, use 10^exponent as the denom coefficient
    #[arg(long, env = "COSMOS_EXPORTER_DENOM_EXPONENT", default_value_t = 0)]
    pub denom_exponent: u32,

    /// Chain ID; discovered from the node when empty
    #[arg(long, env = "COSMOS_EXPORTER_CHAIN_ID", default_value = "")]
    pub chain_id: String,

    /// Pagination limit for LCD list queries
    #[arg(long, env = "COSMOS_EXPORTER_LIMIT", default_value_t = 1000)]
    pub limit: u64,

    /// LCD request timeout in seconds
    #[arg(long = "timeout", env = "COSMOS_EXPORTER_TIMEOUT", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, env = "COSMOS_EXPORTER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Output logs as JSON
    #[arg(
        long = "json",
        env = "COSMOS_EXPORTER_JSON",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub json_output: bool,

    /// Serve every selected category from a single /metrics endpoint
    #[arg(
        long = "single",
        env = "COSMOS_EXPORTER_SINGLE",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub single_req: bool,

    /// Wallet addresses scraped in single mode
    #[arg(long, env = "COSMOS_EXPORTER_WALLETS", value_delimiter = ',')]
    pub wallets: Vec<String>,

    /// Validator operator addresses scraped in single mode
    #[arg(long, env = "COSMOS_EXPORTER_VALIDATORS", value_delimiter = ',')]
    pub validators: Vec<String>,

    /// Include governance proposals in single mode
    #[arg(
        long,
        env = "COSMOS_EXPORTER_PROPOSALS",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub proposals: bool,

    /// Include chain params in single mode
    #[arg(
        long,
        env = "COSMOS_EXPORTER_PARAMS",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub params: bool,

    /// Include the pending upgrade plan in single mode
    #[arg(
        long,
        env = "COSMOS_EXPORTER_UPGRADES",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub upgrades: bool,

    /// Resolved prefixes, filled in after merging.
    #[arg(skip)]
    pub prefixes: Bech32Prefixes,

    /// Outcome of reading the config file, reported once logging is up.
    #[arg(skip)]
    pub config_file: ConfigFile,
}

impl ServiceConfig {
    /// Compute the bech32 prefixes from the chain prefix and explicit overrides.
    pub fn resolve_prefixes(&mut self) {
        let overrides = PrefixOverrides {
            account: self.account_prefix.clone(),
            account_pubkey: self.account_pubkey_prefix.clone(),
            validator: self.validator_prefix.clone(),
            validator_pubkey: self.validator_pubkey_prefix.clone(),
            consensus_node: self.consensus_node_prefix.clone(),
            consensus_node_pubkey: self.consensus_node_pubkey_prefix.clone(),
        };
        self.prefixes = Bech32Prefixes::from_chain_prefix(&self.prefix).with_overrides(&overrides);
    }

    /// Address to bind, with `:port` expanded to all interfaces.
    pub fn bind_address(&self) -> String {
        if self.listen_address.starts_with(':') {
            format!("0.0.0.0{}", self.listen_address)
        } else {
            self.listen_address.clone()
        }
    }

    /// Effective divisor for base-denom amounts.
    pub fn effective_denom_coefficient(&self) -> f64 {
        if self.denom_exponent > 0 {
            10f64.powi(self.denom_exponent as i32)
        } else {
            self.denom_coefficient
        }
    }

    /// Log the resolved configuration once at startup.
    pub fn log_config(&self) {
        match &self.config_file {
            ConfigFile::NotSet => {}
            ConfigFile::Merged { path, applied } => {
                tracing::info!(path = %path.display(), applied, "Config file merged");
            }
            ConfigFile::Missing(path) => {
                tracing::warn!(path = %path.display(), "Config file not found, using flags and defaults");
            }
        }

        tracing::info!(
            lcd = %self.lcd,
            oracle = self.oracle,
            listen_address = %self.listen_address,
            bech_prefix = %self.prefix,
            account_prefix = %self.prefixes.account,
            validator_prefix = %self.prefixes.validator,
            consensus_node_prefix = %self.prefixes.consensus_node,
            denom = %self.denom,
            denom_coefficient = self.effective_denom_coefficient(),
            chain_id = %self.chain_id,
            limit = self.limit,
            timeout_secs = self.timeout_secs,
            log_level = %self.log_level,
            json = self.json_output,
            single = self.single_req,
            wallets = ?self.wallets,
            validators = ?self.validators,
            proposals = self.proposals,
            params = self.params,
            upgrades = self.upgrades,
            "Started with following parameters"
        );
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let mut config = Self::parse_from(["cosmos-exporter"]);
        config.resolve_prefixes();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address_expands_bare_port() {
        let mut config = ServiceConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:9300");

        config.listen_address = "127.0.0.1:9400".to_string();
        assert_eq!(config.bind_address(), "127.0.0.1:9400");
    }

    #[test]
    fn test_denom_exponent_overrides_coefficient() {
        let mut config = ServiceConfig::default();
        config.denom_coefficient = 1000.0;
        assert_eq!(config.effective_denom_coefficient(), 1000.0);

        config.denom_exponent = 6;
        assert_eq!(config.effective_denom_coefficient(), 1_000_000.0);
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        ServiceConfig::command().debug_assert();
    }
}
