//! Bech32 human-readable prefixes for one chain.

use serde::Serialize;

/// The six bech32 prefixes a Cosmos-SDK chain uses.
///
/// Every prefix has a companion public-key prefix, mirroring the account,
/// validator operator and consensus node address families.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bech32Prefixes {
    pub account: String,
    pub account_pubkey: String,
    pub validator: String,
    pub validator_pubkey: String,
    pub consensus_node: String,
    pub consensus_node_pubkey: String,
}

impl Bech32Prefixes {
    /// Derive the full prefix set from a chain shorthand such as `cosmos`.
    pub fn from_chain_prefix(prefix: &str) -> Self {
        Self {
            account: prefix.to_string(),
            account_pubkey: format!("{prefix}pub"),
            validator: format!("{prefix}valoper"),
            validator_pubkey: format!("{prefix}valoperpub"),
            consensus_node: format!("{prefix}valcons"),
            consensus_node_pubkey: format!("{prefix}valconspub"),
        }
    }

    /// Replace derived prefixes with explicitly configured ones.
    pub fn with_overrides(mut self, overrides: &PrefixOverrides) -> Self {
        let slots = [
            (&mut self.account, &overrides.account),
            (&mut self.account_pubkey, &overrides.account_pubkey),
            (&mut self.validator, &overrides.validator),
            (&mut self.validator_pubkey, &overrides.validator_pubkey),
            (&mut self.consensus_node, &overrides.consensus_node),
            (&mut self.consensus_node_pubkey, &overrides.consensus_node_pubkey),
        ];

        for (slot, value) in slots {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                *slot = value.to_string();
            }
        }

        self
    }
}

/// Explicitly set prefixes; `None` means "derive from the chain prefix".
#[derive(Debug, Clone, Default)]
pub struct PrefixOverrides {
    pub account: Option<String>,
    pub account_pubkey: Option<String>,
    pub validator: Option<String>,
    pub validator_pubkey: Option<String>,
    pub consensus_node: Option<String>,
    pub consensus_node_pubkey: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_from_chain_prefix() {
        let prefixes = Bech32Prefixes::from_chain_prefix("pryzm");
        assert_eq!(prefixes.account, "pryzm");
        assert_eq!(prefixes.account_pubkey, "pryzmpub");
        assert_eq!(prefixes.validator, "pryzmvaloper");
        assert_eq!(prefixes.validator_pubkey, "pryzmvaloperpub");
        assert_eq!(prefixes.consensus_node, "pryzmvalcons");
        assert_eq!(prefixes.consensus_node_pubkey, "pryzmvalconspub");
    }

    #[test]
    fn test_explicit_prefix_wins() {
        let overrides = PrefixOverrides {
            validator: Some("custvaloper".to_string()),
            consensus_node: Some(String::new()),
            ..Default::default()
        };
        let prefixes = Bech32Prefixes::from_chain_prefix("cosmos").with_overrides(&overrides);

        assert_eq!(prefixes.account, "cosmos");
        assert_eq!(prefixes.validator, "custvaloper");
        // Empty values fall back to the derived prefix
        assert_eq!(prefixes.consensus_node, "cosmosvalcons");
    }
}
