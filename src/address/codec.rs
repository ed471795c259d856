//! Sealed bech32 address codec.
//!
//! The codec is built once at startup from the resolved prefixes and then
//! shared by reference. There are no setters: a codec value is sealed by
//! construction.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bech32::{Bech32, Hrp};
use sha2::{Digest, Sha256};

use crate::address::prefixes::Bech32Prefixes;
use crate::address::AddressError;

/// Type URL of the ed25519 consensus key used by Tendermint/CometBFT validators.
pub const ED25519_PUBKEY_TYPE: &str = "/cosmos.crypto.ed25519.PubKey";

/// Length of an address derived from a public key hash.
const ADDRESS_LEN: usize = 20;

/// Encodes and decodes chain addresses with a fixed prefix set.
#[derive(Debug, Clone)]
pub struct AddressCodec {
    prefixes: Bech32Prefixes,
    account: Hrp,
    validator: Hrp,
    consensus_node: Hrp,
}

impl AddressCodec {
    /// Validate every prefix and seal them into a codec.
    pub fn new(prefixes: Bech32Prefixes) -> Result<Self, AddressError> {
        // Pubkey prefixes are not used for encoding here but must still be valid.
        for prefix in [&prefixes.account_pubkey, &prefixes.validator_pubkey, &prefixes.consensus_node_pubkey] {
            parse_hrp(prefix)?;
        }

        Ok(Self {
            account: parse_hrp(&prefixes.account)?,
            validator: parse_hrp(&prefixes.validator)?,
            consensus_node: parse_hrp(&prefixes.consensus_node)?,
            prefixes,
        })
    }

    pub fn prefixes(&self) -> &Bech32Prefixes {
        &self.prefixes
    }

    /// Decode an account address, checking its prefix.
    pub fn decode_account(&self, address: &str) -> Result<Vec<u8>, AddressError> {
        decode_with(&self.account, address)
    }

    /// Decode a validator operator address, checking its prefix.
    pub fn decode_validator(&self, address: &str) -> Result<Vec<u8>, AddressError> {
        decode_with(&self.validator, address)
    }

    pub fn encode_account(&self, bytes: &[u8]) -> Result<String, AddressError> {
        encode_with(self.account, bytes)
    }

    /// The account address that owns a validator operator address.
    pub fn validator_to_account(&self, valoper: &str) -> Result<String, AddressError> {
        let bytes = self.decode_validator(valoper)?;
        self.encode_account(&bytes)
    }

    /// Consensus address for a validator consensus public key as returned by the LCD.
    ///
    /// `key` is the base64-encoded public key. Only ed25519 keys are supported.
    pub fn consensus_address(&self, key_type: &str, key: &str) -> Result<String, AddressError> {
        if key_type != ED25519_PUBKEY_TYPE {
            return Err(AddressError::UnsupportedKey(key_type.to_string()));
        }

        let raw = STANDARD
            .decode(key)
            .map_err(|e| AddressError::InvalidKey(e.to_string()))?;
        if raw.len() != 32 {
            return Err(AddressError::InvalidKey(format!(
                "ed25519 key must be 32 bytes, got {}",
                raw.len()
            )));
        }

        let digest = Sha256::digest(&raw);
        encode_with(self.consensus_node, &digest[..ADDRESS_LEN])
    }
}

fn parse_hrp(prefix: &str) -> Result<Hrp, AddressError> {
    Hrp::parse(prefix).map_err(|e| AddressError::InvalidPrefix {
        prefix: prefix.to_string(),
        reason: e.to_string(),
    })
}

fn decode_with(expected: &Hrp, address: &str) -> Result<Vec<u8>, AddressError> {
    let (hrp, data) = bech32::decode(address).map_err(|e| AddressError::Decode {
        address: address.to_string(),
        reason: e.to_string(),
    })?;

    if hrp != *expected {
        return Err(AddressError::WrongPrefix {
            address: address.to_string(),
            expected: expected.to_string(),
            actual: hrp.to_string(),
        });
    }

    Ok(data)
}

fn encode_with(hrp: Hrp, bytes: &[u8]) -> Result<String, AddressError> {
    bech32::encode::<Bech32>(hrp, bytes).map_err(|e| AddressError::Encode(e.to_string()))
}
