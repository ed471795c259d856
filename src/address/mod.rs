//! Chain address handling.
//!
//! # Data Flow
//! ```text
//! ServiceConfig (chain prefix + explicit overrides)
//!     → prefixes.rs (derive the six bech32 prefixes)
//!     → codec.rs (validate and seal into an AddressCodec)
//!     → Arc<AddressCodec> shared by every scrape handler
//! ```
//!
//! # Design Decisions
//! - No process-wide prefix state: the codec is a value passed by reference
//! - Sealing happens before the HTTP router exists

pub mod codec;
pub mod prefixes;

use thiserror::Error;

pub use codec::AddressCodec;
pub use prefixes::{Bech32Prefixes, PrefixOverrides};

/// Errors raised while building the codec or converting addresses.
#[derive(Debug, Error)]
pub enum AddressError {
    #[error("invalid bech32 prefix '{prefix}': {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    #[error("could not decode address '{address}': {reason}")]
    Decode { address: String, reason: String },

    #[error("address '{address}' has prefix '{actual}', expected '{expected}'")]
    WrongPrefix {
        address: String,
        expected: String,
        actual: String,
    },

    #[error("could not encode address: {0}")]
    Encode(String),

    #[error("unsupported consensus key type: {0}")]
    UnsupportedKey(String),

    #[error("invalid consensus key: {0}")]
    InvalidKey(String),
}
