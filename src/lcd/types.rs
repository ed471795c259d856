//! LCD response types and error definitions.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::lcd::codec::{from_duration_string, from_f64_string, from_u64_string};

/// Errors that can occur while querying the LCD.
#[derive(Debug, Error)]
pub enum LcdError {
    /// The configured endpoint is not a valid URL.
    #[error("invalid LCD endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// The HTTP client could not be built.
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Request did not complete within the configured timeout.
    #[error("LCD request {path} timed out after {secs} seconds")]
    Timeout { path: String, secs: u64 },

    /// Connection or transport failure.
    #[error("LCD request {path} failed: {source}")]
    Request {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// LCD answered with a non-success status.
    #[error("LCD request {path} returned {status}: {message}")]
    Status {
        path: String,
        status: u16,
        message: String,
    },

    /// Body could not be decoded into the expected type.
    #[error("could not decode LCD response for {path}: {reason}")]
    Decode { path: String, reason: String },
}

/// Result type for LCD operations.
pub type LcdResult<T> = Result<T, LcdError>;

/// Error body returned by the gRPC gateway.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LcdErrorBody {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PageResponse {
    pub next_key: Option<String>,
    pub total: Option<String>,
}

impl PageResponse {
    pub fn total(&self) -> Option<u64> {
        self.total.as_deref().and_then(|t| t.parse().ok())
    }
}

/// A coin or decimal coin; amounts are kept as floats.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Coin {
    pub denom: String,
    #[serde(deserialize_with = "from_f64_string")]
    pub amount: f64,
}

// Node

#[derive(Debug, Clone, Deserialize)]
pub struct NodeInfoResponse {
    pub default_node_info: DefaultNodeInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefaultNodeInfo {
    pub network: String,
    #[serde(default)]
    pub moniker: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockResponse {
    pub block: Block,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockHeader {
    #[serde(default)]
    pub chain_id: String,
    #[serde(deserialize_with = "from_u64_string")]
    pub height: u64,
    pub time: DateTime<Utc>,
}

// Bank

#[derive(Debug, Clone, Deserialize)]
pub struct BalancesResponse {
    pub balances: Vec<Coin>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupplyOfResponse {
    pub amount: Coin,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DenomMetadataResponse {
    pub metadata: DenomMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DenomMetadata {
    pub base: String,
    pub display: String,
    #[serde(default)]
    pub denom_units: Vec<DenomUnit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DenomUnit {
    pub denom: String,
    #[serde(default)]
    pub exponent: u32,
}

impl DenomMetadata {
    /// Exponent of the display unit relative to the base unit.
    pub fn display_exponent(&self) -> u32 {
        self.denom_units
            .iter()
            .find(|unit| unit.denom == self.display)
            .map(|unit| unit.exponent)
            .unwrap_or(0)
    }
}

// Staking

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub enum BondStatus {
    #[serde(rename = "BOND_STATUS_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "BOND_STATUS_UNBONDED")]
    Unbonded,
    #[serde(rename = "BOND_STATUS_UNBONDING")]
    Unbonding,
    #[serde(rename = "BOND_STATUS_BONDED")]
    Bonded,
}

impl BondStatus {
    /// Protobuf enum value, used as the metric value.
    pub fn code(self) -> f64 {
        match self {
            BondStatus::Unspecified => 0.0,
            BondStatus::Unbonded => 1.0,
            BondStatus::Unbonding => 2.0,
            BondStatus::Bonded => 3.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidatorResponse {
    pub validator: Validator,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidatorsResponse {
    pub validators: Vec<Validator>,
    #[serde(default)]
    pub pagination: Option<PageResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Validator {
    pub operator_address: String,
    pub consensus_pubkey: Option<PubKey>,
    #[serde(default)]
    pub jailed: bool,
    pub status: BondStatus,
    #[serde(deserialize_with = "from_f64_string")]
    pub tokens: f64,
    #[serde(deserialize_with = "from_f64_string")]
    pub delegator_shares: f64,
    pub description: Description,
    pub commission: Commission,
    #[serde(deserialize_with = "from_f64_string")]
    pub min_self_delegation: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PubKey {
    #[serde(rename = "@type")]
    pub type_url: String,
    pub key: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Description {
    pub moniker: String,
    pub identity: String,
    pub website: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Commission {
    pub commission_rates: CommissionRates,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommissionRates {
    #[serde(deserialize_with = "from_f64_string")]
    pub rate: f64,
    #[serde(deserialize_with = "from_f64_string")]
    pub max_rate: f64,
    #[serde(deserialize_with = "from_f64_string")]
    pub max_change_rate: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DelegationsResponse {
    pub delegation_responses: Vec<DelegationResponse>,
    #[serde(default)]
    pub pagination: Option<PageResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SingleDelegationResponse {
    pub delegation_response: DelegationResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DelegationResponse {
    pub delegation: Delegation,
    pub balance: Coin,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Delegation {
    pub delegator_address: String,
    pub validator_address: String,
    #[serde(deserialize_with = "from_f64_string")]
    pub shares: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnbondingDelegationsResponse {
    pub unbonding_responses: Vec<UnbondingDelegation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnbondingDelegation {
    pub delegator_address: String,
    pub validator_address: String,
    pub entries: Vec<UnbondingEntry>,
}

impl UnbondingDelegation {
    pub fn total_balance(&self) -> f64 {
        self.entries.iter().map(|entry| entry.balance).sum()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnbondingEntry {
    #[serde(deserialize_with = "from_f64_string")]
    pub balance: f64,
    pub completion_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedelegationsResponse {
    pub redelegation_responses: Vec<RedelegationResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedelegationResponse {
    pub redelegation: Redelegation,
    pub entries: Vec<RedelegationEntryResponse>,
}

impl RedelegationResponse {
    pub fn total_balance(&self) -> f64 {
        self.entries.iter().map(|entry| entry.balance).sum()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Redelegation {
    pub delegator_address: String,
    pub validator_src_address: String,
    pub validator_dst_address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedelegationEntryResponse {
    #[serde(deserialize_with = "from_f64_string")]
    pub balance: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StakingParamsResponse {
    pub params: StakingParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StakingParams {
    #[serde(deserialize_with = "from_duration_string")]
    pub unbonding_time: f64,
    pub max_validators: u32,
    #[serde(default)]
    pub max_entries: u32,
    pub bond_denom: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StakingPoolResponse {
    pub pool: StakingPool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StakingPool {
    #[serde(deserialize_with = "from_f64_string")]
    pub not_bonded_tokens: f64,
    #[serde(deserialize_with = "from_f64_string")]
    pub bonded_tokens: f64,
}

// Distribution

#[derive(Debug, Clone, Deserialize)]
pub struct DelegatorRewardsResponse {
    pub rewards: Vec<DelegatorReward>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DelegatorReward {
    pub validator_address: String,
    pub reward: Vec<Coin>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidatorCommissionResponse {
    pub commission: CoinList,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinList {
    pub commission: Vec<Coin>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutstandingRewardsResponse {
    pub rewards: OutstandingRewards,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutstandingRewards {
    pub rewards: Vec<Coin>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommunityPoolResponse {
    pub pool: Vec<Coin>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DistributionParamsResponse {
    pub params: DistributionParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DistributionParams {
    #[serde(deserialize_with = "from_f64_string")]
    pub community_tax: f64,
    /// Deprecated in newer SDK releases, reported as zero when absent.
    #[serde(default, deserialize_with = "from_f64_string")]
    pub base_proposer_reward: f64,
    #[serde(default, deserialize_with = "from_f64_string")]
    pub bonus_proposer_reward: f64,
}

// Slashing

#[derive(Debug, Clone, Deserialize)]
pub struct SigningInfoResponse {
    pub val_signing_info: SigningInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SigningInfosResponse {
    pub info: Vec<SigningInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SigningInfo {
    pub address: String,
    #[serde(default)]
    pub tombstoned: bool,
    #[serde(deserialize_with = "from_u64_string")]
    pub missed_blocks_counter: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlashingParamsResponse {
    pub params: SlashingParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlashingParams {
    #[serde(deserialize_with = "from_u64_string")]
    pub signed_blocks_window: u64,
    #[serde(deserialize_with = "from_f64_string")]
    pub min_signed_per_window: f64,
    #[serde(deserialize_with = "from_duration_string")]
    pub downtime_jail_duration: f64,
    #[serde(deserialize_with = "from_f64_string")]
    pub slash_fraction_double_sign: f64,
    #[serde(deserialize_with = "from_f64_string")]
    pub slash_fraction_downtime: f64,
}

// Mint

#[derive(Debug, Clone, Deserialize)]
pub struct MintParamsResponse {
    pub params: MintParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MintParams {
    pub mint_denom: String,
    #[serde(deserialize_with = "from_f64_string")]
    pub inflation_rate_change: f64,
    #[serde(deserialize_with = "from_f64_string")]
    pub inflation_max: f64,
    #[serde(deserialize_with = "from_f64_string")]
    pub inflation_min: f64,
    #[serde(deserialize_with = "from_f64_string")]
    pub goal_bonded: f64,
    #[serde(deserialize_with = "from_u64_string")]
    pub blocks_per_year: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InflationResponse {
    #[serde(deserialize_with = "from_f64_string")]
    pub inflation: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnualProvisionsResponse {
    #[serde(deserialize_with = "from_f64_string")]
    pub annual_provisions: f64,
}

// Governance

#[derive(Debug, Clone, Deserialize)]
pub struct ProposalsResponse {
    pub proposals: Vec<Proposal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Proposal {
    #[serde(deserialize_with = "from_u64_string")]
    pub id: u64,
    pub status: String,
    #[serde(default)]
    pub title: String,
    pub voting_end_time: Option<DateTime<Utc>>,
}

// Upgrade

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentPlanResponse {
    pub plan: Option<Plan>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    pub name: String,
    #[serde(deserialize_with = "from_u64_string")]
    pub height: u64,
    #[serde(default)]
    pub info: String,
}

// Pryzm oracle

#[derive(Debug, Clone, Deserialize)]
pub struct OracleParamsResponse {
    pub params: OracleParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OracleParams {
    #[serde(deserialize_with = "from_u64_string")]
    pub vote_period: u64,
    #[serde(deserialize_with = "from_f64_string")]
    pub slash_fraction: f64,
    #[serde(deserialize_with = "from_u64_string")]
    pub slash_window: u64,
    #[serde(deserialize_with = "from_f64_string")]
    pub min_valid_per_window: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MissCounterResponse {
    #[serde(deserialize_with = "from_u64_string")]
    pub miss_counter: u64,
}
