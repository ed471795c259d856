//! LCD REST client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the node's LCD endpoint
//! - Query bank, staking, distribution, slashing, mint, gov and upgrade state
//! - Map transport, status and decoding failures to `LcdError`

use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use url::Url;

use crate::lcd::types::*;

/// Pryzm oracle module routes.
const PRYZM_ORACLE_PARAMS: &str = "/pryzm/oracle/v1/params";
const PRYZM_ORACLE_MISS_COUNTER: &str = "/pryzm/oracle/v1/miss_counter";

/// Typed client for a Cosmos-SDK LCD endpoint.
#[derive(Clone)]
pub struct LcdClient {
    http: reqwest::Client,
    base: Url,
    timeout: Duration,
    limit: u64,
}

impl LcdClient {
    /// Create a new LCD client. No request is made.
    pub fn new(endpoint: &str, timeout: Duration, limit: u64) -> LcdResult<Self> {
        let base: Url = endpoint.parse().map_err(|e: url::ParseError| LcdError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(LcdError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: format!("unsupported scheme '{}'", base.scheme()),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LcdError::Client)?;

        Ok(Self {
            http,
            base,
            timeout,
            limit,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> LcdResult<Url> {
        let joined = format!("{}{}", self.base.as_str().trim_end_matches('/'), path);
        joined.parse().map_err(|e: url::ParseError| LcdError::InvalidEndpoint {
            endpoint: joined.clone(),
            reason: e.to_string(),
        })
    }

    fn pagination(&self) -> Vec<(&'static str, String)> {
        vec![("pagination.limit", self.limit.to_string())]
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> LcdResult<T> {
        let url = self.url(path)?;
        let start = Instant::now();

        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| {
                if source.is_timeout() {
                    LcdError::Timeout {
                        path: path.to_string(),
                        secs: self.timeout.as_secs(),
                    }
                } else {
                    LcdError::Request {
                        path: path.to_string(),
                        source,
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<LcdErrorBody>()
                .await
                .map(|body| body.message)
                .unwrap_or_default();
            return Err(LcdError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<T>().await.map_err(|e| LcdError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!(
            path = %path,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "LCD query finished"
        );

        Ok(body)
    }

    // Node

    pub async fn node_info(&self) -> LcdResult<NodeInfoResponse> {
        self.get("/cosmos/base/tendermint/v1beta1/node_info", &[]).await
    }

    pub async fn latest_block(&self) -> LcdResult<Block> {
        let response: BlockResponse = self.get("/cosmos/base/tendermint/v1beta1/blocks/latest", &[]).await?;
        Ok(response.block)
    }

    pub async fn block_at(&self, height: u64) -> LcdResult<Block> {
        let path = format!("/cosmos/base/tendermint/v1beta1/blocks/{height}");
        let response: BlockResponse = self.get(&path, &[]).await?;
        Ok(response.block)
    }

    // Bank

    pub async fn balances(&self, address: &str) -> LcdResult<Vec<Coin>> {
        let path = format!("/cosmos/bank/v1beta1/balances/{address}");
        let response: BalancesResponse = self.get(&path, &self.pagination()).await?;
        Ok(response.balances)
    }

    pub async fn supply_of(&self, denom: &str) -> LcdResult<Coin> {
        let query = [("denom", denom.to_string())];
        let response: SupplyOfResponse = self.get("/cosmos/bank/v1beta1/supply/by_denom", &query).await?;
        Ok(response.amount)
    }

    pub async fn denom_metadata(&self, denom: &str) -> LcdResult<DenomMetadata> {
        let path = format!("/cosmos/bank/v1beta1/denoms_metadata/{denom}");
        let response: DenomMetadataResponse = self.get(&path, &[]).await?;
        Ok(response.metadata)
    }

    // Staking

    pub async fn validator(&self, valoper: &str) -> LcdResult<Validator> {
        let path = format!("/cosmos/staking/v1beta1/validators/{valoper}");
        let response: ValidatorResponse = self.get(&path, &[]).await?;
        Ok(response.validator)
    }

    pub async fn validators(&self) -> LcdResult<Vec<Validator>> {
        let response: ValidatorsResponse =
            self.get("/cosmos/staking/v1beta1/validators", &self.pagination()).await?;
        Ok(response.validators)
    }

    pub async fn delegations(&self, delegator: &str) -> LcdResult<Vec<DelegationResponse>> {
        let path = format!("/cosmos/staking/v1beta1/delegations/{delegator}");
        let response: DelegationsResponse = self.get(&path, &self.pagination()).await?;
        Ok(response.delegation_responses)
    }

    /// Delegations to a validator, with the total count when the LCD reports it.
    pub async fn validator_delegations(
        &self,
        valoper: &str,
    ) -> LcdResult<(Vec<DelegationResponse>, Option<u64>)> {
        let path = format!("/cosmos/staking/v1beta1/validators/{valoper}/delegations");
        let mut query = self.pagination();
        query.push(("pagination.count_total", "true".to_string()));

        let response: DelegationsResponse = self.get(&path, &query).await?;
        let total = response.pagination.as_ref().and_then(PageResponse::total);
        Ok((response.delegation_responses, total))
    }

    pub async fn delegation(&self, valoper: &str, delegator: &str) -> LcdResult<DelegationResponse> {
        let path = format!("/cosmos/staking/v1beta1/validators/{valoper}/delegations/{delegator}");
        let response: SingleDelegationResponse = self.get(&path, &[]).await?;
        Ok(response.delegation_response)
    }

    pub async fn unbonding_delegations(&self, delegator: &str) -> LcdResult<Vec<UnbondingDelegation>> {
        let path = format!("/cosmos/staking/v1beta1/delegators/{delegator}/unbonding_delegations");
        let response: UnbondingDelegationsResponse = self.get(&path, &self.pagination()).await?;
        Ok(response.unbonding_responses)
    }

    pub async fn validator_unbonding_delegations(
        &self,
        valoper: &str,
    ) -> LcdResult<Vec<UnbondingDelegation>> {
        let path = format!("/cosmos/staking/v1beta1/validators/{valoper}/unbonding_delegations");
        let response: UnbondingDelegationsResponse = self.get(&path, &self.pagination()).await?;
        Ok(response.unbonding_responses)
    }

    pub async fn redelegations(&self, delegator: &str) -> LcdResult<Vec<RedelegationResponse>> {
        let path = format!("/cosmos/staking/v1beta1/delegators/{delegator}/redelegations");
        let response: RedelegationsResponse = self.get(&path, &self.pagination()).await?;
        Ok(response.redelegation_responses)
    }

    pub async fn staking_params(&self) -> LcdResult<StakingParams> {
        let response: StakingParamsResponse = self.get("/cosmos/staking/v1beta1/params", &[]).await?;
        Ok(response.params)
    }

    pub async fn staking_pool(&self) -> LcdResult<StakingPool> {
        let response: StakingPoolResponse = self.get("/cosmos/staking/v1beta1/pool", &[]).await?;
        Ok(response.pool)
    }

    // Distribution

    pub async fn delegator_rewards(&self, delegator: &str) -> LcdResult<Vec<DelegatorReward>> {
        let path = format!("/cosmos/distribution/v1beta1/delegators/{delegator}/rewards");
        let response: DelegatorRewardsResponse = self.get(&path, &[]).await?;
        Ok(response.rewards)
    }

    pub async fn validator_commission(&self, valoper: &str) -> LcdResult<Vec<Coin>> {
        let path = format!("/cosmos/distribution/v1beta1/validators/{valoper}/commission");
        let response: ValidatorCommissionResponse = self.get(&path, &[]).await?;
        Ok(response.commission.commission)
    }

    pub async fn validator_outstanding_rewards(&self, valoper: &str) -> LcdResult<Vec<Coin>> {
        let path = format!("/cosmos/distribution/v1beta1/validators/{valoper}/outstanding_rewards");
        let response: OutstandingRewardsResponse = self.get(&path, &[]).await?;
        Ok(response.rewards.rewards)
    }

    pub async fn community_pool(&self) -> LcdResult<Vec<Coin>> {
        let response: CommunityPoolResponse =
            self.get("/cosmos/distribution/v1beta1/community_pool", &[]).await?;
        Ok(response.pool)
    }

    pub async fn distribution_params(&self) -> LcdResult<DistributionParams> {
        let response: DistributionParamsResponse =
            self.get("/cosmos/distribution/v1beta1/params", &[]).await?;
        Ok(response.params)
    }

    // Slashing

    pub async fn signing_info(&self, consensus_address: &str) -> LcdResult<SigningInfo> {
        let path = format!("/cosmos/slashing/v1beta1/signing_infos/{consensus_address}");
        let response: SigningInfoResponse = self.get(&path, &[]).await?;
        Ok(response.val_signing_info)
    }

    pub async fn signing_infos(&self) -> LcdResult<Vec<SigningInfo>> {
        let response: SigningInfosResponse =
            self.get("/cosmos/slashing/v1beta1/signing_infos", &self.pagination()).await?;
        Ok(response.info)
    }

    pub async fn slashing_params(&self) -> LcdResult<SlashingParams> {
        let response: SlashingParamsResponse = self.get("/cosmos/slashing/v1beta1/params", &[]).await?;
        Ok(response.params)
    }

    // Mint

    pub async fn mint_params(&self) -> LcdResult<MintParams> {
        let response: MintParamsResponse = self.get("/cosmos/mint/v1beta1/params", &[]).await?;
        Ok(response.params)
    }

    pub async fn inflation(&self) -> LcdResult<f64> {
        let response: InflationResponse = self.get("/cosmos/mint/v1beta1/inflation", &[]).await?;
        Ok(response.inflation)
    }

    pub async fn annual_provisions(&self) -> LcdResult<f64> {
        let response: AnnualProvisionsResponse =
            self.get("/cosmos/mint/v1beta1/annual_provisions", &[]).await?;
        Ok(response.annual_provisions)
    }

    // Governance

    pub async fn voting_proposals(&self) -> LcdResult<Vec<Proposal>> {
        let mut query = self.pagination();
        query.push(("proposal_status", "PROPOSAL_STATUS_VOTING_PERIOD".to_string()));
        let response: ProposalsResponse = self.get("/cosmos/gov/v1/proposals", &query).await?;
        Ok(response.proposals)
    }

    // Upgrade

    pub async fn current_plan(&self) -> LcdResult<Option<Plan>> {
        let response: CurrentPlanResponse = self.get("/cosmos/upgrade/v1beta1/current_plan", &[]).await?;
        Ok(response.plan)
    }

    // Pryzm oracle

    pub async fn oracle_params(&self) -> LcdResult<OracleParams> {
        let response: OracleParamsResponse = self.get(PRYZM_ORACLE_PARAMS, &[]).await?;
        Ok(response.params)
    }

    pub async fn oracle_miss_counter(&self, valoper: &str) -> LcdResult<u64> {
        let path = format!("{PRYZM_ORACLE_MISS_COUNTER}/{valoper}");
        let response: MissCounterResponse = self.get(&path, &[]).await?;
        Ok(response.miss_counter)
    }
}

impl std::fmt::Debug for LcdClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LcdClient")
            .field("endpoint", &self.base.as_str())
            .field("timeout_secs", &self.timeout.as_secs())
            .field("limit", &self.limit)
            .finish()
    }
}
