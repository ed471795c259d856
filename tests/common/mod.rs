//! Shared utilities for integration tests: a mock LCD and scrape helpers.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use cosmos_exporter::config::{load_config_from, ServiceConfig};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const WALLET: &str = "cosmos1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5lzv7xu";
pub const VALOPER: &str = "cosmosvaloper1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc56kct20";
pub const VALCONS: &str = "cosmosvalcons1vvxu62txcsekdygj23ythvjmfl6p9fyuyk54c2";
pub const CONSENSUS_KEY: &str = "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8=";
/// A second validator whose delegations come without a pagination total.
pub const OTHER_VALOPER: &str = "cosmosvaloper1z5tpwxqergd3c8g7ruszzg3rysjjvfegdnv9ze";
pub const OTHER_WALLET: &str = "cosmos1z5tpwxqergd3c8g7ruszzg3rysjjvfegg8csw2";
pub const PRYZM_VALOPER: &str = "pryzmvaloper1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5e8chh5";

fn validator_json(operator_address: &str) -> Value {
    json!({
        "operator_address": operator_address,
        "consensus_pubkey": {"@type": "/cosmos.crypto.ed25519.PubKey", "key": CONSENSUS_KEY},
        "jailed": false,
        "status": "BOND_STATUS_BONDED",
        "tokens": "5000000000",
        "delegator_shares": "5000000000.000000000000000000",
        "description": {"moniker": "alpha", "identity": "", "website": ""},
        "commission": {"commission_rates": {
            "rate": "0.050000000000000000",
            "max_rate": "0.200000000000000000",
            "max_change_rate": "0.010000000000000000"
        }},
        "min_self_delegation": "1"
    })
}

fn delegation_json(delegator: &str, validator: &str, amount: &str) -> Value {
    json!({
        "delegation": {
            "delegator_address": delegator,
            "validator_address": validator,
            "shares": format!("{amount}.000000000000000000")
        },
        "balance": {"denom": "uatom", "amount": amount}
    })
}

fn unbonding_json(delegator: &str, validator: &str, balances: &[&str]) -> Value {
    let entries: Vec<Value> = balances
        .iter()
        .map(|balance| {
            json!({
                "creation_height": "900",
                "completion_time": "2024-01-22T00:00:00Z",
                "initial_balance": balance,
                "balance": balance
            })
        })
        .collect();
    json!({
        "delegator_address": delegator,
        "validator_address": validator,
        "entries": entries
    })
}

fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"code": 5, "message": "not found", "details": []})),
    )
}

/// Router answering the LCD routes the exporter queries, for one account and one validator.
pub fn mock_lcd() -> Router {
    Router::new()
        .route(
            "/cosmos/base/tendermint/v1beta1/node_info",
            get(|| async {
                Json(json!({"default_node_info": {
                    "network": "testchain-1",
                    "moniker": "mock",
                    "version": "0.47.5"
                }}))
            }),
        )
        .route(
            "/cosmos/base/tendermint/v1beta1/blocks/latest",
            get(|| async {
                Json(json!({"block": {"header": {
                    "chain_id": "testchain-1",
                    "height": "1000",
                    "time": "2024-01-01T00:10:00Z"
                }}}))
            }),
        )
        .route(
            "/cosmos/staking/v1beta1/params",
            get(|| async {
                Json(json!({"params": {
                    "unbonding_time": "1814400s",
                    "max_validators": 100,
                    "max_entries": 7,
                    "historical_entries": 10000,
                    "bond_denom": "uatom"
                }}))
            }),
        )
        .route(
            "/cosmos/bank/v1beta1/denoms_metadata/uatom",
            get(|| async {
                Json(json!({"metadata": {
                    "base": "uatom",
                    "display": "atom",
                    "denom_units": [
                        {"denom": "uatom", "exponent": 0},
                        {"denom": "atom", "exponent": 6}
                    ]
                }}))
            }),
        )
        .route(
            "/cosmos/bank/v1beta1/balances/{address}",
            get(|Path(address): Path<String>| async move {
                if address != WALLET {
                    return not_found().into_response();
                }
                Json(json!({
                    "balances": [
                        {"denom": "ibc/ABC", "amount": "7"},
                        {"denom": "uatom", "amount": "2500000"}
                    ],
                    "pagination": {"next_key": null, "total": "2"}
                }))
                .into_response()
            }),
        )
        .route(
            "/cosmos/staking/v1beta1/delegations/{address}",
            get(|| async {
                Json(json!({
                    "delegation_responses": [{
                        "delegation": {
                            "delegator_address": WALLET,
                            "validator_address": VALOPER,
                            "shares": "1000000.000000000000000000"
                        },
                        "balance": {"denom": "uatom", "amount": "1000000"}
                    }],
                    "pagination": {"next_key": null, "total": "1"}
                }))
            }),
        )
        .route(
            "/cosmos/staking/v1beta1/validators",
            get(|| async {
                Json(json!({
                    "validators": [validator_json(VALOPER)],
                    "pagination": {"next_key": null, "total": "1"}
                }))
            }),
        )
        .route(
            "/cosmos/staking/v1beta1/validators/{valoper}",
            get(|Path(valoper): Path<String>| async move {
                if valoper != VALOPER {
                    return not_found().into_response();
                }
                Json(json!({"validator": validator_json(VALOPER)})).into_response()
            }),
        )
        .route(
            "/cosmos/staking/v1beta1/validators/{valoper}/delegations",
            get(|Path(valoper): Path<String>| async move {
                match valoper.as_str() {
                    VALOPER => Json(json!({
                        "delegation_responses": [
                            delegation_json(WALLET, VALOPER, "1000000"),
                            delegation_json(OTHER_WALLET, VALOPER, "3000000")
                        ],
                        // Only the first page was returned.
                        "pagination": {"next_key": "AAAA", "total": "5"}
                    }))
                    .into_response(),
                    OTHER_VALOPER => Json(json!({
                        "delegation_responses": [
                            delegation_json(WALLET, OTHER_VALOPER, "2000000")
                        ],
                        "pagination": null
                    }))
                    .into_response(),
                    _ => not_found().into_response(),
                }
            }),
        )
        .route(
            "/cosmos/staking/v1beta1/validators/{valoper}/unbonding_delegations",
            get(|Path(valoper): Path<String>| async move {
                if valoper != VALOPER {
                    return Json(json!({"unbonding_responses": []})).into_response();
                }
                Json(json!({
                    "unbonding_responses": [
                        unbonding_json(WALLET, VALOPER, &["500000"]),
                        unbonding_json(WALLET, VALOPER, &["250000", "250000"]),
                        unbonding_json(OTHER_WALLET, VALOPER, &["2000000"])
                    ],
                    "pagination": {"next_key": null, "total": "3"}
                }))
                .into_response()
            }),
        )
        .route(
            "/cosmos/staking/v1beta1/pool",
            get(|| async {
                Json(json!({"pool": {
                    "not_bonded_tokens": "2000000",
                    "bonded_tokens": "150000000"
                }}))
            }),
        )
        .route(
            "/cosmos/bank/v1beta1/supply/by_denom",
            get(|| async { Json(json!({"amount": {"denom": "uatom", "amount": "300000000"}})) }),
        )
        .route(
            "/cosmos/distribution/v1beta1/community_pool",
            get(|| async {
                Json(json!({"pool": [
                    {"denom": "uatom", "amount": "5000000.000000000000000000"},
                    {"denom": "ibc/ABC", "amount": "9.000000000000000000"}
                ]}))
            }),
        )
        .route(
            "/cosmos/gov/v1/proposals",
            get(|| async {
                Json(json!({
                    "proposals": [
                        {
                            "id": "41",
                            "status": "PROPOSAL_STATUS_VOTING_PERIOD",
                            "title": "Raise the community tax",
                            "voting_end_time": "2024-01-02T00:00:00Z"
                        },
                        {
                            "id": "42",
                            "status": "PROPOSAL_STATUS_VOTING_PERIOD",
                            "title": "Software upgrade",
                            "voting_end_time": null
                        }
                    ],
                    "pagination": {"next_key": null, "total": "2"}
                }))
            }),
        )
        .route(
            "/cosmos/slashing/v1beta1/signing_infos/{address}",
            get(|Path(address): Path<String>| async move {
                Json(json!({"val_signing_info": {
                    "address": address,
                    "tombstoned": false,
                    "missed_blocks_counter": "12"
                }}))
            }),
        )
        .route(
            "/cosmos/upgrade/v1beta1/current_plan",
            get(|| async { Json(json!({"plan": null})) }),
        )
        .route(
            "/pryzm/oracle/v1/params",
            get(|| async {
                Json(json!({"params": {
                    "vote_period": "10",
                    "slash_fraction": "0.001",
                    "slash_window": "100800",
                    "min_valid_per_window": "0.05"
                }}))
            }),
        )
        .route(
            "/pryzm/oracle/v1/miss_counter/{valoper}",
            get(|| async { Json(json!({"miss_counter": "3"})) }),
        )
        .fallback(|| async { not_found() })
}

/// Serve `router` on an ephemeral local port.
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Start the mock LCD and return its base URL.
pub async fn start_mock_lcd() -> String {
    format!("http://{}", spawn(mock_lcd()).await)
}

/// Config pointing at `lcd` with extra flags appended.
pub fn config_for(lcd: &str, extra: &[&str]) -> ServiceConfig {
    let mut args = vec![
        "cosmos-exporter".to_string(),
        format!("--lcd={lcd}"),
        "--timeout=2".to_string(),
    ];
    args.extend(extra.iter().map(|arg| arg.to_string()));
    load_config_from(args).unwrap()
}

/// Value of the first sample of `name` whose label set contains every fragment.
pub fn sample(body: &str, name: &str, fragments: &[&str]) -> Option<f64> {
    body.lines()
        .filter(|line| !line.starts_with('#'))
        .filter(|line| line.starts_with(&format!("{name}{{")) || line.starts_with(&format!("{name} ")))
        .find(|line| fragments.iter().all(|fragment| line.contains(fragment)))
        .and_then(|line| line.rsplit(' ').next())
        .and_then(|value| value.parse().ok())
}
