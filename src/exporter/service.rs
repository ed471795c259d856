//! The exporter service: LCD connection plus resolved chain settings.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::address::AddressCodec;
use crate::config::ServiceConfig;
use crate::lcd::types::{Coin, NodeInfoResponse};
use crate::lcd::{LcdClient, LcdResult};

/// The staking token and how to scale its base-denom amounts.
#[derive(Debug, Clone, PartialEq)]
pub struct Denom {
    pub base: String,
    pub display: String,
    pub coefficient: f64,
}

impl Denom {
    pub fn new(base: impl Into<String>, display: impl Into<String>, coefficient: f64) -> Self {
        // A zero or negative coefficient would make every amount meaningless.
        let coefficient = if coefficient > 0.0 { coefficient } else { 1.0 };
        Self {
            base: base.into(),
            display: display.into(),
            coefficient,
        }
    }

    /// Label and value for a coin: base-denom amounts are scaled, others reported raw.
    pub fn scale<'a>(&'a self, coin: &'a Coin) -> (&'a str, f64) {
        if coin.denom == self.base {
            (&self.display, coin.amount / self.coefficient)
        } else {
            (&coin.denom, coin.amount)
        }
    }

    /// Scale a bare base-denom amount such as validator tokens.
    pub fn scale_amount(&self, amount: f64) -> f64 {
        amount / self.coefficient
    }
}

/// Metric categories selected in the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categories {
    pub wallets: Vec<String>,
    pub validators: Vec<String>,
    pub proposals: bool,
    pub params: bool,
    pub upgrades: bool,
    pub oracle: bool,
}

impl Categories {
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            wallets: config.wallets.clone(),
            validators: config.validators.clone(),
            proposals: config.proposals,
            params: config.params,
            upgrades: config.upgrades,
            oracle: config.oracle,
        }
    }
}

/// Long-lived exporter state shared by every scrape handler.
#[derive(Debug)]
pub struct Service {
    pub(crate) lcd: LcdClient,
    pub(crate) codec: Arc<AddressCodec>,
    pub(crate) config: Arc<ServiceConfig>,
    pub(crate) chain_id: String,
    pub(crate) denom: Denom,
    pub categories: Categories,
}

impl Service {
    /// Build the service without touching the network.
    pub fn new(config: Arc<ServiceConfig>, codec: Arc<AddressCodec>) -> LcdResult<Self> {
        let lcd = LcdClient::new(
            &config.lcd,
            Duration::from_secs(config.timeout_secs),
            config.limit,
        )?;

        let base = config.denom.clone();
        let denom = Denom::new(base.clone(), base, config.effective_denom_coefficient());

        Ok(Self {
            lcd,
            codec,
            chain_id: config.chain_id.clone(),
            denom,
            categories: Categories::from_config(&config),
            config,
        })
    }

    /// Build the service and verify the LCD answers.
    pub async fn connect(config: Arc<ServiceConfig>, codec: Arc<AddressCodec>) -> LcdResult<Self> {
        let mut service = Self::new(config, codec)?;
        let node_info = service.lcd.node_info().await?;

        tracing::info!(
            lcd = %service.lcd.endpoint(),
            network = %node_info.default_node_info.network,
            node_version = %node_info.default_node_info.version,
            "Connected to LCD"
        );

        service.set_chain_id(&node_info);
        service.set_denom().await;
        Ok(service)
    }

    /// Use the configured chain ID, or the node's network when none is set.
    pub fn set_chain_id(&mut self, node_info: &NodeInfoResponse) {
        if self.chain_id.is_empty() {
            self.chain_id = node_info.default_node_info.network.clone();
        }
        tracing::info!(chain_id = %self.chain_id, "Chain ID resolved");
    }

    /// Resolve the staking denom from the chain unless one was configured.
    pub async fn set_denom(&mut self) {
        if !self.config.denom.is_empty() {
            tracing::info!(
                denom = %self.denom.base,
                coefficient = self.denom.coefficient,
                "Using configured denom"
            );
            return;
        }

        let bond_denom = match self.lcd.staking_params().await {
            Ok(params) => params.bond_denom,
            Err(e) => {
                tracing::warn!(error = %e, "Could not get staking params, amounts stay unscaled");
                return;
            }
        };

        self.denom = match self.lcd.denom_metadata(&bond_denom).await {
            Ok(metadata) => {
                let exponent = metadata.display_exponent();
                Denom::new(bond_denom, metadata.display, 10f64.powi(exponent as i32))
            }
            Err(e) => {
                tracing::warn!(error = %e, denom = %bond_denom, "Could not get denom metadata");
                Denom::new(bond_denom.clone(), bond_denom, 1.0)
            }
        };

        tracing::info!(
            denom = %self.denom.base,
            display_denom = %self.denom.display,
            coefficient = self.denom.coefficient,
            "Denom resolved"
        );
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn denom(&self) -> &Denom {
        &self.denom
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn codec(&self) -> &AddressCodec {
        &self.codec
    }

    /// Whether the chain gets the pryzm-specific endpoint.
    pub fn is_pryzm(&self) -> bool {
        self.config.prefix == "pryzm"
    }

    /// Release the LCD connection pool.
    pub fn close(self) {
        tracing::info!(lcd = %self.lcd.endpoint(), "Service client closed");
    }
}

/// `?address=` query parameter shared by several handlers.
#[derive(Debug, Deserialize)]
pub struct AddressQuery {
    pub address: Option<String>,
}

impl AddressQuery {
    pub fn require(&self) -> Result<&str, Response> {
        match self.address.as_deref().map(str::trim) {
            Some(address) if !address.is_empty() => Ok(address),
            _ => Err(bad_request("address query parameter is required")),
        }
    }
}

pub(crate) fn bad_request(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, message.into()).into_response()
}

/// Log a failed LCD query and drop it from the scrape.
pub(crate) fn log_failure<T>(result: LcdResult<T>, query: &'static str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!(error = %e, query, "LCD query failed");
            None
        }
    }
}
