//! Typed settings surface layered on top of [`crate::loader::load_layered_yaml`].
//!
//! The loader itself is generic YAML-merge-and-hash glue; this module is
//! where SODME's actual config shape lives — the enumerated
//! `StrategySettings` defaults, rate-limit budgets, and the env-var
//! *pointers* `secrets::resolve_broker_secrets` reads (never the secret
//! values themselves, which stay out of this struct and out of the hashed
//! config surface entirely).

use serde::Deserialize;

use sodme_schemas::strategy::StrategySettings;

use crate::loader::LoadedConfig;

/// Top-level config shape. `deny_unknown_fields` at every level rejects
/// typos and stray keys at load time instead of silently ignoring them.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SodmeConfig {
    pub strategy_defaults: StrategySettings,
    pub rate_limits: RateLimitConfig,
    pub broker: BrokerConfig,
}

impl Default for SodmeConfig {
    fn default() -> Self {
        Self {
            strategy_defaults: StrategySettings::sane_defaults(),
            rate_limits: RateLimitConfig::default(),
            broker: BrokerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RateLimitConfig {
    pub orders_per_sec: f64,
    pub margin_calc_per_sec: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // Mirrors sodme-gateway::{DEFAULT_ORDERS_PER_SEC, DEFAULT_MARGIN_CALC_PER_SEC}.
        Self { orders_per_sec: 10.0, margin_calc_per_sec: 0.2 }
    }
}

/// Env var *names*, not values — `secrets::resolve_broker_secrets` reads
/// these same JSON pointers directly off the canonical config, so this
/// struct exists only to make the shape `deny_unknown_fields`-checkable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BrokerConfig {
    pub keys_env: BrokerKeysEnv,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BrokerKeysEnv {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub access_token: Option<String>,
}

/// Load layered YAML and deserialize it into the typed settings surface in
/// one step. Fails on the same IO/parse errors as `load_layered_yaml`, plus
/// on any key `SodmeConfig` doesn't recognize.
pub fn load_typed_config(paths: &[&str]) -> anyhow::Result<(SodmeConfig, LoadedConfig)> {
    let loaded = crate::loader::load_layered_yaml(paths)?;
    let typed: SodmeConfig = serde_json::from_value(loaded.config_json.clone())?;
    Ok((typed, loaded))
}
