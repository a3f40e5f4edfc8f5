//! Single source of truth for broker credential resolution.
//!
//! Config YAML stores only **env var NAMES**; the broker API key/secret
//! values themselves never enter the hashed/logged config surface. `Debug`
//! redacts values; error messages name the env var, never its value.

use anyhow::{bail, Result};
use serde_json::Value;

#[derive(Clone)]
pub struct ResolvedBrokerSecrets {
    pub api_key: String,
    pub api_secret: String,
    pub access_token: Option<String>,
}

impl std::fmt::Debug for ResolvedBrokerSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedBrokerSecrets")
            .field("api_key", &"<REDACTED>")
            .field("api_secret", &"<REDACTED>")
            .field("access_token", &self.access_token.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

fn read_str_at(config: &Value, pointer: &str) -> Option<String> {
    let s = config.pointer(pointer)?.as_str()?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Resolve broker credentials named by the config, erroring with the env
/// var NAME (never the value) on the first missing required variable.
pub fn resolve_broker_secrets(config_json: &Value) -> Result<ResolvedBrokerSecrets> {
    let api_key_var = read_str_at(config_json, "/broker/keys_env/api_key")
        .unwrap_or_else(|| "SODME_BROKER_API_KEY".to_string());
    let api_secret_var = read_str_at(config_json, "/broker/keys_env/api_secret")
        .unwrap_or_else(|| "SODME_BROKER_API_SECRET".to_string());
    let access_token_var = read_str_at(config_json, "/broker/keys_env/access_token")
        .unwrap_or_else(|| "SODME_BROKER_ACCESS_TOKEN".to_string());

    let api_key = resolve_env(&api_key_var)
        .ok_or_else(|| anyhow::anyhow!("required env var '{api_key_var}' not set or empty"))?;
    let api_secret = resolve_env(&api_secret_var).ok_or_else(|| {
        anyhow::anyhow!("required env var '{api_secret_var}' not set or empty")
    })?;
    let access_token = resolve_env(&access_token_var);

    if api_key.is_empty() || api_secret.is_empty() {
        bail!("broker credentials resolved but empty");
    }

    Ok(ResolvedBrokerSecrets {
        api_key,
        api_secret,
        access_token,
    })
}
