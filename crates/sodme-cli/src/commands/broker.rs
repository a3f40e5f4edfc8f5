//! `sodme broker check` — resolve credentials from a layered config and
//! confirm the broker session is reachable.

use sodme_marketdata::{KiteMarketDataAdapter, MarketDataAdapter};

use super::CliError;

pub async fn check(config_paths: &[String], instrument_token: i64) -> Result<(), CliError> {
    let path_refs: Vec<&str> = config_paths.iter().map(|s| s.as_str()).collect();
    let loaded = sodme_config::load_layered_yaml(&path_refs).map_err(CliError::Config)?;

    let secrets = sodme_config::resolve_broker_secrets(&loaded.config_json).map_err(CliError::Config)?;
    let access_token = secrets.access_token.ok_or_else(|| {
        CliError::Config(anyhow::anyhow!(
            "no access token resolved — run the Kite login flow before `broker check`"
        ))
    })?;

    let adapter = KiteMarketDataAdapter::new(access_token);
    let quote = adapter
        .last_trade(instrument_token)
        .await
        .map_err(|e| CliError::BrokerUnavailable(anyhow::anyhow!(e)))?;

    println!("broker_ok=true");
    println!("instrument_token={}", quote.instrument_token);
    println!("last_price={:?}", quote.last_price);
    Ok(())
}
