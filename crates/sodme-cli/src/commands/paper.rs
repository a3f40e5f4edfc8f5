//! `sodme paper seed` — print a fresh paper broker's funds snapshot.

use sodme_broker_paper::PaperBroker;
use sodme_gateway::{BrokerAdapter, Funds};
use sodme_schemas::Paise;

use super::CliError;

pub fn seed(available_margin_rupees: i64) -> Result<(), CliError> {
    if available_margin_rupees < 0 {
        return Err(CliError::Config(anyhow::anyhow!("available_margin_rupees must be >= 0")));
    }

    let broker = PaperBroker::new(Funds {
        available_margin: Paise::from_rupees(available_margin_rupees),
        used_margin: Paise::ZERO,
    });
    let funds = broker.get_funds().map_err(|e| CliError::Config(anyhow::anyhow!(e)))?;

    println!("available_margin_rupees={}", funds.available_margin.to_f64_rupees());
    println!("used_margin_rupees={}", funds.used_margin.to_f64_rupees());
    Ok(())
}
