pub mod broker;
pub mod paper;

/// Exit-code contract (spec'd alongside the REST error-kind taxonomy):
/// 0 ok, 2 config error, 3 broker unavailable, 4 DB unavailable.
#[derive(Debug)]
pub enum CliError {
    Config(anyhow::Error),
    BrokerUnavailable(anyhow::Error),
    DbUnavailable(anyhow::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 2,
            CliError::BrokerUnavailable(_) => 3,
            CliError::DbUnavailable(_) => 4,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "config error: {e}"),
            CliError::BrokerUnavailable(e) => write!(f, "broker unavailable: {e}"),
            CliError::DbUnavailable(e) => write!(f, "db unavailable: {e}"),
        }
    }
}

impl std::error::Error for CliError {}
