#[derive(Debug, thiserror::Error)]
pub enum AlertsError {
    #[error("persistence failed: {0}")]
    PersistenceError(String),
}
