use sodme_schemas::Alert;

/// Persists every published alert regardless of subscriber fan-out. An
/// external collaborator — `sodme-db` owns the concrete implementation;
/// the bus only depends on this trait, the same separation
/// `sodme-margin::NseMarginCache` and `sodme-housekeeping::OrderCanceller`
/// use for their own external stores.
pub trait AlertStore {
    fn persist(&self, alert: &Alert) -> Result<(), String>;
}

/// In-memory store used by tests and by any caller that does not yet have
/// a database wired up.
#[derive(Default)]
pub struct InMemoryAlertStore {
    alerts: std::sync::Mutex<Vec<Alert>>,
}

impl AlertStore for InMemoryAlertStore {
    fn persist(&self, alert: &Alert) -> Result<(), String> {
        self.alerts.lock().map_err(|e| e.to_string())?.push(alert.clone());
        Ok(())
    }
}

impl InMemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<Alert> {
        self.alerts.lock().expect("lock poisoned").clone()
    }
}
