use sodme_schemas::{Strategy, StrategySettings, StrategyStatus};
use uuid::Uuid;

use crate::error::StrategyError;

/// The Strategy Store contract: identity/settings CRUD, the at-most-one-
/// default-per-account invariant, status transitions and per-strategy
/// instrument membership. `sodme-db` owns the persisted implementation;
/// `InMemoryStrategyStore` here backs tests and standalone runs.
pub trait StrategyStore {
    fn create(&mut self, owner_account: &str, settings: StrategySettings) -> Result<Strategy, StrategyError>;
    fn get(&self, id: Uuid) -> Option<Strategy>;
    fn settings(&self, id: Uuid) -> Option<StrategySettings>;
    fn list_by_account(&self, owner_account: &str) -> Vec<Strategy>;

    /// Replaces a strategy's settings wholesale after `StrategySettings::validate`
    /// passes. Unknown keys never reach this layer — they are rejected by
    /// `#[serde(deny_unknown_fields)]` at the wire boundary.
    fn update_settings(&mut self, id: Uuid, settings: StrategySettings) -> Result<(), StrategyError>;

    fn set_status(&mut self, id: Uuid, status: StrategyStatus) -> Result<(), StrategyError>;

    /// Marks `id` as the default for its owner account, clearing the
    /// default flag on every other strategy owned by the same account in
    /// the same transaction.
    fn set_default(&mut self, id: Uuid) -> Result<(), StrategyError>;

    fn add_instrument(&mut self, id: Uuid, instrument_token: i64) -> Result<(), StrategyError>;
    fn remove_instrument(&mut self, id: Uuid, instrument_token: i64) -> Result<(), StrategyError>;
    fn instruments(&self, id: Uuid) -> Result<Vec<i64>, StrategyError>;
}
