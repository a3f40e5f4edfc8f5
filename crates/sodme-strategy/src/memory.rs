use std::collections::{BTreeSet, HashMap};

use sodme_schemas::{Strategy, StrategySettings, StrategyStatus};
use uuid::Uuid;

use crate::error::StrategyError;
use crate::store::StrategyStore;
use crate::transitions::is_valid_transition;

struct Record {
    strategy: Strategy,
    settings: StrategySettings,
    instruments: BTreeSet<i64>,
}

#[derive(Default)]
pub struct InMemoryStrategyStore {
    records: HashMap<Uuid, Record>,
}

impl InMemoryStrategyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, id: Uuid) -> Result<&Record, StrategyError> {
        self.records.get(&id).ok_or(StrategyError::NotFound(id))
    }

    fn record_mut(&mut self, id: Uuid) -> Result<&mut Record, StrategyError> {
        self.records.get_mut(&id).ok_or(StrategyError::NotFound(id))
    }
}

impl StrategyStore for InMemoryStrategyStore {
    fn create(&mut self, owner_account: &str, settings: StrategySettings) -> Result<Strategy, StrategyError> {
        settings.validate().map_err(StrategyError::ValidationError)?;
        let strategy = Strategy {
            id: Uuid::new_v4(),
            owner_account: owner_account.to_string(),
            status: StrategyStatus::Draft,
            is_default: false,
        };
        self.records.insert(
            strategy.id,
            Record { strategy: strategy.clone(), settings, instruments: BTreeSet::new() },
        );
        Ok(strategy)
    }

    fn get(&self, id: Uuid) -> Option<Strategy> {
        self.records.get(&id).map(|r| r.strategy.clone())
    }

    fn settings(&self, id: Uuid) -> Option<StrategySettings> {
        self.records.get(&id).map(|r| r.settings.clone())
    }

    fn list_by_account(&self, owner_account: &str) -> Vec<Strategy> {
        let mut out: Vec<Strategy> = self
            .records
            .values()
            .filter(|r| r.strategy.owner_account == owner_account)
            .map(|r| r.strategy.clone())
            .collect();
        out.sort_by_key(|s| s.id);
        out
    }

    fn update_settings(&mut self, id: Uuid, settings: StrategySettings) -> Result<(), StrategyError> {
        settings.validate().map_err(StrategyError::ValidationError)?;
        let record = self.record_mut(id)?;
        record.settings = settings;
        Ok(())
    }

    fn set_status(&mut self, id: Uuid, status: StrategyStatus) -> Result<(), StrategyError> {
        let record = self.record_mut(id)?;
        let from = record.strategy.status;
        if !is_valid_transition(from, status) {
            return Err(StrategyError::InvalidStatusTransition { id, from, to: status });
        }
        record.strategy.status = status;
        Ok(())
    }

    fn set_default(&mut self, id: Uuid) -> Result<(), StrategyError> {
        let owner_account = self.record(id)?.strategy.owner_account.clone();
        for record in self.records.values_mut() {
            if record.strategy.owner_account == owner_account {
                record.strategy.is_default = record.strategy.id == id;
            }
        }
        Ok(())
    }

    fn add_instrument(&mut self, id: Uuid, instrument_token: i64) -> Result<(), StrategyError> {
        self.record_mut(id)?.instruments.insert(instrument_token);
        Ok(())
    }

    fn remove_instrument(&mut self, id: Uuid, instrument_token: i64) -> Result<(), StrategyError> {
        self.record_mut(id)?.instruments.remove(&instrument_token);
        Ok(())
    }

    fn instruments(&self, id: Uuid) -> Result<Vec<i64>, StrategyError> {
        Ok(self.record(id)?.instruments.iter().copied().collect())
    }
}
