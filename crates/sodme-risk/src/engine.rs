use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::greeks::{classify_all, worst};
use crate::loss::{evaluate_loss, level_for_loss, LossVerdict};
use crate::types::{NetGreeks, RiskAction, RiskConfig, RiskDecision, RiskLevel, RiskState};
use crate::{greeks::level_for_greek_class, utilization::level_for_utilization};

/// Flattens a strategy's positions via the broker gateway. An external
/// collaborator — the risk monitor only depends on this trait, matching the
/// same gate-before-broker-call separation `sodme-housekeeping::OrderCanceller`
/// follows for cancels.
pub trait StrategyFlattener {
    fn flatten(&mut self, strategy_id: Uuid) -> Result<(), String>;
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RiskEvaluation {
    pub utilization_pct: f64,
    pub loss_pct: f64,
    pub max_loss_pct: f64,
    pub auto_square_off_on_loss: bool,
    pub net_greeks: NetGreeks,
}

fn action_for_level(level: RiskLevel) -> RiskAction {
    match level {
        RiskLevel::L1 => RiskAction::NoAction,
        RiskLevel::L2 => RiskAction::InfoAlert,
        RiskLevel::L3 => RiskAction::WarningAlert,
        RiskLevel::L4 => RiskAction::CriticalAlertStopNewOrders,
        RiskLevel::L5 => RiskAction::UrgentAlertBlockMarginConsumingActions,
        RiskLevel::L6 => RiskAction::EmergencyAlertStartGraceWindow,
    }
}

/// Per-strategy risk level derived from the max of loss, utilization, and
/// Greeks levels, with sticky worsening and hysteresis-gated recovery.
#[derive(Default)]
pub struct RiskEngine {
    states: HashMap<Uuid, RiskState>,
}

impl RiskEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(
        &mut self,
        strategy_id: Uuid,
        input: RiskEvaluation,
        config: &RiskConfig,
        flattener: &mut dyn StrategyFlattener,
        now: DateTime<Utc>,
    ) -> RiskDecision {
        let state = self.states.entry(strategy_id).or_insert_with(RiskState::new);

        let loss_verdict = evaluate_loss(input.loss_pct, input.max_loss_pct, input.auto_square_off_on_loss);
        let loss_level = level_for_loss(loss_verdict);
        let util_level = level_for_utilization(input.utilization_pct);
        let classified = classify_all(input.net_greeks, config.greek_thresholds);
        let worst_greek = worst(classified);
        let greek_level = level_for_greek_class(worst_greek.1);

        let raw_level = loss_level.max(util_level).max(greek_level);
        let applied_level = state.advance(raw_level);

        let mut reasons = vec![format!("level {}", applied_level.as_str())];
        let mut action = action_for_level(applied_level);

        if loss_verdict == LossVerdict::FlattenRequired && !state.flattened {
            match flattener.flatten(strategy_id) {
                Ok(()) => {
                    state.flattened = true;
                    action = RiskAction::AutoSquareOff;
                    reasons.push(format!(
                        "loss {:.2}% breached limit {:.2}%, flattened within target {}s",
                        input.loss_pct, input.max_loss_pct, config.loss_flatten_target_secs
                    ));
                }
                Err(e) => reasons.push(format!("flatten failed: {e}")),
            }
        }

        if applied_level == RiskLevel::L6 {
            let deadline = *state
                .shortfall_deadline
                .get_or_insert_with(|| now + Duration::minutes(config.shortfall_grace_minutes));
            if now >= deadline && !state.flattened {
                match flattener.flatten(strategy_id) {
                    Ok(()) => {
                        state.flattened = true;
                        action = RiskAction::AutoSquareOff;
                        reasons.push("margin shortfall grace window expired, auto square-off triggered".to_string());
                    }
                    Err(e) => reasons.push(format!("auto square-off failed: {e}")),
                }
            }
        } else {
            state.shortfall_deadline = None;
            state.flattened = false;
        }

        RiskDecision {
            level: applied_level,
            action,
            reasons,
            worst_greek: Some(worst_greek),
        }
    }

    pub fn shortfall_deadline(&self, strategy_id: Uuid) -> Option<DateTime<Utc>> {
        self.states.get(&strategy_id).and_then(|s| s.shortfall_deadline)
    }

    pub fn current_level(&self, strategy_id: Uuid) -> Option<RiskLevel> {
        self.states.get(&strategy_id).map(|s| s.current_level)
    }
}
