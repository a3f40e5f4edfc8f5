use crate::types::{RiskLevel, RiskState};

impl RiskState {
    /// Applies a freshly computed level against the sticky state.
    ///
    /// Worsening is immediate. Improvement only takes effect after it has
    /// been observed for one full recompute cycle in a row — the first
    /// improving recompute just records a pending candidate; the next
    /// recompute at the same or better level commits it.
    pub fn advance(&mut self, new_level: RiskLevel) -> RiskLevel {
        if new_level >= self.current_level {
            self.current_level = new_level;
            self.pending_downgrade = None;
            return self.current_level;
        }

        match self.pending_downgrade {
            Some(pending) if new_level <= pending => {
                self.current_level = new_level;
                self.pending_downgrade = None;
            }
            _ => {
                self.pending_downgrade = Some(new_level);
            }
        }
        self.current_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worsening_applies_immediately() {
        let mut st = RiskState::new();
        assert_eq!(st.advance(RiskLevel::L4), RiskLevel::L4);
    }

    #[test]
    fn improvement_needs_one_full_extra_cycle() {
        let mut st = RiskState::new();
        st.advance(RiskLevel::L5);
        assert_eq!(st.advance(RiskLevel::L2), RiskLevel::L5);
        assert_eq!(st.advance(RiskLevel::L2), RiskLevel::L2);
    }

    #[test]
    fn worsening_during_hysteresis_cancels_the_pending_downgrade() {
        let mut st = RiskState::new();
        st.advance(RiskLevel::L5);
        st.advance(RiskLevel::L2);
        assert_eq!(st.advance(RiskLevel::L6), RiskLevel::L6);
        assert_eq!(st.advance(RiskLevel::L2), RiskLevel::L6);
    }
}
