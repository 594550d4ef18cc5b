//! Best-heuristic tracking with progress log lines.

use sas_task::Cost;

use crate::evaluator::Estimate;

/// Tracks the best heuristic value seen so far.
#[derive(Debug, Default)]
pub struct SearchProgress {
    best: Option<Cost>,
    log: bool,
}

impl SearchProgress {
    pub fn new(log: bool) -> Self {
        Self { best: None, log }
    }

    pub fn best(&self) -> Option<Cost> {
        self.best
    }

    /// Record `estimate`; true if it improves on the best value so far.
    pub fn check_progress(&mut self, estimate: Estimate, g: Cost) -> bool {
        let Some(h) = estimate.value() else {
            return false;
        };
        if self.best.map_or(true, |best| h < best) {
            self.best = Some(h);
            if self.log {
                tracing::info!(h, g, "New best heuristic value");
            }
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_value_is_progress() {
        let mut p = SearchProgress::new(false);
        assert!(p.check_progress(Estimate::Finite(5), 0));
        assert_eq!(p.best(), Some(5));
    }

    #[test]
    fn test_only_strict_improvement_counts() {
        let mut p = SearchProgress::new(false);
        p.check_progress(Estimate::Finite(5), 0);
        assert!(!p.check_progress(Estimate::Finite(5), 1));
        assert!(!p.check_progress(Estimate::Finite(6), 1));
        assert!(p.check_progress(Estimate::Finite(2), 3));
        assert_eq!(p.best(), Some(2));
    }

    #[test]
    fn test_dead_end_is_ignored() {
        let mut p = SearchProgress::new(true);
        assert!(!p.check_progress(Estimate::DeadEnd, 0));
        assert_eq!(p.best(), None);
    }
}
