//! Time-control budget computation.

use std::time::{Duration, Instant};

use crate::types::Color;

use super::SearchLimits;

const SAFETY_MARGIN_MS: u64 = 50;

#[derive(Clone, Copy, Debug)]
pub struct TimeBudget {
    pub soft: Duration,
    pub hard: Duration,
}

/// Computes the soft (may still finish the current iteration) and hard
/// (abort immediately) time budgets for `limits`, from `side`'s clock.
#[must_use]
pub fn compute_budget(limits: &SearchLimits, side: Color) -> Option<TimeBudget> {
    if limits.infinite || limits.perft {
        return None;
    }
    if let Some(move_time) = limits.move_time_ms {
        let soft = Duration::from_millis(move_time);
        return Some(TimeBudget { soft, hard: soft });
    }

    let (time_left, inc) = match side {
        Color::White => (limits.white_time_ms, limits.white_inc_ms),
        Color::Black => (limits.black_time_ms, limits.black_inc_ms),
    };
    let time_left = time_left?;
    let inc = inc.unwrap_or(0);
    let moves_to_go = limits.moves_to_go.unwrap_or(40).max(1) as u64;

    let soft_ms = (time_left / moves_to_go) + inc;
    let safe_left = time_left.saturating_sub(SAFETY_MARGIN_MS);
    let hard_ms = (soft_ms * 2).min(safe_left).max(1);
    let soft_ms = soft_ms.min(hard_ms);

    Some(TimeBudget {
        soft: Duration::from_millis(soft_ms),
        hard: Duration::from_millis(hard_ms),
    })
}

/// Tracks elapsed time against a budget, checked every ~1024 nodes.
pub struct TimeCheck {
    start: Instant,
    budget: Option<TimeBudget>,
}

impl TimeCheck {
    #[must_use]
    pub fn new(budget: Option<TimeBudget>) -> Self {
        TimeCheck {
            start: Instant::now(),
            budget,
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    #[must_use]
    pub fn past_soft(&self) -> bool {
        match self.budget {
            Some(b) => self.elapsed() >= b.soft,
            None => false,
        }
    }

    #[must_use]
    pub fn past_hard(&self) -> bool {
        match self.budget {
            Some(b) => self.elapsed() >= b.hard,
            None => false,
        }
    }

    /// Widens the budget in place, used by `add_extra_time` on a root fail-low.
    pub fn extend(&mut self, extra: Duration) {
        if let Some(b) = &mut self.budget {
            b.soft += extra;
            b.hard += extra;
        }
    }

    /// Promotes an infinite/ponder search (no budget) to a timed one.
    pub fn apply_limits(&mut self, budget: Option<TimeBudget>) {
        self.budget = budget;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_time_sets_equal_soft_and_hard_budget() {
        let limits = SearchLimits {
            move_time_ms: Some(500),
            ..SearchLimits::default()
        };
        let budget = compute_budget(&limits, Color::White).unwrap();
        assert_eq!(budget.soft, budget.hard);
        assert_eq!(budget.soft, Duration::from_millis(500));
    }

    #[test]
    fn infinite_search_has_no_budget() {
        let limits = SearchLimits {
            infinite: true,
            ..SearchLimits::default()
        };
        assert!(compute_budget(&limits, Color::White).is_none());
    }

    #[test]
    fn hard_budget_is_roughly_double_soft() {
        let limits = SearchLimits {
            white_time_ms: Some(60_000),
            white_inc_ms: Some(0),
            ..SearchLimits::default()
        };
        let budget = compute_budget(&limits, Color::White).unwrap();
        assert!(budget.hard >= budget.soft);
        assert!(budget.hard <= budget.soft * 2 + Duration::from_millis(1));
    }
}
