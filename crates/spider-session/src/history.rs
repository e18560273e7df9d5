//! Budget-bounded history selection.
//!
//! The system prompt and pending input are always included; history fills the
//! remaining budget newest-first, stopping at the first turn that would
//! overflow. Because scanning stops there (no skip-and-continue), the
//! selection is always a contiguous suffix of the log, which is already in
//! chronological order.

use spider_core::{TokenEstimator, Turn};

/// Select the history turns to include in the next model call.
///
/// `reserved` is the combined estimated cost of the system prompt and the
/// pending user input; both are included unconditionally even when `reserved`
/// alone exceeds `max_budget`.
pub fn select_history<'a>(
    turns: &'a [Turn],
    reserved: u32,
    max_budget: u32,
    estimator: &dyn TokenEstimator,
) -> &'a [Turn] {
    let remaining = max_budget.saturating_sub(reserved);

    let mut used = 0u32;
    let mut start = turns.len();

    for (index, turn) in turns.iter().enumerate().rev() {
        let cost = estimator.estimate_turn(turn);
        if used.saturating_add(cost) > remaining {
            break;
        }
        used += cost;
        start = index;
    }

    &turns[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use spider_core::CharRatioEstimator;

    // 1 char = 1 unit, no per-turn overhead: costs equal content length.
    fn unit_estimator() -> CharRatioEstimator {
        CharRatioEstimator::new(1.0, 0)
    }

    fn turn_of_len(len: usize) -> Turn {
        Turn::user("a".repeat(len))
    }

    #[test]
    fn empty_history_is_valid() {
        let estimator = unit_estimator();
        let selected = select_history(&[], 10, 100, &estimator);
        assert!(selected.is_empty());
    }

    #[test]
    fn full_history_fits_in_chronological_order() {
        let estimator = unit_estimator();
        let turns = vec![Turn::user("one"), Turn::assistant("two"), Turn::user("three")];

        let selected = select_history(&turns, 0, 100, &estimator);

        assert_eq!(selected.len(), 3);
        assert_eq!(selected[0].content, "one");
        assert_eq!(selected[2].content, "three");
    }

    #[test]
    fn selection_keeps_most_recent_turns() {
        let estimator = unit_estimator();
        let turns: Vec<Turn> = (0..5).map(|_| turn_of_len(10)).collect();

        // Budget for exactly two 10-unit turns after the reservation.
        let selected = select_history(&turns, 5, 25, &estimator);

        assert_eq!(selected.len(), 2);
        assert!(std::ptr::eq(&turns[3], &selected[0]));
        assert!(std::ptr::eq(&turns[4], &selected[1]));
    }

    #[test]
    fn selection_never_partially_includes_an_overflowing_turn() {
        let estimator = unit_estimator();
        let turns = vec![turn_of_len(10), turn_of_len(10)];

        // Room for one turn and a half: only the newest is taken whole.
        let selected = select_history(&turns, 0, 15, &estimator);

        assert_eq!(selected.len(), 1);
        assert_eq!(estimator.estimate_turn(&selected[0]), 10);
    }

    #[test]
    fn oversized_turn_stops_the_scan_even_when_older_turns_fit() {
        let estimator = unit_estimator();
        // Oldest is tiny, middle is huge, newest is small.
        let turns = vec![turn_of_len(1), turn_of_len(100), turn_of_len(5)];

        let selected = select_history(&turns, 0, 10, &estimator);

        // The huge middle turn overflows; the tiny oldest turn must NOT be
        // picked up past it.
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].content.len(), 5);
    }

    #[test]
    fn reservation_exceeding_budget_selects_nothing() {
        let estimator = unit_estimator();
        let turns = vec![turn_of_len(1)];

        let selected = select_history(&turns, 50, 10, &estimator);

        assert!(selected.is_empty());
    }

    #[test]
    fn selected_cost_stays_within_remaining_budget() {
        let estimator = unit_estimator();
        let turns: Vec<Turn> = [3, 7, 2, 9, 4].iter().map(|len| turn_of_len(*len)).collect();

        for budget in 0..40u32 {
            for reserved in 0..10u32 {
                let selected = select_history(&turns, reserved, budget, &estimator);
                let total: u32 = selected.iter().map(|t| estimator.estimate_turn(t)).sum();
                assert!(
                    total <= budget.saturating_sub(reserved),
                    "budget {budget}, reserved {reserved}: selected {total}"
                );
            }
        }
    }
}
