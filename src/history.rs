//! Recent match outcomes
//!
//! Kept in memory only; the list is shown on the title screen and is lost
//! when the process exits.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Maximum number of outcomes to keep
pub const MAX_HISTORY: usize = 5;

/// How a Fall Blocks match ended, from the player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    PlayerWon,
    OpponentWon,
    Draw,
}

impl MatchOutcome {
    /// Decide the outcome from final scores; equal scores are a draw
    pub fn from_scores(player: u32, opponent: u32) -> Self {
        match player.cmp(&opponent) {
            std::cmp::Ordering::Greater => MatchOutcome::PlayerWon,
            std::cmp::Ordering::Less => MatchOutcome::OpponentWon,
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchOutcome::PlayerWon => "You win",
            MatchOutcome::OpponentWon => "You lose",
            MatchOutcome::Draw => "Draw",
        }
    }
}

/// Bounded log of recent outcomes, oldest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchHistory {
    entries: VecDeque<MatchOutcome>,
}

impl MatchHistory {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_HISTORY),
        }
    }

    /// Append an outcome, evicting the oldest once full
    pub fn record(&mut self, outcome: MatchOutcome) {
        if self.entries.len() == MAX_HISTORY {
            self.entries.pop_front();
        }
        self.entries.push_back(outcome);
        log::info!("Recorded outcome {:?} ({} in history)", outcome, self.entries.len());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &MatchOutcome> {
        self.entries.iter()
    }

    /// Newest to oldest, the order the title screen lists them in
    pub fn recent(&self) -> impl Iterator<Item = &MatchOutcome> {
        self.entries.iter().rev()
    }

    /// Most recent outcome (if any)
    pub fn last(&self) -> Option<MatchOutcome> {
        self.entries.back().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_outcome_from_scores() {
        assert_eq!(MatchOutcome::from_scores(3, 1), MatchOutcome::PlayerWon);
        assert_eq!(MatchOutcome::from_scores(1, 3), MatchOutcome::OpponentWon);
        assert_eq!(MatchOutcome::from_scores(2, 2), MatchOutcome::Draw);
        assert_eq!(MatchOutcome::from_scores(0, 0), MatchOutcome::Draw);
    }

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = MatchHistory::new();
        history.record(MatchOutcome::PlayerWon);
        for _ in 0..4 {
            history.record(MatchOutcome::Draw);
        }
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history.iter().next(), Some(&MatchOutcome::PlayerWon));

        history.record(MatchOutcome::OpponentWon);
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history.iter().next(), Some(&MatchOutcome::Draw));
        assert_eq!(history.last(), Some(MatchOutcome::OpponentWon));
        assert_eq!(history.recent().next(), Some(&MatchOutcome::OpponentWon));
    }

    #[test]
    fn test_empty_history() {
        let history = MatchHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.last(), None);
    }

    fn outcome() -> impl Strategy<Value = MatchOutcome> {
        prop_oneof![
            Just(MatchOutcome::PlayerWon),
            Just(MatchOutcome::OpponentWon),
            Just(MatchOutcome::Draw),
        ]
    }

    proptest! {
        #[test]
        fn prop_history_keeps_last_five(outcomes in prop::collection::vec(outcome(), 0..20)) {
            let mut history = MatchHistory::new();
            for o in &outcomes {
                history.record(*o);
            }
            prop_assert!(history.len() <= MAX_HISTORY);
            let expected: Vec<_> = outcomes.iter().rev().take(MAX_HISTORY).rev().copied().collect();
            let kept: Vec<_> = history.iter().copied().collect();
            prop_assert_eq!(kept, expected);
        }
    }
}
