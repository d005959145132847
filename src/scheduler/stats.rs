use std::fmt;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

/// Why a round ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    Won,
    Lost,
    /// The solver reported that it could make no further progress.
    Stuck,
    /// A different algorithm was selected mid-round.
    Switched,
    /// The owner asked for a fresh board.
    Restarted,
}

/// Totals over every round played in a session.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub rounds: u32,
    pub wins: u32,
    pub losses: u32,
    pub stuck: u32,
    pub switches: u32,
    pub restarts: u32,
    pub total_steps: u64,
}

impl SessionStats {
    pub fn record(&mut self, outcome: RoundOutcome, steps: u32) {
        self.rounds += 1;
        self.total_steps += u64::from(steps);

        match outcome {
            RoundOutcome::Won => self.wins += 1,
            RoundOutcome::Lost => self.losses += 1,
            RoundOutcome::Stuck => self.stuck += 1,
            RoundOutcome::Switched => self.switches += 1,
            RoundOutcome::Restarted => self.restarts += 1,
        }
    }

    /// Wins over finished rounds, in `[0, 1]`.
    pub fn win_rate(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.rounds)
        }
    }
}

impl Display for SessionStats {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "rounds: {}, won: {}, lost: {}, stuck: {}, win rate: {:.1}%",
            self.rounds,
            self.wins,
            self.losses,
            self.stuck,
            self.win_rate() * 100.0
        )
    }
}

/// Tallies for the round in progress.
#[derive(Copy, Clone, Debug)]
pub struct RoundStats {
    steps: u32,
    started: Instant,
}

impl RoundStats {
    pub fn new() -> RoundStats {
        RoundStats {
            steps: 0,
            started: Instant::now(),
        }
    }

    pub fn record_step(&mut self) {
        self.steps += 1;
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn clear(&mut self) {
        *self = RoundStats::new();
    }
}

impl Default for RoundStats {
    fn default() -> RoundStats {
        RoundStats::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_display_snapshot;

    #[test]
    fn counts_each_outcome() {
        let mut stats = SessionStats::default();
        stats.record(RoundOutcome::Won, 10);
        stats.record(RoundOutcome::Lost, 3);
        stats.record(RoundOutcome::Lost, 4);
        stats.record(RoundOutcome::Stuck, 20);

        assert_eq!(stats.rounds, 4);
        assert_eq!(stats.total_steps, 37);
        assert_display_snapshot!(stats, @"rounds: 4, won: 1, lost: 2, stuck: 1, win rate: 25.0%");
    }

    #[test]
    fn empty_session_has_zero_win_rate() {
        assert_eq!(SessionStats::default().win_rate(), 0.0);
    }

    #[test]
    fn clearing_restarts_the_round() {
        let mut round = RoundStats::new();
        round.record_step();
        round.record_step();
        assert_eq!(round.steps(), 2);

        round.clear();
        assert_eq!(round.steps(), 0);
    }
}
