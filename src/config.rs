use crate::board::{Board, BoardError};
use crate::highlight::{HighlightTrail, DEFAULT_CAPACITY, DEFAULT_LIFETIME};
use crate::scheduler::SchedulerSettings;
use crate::solver::learned_policy::LearnedPolicySettings;
use crate::solver::{Algorithm, UnknownAlgorithm};
use std::time::Duration;
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MineCount {
    Exact(usize),
    /// Fraction of all cells, in `[0, 1]`.
    Density(f32),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Algorithm(#[from] UnknownAlgorithm),
    #[error("mine density must be between 0 and 1, got {0}")]
    Density(f32),
    #[error("safe origin ({x}, {y}) is outside a {height}x{width} board")]
    SafeOrigin {
        x: usize,
        y: usize,
        height: usize,
        width: usize,
    },
    #[error("highlight trail capacity must be positive")]
    TrailCapacity,
    #[error("exploration rate must be between 0 and 1, got {0}")]
    Exploration(f64),
}

/// Everything needed to start a session.
#[derive(Clone, Debug, PartialEq)]
pub struct SweeperConfig {
    pub height: usize,
    pub width: usize,
    pub mines: MineCount,
    /// Where the first reveal is guaranteed safe. Defaults to the centre.
    pub safe_origin: Option<(usize, usize)>,
    pub algorithm: Algorithm,
    pub step_interval: Duration,
    pub regeneration_wait: Duration,
    pub time_limit: Option<Duration>,
    pub trail_capacity: usize,
    pub trail_lifetime: Duration,
    pub learned_policy: LearnedPolicySettings,
}

impl Default for SweeperConfig {
    fn default() -> SweeperConfig {
        let scheduler = SchedulerSettings::default();

        SweeperConfig {
            height: 17,
            width: 17,
            mines: MineCount::Density(0.25),
            safe_origin: None,
            algorithm: Algorithm::HeuristicSweep,
            step_interval: scheduler.step_interval,
            regeneration_wait: scheduler.regeneration_wait,
            time_limit: None,
            trail_capacity: DEFAULT_CAPACITY,
            trail_lifetime: DEFAULT_LIFETIME,
            learned_policy: LearnedPolicySettings::default(),
        }
    }
}

impl SweeperConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let MineCount::Density(density) = self.mines {
            if !(0.0..=1.0).contains(&density) {
                return Err(ConfigError::Density(density));
            }
        }

        if self.trail_capacity == 0 {
            return Err(ConfigError::TrailCapacity);
        }

        let exploration = self.learned_policy.exploration;
        if !(0.0..=1.0).contains(&exploration) {
            return Err(ConfigError::Exploration(exploration));
        }

        let board = self.empty_board()?;

        if let Some((x, y)) = self.safe_origin {
            if x >= board.width() || y >= board.height() {
                return Err(ConfigError::SafeOrigin {
                    x,
                    y,
                    height: board.height(),
                    width: board.width(),
                });
            }
        }

        Ok(())
    }

    pub fn safe_origin(&self) -> (usize, usize) {
        self.safe_origin
            .unwrap_or((self.width / 2, self.height / 2))
    }

    /// A validated board with its first layout generated.
    pub fn board(&self) -> Result<Board, ConfigError> {
        self.validate()?;

        let mut board = self.empty_board()?;
        let (x, y) = self.safe_origin();
        board.generate(x, y);

        Ok(board)
    }

    pub fn trail(&self) -> HighlightTrail {
        HighlightTrail::new(self.trail_capacity, self.trail_lifetime)
    }

    pub fn scheduler_settings(&self) -> SchedulerSettings {
        SchedulerSettings {
            step_interval: self.step_interval,
            regeneration_wait: self.regeneration_wait,
        }
    }

    fn empty_board(&self) -> Result<Board, BoardError> {
        match self.mines {
            MineCount::Exact(count) => Board::new(self.height, self.width, count),
            MineCount::Density(density) => Board::with_density(self.height, self.width, density),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardState;
    use insta::assert_display_snapshot;

    #[test]
    fn default_board() {
        let board = SweeperConfig::default().board().unwrap();
        let metadata = board.metadata();

        assert_eq!((metadata.height, metadata.width), (17, 17));
        assert_eq!(metadata.safe_origin, (8, 8));
        assert_eq!(metadata.state, BoardState::Ongoing);
        assert_display_snapshot!(metadata.mine_count, @"72");
    }

    #[test]
    fn rejects_bad_values() {
        let config = SweeperConfig {
            mines: MineCount::Density(1.5),
            ..SweeperConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Density(_))));

        let config = SweeperConfig {
            mines: MineCount::Exact(81),
            height: 9,
            width: 9,
            ..SweeperConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Board(BoardError::TooManyMines { .. }))
        ));

        let config = SweeperConfig {
            safe_origin: Some((17, 0)),
            ..SweeperConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SafeOrigin { x: 17, .. })
        ));

        let config = SweeperConfig {
            trail_capacity: 0,
            ..SweeperConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::TrailCapacity)));
    }

    #[test]
    fn explicit_safe_origin_is_used() {
        let config = SweeperConfig {
            height: 9,
            width: 9,
            mines: MineCount::Exact(10),
            safe_origin: Some((0, 8)),
            ..SweeperConfig::default()
        };

        let board = config.board().unwrap();

        assert_eq!(board.metadata().safe_origin, (0, 8));
        assert!(!board.cell(0, 8).unwrap().is_mine());
    }
}
