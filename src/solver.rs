mod heuristic_sweep;
pub mod learned_policy;
mod linear_scan;

pub use heuristic_sweep::HeuristicSweep;
pub use learned_policy::LearnedPolicy;
pub use linear_scan::LinearScan;

use crate::board::Board;
use crate::highlight::Highlighter;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// A solving strategy that advances a board one discrete action at a time.
pub trait Solver {
    /// Performs one action (reveal, flag or chord a bounded set of cells).
    /// Returns `false` when the solver can make no further progress on this
    /// board, which is independent of whether the board is won or lost.
    fn step(&mut self, board: &mut Board, highlighter: &dyn Highlighter) -> bool;

    fn name(&self) -> &'static str;

    fn steps(&self) -> u32;

    /// Forgets all per-round state. The board is left alone.
    fn reset(&mut self);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Algorithm {
    LinearScan,
    HeuristicSweep,
    LearnedPolicy,
}

impl Algorithm {
    pub fn all() -> &'static [Algorithm; 3] {
        &[
            Algorithm::LinearScan,
            Algorithm::HeuristicSweep,
            Algorithm::LearnedPolicy,
        ]
    }

    /// Position in `all()`, which is also the solver's index in the scheduler.
    pub fn index(self) -> usize {
        match self {
            Algorithm::LinearScan => 0,
            Algorithm::HeuristicSweep => 1,
            Algorithm::LearnedPolicy => 2,
        }
    }

    pub fn from_index(index: usize) -> Algorithm {
        Algorithm::all()[index % Algorithm::all().len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::LinearScan => "linear-scan",
            Algorithm::HeuristicSweep => "heuristic-sweep",
            Algorithm::LearnedPolicy => "learned-policy",
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown algorithm {0:?}, expected one of linear-scan, heuristic-sweep, learned-policy")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(name: &str) -> Result<Algorithm, UnknownAlgorithm> {
        Algorithm::all()
            .iter()
            .copied()
            .find(|algorithm| algorithm.name() == name)
            .ok_or_else(|| UnknownAlgorithm(name.to_owned()))
    }
}

/// One solver per `Algorithm`, in `Algorithm::all()` order.
pub fn standard_solvers(learned_policy: LearnedPolicy) -> Vec<Box<dyn Solver + Send>> {
    vec![
        Box::new(LinearScan::new()),
        Box::new(HeuristicSweep::new()),
        Box::new(learned_policy),
    ]
}
