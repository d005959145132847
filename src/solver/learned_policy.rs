mod example_collector;
pub mod features;
mod linear_model;

pub use example_collector::{
    ChannelExampleCollector, ExampleCollector, FileExampleCollector, NullExampleCollector,
};
pub use linear_model::{LinearModel, ModelError, TrainingSet};

use super::Solver;
use crate::board::{Board, BoardState};
use crate::highlight::Highlighter;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub const RIDGE_LAMBDA: f64 = 1e-4;

#[derive(Clone, Debug, PartialEq)]
pub struct LearnedPolicySettings {
    /// Retrain after this many samples. Zero disables training.
    pub train_every: usize,
    pub model_path: PathBuf,
    /// Probability of a uniformly random pick even when a model exists.
    pub exploration: f64,
}

impl Default for LearnedPolicySettings {
    fn default() -> LearnedPolicySettings {
        LearnedPolicySettings {
            train_every: 5000,
            model_path: PathBuf::from("models/linear.bin"),
            exploration: 0.1,
        }
    }
}

/// Reveals hidden cells and learns, from how each reveal turned out, which
/// neighbourhoods are safe.
///
/// Until a model has been trained every pick is uniformly random. Afterwards
/// the candidate with the highest predicted safety is revealed, except for
/// an `exploration` fraction of random picks. Each reveal becomes a sample
/// labelled 1 if the board survived and 0 if it was lost.
pub struct LearnedPolicy {
    settings: LearnedPolicySettings,
    model: Option<LinearModel>,
    training: TrainingSet,
    collector: Box<dyn ExampleCollector + Send>,
    rng: SmallRng,
    steps: u32,
}

impl LearnedPolicy {
    pub fn new(settings: LearnedPolicySettings) -> LearnedPolicy {
        LearnedPolicy {
            settings,
            model: None,
            training: TrainingSet::new(),
            collector: Box::new(NullExampleCollector),
            rng: SmallRng::from_entropy(),
            steps: 0,
        }
    }

    pub fn with_model(mut self, model: LinearModel) -> LearnedPolicy {
        self.model = Some(model);
        self
    }

    pub fn with_collector(mut self, collector: Box<dyn ExampleCollector + Send>) -> LearnedPolicy {
        self.collector = collector;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> LearnedPolicy {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    pub fn model(&self) -> Option<&LinearModel> {
        self.model.as_ref()
    }

    pub fn samples(&self) -> usize {
        self.training.len()
    }

    /// Adds a sample, dropping it with a warning if its dimension differs
    /// from the samples already held.
    pub fn record(&mut self, features: &[f64], label: f64) {
        self.collector.collect_example(features, label);

        if let Err(err) = self.training.push(features, label) {
            warn!(%err, "dropping training sample");
            return;
        }

        let train_every = self.settings.train_every;
        if train_every > 0 && self.training.len() % train_every == 0 {
            self.train();
        }
    }

    fn train(&mut self) {
        let model = match LinearModel::fit(&self.training, RIDGE_LAMBDA) {
            Ok(model) => model,
            Err(err) => {
                warn!(%err, samples = self.training.len(), "training failed");
                return;
            }
        };

        info!(samples = self.training.len(), "trained learned policy");

        let path = &self.settings.model_path;
        match model.save(path) {
            Ok(()) => info!(path = %path.display(), "saved model"),
            Err(err) => warn!(%err, path = %path.display(), "failed to save model"),
        }

        self.model = Some(model);
    }

    fn choose(&mut self, board: &Board, candidates: &[(usize, usize)]) -> Option<(usize, usize)> {
        let explore = self.rng.gen::<f64>() < self.settings.exploration;

        match &self.model {
            Some(model) if !explore => candidates.iter().copied().max_by(|&(ax, ay), &(bx, by)| {
                let a = model.predict(&features::featurize(board, ax, ay));
                let b = model.predict(&features::featurize(board, bx, by));
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }),
            _ => candidates.choose(&mut self.rng).copied(),
        }
    }
}

impl Solver for LearnedPolicy {
    fn step(&mut self, board: &mut Board, highlighter: &dyn Highlighter) -> bool {
        let candidates: Vec<(usize, usize)> = board
            .positions()
            .filter(|&(x, y)| board.cell(x, y).map_or(false, |cell| cell.is_hidden()))
            .collect();

        let (x, y) = match self.choose(board, &candidates) {
            Some(candidate) => candidate,
            None => return false,
        };

        let features = features::featurize(board, x, y);

        highlighter.highlight(x, y);
        board.reveal(x, y);
        self.steps += 1;

        let label = if board.state() == BoardState::Lost {
            0.0
        } else {
            1.0
        };
        debug!(x, y, label, "learned policy reveal");

        self.record(&features, label);

        true
    }

    fn name(&self) -> &'static str {
        "learned policy"
    }

    fn steps(&self) -> u32 {
        self.steps
    }

    fn reset(&mut self) {
        self.steps = 0;
    }
}
