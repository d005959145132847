mod abort_controller;
mod regeneration;
mod stats;

pub use abort_controller::{AbortController, CancelToken, NoAbortController, TimeoutAbortController};
pub use regeneration::{RegenerationHandshake, WaitOutcome};
pub use stats::{RoundOutcome, RoundStats, SessionStats};

use crate::board::{Board, BoardState};
use crate::config::{ConfigError, SweeperConfig};
use crate::highlight::HighlightTrail;
use crate::solver::Solver;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SchedulerSettings {
    /// Pause between solver steps.
    pub step_interval: Duration,
    /// How long one wait for a regeneration acknowledgement lasts before
    /// cancellation is checked again.
    pub regeneration_wait: Duration,
}

impl Default for SchedulerSettings {
    fn default() -> SchedulerSettings {
        SchedulerSettings {
            step_interval: Duration::from_millis(1),
            regeneration_wait: Duration::from_millis(100),
        }
    }
}

/// State shared by the owner of the board and the solver thread.
///
/// The board sits behind a read/write lock: a solver step holds the write
/// lock for its whole duration, regeneration happens under the write lock on
/// the owner's side, and rendering takes the read lock. The highlight trail
/// has a lock of its own.
pub struct SharedSession {
    board: RwLock<Board>,
    trail: HighlightTrail,
    handshake: RegenerationHandshake,
    selection: AtomicUsize,
    restart: AtomicBool,
    totals: Mutex<SessionStats>,
    round: Mutex<RoundStats>,
}

impl SharedSession {
    pub fn new(board: Board, trail: HighlightTrail) -> SharedSession {
        SharedSession {
            board: RwLock::new(board),
            trail,
            handshake: RegenerationHandshake::new(),
            selection: AtomicUsize::new(0),
            restart: AtomicBool::new(false),
            totals: Mutex::new(SessionStats::default()),
            round: Mutex::new(RoundStats::new()),
        }
    }

    pub fn board(&self) -> &RwLock<Board> {
        &self.board
    }

    pub fn trail(&self) -> &HighlightTrail {
        &self.trail
    }

    pub fn handshake(&self) -> &RegenerationHandshake {
        &self.handshake
    }

    /// Takes effect at the scheduler's next step.
    pub fn select_algorithm(&self, index: usize) {
        self.selection.store(index, Ordering::Release);
    }

    pub fn selected_algorithm(&self) -> usize {
        self.selection.load(Ordering::Acquire)
    }

    /// Ends the current round early; the scheduler then asks for a new board.
    pub fn request_restart(&self) {
        self.restart.store(true, Ordering::Release);
    }

    fn take_restart(&self) -> bool {
        self.restart.swap(false, Ordering::AcqRel)
    }

    pub fn stats(&self) -> SessionStats {
        *self.totals.lock()
    }

    pub fn round(&self) -> RoundStats {
        *self.round.lock()
    }

    /// Owner side, once per frame: regenerates the board if the scheduler
    /// asked for it, then refreshes the board timer. Returns whether a new
    /// board was generated.
    pub fn tick(&self) -> bool {
        let regenerated = self.handshake.service(|| {
            let mut board = self.board.write();
            let (x, y) = board.metadata().safe_origin;
            board.generate(x, y);
            debug!(seed = board.metadata().seed, "regenerated board");
        });

        self.board.write().update_timer();

        regenerated
    }
}

/// Drives the selected solver against the shared board on its own thread.
pub struct SolverScheduler {
    session: Arc<SharedSession>,
    solvers: Vec<Box<dyn Solver + Send>>,
    active: usize,
    settings: SchedulerSettings,
    abort_controller: Box<dyn AbortController + Send>,
}

impl SolverScheduler {
    pub fn new(
        session: Arc<SharedSession>,
        solvers: Vec<Box<dyn Solver + Send>>,
        settings: SchedulerSettings,
    ) -> SolverScheduler {
        assert!(!solvers.is_empty(), "a scheduler needs at least one solver");

        let active = session.selected_algorithm() % solvers.len();

        SolverScheduler {
            session,
            solvers,
            active,
            settings,
            abort_controller: Box::new(NoAbortController),
        }
    }

    pub fn with_abort_controller(
        mut self,
        abort_controller: Box<dyn AbortController + Send>,
    ) -> SolverScheduler {
        self.abort_controller = abort_controller;
        self
    }

    pub fn active_solver(&self) -> &dyn Solver {
        self.solvers[self.active].as_ref()
    }

    pub fn spawn(self) -> SchedulerHandle {
        let cancel = CancelToken::new();
        let token = cancel.clone();

        let thread = thread::spawn(move || {
            let mut scheduler = self;
            scheduler.run(&token);
            scheduler
        });

        SchedulerHandle {
            cancel,
            thread: Some(thread),
        }
    }

    /// Steps until cancelled or aborted.
    pub fn run(&mut self, cancel: &CancelToken) {
        info!(solver = self.active_solver().name(), "scheduler started");

        while !self.should_stop(cancel) {
            if let Some(outcome) = self.step() {
                if !self.finish_round(outcome, cancel) {
                    break;
                }
            }

            thread::sleep(self.settings.step_interval);
        }

        info!(stats = %self.session.stats(), "scheduler stopped");
    }

    /// One iteration of the loop. Returns the outcome if the round is over.
    pub fn step(&mut self) -> Option<RoundOutcome> {
        let selected = self.session.selected_algorithm() % self.solvers.len();
        if selected != self.active {
            info!(
                from = self.active_solver().name(),
                to = self.solvers[selected].name(),
                "switching solver"
            );
            self.solvers[self.active].reset();
            self.active = selected;
            return Some(RoundOutcome::Switched);
        }

        if self.session.take_restart() {
            return Some(RoundOutcome::Restarted);
        }

        let progressed = {
            let mut board = self.session.board.write();
            self.solvers[self.active].step(&mut board, &self.session.trail)
        };
        self.session.round.lock().record_step();

        match self.session.board.read().state() {
            BoardState::Won => Some(RoundOutcome::Won),
            BoardState::Lost => Some(RoundOutcome::Lost),
            BoardState::Ongoing if !progressed => Some(RoundOutcome::Stuck),
            BoardState::Ongoing => None,
        }
    }

    /// Records the outcome and blocks until the owner has regenerated the
    /// board. Returns `false` if cancelled while waiting.
    pub fn finish_round(&mut self, outcome: RoundOutcome, cancel: &CancelToken) -> bool {
        let round = self.session.round();
        self.session.totals.lock().record(outcome, round.steps());

        info!(
            ?outcome,
            solver = self.active_solver().name(),
            steps = round.steps(),
            elapsed_ms = round.elapsed().as_millis() as u64,
            "round finished"
        );

        self.session.handshake.request();

        while self
            .session
            .handshake
            .wait_acknowledged(self.settings.regeneration_wait)
            == WaitOutcome::TimedOut
        {
            debug!("regeneration not acknowledged yet");
            if self.should_stop(cancel) {
                debug!("stopped while waiting for regeneration");
                return false;
            }
        }

        // A restart asked for during the wait is served by this regeneration.
        self.session.take_restart();
        self.session.round.lock().clear();
        self.solvers[self.active].reset();
        self.session.trail.clear();

        true
    }

    fn should_stop(&self, cancel: &CancelToken) -> bool {
        cancel.should_abort() || self.abort_controller.should_abort()
    }
}

/// Owns the scheduler thread. Dropping the handle stops the thread.
pub struct SchedulerHandle {
    cancel: CancelToken,
    thread: Option<JoinHandle<SolverScheduler>>,
}

impl SchedulerHandle {
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Cancels the scheduler and joins its thread, returning the scheduler
    /// unless the thread panicked.
    pub fn stop(mut self) -> Option<SolverScheduler> {
        self.cancel.cancel();
        self.thread.take().and_then(|thread| thread.join().ok())
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Generates the first board and starts the scheduler on it.
pub fn launch(
    config: &SweeperConfig,
    solvers: Vec<Box<dyn Solver + Send>>,
) -> Result<(Arc<SharedSession>, SchedulerHandle), ConfigError> {
    let board = config.board()?;
    let session = Arc::new(SharedSession::new(board, config.trail()));
    session.select_algorithm(config.algorithm.index());

    let mut scheduler = SolverScheduler::new(session.clone(), solvers, config.scheduler_settings());
    if let Some(limit) = config.time_limit {
        scheduler = scheduler.with_abort_controller(Box::new(TimeoutAbortController::duration(limit)));
    }

    Ok((session, scheduler.spawn()))
}
