use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Checked by the scheduler between steps and while it waits for a new board.
pub trait AbortController {
    fn should_abort(&self) -> bool;
}

/// Lets the scheduler run until its handle is stopped.
pub struct NoAbortController;

impl AbortController for NoAbortController {
    fn should_abort(&self) -> bool {
        false
    }
}

/// Stops a session once its time limit has passed, as set by the CLI's
/// `--time-limit`. The clock starts when the controller is built, which
/// `launch` does just before spawning the solver thread.
pub struct TimeoutAbortController {
    timeout_at: Instant,
}

impl AbortController for TimeoutAbortController {
    fn should_abort(&self) -> bool {
        Instant::now() >= self.timeout_at
    }
}

impl TimeoutAbortController {
    pub fn duration(duration: Duration) -> TimeoutAbortController {
        TimeoutAbortController {
            timeout_at: Instant::now() + duration,
        }
    }
}

/// A shared stop flag. Every clone observes the same cancellation.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl AbortController for CancelToken {
    fn should_abort(&self) -> bool {
        self.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_expires() {
        assert!(TimeoutAbortController::duration(Duration::from_secs(0)).should_abort());
        assert!(!TimeoutAbortController::duration(Duration::from_secs(60)).should_abort());
        assert!(!NoAbortController.should_abort());
    }

    #[test]
    fn clones_share_cancellation() {
        let token = CancelToken::new();
        let clone = token.clone();

        assert!(!clone.should_abort());
        token.cancel();
        assert!(clone.should_abort());
    }
}
