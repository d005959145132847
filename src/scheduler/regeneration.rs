use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    Acknowledged,
    TimedOut,
}

#[derive(Default)]
struct Flags {
    requested: bool,
    done: bool,
}

/// Hands a finished board from the solver thread to the owner of the board,
/// which regenerates it and reports back.
///
/// Each `request` is acknowledged at most once, and each acknowledgement is
/// observed by exactly one successful `wait_acknowledged`.
#[derive(Default)]
pub struct RegenerationHandshake {
    flags: Mutex<Flags>,
    acknowledged: Condvar,
}

impl RegenerationHandshake {
    pub fn new() -> RegenerationHandshake {
        RegenerationHandshake::default()
    }

    /// Solver side.
    pub fn request(&self) {
        let mut flags = self.flags.lock();
        flags.requested = true;
        flags.done = false;
    }

    /// Solver side. Blocks until the owner acknowledges or `timeout` passes.
    pub fn wait_acknowledged(&self, timeout: Duration) -> WaitOutcome {
        let deadline = Instant::now() + timeout;
        let mut flags = self.flags.lock();

        while !flags.done {
            if self
                .acknowledged
                .wait_until(&mut flags, deadline)
                .timed_out()
            {
                break;
            }
        }

        if flags.done {
            flags.done = false;
            WaitOutcome::Acknowledged
        } else {
            WaitOutcome::TimedOut
        }
    }

    pub fn is_requested(&self) -> bool {
        self.flags.lock().requested
    }

    /// Owner side. Clears and returns the pending request.
    pub fn take_request(&self) -> bool {
        let mut flags = self.flags.lock();
        let requested = flags.requested;
        flags.requested = false;
        requested
    }

    /// Owner side.
    pub fn acknowledge(&self) {
        self.flags.lock().done = true;
        self.acknowledged.notify_all();
    }

    /// Owner side. Runs `regenerate` and acknowledges if a request is
    /// pending; the handshake lock is not held while `regenerate` runs.
    pub fn service<F: FnOnce()>(&self, regenerate: F) -> bool {
        if !self.take_request() {
            return false;
        }

        regenerate();
        self.acknowledge();

        true
    }
}
