use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

pub const DEFAULT_CAPACITY: usize = 4096;
pub const DEFAULT_LIFETIME: Duration = Duration::from_millis(500);

/// Receives the cells a solver touches.
pub trait Highlighter {
    fn highlight(&self, x: usize, y: usize);
}

pub struct NoHighlight;

impl Highlighter for NoHighlight {
    fn highlight(&self, _x: usize, _y: usize) {}
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HighlightEntry {
    pub x: usize,
    pub y: usize,
    pub created: Instant,
}

/// A bounded, fading log of recently touched cells.
///
/// Written by the solver thread and read by the render pass. It has its own
/// lock, independent of the board's. When full, the oldest entry is dropped;
/// entries older than the lifetime are pruned whenever a snapshot is taken.
pub struct HighlightTrail {
    entries: Mutex<VecDeque<HighlightEntry>>,
    capacity: usize,
    lifetime: Duration,
    enabled: AtomicBool,
}

impl HighlightTrail {
    pub fn new(capacity: usize, lifetime: Duration) -> HighlightTrail {
        HighlightTrail {
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY))),
            capacity: capacity.max(1),
            lifetime,
            enabled: AtomicBool::new(true),
        }
    }

    pub fn push(&self, x: usize, y: usize, created: Instant) {
        if !self.is_enabled() {
            return;
        }

        let mut entries = self.entries.lock();
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(HighlightEntry { x, y, created });
    }

    /// The live entries paired with how far they have faded, from 0 (fresh)
    /// to 1 (about to expire).
    pub fn snapshot(&self, now: Instant) -> Vec<(HighlightEntry, f32)> {
        let copy: Vec<HighlightEntry> = self.entries.lock().iter().copied().collect();

        let mut expired = false;
        let mut live = Vec::with_capacity(copy.len());

        for entry in copy {
            let age = now.saturating_duration_since(entry.created);
            if age > self.lifetime {
                expired = true;
                continue;
            }

            let fade = (age.as_secs_f32() / self.lifetime.as_secs_f32()).min(1.0);
            live.push((entry, if fade.is_nan() { 0.0 } else { fade }));
        }

        if expired {
            let lifetime = self.lifetime;
            self.entries
                .lock()
                .retain(|entry| now.saturating_duration_since(entry.created) <= lifetime);
        }

        live
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

impl Default for HighlightTrail {
    fn default() -> HighlightTrail {
        HighlightTrail::new(DEFAULT_CAPACITY, DEFAULT_LIFETIME)
    }
}

impl Highlighter for HighlightTrail {
    fn highlight(&self, x: usize, y: usize) {
        self.push(x, y, Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn evicts_oldest_when_full() {
        let trail = HighlightTrail::new(3, Duration::from_secs(60));
        let now = Instant::now();

        for x in 0..5 {
            trail.push(x, 0, now);
        }

        let xs: Vec<usize> = trail.snapshot(now).iter().map(|(entry, _)| entry.x).collect();
        assert_eq!(xs, vec![2, 3, 4]);
    }

    #[test]
    fn prunes_expired_entries_on_snapshot() {
        let trail = HighlightTrail::new(16, Duration::from_millis(500));
        let start = Instant::now();

        trail.push(0, 0, start);
        trail.push(1, 0, start + Duration::from_millis(400));

        let later = start + Duration::from_millis(600);
        let live = trail.snapshot(later);

        assert_eq!(live.len(), 1);
        assert_eq!(live[0].0.x, 1);
        assert!((live[0].1 - 0.4).abs() < 1e-3);
        assert_eq!(trail.len(), 1);
    }

    #[test]
    fn disabled_trail_records_nothing() {
        let trail = HighlightTrail::default();
        trail.set_enabled(false);
        trail.highlight(1, 1);
        assert!(trail.is_empty());

        trail.set_enabled(true);
        trail.highlight(1, 1);
        assert_eq!(trail.len(), 1);

        trail.clear();
        assert!(trail.is_empty());
    }

    #[test]
    fn concurrent_writer_and_reader() {
        let trail = Arc::new(HighlightTrail::new(64, Duration::from_secs(60)));

        let writer = {
            let trail = trail.clone();
            thread::spawn(move || {
                for i in 0..10_000 {
                    trail.highlight(i % 17, i % 13);
                }
            })
        };

        for _ in 0..100 {
            assert!(trail.snapshot(Instant::now()).len() <= 64);
        }

        writer.join().unwrap();
        assert_eq!(trail.len(), 64);
    }
}
