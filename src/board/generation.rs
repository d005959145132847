use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

/// A seed derived from the current wall-clock time.
pub fn clock_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|since_epoch| since_epoch.as_nanos())
        .unwrap_or_default();

    let mut hasher = DefaultHasher::new();
    format!("{:x}", nanos).hash(&mut hasher);
    hasher.finish()
}

/// Picks `mine_count` distinct flat indices out of `cell_count`, never
/// `safe_index`.
///
/// A partial Fisher-Yates shuffle runs over the `cell_count - 1` indices that
/// remain once the safe cell is taken out; picks at or past the safe cell are
/// shifted up by one to map back onto the board.
pub fn place_mines(cell_count: usize, safe_index: usize, mine_count: usize, seed: u64) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..cell_count.saturating_sub(1)).collect();
    let mine_count = mine_count.min(indices.len());
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut mines = Vec::with_capacity(mine_count);

    for i in 0..mine_count {
        let j = rng.gen_range(i, indices.len());
        indices.swap(i, j);

        let index = indices[i];
        mines.push(if index >= safe_index { index + 1 } else { index });
    }

    mines
}
