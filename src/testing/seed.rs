//! Process-wide random seed for generated test data
//!
//! The harness calls `init_random_seed` once before the suite runs; tests
//! derive their own generators from the seed with `test_rng`, so a failing
//! run can be replayed by exporting `CLICKHOUSE_TEST_SEED`.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Variable that pins the seed
pub const SEED_VARIABLE: &str = "CLICKHOUSE_TEST_SEED";

static SEED: OnceLock<u64> = OnceLock::new();

// Distinguishes generators handed out from the same seed
static STREAM: AtomicU64 = AtomicU64::new(0);

fn pick_seed() -> u64 {
    if let Some(seed) = std::env::var(SEED_VARIABLE)
        .ok()
        .and_then(|v| v.parse().ok())
    {
        return seed;
    }
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

/// Choose and log the seed; later calls return the same value
pub fn init_random_seed() -> u64 {
    *SEED.get_or_init(|| {
        let seed = pick_seed();
        tracing::info!(seed, "using random seed {} for std tests", seed);
        seed
    })
}

/// Seed chosen by `init_random_seed` (initializing it if needed)
pub fn random_seed() -> u64 {
    init_random_seed()
}

/// A fresh generator derived from the process seed
pub fn test_rng() -> StdRng {
    let stream = STREAM.fetch_add(1, Ordering::Relaxed);
    StdRng::seed_from_u64(random_seed().wrapping_add(stream))
}
