//! Mint cost estimation.
//!
//! Minting time is calibrated once per process by minting a handful of 16-bit
//! stamps, then extrapolated: each extra bit doubles the expected cost. The
//! first call is expensive (on the order of a second); later calls are free.
//! Individual mints vary widely around the estimate.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::{MintRequest, TokenMinter};

/// Bit target used for calibration.
pub const CALIBRATION_BITS: u32 = 16;

/// Number of stamps minted during calibration.
pub const CALIBRATION_ROUNDS: u32 = 11;

const CALIBRATION_RESOURCE: &str = "estimation";

static BASELINE: OnceLock<Duration> = OnceLock::new();

/// Extrapolates mint cost from the average time of a 16-bit mint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Estimator {
    baseline: Duration,
}

impl Estimator {
    /// The process-wide estimator, calibrating on first use.
    ///
    /// Concurrent first callers block until the single calibration finishes.
    pub fn global() -> Self {
        Self {
            baseline: *BASELINE.get_or_init(calibrate),
        }
    }

    /// An estimator with a known per-mint cost at 16 bits.
    pub fn with_baseline(baseline: Duration) -> Self {
        Self { baseline }
    }

    /// Average time to mint a 16-bit stamp.
    pub fn baseline(&self) -> Duration {
        self.baseline
    }

    /// Expected time to mint a stamp of `bits`. Saturates at `Duration::MAX`.
    pub fn estimate_time(&self, bits: u32) -> Duration {
        let exponent = i64::from(bits) - i64::from(CALIBRATION_BITS);
        let scale = 2f64.powf(exponent as f64);
        Duration::try_from_secs_f64(self.baseline.as_secs_f64() * scale).unwrap_or(Duration::MAX)
    }

    /// The bit value that can be minted in about `seconds`.
    pub fn estimate_value(&self, seconds: u64) -> u32 {
        let baseline_ms = self.baseline.as_millis().max(1);
        let mut budget = u128::from(seconds) * 1000 * (1u128 << CALIBRATION_BITS) / baseline_ms;
        let mut bits = 0;
        while budget > 1 {
            bits += 1;
            budget /= 2;
        }
        bits
    }
}

/// Expected time to mint a stamp of `bits`, using the global calibration.
pub fn estimate_time(bits: u32) -> Duration {
    Estimator::global().estimate_time(bits)
}

/// Bits mintable in about `seconds`, using the global calibration.
pub fn estimate_value(seconds: u64) -> u32 {
    Estimator::global().estimate_value(seconds)
}

fn calibrate() -> Duration {
    let minter = TokenMinter::new();
    let request = MintRequest::new(CALIBRATION_RESOURCE, CALIBRATION_BITS);
    let started = Instant::now();
    for _ in 0..CALIBRATION_ROUNDS {
        if let Err(e) = minter.mint(&request) {
            warn!(error = %e, "calibration mint failed");
        }
    }
    let per_mint = started.elapsed() / CALIBRATION_ROUNDS;
    info!(
        per_mint_ms = per_mint.as_millis() as u64,
        bits = CALIBRATION_BITS,
        "calibrated mint timing"
    );
    per_mint
}
