use rand::rngs::OsRng;
use rand::{Rng, SeedableRng, TryRngCore};
use rand_chacha::ChaCha20Rng;

/// Source of uniformly distributed integers for dice and session tokens.
///
/// Implementations must return a value in `[min, max]` inclusive and never
/// fail; callers guarantee `min <= max`.
pub trait RandomSource {
    fn random_int(&mut self, min: u32, max: u32) -> u32;
}

/// Draws from operating-system entropy, falling back to a ChaCha20 stream
/// when the entropy source reports an error.
///
/// The source is probed once on construction, so [`is_degraded`](Self::is_degraded)
/// already reflects an unavailable OS generator before the first draw. A
/// failure on any later draw switches to the fallback for good.
///
/// # Examples
///
/// ```
/// use taixiu_engine::rng::{RandomSource, SecureRandom};
///
/// let mut rng = SecureRandom::new();
/// let face = rng.random_int(1, 6);
/// assert!((1..=6).contains(&face));
/// ```
#[derive(Debug)]
pub struct SecureRandom<E: TryRngCore = OsRng> {
    entropy: E,
    fallback: ChaCha20Rng,
    /// Set once the entropy source has failed; stays on the fallback afterwards
    degraded: bool,
}

impl SecureRandom {
    pub fn new() -> Self {
        Self::with_entropy(OsRng)
    }
}

impl<E: TryRngCore> SecureRandom<E> {
    /// Uses `entropy` in place of the OS generator.
    pub fn with_entropy(mut entropy: E) -> Self {
        let fallback = ChaCha20Rng::try_from_os_rng().unwrap_or_else(|_| {
            ChaCha20Rng::seed_from_u64(clock_seed())
        });
        let degraded = match entropy.try_next_u32() {
            Ok(_) => false,
            Err(e) => {
                tracing::warn!(error = %e, "OS entropy unavailable, using ChaCha20 fallback");
                true
            }
        };
        Self {
            entropy,
            fallback,
            degraded,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

impl Default for SecureRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: TryRngCore> RandomSource for SecureRandom<E> {
    fn random_int(&mut self, min: u32, max: u32) -> u32 {
        if !self.degraded {
            let entropy = &mut self.entropy;
            match uniform_in(min, max, || entropy.try_next_u32()) {
                Ok(v) => return v,
                Err(e) => {
                    tracing::warn!(error = %e, "OS entropy unavailable, using ChaCha20 fallback");
                    self.degraded = true;
                }
            }
        }
        self.fallback.random_range(min..=max)
    }
}

/// Deterministic ChaCha20 source. The same seed always yields the same rolls,
/// which makes simulations and replays reproducible.
///
/// ```
/// use taixiu_engine::rng::{RandomSource, SeededRandom};
///
/// let mut a = SeededRandom::new(42);
/// let mut b = SeededRandom::new(42);
/// assert_eq!(a.random_int(1, 6), b.random_int(1, 6));
/// ```
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: ChaCha20Rng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn random_int(&mut self, min: u32, max: u32) -> u32 {
        self.rng.random_range(min..=max)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn random_int(&mut self, min: u32, max: u32) -> u32 {
        (**self).random_int(min, max)
    }
}

/// Maps raw 32-bit draws onto `[min, max]` by rejection sampling, so every
/// value in the range is equally likely.
fn uniform_in<E>(min: u32, max: u32, mut draw: impl FnMut() -> Result<u32, E>) -> Result<u32, E> {
    let span = max.wrapping_sub(min).wrapping_add(1);
    if span == 0 {
        // full u32 range
        return draw();
    }
    // 2^32 mod span; draws at or above 2^32 - rem would skew low values
    let rem = span.wrapping_neg() % span;
    loop {
        let v = draw()?;
        if rem == 0 || v < rem.wrapping_neg() {
            return Ok(min + v % span);
        }
    }
}

fn clock_seed() -> u64 {
    let now = chrono::Utc::now();
    now.timestamp_nanos_opt()
        .map(|n| n as u64)
        .unwrap_or_else(|| now.timestamp_millis() as u64)
}
