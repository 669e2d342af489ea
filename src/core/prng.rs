// Minimal PRNG (no external crates).
//
// This is NOT cryptographically secure.
// It is the single random stream a `TrialSequencer` owns: every pointer and
// every shown-side draw comes from here, in a fixed order, so a seed fully
// determines the trial sequence.

#[derive(Debug, Clone)]
pub struct Prng {
    state: u64,
}

impl Prng {
    pub fn new(seed: u64) -> Self {
        // Avoid a zero state.
        let seed = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state: seed }
    }

    /// Seeded when `seed` is given, otherwise seeded from the wall clock.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::new(s),
            None => Self::new(entropy_seed()),
        }
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        // xorshift64*
        // Marsaglia / Vigna family. Simple, fast, decent for simulation noise.
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform in [0, 1) with 53 bits of precision.
    #[inline]
    pub fn next_f64_01(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Standard normal draw (Box-Muller, cosine branch only).
    ///
    /// Exactly two uniforms are consumed per call so the stream position after
    /// `n` draws does not depend on the values drawn.
    pub fn next_gaussian(&mut self) -> f64 {
        let u1 = self.next_f64_01().max(1e-300);
        let u2 = self.next_f64_01();
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }

    #[inline]
    pub fn gen_bool(&mut self) -> bool {
        self.next_u32() >> 31 == 1
    }
}

fn entropy_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    // splitmix64 finalizer so close timestamps give unrelated streams.
    let mut z = nanos.wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
