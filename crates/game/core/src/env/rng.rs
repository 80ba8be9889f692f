//! Seeded random source for battle draws.
//!
//! Every probabilistic decision in a battle (tie-breaks, random targets,
//! crits, focus checks, effect chances) consumes one draw from a single
//! [`RngSource`]. The order of draws is part of the replay contract.
//!
//! # Determinism
//!
//! [`Arc4Rng`] reproduces the ARC4-based generator historical battle logs
//! were produced with, so the same seed string yields the same sequence of
//! `f64` values bit for bit.

/// Source of uniform draws in `[0, 1)`.
pub trait RngSource {
    /// Draws the next value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Picks an index in `0..len` with `floor(draw * len)`.
    ///
    /// Callers must not pass `len == 0`; the result is clamped to `len - 1`.
    fn pick_index(&mut self, len: usize) -> usize {
        let draw = self.next_f64();
        let index = (draw * len as f64).floor() as usize;
        index.min(len.saturating_sub(1))
    }
}

impl<R: RngSource + ?Sized> RngSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

// ============================================================================
// ARC4
// ============================================================================

const WIDTH: f64 = 256.0;
const CHUNKS: usize = 6;
/// `WIDTH ^ CHUNKS`
const START_DENOM: f64 = 281_474_976_710_656.0;
/// `2 ^ 52`
const SIGNIFICANCE: f64 = 4_503_599_627_370_496.0;
/// `2 ^ 53`
const OVERFLOW: f64 = 9_007_199_254_740_992.0;

#[derive(Clone, Debug)]
struct Arc4 {
    i: u8,
    j: u8,
    s: [u8; 256],
}

impl Arc4 {
    fn new(key: &[u8]) -> Self {
        let key: &[u8] = if key.is_empty() { &[0] } else { key };
        let mut s = [0u8; 256];
        for (index, slot) in s.iter_mut().enumerate() {
            *slot = index as u8;
        }

        let mut j: u8 = 0;
        for i in 0..s.len() {
            let t = s[i];
            j = j.wrapping_add(key[i % key.len()]).wrapping_add(t);
            s[i] = s[j as usize];
            s[j as usize] = t;
        }

        let mut arc4 = Self { i: 0, j: 0, s };
        // The first 256 bytes of keystream are discarded.
        for _ in 0..256 {
            arc4.next_byte();
        }
        arc4
    }

    fn next_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        let t = self.s[self.i as usize];
        self.j = self.j.wrapping_add(t);
        self.s[self.i as usize] = self.s[self.j as usize];
        self.s[self.j as usize] = t;
        self.s[self.s[self.i as usize].wrapping_add(t) as usize]
    }

    fn next_chunk(&mut self, count: usize) -> u64 {
        (0..count).fold(0u64, |acc, _| acc * 256 + u64::from(self.next_byte()))
    }
}

/// Mixes the UTF-16 code units of `seed` into an ARC4 key.
fn mix_key(seed: &str) -> Vec<u8> {
    let mut key: Vec<u8> = Vec::new();
    let mut smear: u32 = 0;
    for (index, unit) in seed.encode_utf16().enumerate() {
        let slot = index & 0xff;
        let existing = key.get(slot).copied().unwrap_or(0);
        smear ^= u32::from(existing) * 19;
        let value = (smear.wrapping_add(u32::from(unit)) & 0xff) as u8;
        if slot < key.len() {
            key[slot] = value;
        } else {
            key.push(value);
        }
    }
    key
}

/// ARC4 keystream generator seeded from a string.
///
/// Produces doubles with 52 bits of significance, matching the generator
/// used by historical battle logs.
#[derive(Clone, Debug)]
pub struct Arc4Rng {
    arc4: Arc4,
}

impl Arc4Rng {
    pub fn from_seed(seed: &str) -> Self {
        Self {
            arc4: Arc4::new(&mix_key(seed)),
        }
    }
}

impl RngSource for Arc4Rng {
    fn next_f64(&mut self) -> f64 {
        let mut n = self.arc4.next_chunk(CHUNKS) as f64;
        let mut d = START_DENOM;
        let mut x: u32 = 0;
        while n < SIGNIFICANCE {
            n = (n + f64::from(x)) * WIDTH;
            d *= WIDTH;
            x = u32::from(self.arc4.next_byte());
        }
        while n >= OVERFLOW {
            n /= 2.0;
            d /= 2.0;
            x >>= 1;
        }
        (n + f64::from(x)) / d
    }
}

// ============================================================================
// Scripted sources
// ============================================================================

/// Replays a fixed list of draws, then returns `fallback` forever.
///
/// Used to script exact battle scenarios.
#[derive(Clone, Debug)]
pub struct SequenceRng {
    values: Vec<f64>,
    position: usize,
    fallback: f64,
}

impl SequenceRng {
    pub const DEFAULT_FALLBACK: f64 = 0.99;

    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            position: 0,
            fallback: Self::DEFAULT_FALLBACK,
        }
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Number of draws consumed so far.
    pub fn draws(&self) -> usize {
        self.position
    }
}

impl RngSource for SequenceRng {
    fn next_f64(&mut self) -> f64 {
        let value = self.values.get(self.position).copied().unwrap_or(self.fallback);
        self.position += 1;
        value
    }
}

/// Always returns the same draw.
#[derive(Clone, Copy, Debug)]
pub struct ConstantRng {
    value: f64,
    draws: usize,
}

impl ConstantRng {
    pub fn new(value: f64) -> Self {
        Self { value, draws: 0 }
    }

    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl RngSource for ConstantRng {
    fn next_f64(&mut self) -> f64 {
        self.draws += 1;
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arc4_matches_reference_stream() {
        let mut rng = Arc4Rng::from_seed("hello.");
        assert_eq!(rng.next_f64(), 0.9282578795792454);
        assert_eq!(rng.next_f64(), 0.3752569768646784);
    }

    #[test]
    fn arc4_is_deterministic_per_seed() {
        let mut a = Arc4Rng::from_seed("battle-42");
        let mut b = Arc4Rng::from_seed("battle-42");
        let mut c = Arc4Rng::from_seed("battle-43");
        let first: Vec<f64> = (0..32).map(|_| a.next_f64()).collect();
        let second: Vec<f64> = (0..32).map(|_| b.next_f64()).collect();
        let third: Vec<f64> = (0..32).map(|_| c.next_f64()).collect();
        assert_eq!(first, second);
        assert_ne!(first, third);
        assert!(first.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn pick_index_floors_and_clamps() {
        let mut rng = SequenceRng::new(vec![0.0, 0.5, 0.999, 1.0]);
        assert_eq!(rng.pick_index(4), 0);
        assert_eq!(rng.pick_index(4), 2);
        assert_eq!(rng.pick_index(4), 3);
        assert_eq!(rng.pick_index(4), 3);
        assert_eq!(rng.draws(), 4);
    }

    #[test]
    fn sequence_falls_back_when_exhausted() {
        let mut rng = SequenceRng::new(vec![0.1]).with_fallback(0.4);
        assert_eq!(rng.next_f64(), 0.1);
        assert_eq!(rng.next_f64(), 0.4);
        assert_eq!(rng.next_f64(), 0.4);
    }
}
