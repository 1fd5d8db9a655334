//! Deterministic sequence generator
//!
//! A 32-bit linear congruential generator. Every consumer derives its own
//! sub-stream from the world seed plus a constant offset from [`streams`],
//! so adding a new consumer never shifts the numbers an existing one sees.

use rand::RngCore;

use crate::core::error::{Result, SimError};

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Seed offsets for independent sub-streams
pub mod streams {
    pub const WORLD: u64 = 0x0001_0000;
    pub const GOALS: u64 = 0x0002_0000;
    pub const FACTIONS: u64 = 0x0003_0000;
    pub const FACTION_TURNS: u64 = 0x0004_0000;
    pub const ACTION_RISKS: u64 = 0x0005_0000;
    pub const OMENS: u64 = 0x0006_0000;
    pub const DREAMS: u64 = 0x0007_0000;
    pub const EVENTS: u64 = 0x0008_0000;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        // Scramble so neighbouring seeds do not start on neighbouring states
        let mixed = splitmix64(seed);
        Self {
            state: ((mixed >> 32) as u32) ^ (mixed as u32),
        }
    }

    /// Sub-stream for one concern: `seed + offset`
    pub fn stream(seed: u64, offset: u64) -> Self {
        Self::new(seed.wrapping_add(offset))
    }

    /// Sub-stream keyed by additional coordinates such as (tick, region id)
    pub fn keyed(seed: u64, offset: u64, parts: &[u64]) -> Self {
        let mut key = seed.wrapping_add(offset);
        for &part in parts {
            key = splitmix64(key ^ part);
        }
        Self::new(key)
    }

    fn step(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state
    }

    /// Next value in [0, 1)
    pub fn next(&mut self) -> f64 {
        self.step() as f64 / TWO_POW_32
    }

    /// Integer in the inclusive range [min, max]; bounds are swapped if reversed
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let span = (hi - lo + 1) as f64;
        let offset = (self.next() * span).floor() as i64;
        (lo + offset).min(hi)
    }

    /// Float in [min, max)
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next() * (max - min)
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f64) -> bool {
        self.next() < p
    }

    /// Uniform pick from a non-empty slice
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T> {
        if items.is_empty() {
            return Err(SimError::InvalidArgument(
                "choice from an empty sequence".into(),
            ));
        }
        let idx = self.next_int(0, items.len() as i64 - 1) as usize;
        Ok(&items[idx])
    }

    /// Index picked with probability proportional to its weight.
    /// Returns None when no weight is positive.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }
        let mut roll = self.next() * total;
        let mut last_positive = None;
        for (i, &w) in weights.iter().enumerate() {
            if w <= 0.0 {
                continue;
            }
            last_positive = Some(i);
            if roll < w {
                return Some(i);
            }
            roll -= w;
        }
        last_positive
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.step() as u64;
        let lo = self.step() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// FNV-1a hash of the ambition text, used as the seed when none is given
pub fn seed_from_text(text: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    text.bytes()
        .fold(OFFSET, |hash, byte| (hash ^ byte as u64).wrapping_mul(PRIME))
}

fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
