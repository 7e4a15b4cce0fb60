//! RNG module - the deterministic random service behind refill and autoplay
//!
//! Boards never touch ambient randomness. Every random draw goes through a
//! [`SimpleRng`] owned by the board, so a board is a pure function of its seed
//! token and the sequence of commands applied to it.
//!
//! Seeds are strings (`"gccd"`, `"dcd"`, ...). A token is folded into the
//! generator state with 32-bit FNV-1a.

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Create a new RNG from a seed token
    pub fn from_token(token: &str) -> Self {
        Self::new(fnv1a32(token))
    }

    /// Reset the generator as if it had just been created from `token`
    pub fn reseed(&mut self, token: &str) {
        *self = Self::from_token(token);
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of an LCG with a power-of-two modulus
    /// cycle with a short period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Pick one element uniformly. Consumes exactly one draw, even for a
    /// single-element slice; `None` (without a draw) for an empty one.
    pub fn random_element<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_range(items.len() as u32) as usize;
        items.get(idx).copied()
    }

    /// Random integer in `[lo, hi)`; returns `lo` without drawing when the
    /// range is empty.
    pub fn random_between(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        let span = (hi as i64 - lo as i64) as u32;
        lo + self.next_range(span) as i32
    }

    /// Current generator state (enough to resume the exact sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

/// 32-bit FNV-1a over the token's UTF-8 bytes.
fn fnv1a32(token: &str) -> u32 {
    let mut h: u32 = 0x811c9dc5;
    for b in token.bytes() {
        h ^= b as u32;
        h = h.wrapping_mul(0x01000193);
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::from_token("gccd");
        let mut rng2 = SimpleRng::from_token("gccd");

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_tokens() {
        let mut rng1 = SimpleRng::from_token("gccd");
        let mut rng2 = SimpleRng::from_token("dcd");

        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_reseed_restarts_sequence() {
        let mut rng = SimpleRng::from_token("g");
        let first: Vec<u32> = (0..5).map(|_| rng.next_u32()).collect();

        rng.reseed("g");
        let again: Vec<u32> = (0..5).map(|_| rng.next_u32()).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn test_fnv_reference_values() {
        assert_eq!(fnv1a32(""), 0x811c9dc5);
        assert_eq!(fnv1a32("a"), 0xe40c292c);
    }

    #[test]
    fn test_next_range_bounds() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_range(6) < 6);
        }
        assert_eq!(rng.next_range(0), 0);
    }

    #[test]
    fn test_random_element_covers_all() {
        let mut rng = SimpleRng::from_token("cover");
        let items = [0u8, 1, 2, 3, 4, 5];
        let mut seen = [false; 6];
        for _ in 0..500 {
            let v = rng.random_element(&items).unwrap();
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
        assert_eq!(rng.random_element::<u8>(&[]), None);
    }

    #[test]
    fn test_random_between_half_open() {
        let mut rng = SimpleRng::from_token("between");
        for _ in 0..500 {
            let v = rng.random_between(-3, 4);
            assert!((-3..4).contains(&v));
        }

        let before = rng.state();
        assert_eq!(rng.random_between(5, 5), 5);
        assert_eq!(rng.state(), before);
    }
}
