//! Park-Miller Linear Congruential Generator (MINSTD)
//!
//! Maze layouts are a pure function of `(grid size, seed)`, so a seed can be
//! shared to replay the same heart maze anywhere.
//!
//! Constants:
//! - Multiplier (a): 48271
//! - Modulus (m): 2^31 - 1 = 2147483647
//!
//! Reference: https://en.wikipedia.org/wiki/Lehmer_random_number_generator

const A: u64 = 48271;
const M: u64 = 2147483647; // 2^31 - 1

/// Seeded pseudo-random source for maze carving
///
/// Same seed always produces the same sequence.
#[derive(Clone, Debug)]
pub struct SimpleLCG {
    state: u32,
}

impl SimpleLCG {
    /// Create a new LCG with the given seed
    ///
    /// The state must stay in `1..M`: a zero seed would lock the generator
    /// at zero and `M` itself is congruent to zero, so both map to 1.
    pub fn new(seed: u32) -> Self {
        let state = (seed as u64 % M) as u32;
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    /// Next raw value in `1..M`
    pub fn next_u32(&mut self) -> u32 {
        self.state = ((self.state as u64 * A) % M) as u32;
        self.state
    }

    /// Uniform index in `[0, len)`
    ///
    /// Integer-only scaling, so results do not depend on float rounding.
    /// `len` must be non-zero.
    pub fn choice_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "choice_index on an empty range");
        let scaled = (self.next_u32() as u64 * len as u64) / M;
        scaled as usize
    }

    /// Uniform integer in `[a, b]` (inclusive)
    pub fn randint(&mut self, a: usize, b: usize) -> usize {
        a + self.choice_index(b - a + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = SimpleLCG::new(12345);
        let mut rng2 = SimpleLCG::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_degenerate_seeds() {
        // Both degenerate seeds fall back to the state of seed 1
        let expected = SimpleLCG::new(1).next_u32();
        assert_eq!(SimpleLCG::new(0).next_u32(), expected);
        assert_eq!(SimpleLCG::new(M as u32).next_u32(), expected);
    }

    #[test]
    fn test_known_first_value() {
        // 1 * 48271 mod (2^31 - 1)
        assert_eq!(SimpleLCG::new(1).next_u32(), 48271);
    }

    #[test]
    fn test_choice_index_range() {
        let mut rng = SimpleLCG::new(54321);

        for len in 1..=4 {
            for _ in 0..250 {
                assert!(rng.choice_index(len) < len);
            }
        }
    }

    #[test]
    fn test_randint() {
        let mut rng = SimpleLCG::new(11111);

        for _ in 0..100 {
            let val = rng.randint(5, 10);
            assert!((5..=10).contains(&val), "randint {} not in [5, 10]", val);
        }
    }

    #[test]
    fn test_choice_index_covers_all_slots() {
        let mut rng = SimpleLCG::new(2918957128);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[rng.choice_index(4)] = true;
        }
        assert_eq!(seen, [true; 4]);
    }
}
