use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::notation::{Move, ALL_MOVES};

/// `len` moves drawn uniformly from all 18 tokens; repeats are allowed.
pub fn scramble<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<Move> {
    (0..len)
        .map(|_| ALL_MOVES[rng.random_range(0..ALL_MOVES.len())])
        .collect()
}

pub fn splitmix64(mut value: u64) -> u64 {
    value = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = value;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(splitmix64(seed))
}
