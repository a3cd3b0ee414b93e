use rand::thread_rng;
use rand_xoshiro::rand_core::RngCore;
use rug::{Complete, Integer};

use crate::nt::{gcd, power_modulo, random_in_range};

/// Parameters of the Fermat test in [`is_prime_with`].
///
/// The witness count is a heuristic. It leaves a small but nonzero chance of accepting a
/// composite and is not meant for cryptographic use.
#[derive(Clone, Copy, Debug)]
pub struct FermatParams {
    pub witnesses_per_bit: u32,
}

impl FermatParams {
    pub const DEFAULT_WITNESSES_PER_BIT: u32 = 4;

    pub fn new(witnesses_per_bit: u32) -> FermatParams {
        FermatParams { witnesses_per_bit }
    }

    fn witnesses(&self, n: &Integer) -> u64 {
        n.significant_bits() as u64 * self.witnesses_per_bit as u64
    }
}

impl Default for FermatParams {
    fn default() -> FermatParams {
        FermatParams::new(FermatParams::DEFAULT_WITNESSES_PER_BIT)
    }
}

pub fn is_prime(n: &Integer) -> bool {
    is_prime_with(n, &FermatParams::default(), &mut thread_rng())
}

// Fermat test with random witnesses, followed by trial division with 6i - 1 and 6i + 1 up to the
// square root of n. A witness sharing a factor with n rejects immediately, so Carmichael numbers
// are caught as soon as such a witness is drawn. Trial division makes this impractical for n much
// beyond 2^80.
pub fn is_prime_with<R: RngCore>(n: &Integer, params: &FermatParams, rng: &mut R) -> bool {
    if *n <= 1 {
        return false;
    }
    if *n <= 3 {
        return true;
    }
    if n.is_divisible_u(2) || n.is_divisible_u(3) {
        return false;
    }

    let two = Integer::from(2);
    let n_minus_one = Integer::from(n - 1u32);

    for _ in 0..params.witnesses(n) {
        let a = random_in_range(&two, n, rng);
        if gcd(&a, n) != 1 {
            return false;
        }
        if power_modulo(&a, &n_minus_one, n) != 1 {
            return false;
        }
    }

    let mut i = Integer::from(5);
    while (&i * &i).complete() <= *n {
        if n.is_divisible(&i) || n.is_divisible(&(&i + 2u32).complete()) {
            return false;
        }
        i += 6;
    }

    true
}

/// Smallest prime strictly greater than n.
pub fn next_prime(n: &Integer) -> Integer {
    next_prime_with(n, &FermatParams::default(), &mut thread_rng())
}

pub fn next_prime_with<R: RngCore>(n: &Integer, params: &FermatParams, rng: &mut R) -> Integer {
    if *n <= 1 {
        return Integer::from(2);
    }

    let mut n = n.clone();
    if n.is_even() {
        n += 1;
        if is_prime_with(&n, params, rng) {
            return n;
        }
    }

    loop {
        n += 2;
        if is_prime_with(&n, params, rng) {
            return n;
        }
    }
}
