use std::cmp::Ordering;

use log::{debug, trace};
use rand::thread_rng;
use rand_xoshiro::rand_core::RngCore;
use rug::{Complete, Integer};

use crate::{
    error::SqrtError,
    nt::{inverse_modulo, legendre_symbol, power_modulo, random_in_range},
};

/// How [`find_non_residue`] picks its candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NonResidueSearch {
    /// Tries 2, 3, 4, ... in order. Reproducible for a given modulus.
    Deterministic,
    /// Draws candidates uniformly from [2, p).
    Randomized,
}

/// Outcome of [`tonelli_shanks`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SquareRoot {
    /// One of the two square roots. The other one is p minus this one.
    Root(Integer),
    /// The value is not a square modulo p.
    NoRoot,
}

impl SquareRoot {
    pub fn root(&self) -> Option<&Integer> {
        match self {
            SquareRoot::Root(x) => Some(x),
            SquareRoot::NoRoot => None,
        }
    }

    pub fn into_option(self) -> Option<Integer> {
        match self {
            SquareRoot::Root(x) => Some(x),
            SquareRoot::NoRoot => None,
        }
    }

    /// Both square roots modulo p, the smaller one first.
    pub fn roots(&self, p: &Integer) -> Option<(Integer, Integer)> {
        let x = self.root()?;
        let y = (p - x).complete();
        match x.cmp(&y) {
            Ordering::Greater => Some((y, x.clone())),
            _ => Some((x.clone(), y)),
        }
    }
}

/// Finds some b in [2, p) with Legendre symbol p - 1 modulo the odd prime p.
///
/// About two candidates are needed on average, since half of the nonzero residues are
/// non-squares. The rng is only used for [`NonResidueSearch::Randomized`].
pub fn find_non_residue<R: RngCore>(
    p: &Integer,
    search: NonResidueSearch,
    rng: &mut R,
) -> Result<Integer, SqrtError> {
    assert!(p.is_odd() && *p > 2, "modulus must be an odd number greater than 2");

    let two = Integer::from(2);
    let mut b = two.clone();
    let mut symbol = legendre_symbol(&b, p);
    let mut attempts: u64 = 1;

    while symbol == 1 {
        match search {
            NonResidueSearch::Deterministic => b += 1,
            NonResidueSearch::Randomized => b = random_in_range(&two, p, rng),
        }
        symbol = legendre_symbol(&b, p);
        attempts += 1;
    }

    // For prime p the symbol of a unit is either 1 or p - 1.
    if symbol != (p - 1u32).complete() {
        return Err(SqrtError::CompositeModulus {
            p: p.clone(),
            witness: b,
        });
    }

    debug!("chose the non-residue b = {} after {} attempts", &b, attempts);
    Ok(b)
}

/// Computes a square root of a modulo the odd prime p, searching for the auxiliary non-residue
/// deterministically or with the thread-local rng.
///
/// The primality of p is not tested here, see [`crate::is_prime`].
pub fn tonelli_shanks(
    a: &Integer,
    p: &Integer,
    deterministic: bool,
) -> Result<SquareRoot, SqrtError> {
    let search = if deterministic {
        NonResidueSearch::Deterministic
    } else {
        NonResidueSearch::Randomized
    };
    tonelli_shanks_with(a, p, search, &mut thread_rng())
}

pub fn tonelli_shanks_with<R: RngCore>(
    a: &Integer,
    p: &Integer,
    search: NonResidueSearch,
    rng: &mut R,
) -> Result<SquareRoot, SqrtError> {
    if *p <= 2 {
        return Err(SqrtError::ModulusTooSmall { p: p.clone() });
    }
    if p.is_even() {
        return Err(SqrtError::EvenModulus { p: p.clone() });
    }
    if *a <= 0 || a >= p {
        return Err(SqrtError::ResidueOutOfRange {
            a: a.clone(),
            p: p.clone(),
        });
    }

    let p_minus_one = (p - 1u32).complete();

    // Quick Fermat test. Cheap compared to the rest and catches most composite moduli.
    if power_modulo(a, &p_minus_one, p) != 1 {
        return Err(SqrtError::CompositeModulus {
            p: p.clone(),
            witness: a.clone(),
        });
    }

    if legendre_symbol(a, p) != 1 {
        return Ok(SquareRoot::NoRoot);
    }

    let b = find_non_residue(p, search, rng)?;
    let b_inverse = inverse_modulo(&b, p)?;

    solve(a.clone(), p, &b, &b_inverse).map(SquareRoot::Root)
}

// Loop invariant: a^((p - 1) / 2^k) = 1 mod p, with 0 < a < p.
//
// Each pass walks m = (p - 1) / 2^k down while a^m stays 1. If m becomes odd, a^((m + 1) / 2)
// is a square root of a. If a^m hits -1 instead, a is multiplied by b^(2^(k - 1)), which is -1
// when raised to m, so the invariant holds again for the same k. The next pass therefore ends at a
// strictly larger k, which bounds the number of passes by the 2-adic valuation of p - 1.
//
// Every multiplication by b^(2^(k - 1)) is undone at the end by multiplying the root with
// b^(-2^(k - 2)), whose square is the inverse of the factor.
fn solve(
    mut a: Integer,
    p: &Integer,
    b: &Integer,
    b_inverse: &Integer,
) -> Result<Integer, SqrtError> {
    let p_minus_one = (p - 1u32).complete();
    let mut k: u32 = 1;
    let mut reductions: Vec<u32> = Vec::new();

    let base_root = loop {
        // a^m = 1 here, by the Legendre test before the first pass and by the check after each
        // reduction.
        let mut m = Integer::from(&p_minus_one >> k);
        let mut a_m = Integer::from(1);

        while m.is_even() {
            m >>= 1u32;
            k += 1;
            a_m = power_modulo(&a, &m, p);

            if a_m == p_minus_one {
                break;
            }
            // Z/pZ is a field, so 1 and -1 are the only square roots of 1.
            if a_m != 1 {
                return Err(SqrtError::CompositeModulus {
                    p: p.clone(),
                    witness: a,
                });
            }
        }

        if a_m == 1 {
            break power_modulo(&a, &((m + 1u32) >> 1u32), p);
        }

        // a^m = -1 and k >= 2, since a^((p - 1) / 2) = 1 on entry.
        let b_power = Integer::from(1) << (k - 1);
        a *= power_modulo(b, &b_power, p);
        a %= p;

        if power_modulo(&a, &m, p) != 1 {
            return Err(SqrtError::BrokenInvariant(
                "a * b^(2^(k - 1)) raised to m must be 1",
            ));
        }

        trace!("reduced at k = {}, a is now {}", k, &a);
        reductions.push(k);
    };

    debug!(
        "found a square root after {} reductions, undoing them",
        reductions.len()
    );

    let mut root = base_root;
    for &k in reductions.iter().rev() {
        let b_power_half = Integer::from(1) << (k - 2);
        root *= power_modulo(b_inverse, &b_power_half, p);
        root %= p;
    }

    Ok(root)
}
