use core::mem::replace;

use rand_xoshiro::rand_core::RngCore;
use rug::{
    rand::{ThreadRandGen, ThreadRandState},
    Complete, Integer,
};

use crate::error::SqrtError;

// Reduces x into [0, n). Unlike %, the result is never negative.
pub(crate) fn reduce(x: Integer, n: &Integer) -> Integer {
    let mut r = x % n;
    if r < 0 {
        r += n;
    }
    r
}

/// Greatest common divisor of `a` and `b`, always non-negative.
pub fn gcd(a: &Integer, b: &Integer) -> Integer {
    let (mut a, mut b) = (a.clone(), b.clone());

    loop {
        if b == 0 {
            return a.abs();
        }
        a %= &b;
        if a == 0 {
            return b.abs();
        }
        b %= &a;
    }
}

/// Returns `(g, x, y)` with `a * x + b * y = g`, where `g` is a greatest common divisor of `a`
/// and `b`. Quotients are rounded towards negative infinity.
pub fn extended_gcd(a: &Integer, b: &Integer) -> (Integer, Integer, Integer) {
    if *a == 0 {
        return (b.clone(), Integer::ZERO, Integer::from(1));
    }
    // The first division would be by zero otherwise.
    if *b == 0 {
        return (a.clone(), Integer::from(1), Integer::ZERO);
    }

    let (mut a, mut b) = (a.clone(), b.clone());
    let (mut u_prev, mut v_prev) = (Integer::from(1), Integer::ZERO);
    let (mut u, mut v) = (Integer::ZERO, Integer::from(1));

    loop {
        let (q, r) = a.div_rem_floor(b.clone());
        a = replace(&mut b, r);

        if b == 0 {
            return (a, u, v);
        }

        let u_next = u_prev - (&q * &u).complete();
        let v_next = v_prev - (&q * &v).complete();
        u_prev = replace(&mut u, u_next);
        v_prev = replace(&mut v, v_next);
    }
}

/// Computes x in [0, n) with a * x = 1 mod n.
pub fn inverse_modulo(a: &Integer, n: &Integer) -> Result<Integer, SqrtError> {
    assert!(*n > 0, "modulus must be positive");

    let (g, x, _) = extended_gcd(a, n);
    if g != 1 {
        return Err(SqrtError::NoInverse {
            value: a.clone(),
            modulus: n.clone(),
        });
    }

    Ok(reduce(x, n))
}

/// Computes a^b mod n for n > 1 by square-and-multiply, scanning the bits of b from the least
/// significant one. The result lies in [0, n).
pub fn power_modulo(a: &Integer, b: &Integer, n: &Integer) -> Integer {
    assert!(*b >= 0, "exponent must be non-negative");
    assert!(*n > 1, "modulus must be greater than 1");

    let mut base = reduce(a.clone(), n);
    let mut c = Integer::from(1);
    let bits = b.significant_bits();

    for i in 0..bits {
        if b.get_bit(i) {
            c *= &base;
            c %= n;
        }
        if i + 1 < bits {
            base.square_mut();
            base %= n;
        }
    }

    c
}

/// Euler's criterion: a^((p - 1) / 2) mod p, which is 1 for nonzero squares, p - 1 for
/// non-squares and 0 for multiples of p, provided p is an odd prime.
pub fn legendre_symbol(a: &Integer, p: &Integer) -> Integer {
    assert!(p.is_odd(), "legendre symbol needs an odd modulus");

    power_modulo(a, &(Integer::from(p - 1u32) >> 1u32), p)
}

pub fn is_quadratic_residue(a: &Integer, p: &Integer) -> bool {
    legendre_symbol(a, p) == 1
}

// Feeds an injected rng to GMP's random functions.
struct RngCoreGen<'a, R: RngCore>(&'a mut R);

impl<R: RngCore> ThreadRandGen for RngCoreGen<'_, R> {
    fn gen(&mut self) -> u32 {
        self.0.next_u32()
    }
}

/// Draws a uniformly distributed integer from [0, bound).
pub fn random_below<R: RngCore>(bound: &Integer, rng: &mut R) -> Integer {
    assert!(*bound > 0, "cannot sample from an empty range");

    let mut gen = RngCoreGen(rng);
    let mut state = ThreadRandState::new_custom(&mut gen);
    Integer::from(bound.random_below_ref(&mut state))
}

/// Draws a uniformly distributed integer from [low, high).
pub fn random_in_range<R: RngCore>(low: &Integer, high: &Integer, rng: &mut R) -> Integer {
    assert!(low < high, "cannot sample from an empty range");

    random_below(&(high - low).complete(), rng) + low
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_xoshiro::{rand_core::SeedableRng, Xoshiro256PlusPlus};

    fn int(x: i64) -> Integer {
        Integer::from(x)
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(&int(12), &int(18)), 6);
        assert_eq!(gcd(&int(17), &int(5)), 1);
        assert_eq!(gcd(&int(0), &int(7)), 7);
        assert_eq!(gcd(&int(7), &int(0)), 7);
        assert_eq!(gcd(&int(-12), &int(18)), 6);
    }

    #[test]
    fn test_extended_gcd_base_cases() {
        assert_eq!(extended_gcd(&int(0), &int(9)), (int(9), int(0), int(1)));
        assert_eq!(extended_gcd(&int(9), &int(0)), (int(9), int(1), int(0)));
    }

    #[test]
    fn test_extended_gcd_bezout() {
        let mut xo = Xoshiro256PlusPlus::seed_from_u64(1000000009);

        for _ in 0..1000 {
            let a = Integer::from(xo.next_u64());
            let b = Integer::from(xo.next_u64() >> (xo.next_u32() % 64));
            let (g, x, y) = extended_gcd(&a, &b);
            assert_eq!(g, a.clone().gcd(&b));
            assert_eq!((&a * &x).complete() + (&b * &y).complete(), g);
        }
    }

    #[test]
    fn test_inverse_modulo() {
        assert_eq!(inverse_modulo(&int(3), &int(11)).unwrap(), 4);
        assert_eq!(inverse_modulo(&int(-3), &int(11)).unwrap(), 7);
        assert_eq!(
            inverse_modulo(&int(6), &int(9)),
            Err(SqrtError::NoInverse {
                value: int(6),
                modulus: int(9)
            })
        );

        let mut xo = Xoshiro256PlusPlus::seed_from_u64(42);
        let n = Integer::from(998244353);
        for _ in 0..1000 {
            let a = random_in_range(&int(1), &n, &mut xo);
            let x = inverse_modulo(&a, &n).unwrap();
            assert!(x >= 0 && x < n);
            assert_eq!((a * x) % &n, 1);
        }
    }

    #[test]
    fn test_power_modulo() {
        assert_eq!(power_modulo(&int(2), &int(10), &int(1000)), 24);
        assert_eq!(power_modulo(&int(0), &int(0), &int(7)), 1);
        assert_eq!(power_modulo(&int(5), &int(0), &int(13)), 1);
        assert_eq!(power_modulo(&int(-2), &int(3), &int(7)), 6);

        let mut xo = Xoshiro256PlusPlus::seed_from_u64(7);
        for _ in 0..200 {
            let n = Integer::from(xo.next_u64() | 2);
            let a = Integer::from(xo.next_u64());
            let b = Integer::from(xo.next_u64());
            assert_eq!(
                power_modulo(&a, &b, &n),
                a.pow_mod_ref(&b, &n).map(Integer::from).unwrap()
            );
        }
    }

    #[test]
    fn test_legendre_symbol() {
        assert_eq!(legendre_symbol(&int(9), &int(17)), 1);
        assert_eq!(legendre_symbol(&int(3), &int(17)), 16);
        assert_eq!(legendre_symbol(&int(34), &int(17)), 0);
        assert!(is_quadratic_residue(&int(8), &int(17)));
        assert!(!is_quadratic_residue(&int(5), &int(17)));

        let p = Integer::from(10000019);
        let mut xo = Xoshiro256PlusPlus::seed_from_u64(1);
        for _ in 0..500 {
            let a = random_below(&p, &mut xo);
            let expected = match a.legendre(&p) {
                0 => int(0),
                1 => int(1),
                _ => int(10000018),
            };
            assert_eq!(legendre_symbol(&a, &p), expected);
        }
    }

    #[test]
    #[should_panic]
    fn test_power_modulo_unit_modulus() {
        power_modulo(&int(5), &int(0), &int(1));
    }

    #[test]
    #[should_panic]
    fn test_legendre_symbol_even_modulus() {
        legendre_symbol(&int(3), &int(16));
    }

    #[test]
    fn test_random_in_range() {
        let mut xo = Xoshiro256PlusPlus::seed_from_u64(3);
        let (low, high) = (int(2), int(11));
        let mut seen = [false; 11];

        for _ in 0..1000 {
            let x = random_in_range(&low, &high, &mut xo);
            assert!(x >= low && x < high);
            seen[x.to_usize().unwrap()] = true;
        }
        assert!(seen[2..].iter().all(|&s| s));
    }

    #[test]
    fn test_random_below_follows_seed() {
        let bound = (Integer::from(1) << 300u32) - 17u32;
        let mut xo = Xoshiro256PlusPlus::seed_from_u64(1000000009);
        let mut yo = Xoshiro256PlusPlus::seed_from_u64(1000000009);

        for _ in 0..100 {
            let x = random_below(&bound, &mut xo);
            assert!(x >= 0 && x < bound);
            assert_eq!(x, random_below(&bound, &mut yo));
        }
        assert_eq!(random_below(&int(1), &mut xo), 0);
    }
}
