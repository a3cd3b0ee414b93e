//! Errors reported by the solver and its helpers.

use rug::Integer;
use thiserror::Error;

/// Errors that may occur while computing a modular square root.
///
/// A residue without a square root is not an error, see [`crate::SquareRoot::NoRoot`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SqrtError {
    /// The modulus is 2 or smaller.
    #[error("modulus {p} must be greater than 2")]
    ModulusTooSmall { p: Integer },
    /// The modulus is even.
    #[error("modulus {p} must be odd")]
    EvenModulus { p: Integer },
    /// The value to take the root of does not lie strictly between 0 and the modulus.
    #[error("{a} must lie strictly between 0 and {p}")]
    ResidueOutOfRange {
        a: Integer,
        p: Integer,
    },
    /// The primality test rejected the modulus.
    #[error("{p} is not a prime")]
    NotPrime { p: Integer },
    /// The value has no inverse element with the given modulus.
    #[error("{value} has no inverse element modulo {modulus}")]
    NoInverse {
        value: Integer,
        modulus: Integer,
    },
    /// A consistency check that holds for every prime modulus failed.
    #[error("{witness} proves that the modulus {p} is not a prime")]
    CompositeModulus {
        p: Integer,
        witness: Integer,
    },
    /// An internal invariant of the root extraction does not hold.
    #[error("broken invariant: {0}")]
    BrokenInvariant(&'static str),
}
