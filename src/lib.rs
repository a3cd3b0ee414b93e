//! Square roots modulo odd primes of arbitrary size, using the Tonelli-Shanks algorithm.
//!
//! ```
//! use rug::Integer;
//! use tonelli::{tonelli_shanks, SquareRoot};
//!
//! let p = Integer::from(41);
//! let root = tonelli_shanks(&Integer::from(39), &p, true).unwrap();
//! assert_eq!(root.roots(&p), Some((Integer::from(11), Integer::from(30))));
//! assert_eq!(
//!     tonelli_shanks(&Integer::from(3), &p, true).unwrap(),
//!     SquareRoot::NoRoot
//! );
//! ```

mod error;
mod mod_sqrt;
mod nt;
mod prime;

pub use error::SqrtError;
pub use mod_sqrt::{
    find_non_residue, tonelli_shanks, tonelli_shanks_with, NonResidueSearch, SquareRoot,
};
pub use nt::{
    extended_gcd, gcd, inverse_modulo, is_quadratic_residue, legendre_symbol, power_modulo,
    random_below, random_in_range,
};
pub use prime::{is_prime, is_prime_with, next_prime, next_prime_with, FermatParams};
