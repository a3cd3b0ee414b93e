use std::env;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use rand_xoshiro::{
    rand_core::{RngCore, SeedableRng},
    Xoshiro256PlusPlus,
};
use rug::Integer;

use tonelli::{
    is_prime_with, tonelli_shanks_with, FermatParams, NonResidueSearch, SqrtError, SquareRoot,
};

/// Solves x^2 = a (mod p) for an odd prime p.
#[derive(Parser, Debug)]
#[command(name = "tonelli", version, allow_negative_numbers = true)]
struct Cli {
    /// The number to take the square root of, 0 < a < p.
    a: Integer,

    /// An odd prime.
    p: Integer,

    /// Do not check that p is a prime.
    #[arg(long)]
    no_prime_test: bool,

    /// Search for the auxiliary non-residue randomly instead of trying 2, 3, 4, ...
    #[arg(long)]
    rnd: bool,

    /// Seed for the random number generator.
    #[arg(long)]
    seed: Option<u64>,

    /// Fermat witnesses per bit of p used by the primality test.
    #[arg(long, default_value_t = FermatParams::DEFAULT_WITNESSES_PER_BIT)]
    witnesses_per_bit: u32,
}

fn validate(a: &Integer, p: &Integer) -> Result<(), SqrtError> {
    if *p < 3 {
        return Err(SqrtError::ModulusTooSmall { p: p.clone() });
    }
    if *a <= 0 || a >= p {
        return Err(SqrtError::ResidueOutOfRange {
            a: a.clone(),
            p: p.clone(),
        });
    }
    Ok(())
}

fn check_prime<R: RngCore>(
    p: &Integer,
    params: &FermatParams,
    rng: &mut R,
) -> Result<(), SqrtError> {
    if !is_prime_with(p, params, rng) {
        return Err(SqrtError::NotPrime { p: p.clone() });
    }
    Ok(())
}

fn report(a: &Integer, p: &Integer, root: &SquareRoot) -> String {
    match root.roots(p) {
        Some((x, y)) => format!("x = {} or x = {} (mod {})", x, y, p),
        None => format!("no square root of {} modulo {} exists", a, p),
    }
}

fn main() -> ExitCode {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let cli = Cli::parse();
    let (a, p) = (&cli.a, &cli.p);

    if let Err(e) = validate(a, p) {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    let mut xo = Xoshiro256PlusPlus::seed_from_u64(cli.seed.unwrap_or_else(rand::random));

    if !cli.no_prime_test {
        let params = FermatParams::new(cli.witnesses_per_bit);
        if let Err(e) = check_prime(p, &params, &mut xo) {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
        info!("{} passed the primality test", p);
    }

    let search = if cli.rnd {
        NonResidueSearch::Randomized
    } else {
        NonResidueSearch::Deterministic
    };

    match tonelli_shanks_with(a, p, search, &mut xo) {
        Ok(root) => {
            println!("{}", report(a, p, &root));
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
