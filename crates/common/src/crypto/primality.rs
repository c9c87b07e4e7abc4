use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::TryCryptoRng;

use super::keys::random_below;
use super::{DhError, Group};

/// Miller-Rabin rounds used for group checks, error rate below 4^-20
pub const DEFAULT_MR_ROUNDS: usize = 20;

const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Probabilistic primality test
///
/// Trial division by the primes below 100, then `rounds` Miller-Rabin
/// rounds with bases drawn uniformly from `[2, n - 2]`.
///
/// # Errors
///
/// Returns [`DhError::RandomSource`] if the random source fails.
pub fn is_probable_prime<R>(n: &BigUint, rounds: usize, rng: &mut R) -> Result<bool, DhError>
where
    R: TryCryptoRng + ?Sized,
{
    let two = BigUint::from(2u32);
    if n < &two {
        return Ok(false);
    }
    for small in SMALL_PRIMES {
        if *n == BigUint::from(small) {
            return Ok(true);
        }
        if (n % small).is_zero() {
            return Ok(false);
        }
    }

    // n > 97 from here on, so n - 3 is a valid sampling bound
    let one = BigUint::one();
    let n_minus_one = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;
    let base_range = n - 3u32;

    'witness: for _ in 0..rounds {
        let a = random_below(rng, &base_range)? + &two;
        let mut y = a.modpow(&d, n);
        if y == one || y == n_minus_one {
            continue;
        }
        for _ in 1..s {
            y = (&y * &y) % n;
            if y == n_minus_one {
                continue 'witness;
            }
            if y == one {
                return Ok(false);
            }
        }
        return Ok(false);
    }

    Ok(true)
}

/// Outcome of [`Group::check`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupCheck {
    /// `p` passed the primality test
    pub prime: bool,
    /// `q = (p - 1) / 2` passed the primality test
    pub safe_prime: bool,
    /// `g^q mod p == 1`, so `g` lies in the order-q subgroup
    pub generator_in_subgroup: bool,
}

impl GroupCheck {
    pub fn is_sound(&self) -> bool {
        self.prime && self.safe_prime && self.generator_in_subgroup
    }
}

impl Group {
    /// Verify the group is a safe-prime group with a subgroup generator
    ///
    /// Parameters loaded from outside should pass this before use. The
    /// well-known groups always do.
    pub fn check<R>(&self, rounds: usize, rng: &mut R) -> Result<GroupCheck, DhError>
    where
        R: TryCryptoRng + ?Sized,
    {
        self.validate()?;

        let q = self.q();
        let prime = is_probable_prime(self.p(), rounds, rng)?;
        let safe_prime = prime && is_probable_prime(&q, rounds, rng)?;
        let generator_in_subgroup = self.g().modpow(&q, self.p()).is_one();

        tracing::debug!(
            bits = self.bits(),
            prime,
            safe_prime,
            generator_in_subgroup,
            "checked dh group"
        );

        Ok(GroupCheck {
            prime,
            safe_prime,
            generator_in_subgroup,
        })
    }
}
