use std::fmt;

use num_bigint::BigUint;
use rand::TryCryptoRng;
use zeroize::Zeroizing;

use super::group::check_params;
use super::{DhError, Group};

/// Public half of a Diffie-Hellman key pair
///
/// Carries the group parameters alongside `gx = g^x mod p`, so a receiver
/// can tell which group the value belongs to. `gx` is the only value derived
/// from the private exponent that is ever exposed.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    p: BigUint,
    g: BigUint,
    gx: BigUint,
}

impl PublicKey {
    /// Assemble a public key from values decoded by some transport
    ///
    /// # Errors
    ///
    /// Fails if `p` or `g` is missing or `g` is out of range.
    pub fn from_parts(p: BigUint, g: BigUint, gx: BigUint) -> Result<Self, DhError> {
        check_params(&p, &g)?;
        Ok(Self { p, g, gx })
    }

    /// Check the embedded group parameters before they are used
    pub fn validate(&self) -> Result<(), DhError> {
        check_params(&self.p, &self.g)
    }

    pub fn p(&self) -> &BigUint {
        &self.p
    }

    pub fn g(&self) -> &BigUint {
        &self.g
    }

    pub fn gx(&self) -> &BigUint {
        &self.gx
    }

    /// Drop the group parameters, keeping only the public value
    pub fn slim(&self) -> SlimPublicKey {
        SlimPublicKey {
            gx: self.gx.clone(),
        }
    }

    /// Minimal big-endian encoding of the public value
    pub fn to_bytes_be(&self) -> Vec<u8> {
        self.gx.to_bytes_be()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("bits", &self.p.bits())
            .field("g", &self.g)
            .field("gx", &format_args!("{:x}", self.gx))
            .finish()
    }
}

/// Public value without group parameters
///
/// For protocols where both sides agreed on the group out of band.
#[derive(Clone, PartialEq, Eq)]
pub struct SlimPublicKey {
    gx: BigUint,
}

impl SlimPublicKey {
    /// Parse a public value from its big-endian bytes
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        Self {
            gx: BigUint::from_bytes_be(bytes),
        }
    }

    pub fn gx(&self) -> &BigUint {
        &self.gx
    }

    /// Minimal big-endian encoding of the public value
    pub fn to_bytes_be(&self) -> Vec<u8> {
        self.gx.to_bytes_be()
    }
}

impl From<BigUint> for SlimPublicKey {
    fn from(gx: BigUint) -> Self {
        Self { gx }
    }
}

impl fmt::Debug for SlimPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlimPublicKey")
            .field("gx", &format_args!("{:x}", self.gx))
            .finish()
    }
}

/// Private half of a Diffie-Hellman key pair
///
/// Holds the private exponent `x` together with its public key. The
/// exponent has no accessor outside the crate and is redacted from `Debug`
/// output; there is deliberately no serialization for this type.
///
/// # Examples
///
/// ```ignore
/// let alice = PrivateKey::generate(&mut OsRng, &GROUP14)?;
/// let bob = PrivateKey::generate(&mut OsRng, &GROUP14)?;
///
/// let ours = alice.compute_secret(bob.public());
/// let theirs = bob.compute_secret(&alice.slim_public());
/// assert_eq!(ours.to_bytes_be(), theirs.to_bytes_be());
/// ```
pub struct PrivateKey {
    public: PublicKey,
    x: BigUint,
}

impl PrivateKey {
    /// Generate a key pair over `group`
    ///
    /// The exponent `x` is drawn uniformly from `[0, q)` with
    /// `q = (p - 1) / 2`, and `gx = g^x mod p`. The random source must be a
    /// cryptographic one; callers normally pass [`rand::rngs::OsRng`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The group parameters are missing or the generator is out of range
    /// - The random source fails
    pub fn generate<R>(rng: &mut R, group: &Group) -> Result<Self, DhError>
    where
        R: TryCryptoRng + ?Sized,
    {
        group.validate()?;

        let q = group.q();
        let x = random_below(rng, &q)?;
        let gx = group.g().modpow(&x, group.p());

        tracing::debug!(bits = group.bits(), "generated dh key pair");

        Ok(Self {
            public: PublicKey {
                p: group.p().clone(),
                g: group.g().clone(),
                gx,
            },
            x,
        })
    }

    /// The public key matching this private key
    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    /// Just the public value, for protocols where the group is implicit
    pub fn slim_public(&self) -> SlimPublicKey {
        self.public.slim()
    }

    /// Check the embedded group parameters before they are used
    pub fn validate(&self) -> Result<(), DhError> {
        self.public.validate()
    }

    pub(crate) fn x(&self) -> &BigUint {
        &self.x
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public", &self.public)
            .field("x", &"<redacted>")
            .finish()
    }
}

/// Draw a uniform integer from `[0, bound)` by rejection sampling
///
/// Candidates are masked to the bit length of `bound`, so each draw is
/// accepted with probability above one half.
pub(crate) fn random_below<R>(rng: &mut R, bound: &BigUint) -> Result<BigUint, DhError>
where
    R: TryCryptoRng + ?Sized,
{
    let bits = bound.bits();
    if bits == 0 {
        return Err(DhError::MissingParameters);
    }

    let len = bits.div_ceil(8) as usize;
    let excess = (len as u64 * 8 - bits) as u32;
    let mut buf = Zeroizing::new(vec![0u8; len]);

    loop {
        rng.try_fill_bytes(&mut buf)
            .map_err(|e| DhError::RandomSource(e.to_string()))?;
        buf[0] &= 0xff >> excess;

        let candidate = BigUint::from_bytes_be(&buf);
        if &candidate < bound {
            return Ok(candidate);
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::VecDeque;
    use std::convert::Infallible;

    use rand::rngs::OsRng;
    use rand::TryRngCore;

    use super::*;
    use crate::crypto::GROUP1;

    /// Replays a fixed byte script, failing once it runs dry
    struct ScriptedRng(VecDeque<u8>);

    impl TryRngCore for ScriptedRng {
        type Error = std::io::Error;

        fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
            let mut buf = [0u8; 4];
            self.try_fill_bytes(&mut buf)?;
            Ok(u32::from_le_bytes(buf))
        }

        fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
            let mut buf = [0u8; 8];
            self.try_fill_bytes(&mut buf)?;
            Ok(u64::from_le_bytes(buf))
        }

        fn try_fill_bytes(&mut self, dst: &mut [u8]) -> Result<(), Self::Error> {
            if self.0.len() < dst.len() {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "entropy exhausted",
                ));
            }
            for byte in dst.iter_mut() {
                *byte = self.0.pop_front().unwrap_or_default();
            }
            Ok(())
        }
    }

    impl TryCryptoRng for ScriptedRng {}

    fn tiny_group() -> Group {
        // p = 23 = 2 * 11 + 1, and 2 has order 11
        Group::from_hex("17", 2).unwrap()
    }

    #[test]
    fn test_generate_range() {
        let q = GROUP1.q();
        for _ in 0..8 {
            let key = PrivateKey::generate(&mut OsRng, &GROUP1).unwrap();
            assert!(key.x() < &q);
            assert_eq!(key.public().p(), GROUP1.p());
            assert_eq!(key.public().g(), GROUP1.g());
            assert!(key.public().g() < key.public().p());
            assert_eq!(
                key.public().gx(),
                &GROUP1.g().modpow(key.x(), GROUP1.p())
            );
        }
    }

    #[test]
    fn test_rejection_sampling() {
        // q = 11 fits in 4 bits: 0xff masks to 15 and 0x0c is 12, both
        // rejected; 0x07 is the first acceptable draw
        let mut rng = ScriptedRng(VecDeque::from(vec![0xff, 0x0c, 0x07]));
        let key = PrivateKey::generate(&mut rng, &tiny_group()).unwrap();
        assert_eq!(key.x(), &BigUint::from(7u32));
        // 2^7 mod 23 = 128 - 115
        assert_eq!(key.public().gx(), &BigUint::from(13u32));
    }

    #[test]
    fn test_tiny_group_exponents_stay_in_range() {
        let group = tiny_group();
        let q = group.q();
        for _ in 0..200 {
            let key = PrivateKey::generate(&mut OsRng, &group).unwrap();
            assert!(key.x() < &q);
        }
    }

    #[test]
    fn test_random_source_failure() {
        let mut rng = ScriptedRng(VecDeque::new());
        let result = PrivateKey::generate(&mut rng, &GROUP1);
        assert!(matches!(result, Err(DhError::RandomSource(_))));

        // Runs dry mid-way through rejection sampling
        let mut rng = ScriptedRng(VecDeque::from(vec![0xff, 0xfe]));
        let result = PrivateKey::generate(&mut rng, &tiny_group());
        assert!(matches!(result, Err(DhError::RandomSource(_))));
    }

    #[test]
    fn test_generate_validates_group() {
        let group = Group::from_hex("17", 0).unwrap();
        let result = PrivateKey::generate(&mut OsRng, &group);
        assert!(matches!(result, Err(DhError::MissingParameters)));
    }

    #[test]
    fn test_infallible_rngs_are_accepted() {
        // Any CryptoRng gets an infallible TryCryptoRng impl
        fn assert_try_crypto<R: TryCryptoRng<Error = Infallible>>(_: &R) {}
        let rng = rand::rng();
        assert_try_crypto(&rng);

        let mut rng = rand::rng();
        assert!(PrivateKey::generate(&mut rng, &tiny_group()).is_ok());
    }

    #[test]
    fn test_slim_public() {
        let key = PrivateKey::generate(&mut OsRng, &GROUP1).unwrap();
        let slim = key.slim_public();
        assert_eq!(slim.gx(), key.public().gx());
        assert_eq!(slim.to_bytes_be(), key.public().to_bytes_be());
        assert_eq!(SlimPublicKey::from_bytes_be(&slim.to_bytes_be()), slim);
    }

    #[test]
    fn test_from_parts() {
        let key = PrivateKey::generate(&mut OsRng, &GROUP1).unwrap();
        let public = key.public();
        let rebuilt =
            PublicKey::from_parts(public.p().clone(), public.g().clone(), public.gx().clone())
                .unwrap();
        assert_eq!(&rebuilt, public);

        let result = PublicKey::from_parts(BigUint::default(), BigUint::from(2u32), 5u32.into());
        assert!(matches!(result, Err(DhError::MissingParameters)));
    }

    #[test]
    fn test_debug_redacts_exponent() {
        let mut rng = ScriptedRng(VecDeque::from(vec![0x07]));
        let key = PrivateKey::generate(&mut rng, &tiny_group()).unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("x: 7"));
    }
}
