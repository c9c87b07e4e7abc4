use std::fmt;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use zeroize::Zeroizing;

use super::{DhError, PrivateKey, PublicKey, SlimPublicKey};

/// Anything carrying a peer's public value
///
/// Secret computation only ever reads `gx`; the group comes from the
/// caller's own private key.
pub trait PeerPublic {
    fn gx(&self) -> &BigUint;
}

impl PeerPublic for PublicKey {
    fn gx(&self) -> &BigUint {
        PublicKey::gx(self)
    }
}

impl PeerPublic for SlimPublicKey {
    fn gx(&self) -> &BigUint {
        SlimPublicKey::gx(self)
    }
}

/// Shared group element agreed by both parties
///
/// Carries no group metadata. Treat it like a private key: it should be fed
/// to [`derive_key`](super::derive_key) and then dropped.
pub struct Secret(BigUint);

impl Secret {
    pub(crate) fn new(s: BigUint) -> Self {
        Self(s)
    }

    /// Minimal big-endian encoding of the shared element, no padding
    ///
    /// Zero encodes as an empty buffer. The buffer is wiped on drop.
    pub fn to_bytes_be(&self) -> Zeroizing<Vec<u8>> {
        if self.0.is_zero() {
            return Zeroizing::new(Vec::new());
        }
        Zeroizing::new(self.0.to_bytes_be())
    }

    /// Size of the shared element in bits
    pub fn bits(&self) -> u64 {
        self.0.bits()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Secret").field(&"<redacted>").finish()
    }
}

impl PrivateKey {
    /// Compute the shared secret `peer.gx ^ x mod p`
    ///
    /// Always reduces modulo this key's own `p`, which is why a
    /// [`SlimPublicKey`] works just as well as a full [`PublicKey`]. The
    /// peer value is used as-is; see [`PrivateKey::compute_secret_checked`]
    /// for the validating variant.
    pub fn compute_secret(&self, peer: &impl PeerPublic) -> Secret {
        Secret(peer.gx().modpow(self.x(), self.public().p()))
    }

    /// Compute the shared secret after validating the peer's public value
    ///
    /// The value must satisfy `1 < gx < p - 1` and lie in the order-q
    /// subgroup (`gx^q mod p == 1`), which rules out small-subgroup
    /// confinement of the result.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The key's group parameters are missing
    /// - The peer value is out of range or outside the subgroup
    pub fn compute_secret_checked(&self, peer: &impl PeerPublic) -> Result<Secret, DhError> {
        self.validate()?;

        let p = self.public().p();
        let gx = peer.gx();
        let one = BigUint::one();
        let p_minus_one = p - 1u32;

        if gx <= &one {
            return Err(DhError::InvalidPublicValue("gx <= 1"));
        }
        if gx >= &p_minus_one {
            return Err(DhError::InvalidPublicValue("gx >= p - 1"));
        }

        let q = &p_minus_one >> 1u32;
        if gx.modpow(&q, p) != one {
            return Err(DhError::InvalidPublicValue("gx outside the prime-order subgroup"));
        }

        Ok(self.compute_secret(peer))
    }
}
