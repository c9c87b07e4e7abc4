//! Single-step key derivation (NIST SP 800-56A, section 5.8.1)
//!
//! The derived key is the truncated concatenation of
//! `H(counter || Z || OtherInfo)` for `counter = 1, 2, ...`, where the
//! counter is a 32-bit big-endian integer and `Z` is the minimal
//! big-endian encoding of the shared secret. Each block uses a fresh hash
//! state, so both parties derive identical keys from identical inputs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

use super::{DhError, Secret};

/// Derive `key_len` bytes from a shared secret using the hash `D`
///
/// `other_info` binds the key to its context (party identifiers, protocol
/// labels, ...) and may be empty.
///
/// # Errors
///
/// Returns [`DhError::KeyLengthTooLarge`] if more than `2^32 - 1` hash
/// blocks would be needed.
pub fn derive_key<D: Digest>(
    secret: &Secret,
    key_len: usize,
    other_info: &[u8],
) -> Result<Zeroizing<Vec<u8>>, DhError> {
    let hash_len = <D as Digest>::output_size();
    let reps = u32::try_from(key_len.div_ceil(hash_len))
        .map_err(|_| DhError::KeyLengthTooLarge(key_len))?;

    let z = secret.to_bytes_be();
    let mut out = Zeroizing::new(Vec::with_capacity(reps as usize * hash_len));

    for counter in 1..=reps {
        let mut hasher = D::new();
        hasher.update(counter.to_be_bytes());
        hasher.update(&*z);
        hasher.update(other_info);
        out.extend_from_slice(&hasher.finalize());
    }

    tracing::trace!(key_len, reps, hash_len, "derived key");

    out.truncate(key_len);
    Ok(out)
}

/// Hash functions the KDF can be instantiated with at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HashFunction {
    Sha224,
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl HashFunction {
    pub const ALL: [HashFunction; 4] = [
        HashFunction::Sha224,
        HashFunction::Sha256,
        HashFunction::Sha384,
        HashFunction::Sha512,
    ];

    /// Digest size in bytes
    pub fn output_size(&self) -> usize {
        match self {
            HashFunction::Sha224 => <Sha224 as Digest>::output_size(),
            HashFunction::Sha256 => <Sha256 as Digest>::output_size(),
            HashFunction::Sha384 => <Sha384 as Digest>::output_size(),
            HashFunction::Sha512 => <Sha512 as Digest>::output_size(),
        }
    }

    /// [`derive_key`] with this hash
    pub fn derive_key(
        &self,
        secret: &Secret,
        key_len: usize,
        other_info: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, DhError> {
        match self {
            HashFunction::Sha224 => derive_key::<Sha224>(secret, key_len, other_info),
            HashFunction::Sha256 => derive_key::<Sha256>(secret, key_len, other_info),
            HashFunction::Sha384 => derive_key::<Sha384>(secret, key_len, other_info),
            HashFunction::Sha512 => derive_key::<Sha512>(secret, key_len, other_info),
        }
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HashFunction::Sha224 => "sha224",
            HashFunction::Sha256 => "sha256",
            HashFunction::Sha384 => "sha384",
            HashFunction::Sha512 => "sha512",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for HashFunction {
    type Err = DhError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha224" => Ok(HashFunction::Sha224),
            "sha256" => Ok(HashFunction::Sha256),
            "sha384" => Ok(HashFunction::Sha384),
            "sha512" => Ok(HashFunction::Sha512),
            other => Err(DhError::Parse(format!("unknown hash function {other:?}"))),
        }
    }
}
