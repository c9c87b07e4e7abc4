//! Finite-field Diffie-Hellman key agreement
//!
//! This module provides everything two parties need to agree on a
//! symmetric key over an insecure channel:
//!
//! - **Groups**: a prime modulus and generator (`Group`), including the
//!   well-known 1024-bit (`GROUP1`) and 2048-bit (`GROUP14`) MODP groups
//! - **Key pairs**: a private exponent and its public value
//!   (`PrivateKey`/`PublicKey`/`SlimPublicKey`)
//! - **Shared secrets**: `peer_gx ^ x mod p` (`Secret`)
//! - **Key derivation**: the NIST SP 800-56A single-step KDF (`derive_key`)
//!
//! # Protocol
//!
//! 1. Both parties agree on a `Group` (usually one of the predefined ones)
//! 2. Each generates a `PrivateKey` from a cryptographic RNG and sends the
//!    other its public value
//! 3. Each computes the shared `Secret` from its own private key and the
//!    peer's public value; the two secrets are equal
//! 4. Each derives the same symmetric key with `derive_key`, using the same
//!    hash, length and context bytes
//!
//! Public values received over the network should go through
//! `PrivateKey::compute_secret_checked`, which rejects values outside the
//! prime-order subgroup.
//!
//! # Parameter files
//!
//! Groups encode to and decode from PKCS#3 `DH PARAMETERS` PEM documents;
//! parameters loaded from outside should be verified with `Group::check`.

mod error;
mod group;
mod kdf;
mod keys;
mod params;
mod primality;
mod secret;

pub use error::DhError;
pub use group::{Group, NamedGroup, GROUP1, GROUP14};
pub use kdf::{derive_key, HashFunction};
pub use keys::{PrivateKey, PublicKey, SlimPublicKey};
pub use primality::{is_probable_prime, GroupCheck, DEFAULT_MR_ROUNDS};
pub use secret::{PeerPublic, Secret};
