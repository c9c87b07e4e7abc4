/**
 * Finite-field Diffie-Hellman.
 *  - Group parameters and the well-known MODP groups
 *  - Private/public key generation
 *  - Shared secret computation
 *  - SP 800-56A single-step key derivation
 *  - PEM/DER encoding of group parameters
 */
pub mod crypto;

pub mod prelude {
    pub use crate::crypto::{
        derive_key, DhError, Group, HashFunction, NamedGroup, PrivateKey, PublicKey, Secret,
        SlimPublicKey, GROUP1, GROUP14,
    };
}
