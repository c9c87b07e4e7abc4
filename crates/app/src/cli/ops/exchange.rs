use clap::Args;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use rand::rngs::OsRng;
use rand::TryRngCore;

use common::prelude::{DhError, HashFunction, NamedGroup, PrivateKey};

/// Size of ChaCha20-Poly1305 nonce in bytes
const NONCE_SIZE: usize = 12;
/// Size of ChaCha20-Poly1305 key in bytes (256 bits)
const SEAL_KEY_SIZE: usize = 32;

/// Run a full exchange between two local parties and derive a key on both sides
#[derive(Args, Debug, Clone)]
pub struct Exchange {
    /// Group to run the exchange over (group1, group14)
    #[arg(long)]
    pub group: Option<NamedGroup>,

    /// Hash function for key derivation (sha224, sha256, sha384, sha512)
    #[arg(long)]
    pub hash: Option<HashFunction>,

    /// Length of the derived key in bytes
    #[arg(long)]
    pub key_len: Option<usize>,

    /// Context bytes bound into the derived key
    #[arg(long)]
    pub info: Option<String>,

    /// Seal this message under one party's key and open it with the other's
    #[arg(long)]
    pub message: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("key agreement failed: {0}")]
    Dh(#[from] DhError),
    #[error("derived keys do not match")]
    KeyMismatch,
    #[error("sealing a message needs a 32-byte key, got {0}")]
    SealKeyLength(usize),
    #[error("encryption failed: {0}")]
    Seal(String),
    #[error("decryption failed: {0}")]
    Open(String),
}

impl crate::cli::op::Op for Exchange {
    type Error = ExchangeError;
    type Output = String;

    fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let name = self.group.unwrap_or(ctx.config.group);
        let hash = self.hash.unwrap_or(ctx.config.hash);
        let key_len = self.key_len.unwrap_or(ctx.config.key_length);
        let info = self.info.as_deref().unwrap_or(&ctx.config.other_info);
        let group = name.group();

        tracing::info!(group = %name, hash = %hash, key_len, "running exchange");

        let alice = PrivateKey::generate(&mut OsRng, group)?;
        let bob = PrivateKey::generate(&mut OsRng, group)?;

        // Only the slim public values cross the wire
        let alice_secret = alice.compute_secret_checked(&bob.slim_public())?;
        let bob_secret = bob.compute_secret_checked(&alice.slim_public())?;

        let alice_key = hash.derive_key(&alice_secret, key_len, info.as_bytes())?;
        let bob_key = hash.derive_key(&bob_secret, key_len, info.as_bytes())?;
        if alice_key != bob_key {
            return Err(ExchangeError::KeyMismatch);
        }

        let mut lines = vec![
            format!("group:       {} ({} bit)", name, group.bits()),
            format!("hash:        {}", hash),
            format!("other info:  {:?}", info),
            format!("alice gx:    {}", hex::encode(alice.public().to_bytes_be())),
            format!("bob gx:      {}", hex::encode(bob.public().to_bytes_be())),
            format!("secret bits: {}", alice_secret.bits()),
            format!("derived key: {}", hex::encode(&alice_key)),
        ];

        if let Some(message) = &self.message {
            let sealed = seal(&alice_key, message.as_bytes())?;
            let opened = open(&bob_key, &sealed)?;
            lines.push(format!("sealed:      {}", hex::encode(&sealed)));
            lines.push(format!("opened:      {}", String::from_utf8_lossy(&opened)));
        }

        Ok(lines.join("\n"))
    }
}

/// Encrypt with ChaCha20-Poly1305: `nonce (12 bytes) || ciphertext || tag (16 bytes)`
fn seal(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, ExchangeError> {
    if key.len() != SEAL_KEY_SIZE {
        return Err(ExchangeError::SealKeyLength(key.len()));
    }
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng
        .try_fill_bytes(&mut nonce_bytes)
        .map_err(|e| ExchangeError::Seal(format!("failed to generate nonce: {}", e)))?;
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| ExchangeError::Seal("encrypt error".to_string()))?;

    let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    out.extend_from_slice(nonce.as_ref());
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

fn open(key: &[u8], data: &[u8]) -> Result<Vec<u8>, ExchangeError> {
    if key.len() != SEAL_KEY_SIZE {
        return Err(ExchangeError::SealKeyLength(key.len()));
    }
    if data.len() < NONCE_SIZE {
        return Err(ExchangeError::Open("data too short for nonce".to_string()));
    }

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    let nonce = Nonce::from_slice(&data[..NONCE_SIZE]);
    cipher
        .decrypt(nonce, &data[NONCE_SIZE..])
        .map_err(|_| ExchangeError::Open("decrypt error".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::op::{Op, OpContext};

    fn exchange() -> Exchange {
        Exchange {
            group: Some(NamedGroup::Group1),
            hash: None,
            key_len: None,
            info: None,
            message: None,
        }
    }

    #[test]
    fn test_exchange_defaults() {
        let output = exchange().execute(&OpContext::default()).unwrap();
        assert!(output.contains("group:       group1 (1024 bit)"));
        assert!(output.contains("hash:        sha256"));

        let key_hex = output
            .lines()
            .find_map(|line| line.strip_prefix("derived key: "))
            .unwrap();
        assert_eq!(key_hex.len(), 64);
    }

    #[test]
    fn test_exchange_with_message() {
        let op = Exchange {
            message: Some("attack at dawn".to_string()),
            info: Some("demo".to_string()),
            ..exchange()
        };
        let output = op.execute(&OpContext::default()).unwrap();
        assert!(output.contains("opened:      attack at dawn"));
    }

    #[test]
    fn test_message_needs_32_byte_key() {
        let op = Exchange {
            key_len: Some(16),
            message: Some("hello".to_string()),
            ..exchange()
        };
        let result = op.execute(&OpContext::default());
        assert!(matches!(result, Err(ExchangeError::SealKeyLength(16))));
    }

    #[test]
    fn test_open_rejects_tampering() {
        let key = [7u8; SEAL_KEY_SIZE];
        let mut sealed = seal(&key, b"payload").unwrap();
        assert_eq!(open(&key, &sealed).unwrap(), b"payload");

        let last = sealed.len() - 1;
        sealed[last] ^= 1;
        assert!(matches!(open(&key, &sealed), Err(ExchangeError::Open(_))));
        assert!(matches!(open(&key, &[0u8; 4]), Err(ExchangeError::Open(_))));
    }
}
