/// Errors produced by group handling, key generation, secret computation,
/// key derivation and parameter encoding
#[derive(Debug, thiserror::Error)]
pub enum DhError {
    #[error("invalid group modulus: {0}")]
    Parse(String),
    #[error("missing public parameters")]
    MissingParameters,
    #[error("generator must satisfy 2 <= g < p")]
    InvalidGenerator,
    #[error("random source failed: {0}")]
    RandomSource(String),
    #[error("invalid peer public value: {0}")]
    InvalidPublicValue(&'static str),
    #[error("requested key length {0} exceeds the KDF counter range")]
    KeyLengthTooLarge(usize),
    #[error("malformed DER parameters: {0}")]
    Der(String),
    #[error("failed to parse PEM: {0}")]
    Pem(#[from] pem::PemError),
    #[error("unexpected PEM tag {0:?}, expected \"DH PARAMETERS\"")]
    UnexpectedPemTag(String),
}
