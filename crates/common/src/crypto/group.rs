use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use super::DhError;

/// RFC 2409 Oakley group 2 prime (1024 bit), `diffie-hellman-group1-sha1` in SSH
const GROUP1_P: &str = "
    FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74
    020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437
    4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED
    EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE65381FFFFFFFFFFFFFFFF";

/// RFC 3526 group 14 prime (2048 bit), `diffie-hellman-group14-sha1` in SSH
const GROUP14_P: &str = "
    FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74
    020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437
    4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED
    EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05
    98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB
    9ED529077096966D670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B
    E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF695581718
    3995497CEA956AE515D2261898FA051015728E5A8AACAA68FFFFFFFFFFFFFFFF";

/// The 1024-bit MODP group with generator 2
pub static GROUP1: LazyLock<Group> = LazyLock::new(|| well_known(GROUP1_P));

/// The 2048-bit MODP group with generator 2
pub static GROUP14: LazyLock<Group> = LazyLock::new(|| well_known(GROUP14_P));

fn well_known(hex_modulus: &str) -> Group {
    match Group::from_hex(hex_modulus, 2) {
        Ok(group) => group,
        Err(e) => unreachable!("built-in modulus must parse: {e}"),
    }
}

/// A multiplicative group modulo a prime `p` with generator `g`
///
/// Groups are immutable once built. For the safe-prime groups this crate
/// is meant for, `g` generates the subgroup of prime order `q = (p - 1) / 2`
/// and private exponents are drawn from `[0, q)`.
///
/// # Examples
///
/// ```ignore
/// let group = Group::from_hex("17", 2)?; // p = 23
/// assert_eq!(group.q(), BigUint::from(11u32));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Group {
    p: BigUint,
    g: BigUint,
}

impl Group {
    /// Build a group from already decoded integers
    ///
    /// # Errors
    ///
    /// Fails if the parameters do not pass [`Group::validate`].
    pub fn new(p: BigUint, g: BigUint) -> Result<Self, DhError> {
        let group = Self { p, g };
        group.validate()?;
        Ok(group)
    }

    /// Parse a group from a base-16 modulus and a small generator
    ///
    /// An optional `0x` prefix is accepted and ASCII whitespace is skipped,
    /// so RFC-style wrapped constants parse as-is.
    ///
    /// # Errors
    ///
    /// Returns [`DhError::Parse`] if the modulus is empty or contains
    /// anything other than hex digits.
    pub fn from_hex(hex_modulus: &str, generator: u64) -> Result<Self, DhError> {
        let trimmed = hex_modulus.trim();
        let digits: String = trimmed
            .strip_prefix("0x")
            .unwrap_or(trimmed)
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();

        if digits.is_empty() {
            return Err(DhError::Parse("empty modulus".to_string()));
        }
        // num-bigint would otherwise accept `_` separators and a leading `+`
        if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(DhError::Parse(format!("unexpected character {c:?}")));
        }

        let p = BigUint::parse_bytes(digits.as_bytes(), 16)
            .ok_or_else(|| DhError::Parse("not a base-16 integer".to_string()))?;

        Ok(Self {
            p,
            g: BigUint::from(generator),
        })
    }

    /// Check that both parameters are present and the generator is in range
    ///
    /// This is the guard run before any exponentiation; a zeroed modulus or
    /// generator would otherwise compute silently with meaningless values.
    pub fn validate(&self) -> Result<(), DhError> {
        check_params(&self.p, &self.g)
    }

    /// The prime modulus
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// The generator
    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// Order of the prime-order subgroup, `(p - 1) / 2`
    pub fn q(&self) -> BigUint {
        if self.p.is_zero() {
            return BigUint::zero();
        }
        (&self.p - 1u32) >> 1u32
    }

    /// Size of the modulus in bits
    pub fn bits(&self) -> u64 {
        self.p.bits()
    }
}

pub(crate) fn check_params(p: &BigUint, g: &BigUint) -> Result<(), DhError> {
    if p.is_zero() || g.is_zero() {
        return Err(DhError::MissingParameters);
    }
    if g <= &BigUint::one() || g >= p {
        return Err(DhError::InvalidGenerator);
    }
    Ok(())
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("bits", &self.bits())
            .field("g", &self.g)
            .finish()
    }
}

/// Diagnostics rendering: size, generator and the modulus as wrapped hex
impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DH Parameters: ({} bit)", self.bits())?;
        writeln!(f, "    generator: {}", self.g)?;
        write!(f, "    prime:")?;
        let hex = format!("{:X}", self.p);
        for line in hex.as_bytes().chunks(64) {
            // chunks of an ASCII string are valid UTF-8
            write!(f, "\n        {}", String::from_utf8_lossy(line))?;
        }
        Ok(())
    }
}

/// Names of the predefined groups, as used by configuration and the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NamedGroup {
    Group1,
    #[default]
    Group14,
}

impl NamedGroup {
    pub const ALL: [NamedGroup; 2] = [NamedGroup::Group1, NamedGroup::Group14];

    /// Resolve the name to its process-wide group
    pub fn group(&self) -> &'static Group {
        match self {
            NamedGroup::Group1 => &GROUP1,
            NamedGroup::Group14 => &GROUP14,
        }
    }
}

impl fmt::Display for NamedGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamedGroup::Group1 => write!(f, "group1"),
            NamedGroup::Group14 => write!(f, "group14"),
        }
    }
}

impl FromStr for NamedGroup {
    type Err = DhError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "group1" => Ok(NamedGroup::Group1),
            "group14" => Ok(NamedGroup::Group14),
            other => Err(DhError::Parse(format!("unknown group {other:?}"))),
        }
    }
}
