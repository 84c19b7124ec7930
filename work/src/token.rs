//! Parsed hashcash stamps.
//!
//! Parsing is lenient: only the structure is checked, and the digest is
//! taken over the literal text. Nothing is re-serialized for verification.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use hashcash_crypto::{leading_zero_bits, HashFunction};
use hashcash_types::{parse_stamp_date, split_fields, Extensions, HashcashError, Version};

/// An immutable hashcash stamp. Two stamps are equal when their text is.
#[derive(Clone, Debug)]
pub struct Token {
    text: String,
    version: Version,
    pub(crate) claimed_bits: u32,
    minted_at: DateTime<Utc>,
    resource: String,
    extensions: Extensions,
    hash_function: HashFunction,
    digest: Vec<u8>,
    computed_bits: u32,
}

impl Token {
    /// Parse a stamp, hashing it with SHA-1.
    pub fn parse(text: &str) -> Result<Self, HashcashError> {
        Self::parse_with_function(text, HashFunction::Sha1)
    }

    /// Parse a stamp, hashing it with the named algorithm (SHA-1 when empty).
    ///
    /// Structural errors are reported before the algorithm name is looked up.
    pub fn parse_with(text: &str, hash_function: &str) -> Result<Self, HashcashError> {
        let fields = StampFields::split(text)?;
        let hash_function = HashFunction::from_name(hash_function)?;
        Ok(fields.into_token(text, hash_function))
    }

    pub fn parse_with_function(
        text: &str,
        hash_function: HashFunction,
    ) -> Result<Self, HashcashError> {
        Ok(StampFields::split(text)?.into_token(text, hash_function))
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Bits the minter targeted. Advisory only; never checked by verification.
    pub fn claimed_bits(&self) -> u32 {
        self.claimed_bits
    }

    pub fn minted_at(&self) -> DateTime<Utc> {
        self.minted_at
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn hash_function(&self) -> HashFunction {
        self.hash_function
    }

    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(&self.digest)
    }

    /// Leading zero bits of the digest.
    pub fn computed_bits(&self) -> u32 {
        self.computed_bits
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Order by proof-of-work strength.
    pub fn cmp_strength(&self, other: &Token) -> Ordering {
        self.computed_bits.cmp(&other.computed_bits)
    }
}

/// The structural pieces of a stamp, before hashing.
struct StampFields<'a> {
    version: Version,
    claimed_bits: u32,
    minted_at: DateTime<Utc>,
    resource: &'a str,
    extensions: &'a str,
}

impl<'a> StampFields<'a> {
    fn split(text: &'a str) -> Result<Self, HashcashError> {
        let fields = split_fields(text, ':');
        if fields.len() != Version::V0.field_count() && fields.len() != Version::V1.field_count() {
            return Err(HashcashError::format("malformed token"));
        }

        let version = fields[0]
            .parse::<u32>()
            .ok()
            .and_then(|v| Version::try_from(v).ok())
            .ok_or_else(|| HashcashError::format("unsupported version"))?;
        if fields.len() != version.field_count() {
            return Err(HashcashError::format("malformed token"));
        }

        let mut cursor = fields[1..].iter().copied();
        let mut next = || cursor.next().unwrap_or_default();

        let claimed_bits = match version {
            Version::V1 => next()
                .parse::<u32>()
                .map_err(|_| HashcashError::format("bad claimed bits"))?,
            Version::V0 => 0,
        };
        let minted_at = parse_stamp_date(next()).ok_or_else(|| HashcashError::format("bad date"))?;
        let resource = next();
        let extensions = next();

        Ok(Self {
            version,
            claimed_bits,
            minted_at,
            resource,
            extensions,
        })
    }

    fn into_token(self, text: &str, hash_function: HashFunction) -> Token {
        let digest = hash_function.digest(text.as_bytes());
        let computed_bits = leading_zero_bits(&digest);
        Token {
            text: text.to_string(),
            version: self.version,
            claimed_bits: self.claimed_bits,
            minted_at: self.minted_at,
            resource: self.resource.to_string(),
            extensions: Extensions::decode(self.extensions),
            hash_function,
            digest,
            computed_bits,
        }
    }
}

impl FromStr for Token {
    type Err = HashcashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Token::parse(s)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Token::parse(&text).map_err(de::Error::custom)
    }
}
