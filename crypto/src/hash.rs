//! Named digest algorithms.
//!
//! Stamps are hashed with SHA-1 unless the caller names another algorithm.
//! Names resolve case-insensitively but are otherwise exact: surrounding
//! whitespace is not stripped.

use blake2::Blake2b512;
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};
use sha3::{Sha3_224, Sha3_256, Sha3_384, Sha3_512};
use std::fmt;
use std::str::FromStr;

use hashcash_types::HashcashError;

/// Name used when none is given.
pub const DEFAULT_HASH_FUNCTION: &str = "SHA1";

/// A digest algorithm available for stamping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashFunction {
    Md5,
    #[default]
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha512_224,
    Sha512_256,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Blake2b512,
}

impl HashFunction {
    pub const ALL: [HashFunction; 13] = [
        HashFunction::Md5,
        HashFunction::Sha1,
        HashFunction::Sha224,
        HashFunction::Sha256,
        HashFunction::Sha384,
        HashFunction::Sha512,
        HashFunction::Sha512_224,
        HashFunction::Sha512_256,
        HashFunction::Sha3_224,
        HashFunction::Sha3_256,
        HashFunction::Sha3_384,
        HashFunction::Sha3_512,
        HashFunction::Blake2b512,
    ];

    /// Resolve an algorithm name. An empty name means SHA-1.
    pub fn from_name(name: &str) -> Result<Self, HashcashError> {
        let upper = name.to_ascii_uppercase();
        let resolved = match upper.as_str() {
            "" | "SHA" | "SHA1" | "SHA-1" => HashFunction::Sha1,
            "MD5" => HashFunction::Md5,
            "SHA224" | "SHA-224" => HashFunction::Sha224,
            "SHA256" | "SHA-256" => HashFunction::Sha256,
            "SHA384" | "SHA-384" => HashFunction::Sha384,
            "SHA512" | "SHA-512" => HashFunction::Sha512,
            "SHA512/224" | "SHA-512/224" => HashFunction::Sha512_224,
            "SHA512/256" | "SHA-512/256" => HashFunction::Sha512_256,
            "SHA3-224" => HashFunction::Sha3_224,
            "SHA3-256" => HashFunction::Sha3_256,
            "SHA3-384" => HashFunction::Sha3_384,
            "SHA3-512" => HashFunction::Sha3_512,
            "BLAKE2B-512" | "BLAKE2B512" => HashFunction::Blake2b512,
            _ => return Err(HashcashError::UnsupportedHashFunction(name.to_string())),
        };
        Ok(resolved)
    }

    /// Canonical algorithm name.
    pub fn name(self) -> &'static str {
        match self {
            HashFunction::Md5 => "MD5",
            HashFunction::Sha1 => "SHA1",
            HashFunction::Sha224 => "SHA-224",
            HashFunction::Sha256 => "SHA-256",
            HashFunction::Sha384 => "SHA-384",
            HashFunction::Sha512 => "SHA-512",
            HashFunction::Sha512_224 => "SHA-512/224",
            HashFunction::Sha512_256 => "SHA-512/256",
            HashFunction::Sha3_224 => "SHA3-224",
            HashFunction::Sha3_256 => "SHA3-256",
            HashFunction::Sha3_384 => "SHA3-384",
            HashFunction::Sha3_512 => "SHA3-512",
            HashFunction::Blake2b512 => "BLAKE2B-512",
        }
    }

    /// Digest length in bytes.
    pub fn output_len(self) -> usize {
        match self {
            HashFunction::Md5 => 16,
            HashFunction::Sha1 => 20,
            HashFunction::Sha224 | HashFunction::Sha512_224 | HashFunction::Sha3_224 => 28,
            HashFunction::Sha256 | HashFunction::Sha512_256 | HashFunction::Sha3_256 => 32,
            HashFunction::Sha384 | HashFunction::Sha3_384 => 48,
            HashFunction::Sha512 | HashFunction::Sha3_512 | HashFunction::Blake2b512 => 64,
        }
    }

    /// Hash `data` with this algorithm.
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            HashFunction::Md5 => Md5::digest(data).to_vec(),
            HashFunction::Sha1 => Sha1::digest(data).to_vec(),
            HashFunction::Sha224 => Sha224::digest(data).to_vec(),
            HashFunction::Sha256 => Sha256::digest(data).to_vec(),
            HashFunction::Sha384 => Sha384::digest(data).to_vec(),
            HashFunction::Sha512 => Sha512::digest(data).to_vec(),
            HashFunction::Sha512_224 => Sha512_224::digest(data).to_vec(),
            HashFunction::Sha512_256 => Sha512_256::digest(data).to_vec(),
            HashFunction::Sha3_224 => Sha3_224::digest(data).to_vec(),
            HashFunction::Sha3_256 => Sha3_256::digest(data).to_vec(),
            HashFunction::Sha3_384 => Sha3_384::digest(data).to_vec(),
            HashFunction::Sha3_512 => Sha3_512::digest(data).to_vec(),
            HashFunction::Blake2b512 => Blake2b512::digest(data).to_vec(),
        }
    }
}

impl FromStr for HashFunction {
    type Err = HashcashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hash `data` with the algorithm called `hash_function`.
pub fn digest(data: &[u8], hash_function: &str) -> Result<Vec<u8>, HashcashError> {
    Ok(HashFunction::from_name(hash_function)?.digest(data))
}
