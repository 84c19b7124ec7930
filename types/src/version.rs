//! Token format versions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::HashcashError;

/// Hashcash stamp format version.
///
/// Version 0 carries no claimed-bits field; version 1 does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Version {
    V0,
    #[default]
    V1,
}

impl Version {
    pub fn as_u32(self) -> u32 {
        match self {
            Version::V0 => 0,
            Version::V1 => 1,
        }
    }

    /// Number of colon-delimited fields a stamp of this version has.
    pub fn field_count(self) -> usize {
        match self {
            Version::V0 => 6,
            Version::V1 => 7,
        }
    }
}

impl TryFrom<u32> for Version {
    type Error = HashcashError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Version::V0),
            1 => Ok(Version::V1),
            _ => Err(HashcashError::validation("version must be 0 or 1")),
        }
    }
}

impl From<Version> for u32 {
    fn from(v: Version) -> Self {
        v.as_u32()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}
