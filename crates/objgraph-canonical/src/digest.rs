use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Supported digest algorithms for content digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlg {
    /// SHA-256 (the only algorithm the hash collector uses).
    #[serde(rename = "sha-256")]
    Sha256,
}

/// Algorithm + digest bytes, encoded in the base-58 (bitcoin) alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// Digest algorithm (currently always `sha-256`).
    pub alg: DigestAlg,
    /// Base-58 digest bytes.
    pub b58: String,
}

impl ContentDigest {
    /// Constructs a validated digest.
    ///
    /// A 32-byte digest encodes to 32..=44 base-58 characters; leading zero
    /// bytes become leading `1`s.
    pub fn new(alg: DigestAlg, b58: impl Into<String>) -> Result<Self, ValidationError> {
        let b58 = b58.into();
        let re = Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$").expect("invalid regex");
        if !re.is_match(&b58) {
            return Err(ValidationError::PatternMismatch {
                field: "digest",
                value: b58,
            });
        }
        Ok(ContentDigest { alg, b58 })
    }

    /// Decodes the base-58 text back into raw digest bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ValidationError> {
        bs58::decode(&self.b58)
            .into_vec()
            .map_err(|_| ValidationError::PatternMismatch {
                field: "digest",
                value: self.b58.clone(),
            })
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.b58)
    }
}
