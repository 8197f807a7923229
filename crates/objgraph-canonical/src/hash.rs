//! Hash collector: folds attribute names and scalar text into a SHA-256 digest.

use sha2::{Digest as _, Sha256};

use crate::collector::Collector;
use crate::digest::{ContentDigest, DigestAlg};
use crate::errors::GraphError;
use crate::event::{StructuralEvent, Token};

/// Content digest of an event stream.
///
/// Bracket events are ignored. Attribute names are fed as their UTF-8 bytes
/// and values as their raw form ([`crate::Value::raw`]), so the digest depends
/// only on the canonically ordered `(key, value)` sequence. Two values that
/// hold the same named fields in different declaration order, or in a record
/// versus a map, hash identically.
///
/// Nothing separates consecutive inputs: `{"ab": "c"}` and `{"a": "bc"}` share
/// a digest. The scheme is kept for compatibility with existing digests.
#[derive(Debug, Clone, Default)]
pub struct HashCollector {
    hasher: Sha256,
}

impl HashCollector {
    /// Collector with an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw SHA-256 of everything appended so far.
    ///
    /// Finalizes a copy of the accumulator, so it may be called repeatedly and
    /// appending may continue afterwards.
    pub fn digest_bytes(&self) -> [u8; 32] {
        self.hasher.clone().finalize().into()
    }

    /// Base-58 encoding of [`Self::digest_bytes`].
    pub fn digest(&self) -> String {
        bs58::encode(self.digest_bytes()).into_string()
    }

    /// Typed form of [`Self::digest`].
    pub fn content_digest(&self) -> ContentDigest {
        ContentDigest {
            alg: DigestAlg::Sha256,
            b58: self.digest(),
        }
    }
}

impl Collector for HashCollector {
    fn append(&mut self, event: &StructuralEvent) -> Result<(), GraphError> {
        match &event.token {
            Token::Attribute(name) => self.hasher.update(name.as_bytes()),
            Token::Value(value) => self.hasher.update(value.raw().as_bytes()),
            _ => {}
        }
        Ok(())
    }
}
