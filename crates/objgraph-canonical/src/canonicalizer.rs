use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collector::Collector;
use crate::digest::ContentDigest;
use crate::errors::GraphError;
use crate::hash::HashCollector;
use crate::json::{JsonCollector, JsonOptions};
use crate::node::Node;
use crate::policy::{DefaultPolicy, Policy};
use crate::walker::{walk, walk_node};

/// Deserializable settings for a [`Canonicalizer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonicalizerConfig {
    /// Layout of the JSON text.
    pub json: JsonOptions,
}

/// Result of canonicalization: the JSON text and the content digest of one
/// traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalForm {
    /// Canonical JSON text.
    pub json: String,
    /// Content digest of the same event stream.
    pub digest: ContentDigest,
}

/// Canonicalizer that emits deterministic JSON and digests.
pub struct Canonicalizer<P = DefaultPolicy> {
    policy: P,
    config: CanonicalizerConfig,
}

impl Canonicalizer<DefaultPolicy> {
    /// Canonicalizer with the default policy and the given layout.
    pub fn new(config: CanonicalizerConfig) -> Self {
        Self::with_policy(DefaultPolicy, config)
    }
}

impl Default for Canonicalizer<DefaultPolicy> {
    fn default() -> Self {
        Self::new(CanonicalizerConfig::default())
    }
}

impl<P: Policy> Canonicalizer<P> {
    /// Canonicalizer with a custom policy.
    pub fn with_policy(policy: P, config: CanonicalizerConfig) -> Self {
        Self { policy, config }
    }

    /// The policy in use.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Produces JSON text and digest in a single traversal.
    ///
    /// # Errors
    ///
    /// Any [`GraphError`]; no partial output is returned on failure.
    pub fn canonicalize<T: Serialize + ?Sized>(&self, value: &T) -> Result<CanonicalForm, GraphError> {
        let mut collectors = self.collectors();
        walk(value, &self.policy, |event| collectors.append(&event))?;
        Ok(self.finish(collectors))
    }

    /// [`Self::canonicalize`] for an already adapted node.
    pub fn canonicalize_node(&self, node: &Node) -> Result<CanonicalForm, GraphError> {
        let mut collectors = self.collectors();
        walk_node(node, &self.policy, |event| collectors.append(&event))?;
        Ok(self.finish(collectors))
    }

    /// Canonical JSON text only.
    pub fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, GraphError> {
        let mut collector = JsonCollector::new(String::new(), self.config.json.clone());
        walk(value, &self.policy, |event| collector.append(&event))?;
        Ok(collector.into_inner())
    }

    /// Base-58 content digest only.
    pub fn digest<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, GraphError> {
        let mut collector = HashCollector::new();
        walk(value, &self.policy, |event| collector.append(&event))?;
        Ok(collector.digest())
    }

    fn collectors(&self) -> (JsonCollector<String>, HashCollector) {
        (
            JsonCollector::new(String::new(), self.config.json.clone()),
            HashCollector::new(),
        )
    }

    fn finish(&self, (json, hash): (JsonCollector<String>, HashCollector)) -> CanonicalForm {
        let form = CanonicalForm {
            json: json.into_inner(),
            digest: hash.content_digest(),
        };
        debug!(digest = %form.digest, bytes = form.json.len(), "canonicalized object graph");
        form
    }
}

/// Compact canonical JSON under the default policy.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, GraphError> {
    Canonicalizer::new(CanonicalizerConfig::default()).to_json(value)
}

/// Canonical JSON indented by `indent` spaces under the default policy.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T, indent: usize) -> Result<String, GraphError> {
    let config = CanonicalizerConfig {
        json: JsonOptions::indented(indent),
    };
    Canonicalizer::new(config).to_json(value)
}

/// Base-58 content digest under the default policy.
pub fn digest_of<T: Serialize + ?Sized>(value: &T) -> Result<String, GraphError> {
    Canonicalizer::new(CanonicalizerConfig::default()).digest(value)
}
