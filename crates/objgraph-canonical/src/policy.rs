//! Canonicalization strategy injected into each top-level traversal.

use std::fmt;

use crate::errors::EncodingError;
use crate::node::Node;
use crate::value::{Scalar, Value};

type KeyOrderFn = dyn Fn(Vec<String>) -> Vec<String> + Send + Sync;
type SequenceFn = dyn for<'a> Fn(Vec<&'a Node>) -> Vec<&'a Node> + Send + Sync;
type ValueFactoryFn = dyn Fn(&Scalar) -> Result<Value, EncodingError> + Send + Sync;

/// Hooks that decide key order, sequence post-processing and scalar wrapping.
///
/// The defaults give the canonical behaviour: keys ascending by code point,
/// sequences untouched and scalars wrapped with [`Value::json`].
pub trait Policy {
    /// Orders the keys of one record or map.
    ///
    /// Returning a key the container does not hold fails the traversal;
    /// leaving keys out drops them from the output.
    fn order_keys(&self, keys: Vec<String>) -> Vec<String> {
        lexical_order(keys)
    }

    /// Post-processes the elements of one sequence before they are visited.
    fn transform_sequence<'a>(&self, items: Vec<&'a Node>) -> Vec<&'a Node> {
        items
    }

    /// Wraps a scalar leaf.
    fn make_value(&self, datum: &Scalar) -> Result<Value, EncodingError> {
        Value::json(datum.clone())
    }
}

/// Sorts keys ascending by Unicode code point.
///
/// Byte order of UTF-8 text equals code-point order, so a plain sort suffices.
pub fn lexical_order(mut keys: Vec<String>) -> Vec<String> {
    keys.sort();
    keys
}

/// The canonical policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl Policy for DefaultPolicy {}

/// Policy assembled from closures; unset hooks fall back to the defaults.
#[derive(Default)]
pub struct FnPolicy {
    key_order: Option<Box<KeyOrderFn>>,
    sequence: Option<Box<SequenceFn>>,
    value_factory: Option<Box<ValueFactoryFn>>,
}

impl FnPolicy {
    /// Policy with every hook at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a key-ordering hook.
    pub fn with_key_order<F>(mut self, f: F) -> Self
    where
        F: Fn(Vec<String>) -> Vec<String> + Send + Sync + 'static,
    {
        self.key_order = Some(Box::new(f));
        self
    }

    /// Installs a sequence post-processor.
    pub fn with_sequence_transform<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(Vec<&'a Node>) -> Vec<&'a Node> + Send + Sync + 'static,
    {
        self.sequence = Some(Box::new(f));
        self
    }

    /// Installs a scalar factory.
    pub fn with_value_factory<F>(mut self, f: F) -> Self
    where
        F: Fn(&Scalar) -> Result<Value, EncodingError> + Send + Sync + 'static,
    {
        self.value_factory = Some(Box::new(f));
        self
    }
}

impl Policy for FnPolicy {
    fn order_keys(&self, keys: Vec<String>) -> Vec<String> {
        match &self.key_order {
            Some(f) => f(keys),
            None => lexical_order(keys),
        }
    }

    fn transform_sequence<'a>(&self, items: Vec<&'a Node>) -> Vec<&'a Node> {
        match &self.sequence {
            Some(f) => f(items),
            None => items,
        }
    }

    fn make_value(&self, datum: &Scalar) -> Result<Value, EncodingError> {
        match &self.value_factory {
            Some(f) => f(datum),
            None => Value::json(datum.clone()),
        }
    }
}

impl fmt::Debug for FnPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPolicy")
            .field("key_order", &self.key_order.is_some())
            .field("sequence", &self.sequence.is_some())
            .field("value_factory", &self.value_factory.is_some())
            .finish()
    }
}
