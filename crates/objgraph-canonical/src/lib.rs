//! Canonical event streaming for arbitrary object graphs.
//!
//! A value of unknown shape is adapted into a [`Node`], walked into a
//! deterministic stream of [`StructuralEvent`]s and folded by collectors into
//! canonical JSON text ([`JsonCollector`]) and a base-58 SHA-256 content
//! digest ([`HashCollector`]). Object keys are emitted in policy order
//! (ascending by code point by default), so values that differ only in field
//! declaration or map iteration order produce byte-identical output.
//!
//! ```rust
//! use objgraph_canonical::{digest_of, to_json};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Data {
//!     name: &'static str,
//!     date: &'static str,
//! }
//!
//! #[derive(Serialize)]
//! struct KindData {
//!     kind: &'static str,
//!     data: Data,
//! }
//!
//! let value = KindData {
//!     kind: "test",
//!     data: Data { name: "object", date: "2021-05-20" },
//! };
//! assert_eq!(
//!     to_json(&value)?,
//!     r#"{"data":{"date":"2021-05-20","name":"object"},"kind":"test"}"#
//! );
//! assert_eq!(digest_of(&value)?, "5zWhdtvKuGob1FbW9vUGPQKobcLtYYr5wU8AxQRVraeB");
//! # Ok::<(), objgraph_canonical::GraphError>(())
//! ```
#![deny(missing_docs)]

/// High-level facade producing JSON and digest together.
pub mod canonicalizer;
/// Collector trait shared by the JSON and hash collectors.
pub mod collector;
/// Typed content digests.
pub mod digest;
/// Error types.
pub mod errors;
/// Structural events emitted by the walker.
pub mod event;
/// Hash collector.
pub mod hash;
/// JSON collector and its layout options.
pub mod json;
pub mod node;
/// Event locations.
pub mod path;
pub mod policy;
mod ser;
pub mod timestamp;
pub mod value;
pub mod walker;

pub use canonicalizer::{
    digest_of, to_json, to_json_pretty, CanonicalForm, Canonicalizer, CanonicalizerConfig,
};
pub use collector::Collector;
pub use digest::{ContentDigest, DigestAlg};
pub use errors::{EncodingError, ErrorKind, GraphError, ValidationError};
pub use event::{EventKind, StructuralEvent, Token};
pub use hash::HashCollector;
pub use json::{JsonCollector, JsonOptions};
pub use node::{to_node, Field, Node, Record, Visibility};
pub use path::Path;
pub use policy::{lexical_order, DefaultPolicy, FnPolicy, Policy};
pub use timestamp::Timestamp;
pub use value::{Scalar, Value};
pub use walker::{walk, walk_into, walk_node};
