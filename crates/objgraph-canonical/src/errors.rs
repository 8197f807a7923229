use thiserror::Error;

/// Coarse classification of [`GraphError`] values.
///
/// None of the kinds is retryable: every failure aborts the traversal that
/// raised it, and whatever a collector accumulated up to that point must be
/// discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input exposes a shape the walker refuses to decompose.
    Configuration,
    /// A scalar could not be given a textual form.
    Encoding,
    /// A collector received a malformed stream or its sink failed.
    Collector,
    /// The emit callback asked the walker to stop.
    Aborted,
}

/// Errors raised while adapting, walking or collecting an object graph.
#[derive(Error, Debug)]
pub enum GraphError {
    /// A record exposes a field that is not accessible outside its declaring scope.
    #[error("field '{field}' of record '{record}' is not accessible (at {path})")]
    InaccessibleField {
        /// Type name of the record.
        record: String,
        /// Declared field name.
        field: String,
        /// Location of the record in the graph.
        path: String,
    },
    /// The key-ordering hook produced a key the container does not hold.
    #[error("key ordering returned unknown key '{key}' (at {path})")]
    UnknownKey {
        /// The offending key.
        key: String,
        /// Location of the container in the graph.
        path: String,
    },
    /// A map is keyed by something other than text.
    #[error("unsupported map key of type {found}: only text keys are allowed")]
    UnsupportedMapKey {
        /// Description of the offending key type.
        found: &'static str,
    },
    /// The scalar factory failed to produce a textual form.
    #[error("cannot encode scalar at {path}: {source}")]
    Encoding {
        /// Location of the scalar in the graph.
        path: String,
        /// Underlying encoding failure.
        #[source]
        source: EncodingError,
    },
    /// Adapting the input through serde failed.
    #[error("cannot adapt input: {0}")]
    Adapter(String),
    /// A collector saw a closing bracket with no matching opener.
    #[error("unbalanced event stream: {0}")]
    Unbalanced(&'static str),
    /// The output sink rejected a write.
    #[error("output sink failed")]
    Sink(#[from] std::fmt::Error),
    /// The emit callback requested early abandonment.
    #[error("traversal aborted: {0}")]
    Aborted(String),
}

impl GraphError {
    /// Returns the taxonomy bucket for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GraphError::InaccessibleField { .. }
            | GraphError::UnknownKey { .. }
            | GraphError::UnsupportedMapKey { .. } => ErrorKind::Configuration,
            GraphError::Encoding { .. } | GraphError::Adapter(_) => ErrorKind::Encoding,
            GraphError::Unbalanced(_) | GraphError::Sink(_) => ErrorKind::Collector,
            GraphError::Aborted(_) => ErrorKind::Aborted,
        }
    }
}

impl serde::ser::Error for GraphError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        GraphError::Adapter(msg.to_string())
    }
}

/// Failure to derive the textual form of a scalar.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodingError {
    /// NaN and the infinities have no JSON representation.
    #[error("non-finite number {0}")]
    NonFiniteNumber(f64),
    /// A timestamp token carried text that is not RFC3339.
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
    /// Failure reported by a custom value factory.
    #[error("{0}")]
    Custom(String),
}

/// Validation errors for canonical primitives.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// When a value does not match the required pattern.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
}
