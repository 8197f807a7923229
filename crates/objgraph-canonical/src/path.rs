use std::fmt;

/// Location of an event inside the walked graph.
///
/// Extending a path copies its segments, so sibling subtrees that share a
/// prefix never observe each other's segments. Paths are diagnostic only and
/// never influence JSON text or digests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Empty path of the top-level value.
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// New path with `segment` appended; `self` is left untouched.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// New path with a sequence index appended.
    pub fn index(&self, index: usize) -> Self {
        self.child(index.to_string())
    }

    /// Segments from the root outwards.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn siblings_do_not_alias() {
        let parent = Path::root().child("{");
        let left = parent.child("a");
        let right = parent.child("b");
        assert_eq!(left.segments(), ["{", "a"]);
        assert_eq!(right.segments(), ["{", "b"]);
        assert_eq!(parent.segments(), ["{"]);
    }

    #[test]
    fn display() {
        assert_eq!(Path::root().to_string(), "root");
        assert_eq!(Path::root().child("[").index(3).to_string(), "[.3");
    }
}
