use std::fmt;

use crate::path::Path;
use crate::value::Value;

/// Discriminant of a [`StructuralEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Object member name; the member's value follows.
    Attribute,
    /// Scalar leaf.
    Value,
    /// `[`
    ArrayStart,
    /// `]`
    ArrayEnd,
    /// `{`
    ObjectStart,
    /// `}`
    ObjectEnd,
}

impl EventKind {
    /// Whether this kind is one of the four brackets.
    pub fn is_bracket(self) -> bool {
        !matches!(self, EventKind::Attribute | EventKind::Value)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            EventKind::Attribute => "Attr",
            EventKind::Value => "Value",
            EventKind::ArrayStart => "[",
            EventKind::ArrayEnd => "]",
            EventKind::ObjectStart => "{",
            EventKind::ObjectEnd => "}",
        };
        f.write_str(token)
    }
}

/// Payload of an event; brackets carry none.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Member name of the enclosing object.
    Attribute(String),
    /// Scalar leaf.
    Value(Value),
    /// Sequence opened.
    ArrayStart,
    /// Sequence closed.
    ArrayEnd,
    /// Record or map opened.
    ObjectStart,
    /// Record or map closed.
    ObjectEnd,
}

/// One unit of walker output.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralEvent {
    /// What happened.
    pub token: Token,
    /// Where it happened.
    pub path: Path,
}

impl StructuralEvent {
    /// Pairs a token with its location.
    pub fn new(token: Token, path: Path) -> Self {
        Self { token, path }
    }

    /// Kind of this event.
    pub fn kind(&self) -> EventKind {
        match self.token {
            Token::Attribute(_) => EventKind::Attribute,
            Token::Value(_) => EventKind::Value,
            Token::ArrayStart => EventKind::ArrayStart,
            Token::ArrayEnd => EventKind::ArrayEnd,
            Token::ObjectStart => EventKind::ObjectStart,
            Token::ObjectEnd => EventKind::ObjectEnd,
        }
    }

    /// Member name, for ATTRIBUTE events.
    pub fn attribute(&self) -> Option<&str> {
        match &self.token {
            Token::Attribute(name) => Some(name),
            _ => None,
        }
    }

    /// Scalar payload, for VALUE events.
    pub fn value(&self) -> Option<&Value> {
        match &self.token {
            Token::Value(value) => Some(value),
            _ => None,
        }
    }
}
