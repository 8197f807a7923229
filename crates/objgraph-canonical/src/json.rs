//! JSON collector: folds a structural event stream into JSON text.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::collector::Collector;
use crate::errors::GraphError;
use crate::event::{StructuralEvent, Token};

/// Layout options for [`JsonCollector`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonOptions {
    /// Spaces per nesting level; `0` renders compact JSON.
    pub indent: usize,
    /// Line break written before elements and closing brackets when indenting.
    pub newline: String,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            indent: 0,
            newline: "\n".to_string(),
        }
    }
}

impl JsonOptions {
    /// Compact output.
    pub fn compact() -> Self {
        Self::default()
    }

    /// Output indented by `spaces` per level, `\n` line breaks.
    pub fn indented(spaces: usize) -> Self {
        Self {
            indent: spaces,
            ..Self::default()
        }
    }
}

#[derive(Debug)]
struct Frame {
    closer: Option<char>,
    separated: bool,
    count: usize,
}

impl Frame {
    fn open(closer: Option<char>) -> Self {
        Self {
            closer,
            separated: false,
            count: 0,
        }
    }
}

/// Renders events as JSON into a [`std::fmt::Write`] sink.
///
/// State is one frame per open bracket (pending separator and element count)
/// plus a buffered `"name":` label that prefixes the next token. Empty
/// containers render as `[]` and `{}` in every layout.
///
/// # Example
///
/// ```rust
/// use objgraph_canonical::{walk_into, DefaultPolicy, JsonCollector, JsonOptions};
/// use serde_json::json;
///
/// let mut collector = JsonCollector::new(String::new(), JsonOptions::compact());
/// walk_into(&json!({"b": 1, "a": [true]}), &DefaultPolicy, &mut collector)?;
/// assert_eq!(collector.into_inner(), r#"{"a":[true],"b":1}"#);
/// # Ok::<(), objgraph_canonical::GraphError>(())
/// ```
#[derive(Debug)]
pub struct JsonCollector<W> {
    sink: W,
    pretty: bool,
    indent: String,
    newline: String,
    frames: Vec<Frame>,
    label: Option<String>,
}

impl<W: Write> JsonCollector<W> {
    /// Collector writing into `sink`.
    pub fn new(sink: W, options: JsonOptions) -> Self {
        Self {
            sink,
            pretty: options.indent > 0,
            indent: " ".repeat(options.indent),
            newline: options.newline,
            frames: vec![Frame::open(None)],
            label: None,
        }
    }

    /// Text accumulated so far.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Consumes the collector, returning the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    fn break_line(&mut self, depth: usize) -> Result<(), GraphError> {
        self.sink.write_str(&self.newline)?;
        for _ in 0..depth {
            self.sink.write_str(&self.indent)?;
        }
        Ok(())
    }

    /// Separator, line break and pending label in front of a new element.
    fn lead(&mut self) -> Result<(), GraphError> {
        let depth = self.depth();
        let labelled = self.label.is_some();
        let frame = self
            .frames
            .last_mut()
            .ok_or(GraphError::Unbalanced("collector has no open frame"))?;
        let separate = frame.separated;
        frame.separated = true;
        if !labelled {
            frame.count += 1;
        }

        if separate {
            self.sink.write_char(',')?;
        }
        if self.pretty && depth > 0 {
            self.break_line(depth)?;
        }
        if let Some(label) = self.label.take() {
            self.sink.write_str(&label)?;
        }
        Ok(())
    }

    fn open(&mut self, opener: char, closer: char) -> Result<(), GraphError> {
        self.lead()?;
        self.sink.write_char(opener)?;
        self.frames.push(Frame::open(Some(closer)));
        Ok(())
    }

    fn close(&mut self, closer: char) -> Result<(), GraphError> {
        if self.frames.len() < 2 {
            return Err(GraphError::Unbalanced("closing bracket without opener"));
        }
        let frame = self
            .frames
            .pop()
            .ok_or(GraphError::Unbalanced("closing bracket without opener"))?;
        if frame.closer != Some(closer) {
            return Err(GraphError::Unbalanced("closing bracket does not match opener"));
        }
        if self.pretty && frame.count > 0 {
            self.break_line(self.depth())?;
        }
        self.sink.write_char(closer)?;
        Ok(())
    }
}

impl<W: Write> Collector for JsonCollector<W> {
    fn append(&mut self, event: &StructuralEvent) -> Result<(), GraphError> {
        match &event.token {
            Token::ArrayStart => self.open('[', ']'),
            Token::ArrayEnd => self.close(']'),
            Token::ObjectStart => self.open('{', '}'),
            Token::ObjectEnd => self.close('}'),
            Token::Attribute(name) => {
                let frame = self
                    .frames
                    .last_mut()
                    .ok_or(GraphError::Unbalanced("collector has no open frame"))?;
                frame.count += 1;
                let quoted = serde_json::to_string(name)
                    .map_err(|err| GraphError::Adapter(err.to_string()))?;
                let space = if self.pretty { " " } else { "" };
                self.label = Some(format!("{quoted}:{space}"));
                Ok(())
            }
            Token::Value(value) => {
                self.lead()?;
                self.sink.write_str(value.text())?;
                Ok(())
            }
        }
    }
}
