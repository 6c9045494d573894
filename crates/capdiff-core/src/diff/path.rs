//! Document paths.
//!
//! A path is a stack of segments pushed and popped during the walk and
//! rendered only when a difference is recorded, e.g.
//! `sites.Site657.total_assets` or `items[id=42].status`.

use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object member
    Field(String),
    /// Positional list element
    Index(usize),
    /// List element selected by an identifying field (`id` or `name`)
    Keyed { key: &'static str, value: String },
}

impl Segment {
    /// Keyed segment from the raw JSON value of the identifying field.
    pub fn keyed(key: &'static str, value: &Value) -> Self {
        Segment::Keyed {
            key,
            value: selector_text(value),
        }
    }
}

/// Text used inside a `[key=value]` selector.
///
/// Strings are shown bare unless they would make the selector ambiguous:
/// empty, bracket or quote characters, or text that reads as another JSON
/// value (`1`, `true`, `null`). Those are rendered as quoted JSON strings.
pub fn selector_text(value: &Value) -> String {
    match value {
        Value::String(s) if !needs_selector_quoting(s) => s.clone(),
        other => other.to_string(),
    }
}

fn needs_selector_quoting(s: &str) -> bool {
    s.is_empty()
        || s.contains(['[', ']', '=', '"'])
        || matches!(serde_json::from_str::<Value>(s), Ok(v) if !v.is_string())
}

fn needs_quoting(field: &str) -> bool {
    field.is_empty() || field.contains(['.', '[', ']', '"'])
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocPath {
    segments: Vec<Segment>,
}

impl DocPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn pop(&mut self) {
        self.segments.pop();
    }

    /// Nesting depth; the root is depth 0.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Nearest enclosing object member name, used for critical-field checks.
    pub fn field_name(&self) -> Option<&str> {
        self.segments.iter().rev().find_map(|s| match s {
            Segment::Field(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if needs_quoting(name) => {
                    write!(f, "[{}]", Value::String(name.clone()))?;
                }
                Segment::Field(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                Segment::Index(index) => write!(f, "[{}]", index)?,
                Segment::Keyed { key, value } => write!(f, "[{}={}]", key, value)?,
            }
        }
        Ok(())
    }
}
