//! Path template matching.
//!
//! # Responsibilities
//! - Parse OpenAPI path templates into literal and parameter segments
//! - Match a concrete request path against an ordered list of templates
//!
//! # Design Decisions
//! - Segment counts must be equal (no trailing-slash folding, no catch-all)
//! - Literal segments compare byte-for-byte against the raw, still
//!   percent-encoded request segment; nothing is decoded or normalized
//! - An empty path is matched as "/"
//! - First match wins; callers own the ordering
//! - No regex to guarantee O(templates × depth) matching

use std::fmt;

/// A single `/`-delimited piece of a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the request segment exactly.
    Literal(String),
    /// `{name}` placeholder; matches any single segment.
    Param(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => Segment::Param(name.to_string()),
            None => Segment::Literal(raw.to_string()),
        }
    }

    fn matches(&self, value: &str) -> bool {
        match self {
            Segment::Param(_) => true,
            Segment::Literal(literal) => literal == value,
        }
    }
}

/// A parsed path template such as `/assets/{id}/thumbnail`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse a template by splitting on `/`.
    ///
    /// The leading slash yields an empty first segment, exactly as it does for
    /// request paths, so both sides split the same way.
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            segments: raw.split('/').map(Segment::parse).collect(),
        }
    }

    /// The template as written in the specification.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of `{param}` placeholders.
    pub fn param_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Param(_)))
            .count()
    }

    /// Structural match against a request path.
    pub fn matches(&self, path: &str) -> bool {
        let path = canonical_path(path);
        let mut values = path.split('/');

        for segment in &self.segments {
            match values.next() {
                Some(value) if segment.matches(value) => {}
                _ => return false,
            }
        }

        values.next().is_none()
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<PathTemplate> for PathTemplate {
    fn as_ref(&self) -> &PathTemplate {
        self
    }
}

/// Empty paths are treated as the root path.
fn canonical_path(path: &str) -> &str {
    if path.is_empty() {
        "/"
    } else {
        path
    }
}

/// Return the first entry, in slice order, whose template matches `path`.
pub fn find_match<'a, T: AsRef<PathTemplate>>(entries: &'a [T], path: &str) -> Option<&'a T> {
    entries.iter().find(|entry| entry.as_ref().matches(path))
}
