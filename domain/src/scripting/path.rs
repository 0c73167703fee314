//! Dotted member paths (`"game.config.start"`).
//!
//! A [`MemberPath`] names a location in the nested namespace that hangs off
//! the root library table. Segments are stored root-first; the last segment
//! is the leaf that receives or holds the value.

use crate::core::string::explode;
use thiserror::Error;

/// Delimiter between scopes in a member path.
pub const PATH_DELIMITER: char = '.';

/// A malformed member path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("member path is empty")]
    Empty,

    #[error("member path '{path}' has an empty segment at position {position}")]
    EmptySegment { path: String, position: usize },
}

/// A validated, immutable dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberPath {
    raw: String,
    segments: Vec<String>,
}

impl MemberPath {
    /// Parse and validate a dotted path.
    ///
    /// Leading, trailing and consecutive delimiters are rejected rather than
    /// normalized away.
    pub fn parse(input: &str) -> Result<Self, PathError> {
        if input.is_empty() {
            return Err(PathError::Empty);
        }

        let parts = explode(input, PATH_DELIMITER);
        if let Some(position) = parts.iter().position(|s| s.is_empty()) {
            return Err(PathError::EmptySegment {
                path: input.to_string(),
                position,
            });
        }

        Ok(Self {
            raw: input.to_string(),
            segments: parts.into_iter().map(str::to_string).collect(),
        })
    }

    /// All segments, root-first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Every segment except the leaf (the intermediate scope tables).
    pub fn scopes(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// The final segment.
    pub fn leaf(&self) -> &str {
        // parse() guarantees at least one segment
        &self.segments[self.segments.len() - 1]
    }

    /// Number of segments (always >= 1).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The original dotted string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl std::str::FromStr for MemberPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for MemberPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}
