//! Route pattern validation and segment compilation.
//!
//! A pattern is split on `/` and empty fragments are dropped, so leading,
//! trailing and doubled slashes never produce segments: `/a/b`, `/a/b/`,
//! `//a/b` and `/a//b` are the same pattern. A fragment starting with `:`
//! is a parameter named by the rest of the fragment.

use crate::error::Error;

/// One `/`-delimited fragment of a compiled route pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Segment {
    /// Matches only the exact (case-sensitive) text.
    Literal(String),
    /// Matches any fragment and binds it under this name.
    Param(String),
}

/// Checks that a route pattern starts with `/`.
///
/// Runs once per registration. A bad pattern is a startup bug, so request
/// handling never calls this.
pub fn validate(path: &str) -> Result<&str, Error> {
    if path.starts_with('/') {
        Ok(path)
    } else {
        Err(Error::PathFormat { path: path.to_owned() })
    }
}

/// Splits a path into its non-empty fragments.
///
/// Used for both patterns and incoming request paths so the two always agree.
pub fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Compiles a pattern into its ordered segments.
pub fn compile(path: &str) -> Vec<Segment> {
    split(path)
        .map(|frag| match frag.strip_prefix(':') {
            Some(name) => Segment::Param(name.to_owned()),
            None => Segment::Literal(frag.to_owned()),
        })
        .collect()
}
