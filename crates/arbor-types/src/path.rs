use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};

/// An ordered sequence of keys locating a node relative to a root.
///
/// The root path is the empty sequence. Array elements are addressed by their
/// stringified index, exactly like object keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<String>);

impl Path {
    /// The root path (no segments).
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path from its segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Returns `true` for the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments (the depth below the root).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Iterate over segments, outermost first.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// The last segment, or `None` at the root.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// A new path one level below this one.
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend_from_slice(&self.0);
        segments.push(key.into());
        Self(segments)
    }

    /// The enclosing path, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        match self.0.split_last() {
            Some((_, rest)) => Some(Self(rest.to_vec())),
            None => None,
        }
    }

    /// Append a segment in place.
    pub fn push(&mut self, key: impl Into<String>) {
        self.0.push(key.into());
    }

    /// Remove and return the last segment.
    pub fn pop(&mut self) -> Option<String> {
        self.0.pop()
    }

    /// `self` followed by every segment of `suffix`.
    pub fn join(&self, suffix: &Path) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + suffix.0.len());
        segments.extend_from_slice(&self.0);
        segments.extend_from_slice(&suffix.0);
        Self(segments)
    }

    /// Returns `true` if `self` is a prefix of `other` (a path is a prefix of itself).
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Returns `true` if `self` is a prefix of `other` and strictly shorter.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        self.0.len() < other.0.len() && self.is_prefix_of(other)
    }

    /// Parse a slash-separated pointer such as `/nested/tree` or `nested/tree`.
    ///
    /// `""` and `"/"` are the root. Within a segment `~1` decodes to `/` and
    /// `~0` decodes to `~`; any other `~` sequence is rejected.
    pub fn parse(input: &str) -> TypeResult<Self> {
        let body = input.strip_prefix('/').unwrap_or(input);
        if body.is_empty() {
            return Ok(Self::root());
        }

        body.split('/')
            .map(|raw| unescape_segment(input, raw))
            .collect::<TypeResult<Vec<_>>>()
            .map(Self)
    }
}

fn unescape_segment(input: &str, raw: &str) -> TypeResult<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            other => {
                return Err(TypeError::InvalidPath {
                    input: input.to_string(),
                    reason: match other {
                        Some(c) => format!("invalid escape sequence '~{c}'"),
                        None => "dangling '~' at end of segment".to_string(),
                    },
                })
            }
        }
    }
    Ok(out)
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            write!(f, "/{}", segment.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

impl From<Vec<String>> for Path {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<&[&str]> for Path {
    fn from(segments: &[&str]) -> Self {
        Self::from_segments(segments.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Path {
    fn from(segments: [&str; N]) -> Self {
        Self::from_segments(segments)
    }
}

impl<S: Into<String>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_segments(iter)
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
