//! Folder paths
//!
//! A folder location is an ordered list of name segments, root first.
//! Items and the folder registry share this single representation, so
//! every prefix and equality test goes through the helpers below.
//!
//! The empty path means "unfiled". At display and filter time an unfiled
//! item is treated as living in the single-segment bucket [`UNFILED`].

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Name of the bucket that unfiled items are shown under
pub const UNFILED: &str = "Unfiled";

/// Separator used when a path is written as a single string
pub const SEPARATOR: char = '/';

/// Segment-wise equality. Both sides may be empty.
pub fn path_equals(a: &[String], b: &[String]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

/// True when `prefix` matches the first `prefix.len()` segments of `a`.
///
/// The empty prefix matches every path. Matching is on whole segments,
/// so `["Work"]` is never a prefix of `["Workshop"]`.
pub fn path_starts_with(a: &[String], prefix: &[String]) -> bool {
    if prefix.is_empty() {
        return true;
    }
    if a.len() < prefix.len() {
        return false;
    }
    a.iter().zip(prefix).all(|(x, y)| x == y)
}

/// An ordered sequence of non-empty folder name segments
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FolderPath(Vec<String>);

impl FolderPath {
    /// Build a path from segments, dropping empty ones
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            segments
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
        )
    }

    /// The empty (unfiled) path
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// The single-segment unfiled bucket
    pub fn unfiled() -> Self {
        Self(vec![UNFILED.to_string()])
    }

    /// Parse user input such as `"Work / Frontend"`.
    ///
    /// Segments are trimmed and empty segments dropped.
    pub fn parse(input: &str) -> Self {
        Self::new(input.split(SEPARATOR).map(str::trim))
    }

    /// A user-supplied folder name as a single segment.
    ///
    /// Returns the trimmed name, or `None` when it is empty or contains
    /// [`SEPARATOR`]. The registry key encoding would split such a name
    /// into nested segments on the next load.
    pub fn segment_name(name: &str) -> Option<&str> {
        let segment = name.trim();
        if segment.is_empty() || segment.contains(SEPARATOR) {
            None
        } else {
            Some(segment)
        }
    }

    /// Decode a folder registry key (segments joined by [`SEPARATOR`])
    pub fn from_key(key: &str) -> Self {
        Self::new(key.split(SEPARATOR))
    }

    /// Encode as a folder registry key
    pub fn to_key(&self) -> String {
        self.0.join(&SEPARATOR.to_string())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First segment, if any
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Last segment, if any
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// The path with its last segment removed (root stays root)
    pub fn parent(&self) -> Self {
        let mut segments = self.0.clone();
        segments.pop();
        Self(segments)
    }

    /// This path extended by one segment
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self::new(segments)
    }

    pub fn starts_with(&self, prefix: &FolderPath) -> bool {
        path_starts_with(&self.0, &prefix.0)
    }

    /// The stored path, or the unfiled bucket when empty
    pub fn effective(&self) -> Cow<'_, FolderPath> {
        if self.is_empty() {
            Cow::Owned(Self::unfiled())
        } else {
            Cow::Borrowed(self)
        }
    }

    /// Replace the leading `from` segments with `to`, keeping the suffix.
    ///
    /// Returns `None` when `from` is not a prefix of this path.
    pub fn rebase(&self, from: &FolderPath, to: &FolderPath) -> Option<FolderPath> {
        if !self.starts_with(from) {
            return None;
        }
        let mut segments = to.0.clone();
        segments.extend(self.0[from.len()..].iter().cloned());
        Some(Self(segments))
    }
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_key())
    }
}

impl From<Vec<String>> for FolderPath {
    fn from(segments: Vec<String>) -> Self {
        Self::new(segments)
    }
}

impl From<&[&str]> for FolderPath {
    fn from(segments: &[&str]) -> Self {
        Self::new(segments.iter().copied())
    }
}

impl Serialize for FolderPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FolderPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<String>::deserialize(deserializer).map(Self::new)
    }
}
