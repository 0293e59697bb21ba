//! Store path types.
//!
//! A `StorePath` is always absolute and normalized: it starts with `/`,
//! has no empty, blank, `.` or `..` segments, and carries no trailing `/` unless it
//! is the root itself.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// URI scheme accepted for fully-qualified paths.
pub const ADL_SCHEME: &str = "adl://";

/// A validated absolute path inside a remote store account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorePath(String);

impl StorePath {
    /// Parses and normalizes a path.
    ///
    /// Accepts `/folder/file.txt`, `folder/file.txt` and
    /// `adl://<host>/folder/file.txt`.
    pub fn parse(input: &str) -> Result<Self> {
        Self::parse_qualified(input).map(|(_, path)| path)
    }

    /// Parses a path and also returns the host of an `adl://` input.
    ///
    /// Plain paths yield `None` for the host.
    pub fn parse_qualified(input: &str) -> Result<(Option<String>, Self)> {
        let (host, raw) = split_scheme(input)?;
        let path = Self::normalize(input, raw)?;
        Ok((host.map(str::to_string), path))
    }

    fn normalize(input: &str, raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::EmptyPath);
        }
        if raw.chars().any(char::is_control) {
            return Err(Error::ControlCharacter(input.to_string()));
        }

        let relative = raw.strip_prefix('/').unwrap_or(raw);
        if relative.is_empty() {
            return Ok(Self::root());
        }
        let relative = relative.strip_suffix('/').unwrap_or(relative);

        for segment in relative.split('/') {
            match segment {
                s if s.trim().is_empty() => return Err(Error::EmptySegment(input.to_string())),
                "." | ".." => return Err(Error::RelativeSegment(input.to_string())),
                _ => {}
            }
        }

        Ok(Self(format!("/{relative}")))
    }

    /// The root of the store.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Returns the containing directory, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<StorePath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) | None => Some(Self::root()),
            Some(idx) => Some(Self(self.0[..idx].to_string())),
        }
    }

    /// Returns every proper ancestor, nearest to the root first.
    #[must_use]
    pub fn ancestors(&self) -> Vec<StorePath> {
        let mut chain = Vec::new();
        let mut current = self.parent();
        while let Some(path) = current {
            current = path.parent();
            chain.push(path);
        }
        chain.reverse();
        chain
    }

    /// Returns true if `self` lies strictly below `other`.
    #[must_use]
    pub fn is_descendant_of(&self, other: &StorePath) -> bool {
        if other.is_root() {
            return !self.is_root();
        }
        self.0
            .strip_prefix(other.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Renders the path as `adl://<host><path>`.
    #[must_use]
    pub fn fully_qualified(&self, host: &str) -> String {
        format!("{ADL_SCHEME}{}{}", host.trim_end_matches('/'), self.0)
    }
}

fn split_scheme(input: &str) -> Result<(Option<&str>, &str)> {
    let Some(rest) = input.strip_prefix(ADL_SCHEME) else {
        return Ok((None, input));
    };
    let host_end = rest.find('/').unwrap_or(rest.len());
    if host_end == 0 {
        return Err(Error::MissingHost(input.to_string()));
    }
    let (host, path) = rest.split_at(host_end);
    match path {
        "" => Ok((Some(host), "/")),
        path => Ok((Some(host), path)),
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StorePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StorePath {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<StorePath> for String {
    fn from(path: StorePath) -> Self {
        path.0
    }
}

impl AsRef<str> for StorePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An ordered, non-empty list of files to concatenate.
///
/// Order is the byte order of the concatenated output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<StorePath>", into = "Vec<StorePath>")]
pub struct SourcePaths(Vec<StorePath>);

impl SourcePaths {
    pub fn new(paths: Vec<StorePath>) -> Result<Self> {
        if paths.is_empty() {
            return Err(Error::EmptySourceList);
        }
        Ok(Self(paths))
    }

    /// Parses every input as a `StorePath`, keeping the given order.
    pub fn parse<I, S>(inputs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paths = inputs
            .into_iter()
            .map(|s| StorePath::parse(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(paths)
    }

    #[must_use]
    pub fn first(&self) -> &StorePath {
        &self.0[0]
    }

    #[must_use]
    pub fn as_slice(&self) -> &[StorePath] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StorePath> {
        self.0.iter()
    }
}

impl TryFrom<Vec<StorePath>> for SourcePaths {
    type Error = Error;

    fn try_from(value: Vec<StorePath>) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SourcePaths> for Vec<StorePath> {
    fn from(paths: SourcePaths) -> Self {
        paths.0
    }
}

impl<'a> IntoIterator for &'a SourcePaths {
    type Item = &'a StorePath;
    type IntoIter = std::slice::Iter<'a, StorePath>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
