//! Selecting which top-level arrays to decode

use std::collections::HashSet;

/// Decides by name whether a top-level array is decoded
///
/// Rejected arrays are read only as far as their name and then skipped.
pub trait ArrayFilter: Send + Sync {
    fn matches(&self, name: &str) -> bool;
}

/// Filter that accepts every array
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ArrayFilter for AcceptAll {
    fn matches(&self, _name: &str) -> bool {
        true
    }
}

/// Filter over a set of names; an empty set accepts everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilter {
    names: HashSet<String>,
}

impl NameFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_name(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.add_name(name);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for NameFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl ArrayFilter for NameFilter {
    fn matches(&self, name: &str) -> bool {
        self.names.is_empty() || self.names.contains(name)
    }
}

impl<F> ArrayFilter for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn matches(&self, name: &str) -> bool {
        self(name)
    }
}
