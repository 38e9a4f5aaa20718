use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use std::str::FromStr;
use thiserror::Error;

/// A header name or value rejected by [`Headers`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid HTTP header: {name}: {value}")]
pub struct InvalidHeader {
    pub name: String,
    pub value: String,
}

/// An ordered, case-insensitive header multimap.
///
/// Entries keep their insertion order and duplicates are allowed. Names are
/// stored as [`HeaderName`], which is lowercase, so every lookup is
/// case-insensitive without ad hoc string comparisons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(HeaderName, HeaderValue)>,
}

impl Headers {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Parse a raw name/value pair.
    pub fn parse(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), InvalidHeader> {
        let invalid = || InvalidHeader {
            name: name.to_string(),
            value: value.to_string(),
        };
        let name_header = HeaderName::from_str(name).map_err(|_| invalid())?;
        let value_header = HeaderValue::from_str(value).map_err(|_| invalid())?;
        Ok((name_header, value_header))
    }

    /// Append an entry, keeping any existing entries with the same name.
    pub fn append(&mut self, name: &str, value: &str) -> Result<(), InvalidHeader> {
        let (name, value) = Self::parse(name, value)?;
        self.entries.push((name, value));
        Ok(())
    }

    /// Append an already-validated entry.
    pub fn append_typed(&mut self, name: HeaderName, value: HeaderValue) {
        self.entries.push((name, value));
    }

    /// Set a header, replacing every existing entry with that name.
    /// The first existing entry keeps its position; new names are appended.
    pub fn insert(&mut self, name: &str, value: &str) -> Result<(), InvalidHeader> {
        let (name, value) = Self::parse(name, value)?;
        match self.entries.iter().position(|(n, _)| *n == name) {
            Some(idx) => {
                self.entries[idx].1 = value;
                let mut seen = 0usize;
                self.entries.retain(|(n, _)| {
                    if *n != name {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.entries.push((name, value)),
        }
        Ok(())
    }

    pub fn remove(&mut self, name: &str) {
        if let Ok(target) = HeaderName::from_str(name) {
            self.entries.retain(|(n, _)| *n != target);
        }
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        let target = HeaderName::from_str(name).ok()?;
        self.entries
            .iter()
            .find(|(n, _)| *n == target)
            .map(|(_, v)| v)
    }

    /// First value for `name`, if it is visible ASCII.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.to_str().ok())
    }

    /// Every value for `name`, in insertion order.
    pub fn get_all<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a HeaderValue> + 'a {
        let target = HeaderName::from_str(name).ok();
        self.entries
            .iter()
            .filter(move |(n, _)| Some(n) == target.as_ref())
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.entries.iter().map(|(n, v)| (n, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the map and returns a standard http::HeaderMap.
    pub fn to_header_map(self) -> HeaderMap {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        for (name, value) in self.entries {
            map.append(name, value);
        }
        map
    }
}

impl FromIterator<(HeaderName, HeaderValue)> for Headers {
    fn from_iter<I: IntoIterator<Item = (HeaderName, HeaderValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Headers {
    type Item = (HeaderName, HeaderValue);
    type IntoIter = std::vec::IntoIter<(HeaderName, HeaderValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
