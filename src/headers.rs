//! Case-insensitive header map

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Headers keyed by lower-cased name; the last occurrence of a name wins
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedHeaders(HashMap<String, String>);

impl NormalizedHeaders {
    /// Look up a header by name, ignoring case
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_lowercase()).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for NormalizedHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HashMap::new();
        for (name, value) in iter {
            map.insert(name.as_ref().to_lowercase(), value.into());
        }
        Self(map)
    }
}

/// Flatten an ordered header list into a [`NormalizedHeaders`].
///
/// Values are kept verbatim (no trimming, no merging of repeats).
#[must_use]
pub fn normalize(headers: &[(String, String)]) -> NormalizedHeaders {
    headers
        .iter()
        .map(|(name, value)| (name.as_str(), value.clone()))
        .collect()
}
