use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a loadable resource (usually a script URL).
///
/// Locators are compared verbatim: no normalisation or deduplication is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    pub fn new(src: impl Into<String>) -> Self {
        Self(src.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locator {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Locator {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Locator {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_verbatim() {
        let src = "https://cdn.example.org/lodash.js";
        assert_eq!(Locator::from(src).to_string(), src);
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Locator::new("a.js")).unwrap();
        assert_eq!(json, r#""a.js""#);
    }
}
