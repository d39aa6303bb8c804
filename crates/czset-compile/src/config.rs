//! Conversion configuration.

use serde::{Deserialize, Serialize};

/// Options fixed when a converter is constructed.
///
/// Deserializes with every missing field at its default:
///
/// ```
/// use czset_compile::ConversionConfig;
///
/// let config: ConversionConfig = serde_json::from_str(r#"{"allow_partial_czs": true}"#).unwrap();
/// assert!(config.allow_partial_czs);
/// assert!(!config.ignore_failures);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Pass operations that cannot be converted through unchanged instead of
    /// failing.
    pub ignore_failures: bool,
    /// Accept any `CZ**t` as legal, not only the canonical `CZ`.
    pub allow_partial_czs: bool,
}

impl ConversionConfig {
    /// Default configuration: strict, canonical `CZ` only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the failure policy.
    #[must_use]
    pub fn with_ignore_failures(mut self, ignore: bool) -> Self {
        self.ignore_failures = ignore;
        self
    }

    /// Set whether partial `CZ` powers are legal.
    #[must_use]
    pub fn with_partial_czs(mut self, allow: bool) -> Self {
        self.allow_partial_czs = allow;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConversionConfig::new();
        assert!(!config.ignore_failures);
        assert!(!config.allow_partial_czs);
    }

    #[test]
    fn test_deserialize_empty() {
        let config: ConversionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ConversionConfig::default());
    }

    #[test]
    fn test_builder() {
        let config = ConversionConfig::new()
            .with_ignore_failures(true)
            .with_partial_czs(true);
        assert!(config.ignore_failures && config.allow_partial_czs);
    }
}
