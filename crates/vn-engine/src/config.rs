//! Configuration for the narrative engine.

use vn_core::LINK_DELIMITER;

/// Storage key the endings ledger is written under.
pub const DEFAULT_LEDGER_KEY: &str = "endings";

/// Selector used when nothing more specific applies.
pub const DEFAULT_SELECTOR: &str = "default";

/// Configuration for an engine instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Substring separating a passage's prompt from its link markup.
    pub link_delimiter: String,
    /// Storage key for the endings ledger.
    pub ledger_key: String,
    /// Background selector of last resort.
    pub default_background: String,
    /// Character animation used when a passage has no directory entry.
    pub default_animation: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            link_delimiter: LINK_DELIMITER.to_string(),
            ledger_key: DEFAULT_LEDGER_KEY.to_string(),
            default_background: DEFAULT_SELECTOR.to_string(),
            default_animation: DEFAULT_SELECTOR.to_string(),
        }
    }
}

impl EngineConfig {
    /// Set the link delimiter. An empty delimiter is ignored.
    pub fn with_link_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        let delimiter = delimiter.into();
        if !delimiter.is_empty() {
            self.link_delimiter = delimiter;
        }
        self
    }

    /// Set the ledger storage key.
    pub fn with_ledger_key(mut self, key: impl Into<String>) -> Self {
        self.ledger_key = key.into();
        self
    }

    /// Set the fallback background selector.
    pub fn with_default_background(mut self, selector: impl Into<String>) -> Self {
        self.default_background = selector.into();
        self
    }

    /// Set the fallback character animation.
    pub fn with_default_animation(mut self, animation: impl Into<String>) -> Self {
        self.default_animation = animation.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.link_delimiter, "[[");
        assert_eq!(cfg.ledger_key, "endings");
        assert_eq!(cfg.default_background, "default");
        assert_eq!(cfg.default_animation, "default");
    }

    #[test]
    fn builder_methods() {
        let cfg = EngineConfig::default()
            .with_link_delimiter("<<")
            .with_ledger_key("profile-1")
            .with_default_background("black")
            .with_default_animation("idle");
        assert_eq!(cfg.link_delimiter, "<<");
        assert_eq!(cfg.ledger_key, "profile-1");
        assert_eq!(cfg.default_background, "black");
        assert_eq!(cfg.default_animation, "idle");
    }

    #[test]
    fn empty_delimiter_ignored() {
        let cfg = EngineConfig::default().with_link_delimiter("");
        assert_eq!(cfg.link_delimiter, "[[");
    }
}
