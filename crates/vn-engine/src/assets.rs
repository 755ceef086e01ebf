//! Asset manifests: which backgrounds exist and which passages have custom
//! character animations.
//!
//! The engine never touches asset files. It only picks selector keys from
//! these manifests and hands them to the presentation adapter.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Character animation to play for a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationCue {
    /// Animation selector key.
    pub animation: String,
    /// Whether the secondary overlay effect is on.
    #[serde(default)]
    pub secondary_effect: bool,
}

impl AnimationCue {
    /// A cue with the given animation and no secondary effect.
    pub fn plain(animation: impl Into<String>) -> Self {
        Self {
            animation: animation.into(),
            secondary_effect: false,
        }
    }
}

/// Per-passage animation overrides, keyed by passage name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationDirectory {
    entries: BTreeMap<String, AnimationCue>,
}

impl AnimationDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder style).
    pub fn with_entry(mut self, passage_name: impl Into<String>, cue: AnimationCue) -> Self {
        self.entries.insert(passage_name.into(), cue);
        self
    }

    /// Build from a JSON object, skipping malformed entries.
    ///
    /// Each entry is either an animation name (`"Cave": "shiver"`) or an object
    /// (`"Cave": {"animation": "shiver", "secondary_effect": true}`).
    pub fn from_json(value: &Value) -> Self {
        let mut entries = BTreeMap::new();
        let Some(map) = value.as_object() else {
            if !value.is_null() {
                tracing::warn!("animation directory is not an object; ignoring it");
            }
            return Self { entries };
        };

        for (name, raw) in map {
            let cue = match raw {
                Value::String(animation) if !animation.is_empty() => {
                    Some(AnimationCue::plain(animation.clone()))
                }
                Value::Object(_) => serde_json::from_value::<AnimationCue>(raw.clone())
                    .ok()
                    .filter(|cue| !cue.animation.is_empty()),
                _ => None,
            };
            match cue {
                Some(cue) => {
                    entries.insert(name.clone(), cue);
                }
                None => tracing::warn!(passage = %name, "malformed animation entry; using default"),
            }
        }
        Self { entries }
    }

    /// The override for a passage, if any.
    pub fn get(&self, passage_name: &str) -> Option<&AnimationCue> {
        self.entries.get(passage_name)
    }

    /// Passage names that have an override, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything the engine needs to know about available assets.
#[derive(Debug, Clone, Default)]
pub struct AssetManifest {
    /// Background selector keys mapped to asset locations.
    pub backgrounds: BTreeMap<String, String>,
    /// Per-passage animation overrides.
    pub animations: AnimationDirectory,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    backgrounds: BTreeMap<String, String>,
    #[serde(default)]
    animations: Value,
}

impl AssetManifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a background (builder style).
    pub fn with_background(mut self, key: impl Into<String>, location: impl Into<String>) -> Self {
        self.backgrounds.insert(key.into(), location.into());
        self
    }

    /// Set the animation directory (builder style).
    pub fn with_animations(mut self, animations: AnimationDirectory) -> Self {
        self.animations = animations;
        self
    }

    /// Parse a manifest of the form `{"backgrounds": {...}, "animations": {...}}`.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let raw: RawManifest = serde_json::from_str(json)?;
        Ok(Self {
            backgrounds: raw.backgrounds,
            animations: AnimationDirectory::from_json(&raw.animations),
        })
    }

    /// Whether a background key exists.
    pub fn has_background(&self, key: &str) -> bool {
        self.backgrounds.contains_key(key)
    }

    /// Pick the first candidate that names a known background, else `fallback`.
    pub fn resolve_background<'a>(
        &self,
        candidates: impl IntoIterator<Item = &'a str>,
        fallback: &str,
    ) -> String {
        candidates
            .into_iter()
            .find(|key| self.has_background(key))
            .unwrap_or(fallback)
            .to_string()
    }

    /// The animation for a passage, or `default_animation` with no secondary effect.
    pub fn resolve_animation(&self, passage_name: &str, default_animation: &str) -> AnimationCue {
        self.animations
            .get(passage_name)
            .cloned()
            .unwrap_or_else(|| AnimationCue::plain(default_animation))
    }
}
