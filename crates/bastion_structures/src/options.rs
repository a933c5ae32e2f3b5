//! Generation options.
//!
//! Options arrive either typed (builder methods, serde) or as a loose
//! key/value map from a host. Unknown keys are kept in `extra` and never
//! rejected; values of the wrong type are ignored. Range clamping happens
//! at the point of use so the raw request stays inspectable.

use std::collections::BTreeMap;

use bastion_shared::Value;
use serde::{Deserialize, Serialize};

/// Coarse size selector shared by most generators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    /// Fewer rooms, shorter corridors
    Small,
    /// Default footprint
    Medium,
    /// More rooms, longer corridors
    Large,
}

impl SizeClass {
    /// Parses `small` / `medium` / `large` (case-insensitive).
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "small" => Some(Self::Small),
            "medium" => Some(Self::Medium),
            "large" => Some(Self::Large),
            _ => None,
        }
    }

    /// Picks one of three values by size.
    #[must_use]
    pub const fn select<T: Copy>(self, small: T, medium: T, large: T) -> T {
        match self {
            Self::Small => small,
            Self::Medium => medium,
            Self::Large => large,
        }
    }
}

/// Options recognized across generators.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureOptions {
    /// Size class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeClass>,
    /// Style / material variant id.
    #[serde(alias = "style", alias = "material", skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// Ruin factor in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degradation: Option<f64>,
    /// Structure seed; the dispatcher's base seed is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Biome name (village and ruin palettes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biome: Option<String>,
    /// Number of village buildings, center included.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub village_size: Option<i64>,
    /// Forces burial of a ruined portal on or off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buried: Option<bool>,
    /// Everything else, passed through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl StructureOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a loose host map, ignoring values of the wrong type.
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, Value>) -> Self {
        let mut options = Self::default();
        for (key, value) in map {
            let accepted = match key.as_str() {
                "size" => value
                    .as_str()
                    .and_then(SizeClass::parse)
                    .map(|s| options.size = Some(s)),
                "variant" | "style" | "material" => {
                    value.as_str().map(|s| options.variant = Some(s.to_owned()))
                }
                "degradation" => value.as_float().map(|d| options.degradation = Some(d)),
                "seed" => value.as_int().map(|s| options.seed = Some(s)),
                "biome" => value.as_str().map(|s| options.biome = Some(s.to_owned())),
                "village_size" => value.as_int().map(|n| options.village_size = Some(n)),
                "buried" => value.as_bool().map(|b| options.buried = Some(b)),
                _ => {
                    options.extra.insert(key.clone(), value.clone());
                    Some(())
                }
            };
            if accepted.is_none() {
                tracing::debug!(key = key.as_str(), ?value, "ignoring option with unexpected type");
            }
        }
        options
    }

    /// Sets the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the size class.
    #[must_use]
    pub fn with_size(mut self, size: SizeClass) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets the degradation.
    #[must_use]
    pub fn with_degradation(mut self, degradation: f64) -> Self {
        self.degradation = Some(degradation);
        self
    }

    /// Sets the biome.
    #[must_use]
    pub fn with_biome(mut self, biome: impl Into<String>) -> Self {
        self.biome = Some(biome.into());
        self
    }

    /// Sets the style variant.
    #[must_use]
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// Sets the village building count.
    #[must_use]
    pub fn with_village_size(mut self, count: i64) -> Self {
        self.village_size = Some(count);
        self
    }

    /// Forces burial on or off.
    #[must_use]
    pub fn with_buried(mut self, buried: bool) -> Self {
        self.buried = Some(buried);
        self
    }

    /// Adds a generator-specific option.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Size class, medium when unset.
    #[must_use]
    pub fn size_or_default(&self) -> SizeClass {
        self.size.unwrap_or(SizeClass::Medium)
    }

    /// Degradation clamped to `[0, 1]`, `fallback` when unset or NaN.
    #[must_use]
    pub fn degradation_or(&self, fallback: f64) -> f64 {
        match self.degradation {
            Some(d) if !d.is_nan() => d.clamp(0.0, 1.0),
            _ => fallback.clamp(0.0, 1.0),
        }
    }

    /// Seed reinterpreted as unsigned bits.
    #[must_use]
    pub fn seed_bits(&self) -> Option<u64> {
        #[allow(clippy::cast_sign_loss)]
        self.seed.map(|s| s as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_map_is_lenient() {
        let mut map = BTreeMap::new();
        map.insert("seed".to_owned(), Value::Int(42));
        map.insert("size".to_owned(), Value::Text("LARGE".into()));
        map.insert("degradation".to_owned(), Value::Text("lots".into()));
        map.insert("style".to_owned(), Value::Text("desert".into()));
        map.insert("flag_color".to_owned(), Value::Text("red".into()));

        let options = StructureOptions::from_map(&map);
        assert_eq!(options.seed, Some(42));
        assert_eq!(options.size, Some(SizeClass::Large));
        assert_eq!(options.degradation, None);
        assert_eq!(options.variant.as_deref(), Some("desert"));
        assert_eq!(options.extra.get("flag_color"), Some(&Value::Text("red".into())));
    }

    #[test]
    fn test_degradation_is_clamped() {
        assert_eq!(StructureOptions::new().with_degradation(3.0).degradation_or(0.1), 1.0);
        assert_eq!(StructureOptions::new().with_degradation(-1.0).degradation_or(0.1), 0.0);
        assert_eq!(StructureOptions::new().degradation_or(0.25), 0.25);
        assert_eq!(StructureOptions::new().with_degradation(f64::NAN).degradation_or(0.5), 0.5);
    }

    #[test]
    fn test_negative_seed_keeps_bits() {
        let options = StructureOptions::new().with_seed(-1);
        assert_eq!(options.seed_bits(), Some(u64::MAX));
    }
}
