//! # Structure Configuration
//!
//! Tunables for every structure family, loaded once at startup from TOML
//! (see `data/structures.toml`). Missing keys fall back to the defaults
//! below and every value is clamped into a sane range after loading, so a
//! bad file degrades structures instead of breaking them.

use std::path::Path;

use bastion_shared::{MAX_BUILD_HEIGHT, MIN_BUILD_HEIGHT};
use serde::{Deserialize, Serialize};

use crate::error::{GenerationResult, StructureError};

/// Build height limits applied to request origins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Lowest allowed origin Y.
    pub min_y: i32,
    /// Highest allowed origin Y.
    pub max_y: i32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            min_y: MIN_BUILD_HEIGHT,
            max_y: MAX_BUILD_HEIGHT,
        }
    }
}

/// Mineshaft tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MineshaftConfig {
    /// Main corridor length for `size = "small"`.
    pub small_length: i32,
    /// Main corridor length for `size = "medium"` (and the default).
    pub medium_length: i32,
    /// Main corridor length for `size = "large"`.
    pub large_length: i32,
    /// Cells between wooden supports.
    pub support_interval: i32,
    /// Cells between collapse decorations.
    pub decoration_interval: i32,
    /// Shortest branch.
    pub branch_min_length: i32,
    /// Longest branch before clamping.
    pub branch_max_length: i32,
    /// Chance of each optional room (intersection, spawner).
    pub room_chance: f64,
}

impl Default for MineshaftConfig {
    fn default() -> Self {
        Self {
            small_length: 32,
            medium_length: 48,
            large_length: 64,
            support_interval: 4,
            decoration_interval: 12,
            branch_min_length: 8,
            branch_max_length: 28,
            room_chance: 0.6,
        }
    }
}

/// Stronghold tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrongholdConfig {
    /// Lower bound of the cracked-brick substitution rate.
    pub cracked_min: f64,
    /// Upper bound of the cracked-brick substitution rate.
    pub cracked_max: f64,
    /// Lower bound of the mossy-brick substitution rate.
    pub mossy_min: f64,
    /// Upper bound of the mossy-brick substitution rate.
    pub mossy_max: f64,
    /// Chance of a loot chest in each corridor.
    pub corridor_chest_chance: f64,
    /// Cells between corridor torches.
    pub light_interval: i32,
}

impl Default for StrongholdConfig {
    fn default() -> Self {
        Self {
            cracked_min: 0.15,
            cracked_max: 0.25,
            mossy_min: 0.15,
            mossy_max: 0.25,
            corridor_chest_chance: 0.3,
            light_interval: 5,
        }
    }
}

/// Village tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VillageConfig {
    /// Buildings (center included) when neither `village_size` nor `size` is given.
    pub default_size: i32,
    /// Radius step between rings.
    pub ring_spacing: i32,
    /// Maximum distance for building-to-building roads.
    pub link_distance: f64,
    /// Chance of linking a building to its closest unconnected neighbour.
    pub link_probability: f64,
    /// Chance that a bed after the first goes to a child.
    pub child_probability: f64,
    /// Maximum angular jitter in radians.
    pub angle_jitter: f64,
}

impl Default for VillageConfig {
    fn default() -> Self {
        Self {
            default_size: 5,
            ring_spacing: 16,
            link_distance: 30.0,
            link_probability: 0.7,
            child_probability: 0.3,
            angle_jitter: 0.2,
        }
    }
}

/// Ancient city tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AncientCityConfig {
    /// Half-width of the platform.
    pub platform_radius: i32,
    /// Height of the air cavity above the platform.
    pub cavity_height: i32,
    /// Radius of the central altar chamber.
    pub chamber_radius: i32,
    /// Length of each cardinal corridor.
    pub corridor_length: i32,
    /// Distance of treasure rooms from the center.
    pub treasure_radius: i32,
    /// Fewest sculk patches.
    pub sculk_patches_min: i32,
    /// Most sculk patches.
    pub sculk_patches_max: i32,
}

impl Default for AncientCityConfig {
    fn default() -> Self {
        Self {
            platform_radius: 36,
            cavity_height: 10,
            chamber_radius: 9,
            corridor_length: 16,
            treasure_radius: 28,
            sculk_patches_min: 15,
            sculk_patches_max: 25,
        }
    }
}

/// Ocean monument tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonumentConfig {
    /// Footprint edge length.
    pub width: i32,
    /// Wall height above the base layer.
    pub height: i32,
    /// Cells between wall windows.
    pub window_interval: i32,
    /// Ordinary guardians scattered through the interior.
    pub guardians: i32,
}

impl Default for MonumentConfig {
    fn default() -> Self {
        Self {
            width: 29,
            height: 14,
            window_interval: 4,
            guardians: 8,
        }
    }
}

/// Degradation used when a request does not set one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DegradationConfig {
    /// Intact structures (villages, temples, ...).
    pub default: f64,
    /// Small ruins.
    pub ruins: f64,
    /// Ocean ruins.
    pub ocean_ruins: f64,
    /// Ruined portals.
    pub ruined_portal: f64,
    /// Strongholds (decor only).
    pub stronghold: f64,
}

impl Default for DegradationConfig {
    fn default() -> Self {
        Self {
            default: 0.0,
            ruins: 0.4,
            ocean_ruins: 0.3,
            ruined_portal: 0.3,
            stronghold: 0.05,
        }
    }
}

/// All structure tunables.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    /// Height limits.
    pub limits: LimitsConfig,
    /// Mineshaft tunables.
    pub mineshaft: MineshaftConfig,
    /// Stronghold tunables.
    pub stronghold: StrongholdConfig,
    /// Village tunables.
    pub village: VillageConfig,
    /// Ancient city tunables.
    pub ancient_city: AncientCityConfig,
    /// Ocean monument tunables.
    pub monument: MonumentConfig,
    /// Per-family default degradation.
    pub degradation: DegradationConfig,
}

impl StructureConfig {
    /// Parses a TOML document and sanitizes it.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::InvalidConfig`] if the document is not
    /// valid TOML or has mistyped keys.
    pub fn from_toml_str(source: &str) -> GenerationResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| StructureError::InvalidConfig(e.to_string()))?;
        Ok(config.sanitized())
    }

    /// Loads and sanitizes a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::InvalidConfig`] if the file cannot be read
    /// or parsed.
    pub fn load(path: impl AsRef<Path>) -> GenerationResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| StructureError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Default degradation for a structure id.
    #[must_use]
    pub fn default_degradation(&self, structure: &str) -> f64 {
        match structure {
            "ruins" => self.degradation.ruins,
            "ocean_ruins" => self.degradation.ocean_ruins,
            "ruined_portal" => self.degradation.ruined_portal,
            "stronghold" => self.degradation.stronghold,
            _ => self.degradation.default,
        }
    }

    /// Clamps every value into its working range.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let limits = &mut self.limits;
        limits.min_y = limits.min_y.clamp(MIN_BUILD_HEIGHT, MAX_BUILD_HEIGHT);
        limits.max_y = limits.max_y.clamp(limits.min_y, MAX_BUILD_HEIGHT);

        let m = &mut self.mineshaft;
        m.small_length = m.small_length.clamp(16, 256);
        m.medium_length = m.medium_length.clamp(16, 256);
        m.large_length = m.large_length.clamp(16, 256);
        m.support_interval = m.support_interval.clamp(2, 16);
        m.decoration_interval = m.decoration_interval.clamp(4, 64);
        m.branch_min_length = m.branch_min_length.clamp(4, 64);
        m.branch_max_length = m.branch_max_length.clamp(m.branch_min_length, 128);
        m.room_chance = unit(m.room_chance);

        let s = &mut self.stronghold;
        s.cracked_min = unit(s.cracked_min);
        s.cracked_max = unit(s.cracked_max).max(s.cracked_min);
        s.mossy_min = unit(s.mossy_min);
        s.mossy_max = unit(s.mossy_max).max(s.mossy_min);
        s.corridor_chest_chance = unit(s.corridor_chest_chance);
        s.light_interval = s.light_interval.clamp(1, 32);

        let v = &mut self.village;
        v.default_size = v.default_size.clamp(1, 40);
        v.ring_spacing = v.ring_spacing.clamp(12, 64);
        v.link_distance = v.link_distance.clamp(0.0, 128.0);
        v.link_probability = unit(v.link_probability);
        v.child_probability = unit(v.child_probability);
        v.angle_jitter = v.angle_jitter.clamp(0.0, 0.5);

        let a = &mut self.ancient_city;
        a.chamber_radius = a.chamber_radius.clamp(6, 16);
        a.corridor_length = a.corridor_length.clamp(8, 48);
        a.treasure_radius = a.treasure_radius.clamp(a.chamber_radius + 8, 64);
        a.platform_radius = a
            .platform_radius
            .clamp(a.chamber_radius + a.corridor_length + 4, 128)
            .max(a.treasure_radius + 8);
        a.cavity_height = a.cavity_height.clamp(6, 32);
        a.sculk_patches_min = a.sculk_patches_min.clamp(0, 100);
        a.sculk_patches_max = a.sculk_patches_max.clamp(a.sculk_patches_min, 200);

        let o = &mut self.monument;
        o.width = o.width.clamp(23, 64);
        o.height = o.height.clamp(14, 32);
        o.window_interval = o.window_interval.clamp(2, 16);
        o.guardians = o.guardians.clamp(0, 64);

        let d = &mut self.degradation;
        d.default = unit(d.default);
        d.ruins = unit(d.ruins);
        d.ocean_ruins = unit(d.ocean_ruins);
        d.ruined_portal = unit(d.ruined_portal);
        d.stronghold = unit(d.stronghold);

        self
    }
}

/// Clamps to `[0, 1]`, mapping NaN to zero.
fn unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_config_matches_defaults() {
        let shipped = include_str!("../../../data/structures.toml");
        let config = StructureConfig::from_toml_str(shipped).expect("shipped config parses");
        assert_eq!(config, StructureConfig::default().sanitized());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = StructureConfig::from_toml_str("[village]\nring_spacing = 20\n").unwrap();
        assert_eq!(config.village.ring_spacing, 20);
        assert_eq!(config.village.default_size, 5);
        assert_eq!(config.mineshaft, MineshaftConfig::default());
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let config = StructureConfig::from_toml_str(
            "[village]\nlink_probability = 4.0\n[mineshaft]\nsupport_interval = 0\n",
        )
        .unwrap();
        assert_eq!(config.village.link_probability, 1.0);
        assert_eq!(config.mineshaft.support_interval, 2);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let err = StructureConfig::from_toml_str("[village]\nring_spacing = \"wide\"\n");
        assert!(matches!(err, Err(StructureError::InvalidConfig(_))));
        let missing = StructureConfig::load("/definitely/not/here.toml");
        assert!(matches!(missing, Err(StructureError::InvalidConfig(_))));
    }

    #[test]
    fn test_default_degradation_per_family() {
        let config = StructureConfig::default();
        assert_eq!(config.default_degradation("village"), 0.0);
        assert!(config.default_degradation("ruins") > 0.0);
    }
}
