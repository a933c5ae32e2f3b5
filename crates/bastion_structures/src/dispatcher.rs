//! # Structure Dispatcher
//!
//! Single entry point for hosts. Built-in families are a closed enum
//! mapped to their generators at compile time; hosts may add their own
//! kinds at runtime through the registry.
//!
//! ## Request flow
//!
//! ```text
//! generate(id, position, options, writer)
//!     │
//!     ├── validate height against the configured limits
//!     ├── resolve id: registry first, then built-in kinds
//!     ├── seed = WorldSeed(options.seed | base).derive(id).at(position)
//!     └── generator.generate(BuildContext) ──> StructureResult
//! ```
//!
//! Nothing here panics: unknown ids, out-of-range positions and rejected
//! registrations come back as `None` / `false` with a warning.

use std::collections::HashMap;
use std::sync::Arc;

use bastion_shared::Coordinate;
use parking_lot::RwLock;

use crate::capability::{BlockWriter, Capabilities, EntitySpawner};
use crate::config::StructureConfig;
use crate::context::BuildContext;
use crate::error::{GenerationResult, StructureError};
use crate::generators::ancient_city::AncientCityGenerator;
use crate::generators::decoration::{BoulderPileGenerator, FallenTreeGenerator, WellGenerator};
use crate::generators::dungeon::DungeonGenerator;
use crate::generators::mineshaft::MineshaftGenerator;
use crate::generators::monument::OceanMonumentGenerator;
use crate::generators::ruined_portal::RuinedPortalGenerator;
use crate::generators::ruins::{OceanRuinsGenerator, RuinsGenerator};
use crate::generators::stronghold::StrongholdGenerator;
use crate::generators::temple::{DesertPyramidGenerator, JungleTempleGenerator};
use crate::generators::village::VillageGenerator;
use crate::generators::{FeatureGenerator, GeneratorFn};
use crate::options::StructureOptions;
use crate::palette::Palettes;
use crate::random::WorldSeed;
use crate::result::StructureResult;

/// Base seed used when neither the dispatcher nor the request sets one.
pub const DEFAULT_BASE_SEED: u64 = 0x5EED_B457_1011;

// =============================================================================
// Built-in kinds
// =============================================================================

/// Built-in structure families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StructureKind {
    /// Village well
    Well,
    /// Pile of mossy boulders
    BoulderPile,
    /// Toppled tree trunk
    FallenTree,
    /// Desert pyramid
    DesertPyramid,
    /// Jungle temple
    JungleTemple,
    /// Monster room
    Dungeon,
    /// Mineshaft
    Mineshaft,
    /// Stronghold
    Stronghold,
    /// Ocean monument
    OceanMonument,
    /// Ancient city
    AncientCity,
    /// Village
    Village,
    /// Ruined portal
    RuinedPortal,
    /// Land ruins
    Ruins,
    /// Ocean ruins
    OceanRuins,
}

impl StructureKind {
    /// Every built-in kind.
    pub const ALL: [Self; 14] = [
        Self::Well,
        Self::BoulderPile,
        Self::FallenTree,
        Self::DesertPyramid,
        Self::JungleTemple,
        Self::Dungeon,
        Self::Mineshaft,
        Self::Stronghold,
        Self::OceanMonument,
        Self::AncientCity,
        Self::Village,
        Self::RuinedPortal,
        Self::Ruins,
        Self::OceanRuins,
    ];

    /// Canonical id.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Well => "well",
            Self::BoulderPile => "boulder_pile",
            Self::FallenTree => "fallen_tree",
            Self::DesertPyramid => "desert_pyramid",
            Self::JungleTemple => "jungle_temple",
            Self::Dungeon => "dungeon",
            Self::Mineshaft => "mineshaft",
            Self::Stronghold => "stronghold",
            Self::OceanMonument => "ocean_monument",
            Self::AncientCity => "ancient_city",
            Self::Village => "village",
            Self::RuinedPortal => "ruined_portal",
            Self::Ruins => "ruins",
            Self::OceanRuins => "ocean_ruins",
        }
    }

    /// Parses a canonical id or one of the accepted aliases.
    #[must_use]
    pub fn parse(id: &str) -> Option<Self> {
        let kind = match id {
            "well" | "village_well" => Self::Well,
            "boulder_pile" | "boulder" | "boulders" => Self::BoulderPile,
            "fallen_tree" | "fallen_log" => Self::FallenTree,
            "desert_pyramid" | "desert_temple" | "pyramid" => Self::DesertPyramid,
            "jungle_temple" | "jungle_pyramid" => Self::JungleTemple,
            "dungeon" | "monster_room" => Self::Dungeon,
            "mineshaft" => Self::Mineshaft,
            "stronghold" => Self::Stronghold,
            "ocean_monument" | "monument" => Self::OceanMonument,
            "ancient_city" => Self::AncientCity,
            "village" => Self::Village,
            "ruined_portal" => Self::RuinedPortal,
            "ruins" | "ruin" => Self::Ruins,
            "ocean_ruins" | "ocean_ruin" => Self::OceanRuins,
            _ => return None,
        };
        Some(kind)
    }

    /// Generator for this kind.
    #[must_use]
    pub fn generator(self) -> &'static dyn FeatureGenerator {
        match self {
            Self::Well => &WellGenerator,
            Self::BoulderPile => &BoulderPileGenerator,
            Self::FallenTree => &FallenTreeGenerator,
            Self::DesertPyramid => &DesertPyramidGenerator,
            Self::JungleTemple => &JungleTempleGenerator,
            Self::Dungeon => &DungeonGenerator,
            Self::Mineshaft => &MineshaftGenerator,
            Self::Stronghold => &StrongholdGenerator,
            Self::OceanMonument => &OceanMonumentGenerator,
            Self::AncientCity => &AncientCityGenerator,
            Self::Village => &VillageGenerator,
            Self::RuinedPortal => &RuinedPortalGenerator,
            Self::Ruins => &RuinsGenerator,
            Self::OceanRuins => &OceanRuinsGenerator,
        }
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Structure generation entry point.
///
/// ## Thread Safety
///
/// `StructureGenerator` is `Send + Sync`. Share it behind an `Arc` and call
/// [`generate`](Self::generate) from several threads for non-overlapping
/// regions; registration takes a short write lock.
///
/// ## Usage
///
/// ```rust,ignore
/// let engine = StructureGenerator::with_seed(42);
/// let mut canvas = VoxelCanvas::new();
/// let result = engine
///     .generate("mineshaft", Coordinate::new(0, 40, 0), &StructureOptions::new(), &mut canvas)
///     .expect("built-in kind");
/// assert!(canvas.count_kind("chest_minecart") == 1);
/// ```
pub struct StructureGenerator {
    base_seed: u64,
    config: StructureConfig,
    palettes: Palettes,
    custom: RwLock<HashMap<String, Arc<dyn FeatureGenerator>>>,
}

impl StructureGenerator {
    /// Dispatcher with default configuration, standard palettes and the
    /// default base seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_BASE_SEED)
    }

    /// Dispatcher with a base seed.
    #[must_use]
    pub fn with_seed(base_seed: u64) -> Self {
        Self {
            base_seed,
            config: StructureConfig::default(),
            palettes: Palettes::standard(),
            custom: RwLock::new(HashMap::new()),
        }
    }

    /// Replaces the configuration (sanitized first).
    #[must_use]
    pub fn with_config(mut self, config: StructureConfig) -> Self {
        self.config = config.sanitized();
        self
    }

    /// Replaces the palettes.
    #[must_use]
    pub fn with_palettes(mut self, palettes: Palettes) -> Self {
        self.palettes = palettes;
        self
    }

    /// Base seed used when a request carries none.
    #[inline]
    #[must_use]
    pub const fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &StructureConfig {
        &self.config
    }

    /// Active palettes.
    #[must_use]
    pub const fn palettes(&self) -> &Palettes {
        &self.palettes
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Registers a host generator under `id`.
    ///
    /// Returns false, logs a warning and keeps the existing binding if `id`
    /// is taken, built-in ids included.
    pub fn register(&self, id: impl Into<String>, generator: impl FeatureGenerator + 'static) -> bool {
        let id = id.into();
        match self.try_register(&id, Arc::new(generator)) {
            Ok(()) => {
                tracing::debug!(id = id.as_str(), "structure generator registered");
                true
            }
            Err(err) => {
                tracing::warn!(%err, "registration rejected");
                false
            }
        }
    }

    /// [`register`](Self::register) for a plain function or closure.
    pub fn register_fn<F>(&self, id: impl Into<String>, generate: F) -> bool
    where
        F: Fn(BuildContext<'_>) -> StructureResult + Send + Sync + 'static,
    {
        self.register(id, GeneratorFn(generate))
    }

    fn try_register(&self, id: &str, generator: Arc<dyn FeatureGenerator>) -> GenerationResult<()> {
        if StructureKind::parse(id).is_some() {
            return Err(StructureError::DuplicateRegistration(id.to_owned()));
        }
        let mut custom = self.custom.write();
        if custom.contains_key(id) {
            return Err(StructureError::DuplicateRegistration(id.to_owned()));
        }
        custom.insert(id.to_owned(), generator);
        Ok(())
    }

    /// Returns true if `id` resolves to a generator.
    #[must_use]
    pub fn is_registered(&self, id: &str) -> bool {
        StructureKind::parse(id).is_some() || self.custom.read().contains_key(id)
    }

    /// Every id that resolves, built-in canonical ids first, then host ids sorted.
    #[must_use]
    pub fn kinds(&self) -> Vec<String> {
        let mut custom: Vec<String> = self.custom.read().keys().cloned().collect();
        custom.sort_unstable();
        StructureKind::ALL
            .iter()
            .map(|k| k.id().to_owned())
            .chain(custom)
            .collect()
    }

    // =========================================================================
    // Generation
    // =========================================================================

    /// Generates `id` at `position`, writing through `writer`. Spawns are
    /// recorded but reach no live entity system.
    ///
    /// Returns `None` for unknown ids and positions outside the build range.
    pub fn generate(
        &self,
        id: &str,
        position: Coordinate,
        options: &StructureOptions,
        writer: &mut dyn BlockWriter,
    ) -> Option<StructureResult> {
        self.generate_with(id, position, options, Capabilities::new(writer))
    }

    /// Generates with a full capability set (writer, optional spawner and
    /// terrain probe).
    pub fn generate_with(
        &self,
        id: &str,
        position: Coordinate,
        options: &StructureOptions,
        caps: Capabilities<'_>,
    ) -> Option<StructureResult> {
        match self.try_generate(id, position, options, caps) {
            Ok(result) => Some(result),
            Err(err) => {
                tracing::warn!(%err, %position, "structure request rejected");
                None
            }
        }
    }

    fn try_generate(
        &self,
        id: &str,
        position: Coordinate,
        options: &StructureOptions,
        caps: Capabilities<'_>,
    ) -> GenerationResult<StructureResult> {
        let limits = &self.config.limits;
        if position.y < limits.min_y || position.y > limits.max_y {
            return Err(StructureError::PositionOutOfRange {
                y: position.y,
                min: limits.min_y,
                max: limits.max_y,
            });
        }

        // Host generators are held by Arc so the lock is released before
        // the (possibly long) generation runs.
        let custom = self.custom.read().get(id).cloned();
        let (canonical, builtin) = match StructureKind::parse(id) {
            Some(kind) => (kind.id(), Some(kind.generator())),
            None => (id, None),
        };
        let generator: &dyn FeatureGenerator = match (&custom, builtin) {
            (Some(generator), _) => generator.as_ref(),
            (None, Some(generator)) => generator,
            (None, None) => return Err(StructureError::UnknownStructure(id.to_owned())),
        };

        let base = options.seed_bits().unwrap_or(self.base_seed);
        let seed = WorldSeed::new(base).derive_str(canonical).at(position);
        tracing::debug!(id = canonical, %position, seed = seed.value(), "generating structure");

        // Rebuilt so the host borrows shrink to this call's lifetime.
        let Capabilities { writer, spawner, reader } = caps;
        let mut caps = Capabilities::new(writer);
        caps.spawner = spawner.map(|s| s as &mut dyn EntitySpawner);
        caps.reader = reader;

        let ctx = BuildContext::new(canonical, position, options, &self.config, &self.palettes, seed, caps);
        Ok(generator.generate(ctx))
    }
}

impl Default for StructureGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StructureGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructureGenerator")
            .field("base_seed", &self.base_seed)
            .field("custom", &self.custom.read().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::VoxelCanvas;
    use bastion_shared::{BlockDescriptor, EntityHandle, SpawnRequest};

    #[test]
    fn test_every_kind_round_trips_its_id() {
        for kind in StructureKind::ALL {
            assert_eq!(StructureKind::parse(kind.id()), Some(kind));
        }
        assert_eq!(StructureKind::parse("monument"), Some(StructureKind::OceanMonument));
        assert_eq!(StructureKind::parse("castle"), None);
    }

    #[test]
    fn test_unknown_id_is_none() {
        let engine = StructureGenerator::new();
        let mut canvas = VoxelCanvas::new();
        let result = engine.generate("castle", Coordinate::new(0, 64, 0), &StructureOptions::new(), &mut canvas);
        assert!(result.is_none());
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_position_out_of_range_is_none() {
        let engine = StructureGenerator::new();
        let mut canvas = VoxelCanvas::new();
        let options = StructureOptions::new();
        assert!(engine.generate("well", Coordinate::new(0, 900, 0), &options, &mut canvas).is_none());
        assert!(engine.generate("well", Coordinate::new(0, -200, 0), &options, &mut canvas).is_none());
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_first_registration_wins() {
        let engine = StructureGenerator::new();
        let first = engine.register_fn("marker", |mut ctx: BuildContext<'_>| {
            let at = ctx.origin();
            ctx.place(at, BlockDescriptor::new("gold_block"));
            ctx.finish()
        });
        let second = engine.register_fn("marker", |mut ctx: BuildContext<'_>| {
            let at = ctx.origin();
            ctx.place(at, BlockDescriptor::new("dirt"));
            ctx.finish()
        });
        assert!(first);
        assert!(!second);

        let mut canvas = VoxelCanvas::new();
        let at = Coordinate::new(1, 70, 1);
        let result = engine.generate("marker", at, &StructureOptions::new(), &mut canvas).unwrap();
        assert_eq!(result.structure, "marker");
        assert_eq!(canvas.get(at).map(BlockDescriptor::kind), Some("gold_block"));
    }

    #[test]
    fn test_builtin_ids_cannot_be_shadowed() {
        let engine = StructureGenerator::new();
        assert!(!engine.register_fn("village", |ctx: BuildContext<'_>| ctx.finish()));
        assert!(!engine.register_fn("monument", |ctx: BuildContext<'_>| ctx.finish()));
        assert!(engine.is_registered("village"));
        assert!(!engine.is_registered("marker"));
    }

    #[test]
    fn test_request_seed_overrides_base_seed() {
        let a = StructureGenerator::with_seed(1);
        let b = StructureGenerator::with_seed(2);
        let options = StructureOptions::new().with_seed(99);
        let at = Coordinate::new(0, 30, 0);
        let (mut ca, mut cb) = (VoxelCanvas::new(), VoxelCanvas::new());
        a.generate("dungeon", at, &options, &mut ca).unwrap();
        b.generate("dungeon", at, &options, &mut cb).unwrap();
        assert_eq!(ca.writes(), cb.writes());
    }

    #[test]
    fn test_alias_resolves_to_canonical_stream() {
        let engine = StructureGenerator::with_seed(5);
        let at = Coordinate::new(0, 30, 0);
        let (mut ca, mut cb) = (VoxelCanvas::new(), VoxelCanvas::new());
        let a = engine.generate("dungeon", at, &StructureOptions::new(), &mut ca).unwrap();
        let b = engine.generate("monster_room", at, &StructureOptions::new(), &mut cb).unwrap();
        assert_eq!(a.structure, "dungeon");
        assert_eq!(b.structure, "dungeon");
        assert_eq!(ca.writes(), cb.writes());
    }

    #[test]
    fn test_generate_with_outlives_request_borrows() {
        let engine = StructureGenerator::with_seed(4);
        let terrain = VoxelCanvas::new();
        let mut canvas = VoxelCanvas::new();
        let mut spawned = 0_usize;
        let mut spawner = |_: &SpawnRequest| {
            spawned += 1;
            EntityHandle::Live(spawned as u64)
        };
        let result = {
            // Id and options live shorter than the host capabilities.
            let id = String::from("monster_room");
            let options = StructureOptions::new().with_seed(21);
            let caps = Capabilities::new(&mut canvas).with_spawner(&mut spawner).with_reader(&terrain);
            engine.generate_with(&id, Coordinate::new(0, 30, 0), &options, caps)
        };
        let result = result.expect("dungeon");
        assert!(!canvas.is_empty());
        assert_eq!(spawned, result.spawns.len());
    }

    #[test]
    fn test_kinds_lists_builtins_then_hosts() {
        let engine = StructureGenerator::new();
        engine.register_fn("zz_custom", |ctx: BuildContext<'_>| ctx.finish());
        let kinds = engine.kinds();
        assert_eq!(kinds.len(), StructureKind::ALL.len() + 1);
        assert_eq!(kinds.last().map(String::as_str), Some("zz_custom"));
    }
}
