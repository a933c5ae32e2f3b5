//! # Feature Generators
//!
//! One generator per structure family. Every generator has the same shape:
//! it receives a fresh [`BuildContext`] (seeded stream, capabilities, style
//! tables, tuning) and returns the finished [`StructureResult`].
//!
//! ## Families
//!
//! | Module | Structures |
//! |--------|-----------|
//! | [`decoration`] | well, boulder pile, fallen tree |
//! | [`dungeon`] | monster room |
//! | [`mineshaft`] | hub, rail corridors, branches |
//! | [`stronghold`] | entrance, stairs, library, portal room |
//! | [`village`] | ring layout, roads, villagers |
//! | [`ancient_city`] | platform, altar, treasure rooms, sculk |
//! | [`monument`] | flooded shell with guardian chambers |
//! | [`temple`] | desert pyramid, jungle temple |
//! | [`ruined_portal`] | tilted decayed frame |
//! | [`ruins`] | land ruins, ocean ruins |

pub mod ancient_city;
pub mod decoration;
pub mod dungeon;
pub mod mineshaft;
pub mod monument;
pub mod ruined_portal;
pub mod ruins;
pub mod stronghold;
pub mod temple;
pub mod village;

use bastion_shared::{BlockDescriptor, Direction};

use crate::context::BuildContext;
use crate::result::StructureResult;

/// A structure family.
///
/// Generators are stateless; everything a call needs arrives in the
/// context, so one instance serves every thread.
pub trait FeatureGenerator: Send + Sync {
    /// Builds one structure and returns its layout.
    fn generate(&self, ctx: BuildContext<'_>) -> StructureResult;
}

/// Adapts a plain function or closure into a [`FeatureGenerator`].
pub struct GeneratorFn<F>(pub F);

impl<F> FeatureGenerator for GeneratorFn<F>
where
    F: Fn(BuildContext<'_>) -> StructureResult + Send + Sync,
{
    fn generate(&self, ctx: BuildContext<'_>) -> StructureResult {
        (self.0)(ctx)
    }
}

/// Chest facing `facing`, filled from `table`.
#[must_use]
pub(crate) fn chest(facing: Direction, table: &str) -> BlockDescriptor {
    BlockDescriptor::new("chest").facing(facing).loot(table)
}

/// Mob spawner block for `entity`.
#[must_use]
pub(crate) fn spawner_block(entity: &str) -> BlockDescriptor {
    BlockDescriptor::new("spawner").entity(entity)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Runs generators against an in-memory canvas.

    use bastion_shared::Coordinate;

    use super::FeatureGenerator;
    use crate::canvas::VoxelCanvas;
    use crate::capability::{BlockReader, Capabilities};
    use crate::config::StructureConfig;
    use crate::context::BuildContext;
    use crate::options::StructureOptions;
    use crate::palette::Palettes;
    use crate::random::WorldSeed;
    use crate::result::StructureResult;

    /// Generates `id` at `origin` with a fixed seed.
    pub fn run(
        generator: &dyn FeatureGenerator,
        id: &str,
        origin: Coordinate,
        options: &StructureOptions,
        seed: u64,
    ) -> (StructureResult, VoxelCanvas) {
        generate(generator, id, origin, options, seed, None)
    }

    /// Like [`run`] with a terrain probe.
    pub fn run_on(
        generator: &dyn FeatureGenerator,
        id: &str,
        origin: Coordinate,
        options: &StructureOptions,
        seed: u64,
        terrain: &dyn BlockReader,
    ) -> (StructureResult, VoxelCanvas) {
        generate(generator, id, origin, options, seed, Some(terrain))
    }

    fn generate(
        generator: &dyn FeatureGenerator,
        id: &str,
        origin: Coordinate,
        options: &StructureOptions,
        seed: u64,
        terrain: Option<&dyn BlockReader>,
    ) -> (StructureResult, VoxelCanvas) {
        let config = StructureConfig::default();
        let palettes = Palettes::standard();
        let mut canvas = VoxelCanvas::new();
        let result = {
            let mut capabilities = Capabilities::new(&mut canvas);
            if let Some(terrain) = terrain {
                capabilities = capabilities.with_reader(terrain);
            }
            let ctx = BuildContext::new(
                id,
                origin,
                options,
                &config,
                &palettes,
                WorldSeed::new(seed),
                capabilities,
            );
            generator.generate(ctx)
        };
        (result, canvas)
    }

    /// Solid at and below `top`, empty above.
    pub struct FlatTerrain(pub i32);

    impl BlockReader for FlatTerrain {
        fn is_solid(&self, at: Coordinate) -> bool {
            at.y <= self.0
        }
    }

    /// Returns true if every final block lies inside the result bounds.
    pub fn contained(result: &StructureResult, canvas: &VoxelCanvas) -> bool {
        canvas.writes().iter().all(|(at, _)| result.bounds.contains(*at))
    }
}
