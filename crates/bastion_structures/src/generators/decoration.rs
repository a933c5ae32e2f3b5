//! Small surface decorations: village wells, boulder piles, fallen trees.
//!
//! None of these have rooms or corridors; the result carries the bounds
//! and nothing else.

use bastion_shared::{BlockDescriptor, BoundingBox, Coordinate};

use super::FeatureGenerator;
use crate::context::BuildContext;
use crate::palette::{Slot, StyleTable};
use crate::primitives::sphere;
use crate::result::StructureResult;

/// Log species a fallen tree may be made of.
const TREE_SPECIES: &[&str] = &["oak", "birch", "spruce", "jungle", "dark_oak", "acacia"];

/// Builds a well centred on `center` (walking level) and returns its box.
///
/// Layout: a 5x5 cobble apron, a 3x3 rim around a water shaft three deep,
/// fence posts on the rim corners and a slab roof.
pub(crate) fn build_well(ctx: &mut BuildContext<'_>, center: Coordinate, style: &StyleTable) -> BoundingBox {
    for dz in -2..=2_i32 {
        for dx in -2..=2_i32 {
            let ring = dx.abs().max(dz.abs());
            let column = center.offset(dx, 0, dz);
            match ring {
                0 => {
                    for depth in 0..=3 {
                        ctx.place_style(column.below(depth), style, Slot::Fluid);
                    }
                    ctx.place_style(column.below(4), style, Slot::Wall);
                }
                1 => {
                    for depth in 0..=3 {
                        ctx.place_style(column.below(depth), style, Slot::Wall);
                    }
                }
                _ => {
                    ctx.place_style(column.below(1), style, Slot::Floor);
                }
            }
        }
    }
    for (dx, dz) in [(-1, -1), (1, -1), (-1, 1), (1, 1)] {
        for h in 1..=2 {
            ctx.place_style(center.offset(dx, h, dz), style, Slot::Pillar);
        }
    }
    for dz in -1..=1 {
        for dx in -1..=1 {
            ctx.place_style(center.offset(dx, 3, dz), style, Slot::Roof);
        }
    }
    BoundingBox::new(center.offset(-2, -4, -2), center.offset(2, 3, 2))
}

/// Standalone well.
#[derive(Debug, Default, Clone, Copy)]
pub struct WellGenerator;

impl FeatureGenerator for WellGenerator {
    fn generate(&self, mut ctx: BuildContext<'_>) -> StructureResult {
        let style = ctx.palette("well");
        let origin = ctx.origin();
        let footprint = build_well(&mut ctx, origin, style);
        ctx.declare(footprint);
        ctx.finish()
    }
}

/// Two to four overlapping stone spheres.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoulderPileGenerator;

impl FeatureGenerator for BoulderPileGenerator {
    fn generate(&self, mut ctx: BuildContext<'_>) -> StructureResult {
        let style = ctx.palette("boulder");
        let origin = ctx.origin();
        let count = ctx.rng.next_int(2, 4);
        for _ in 0..count {
            let radius = ctx.rng.next_int(1, 2);
            let dx = ctx.rng.next_int(-3, 3);
            let dz = ctx.rng.next_int(-3, 3);
            let mut base = origin.offset(dx, 0, dz);
            if let Some(ground) = ctx.ground_below(base.above(4), 12) {
                base = ground.above(1);
            }
            sphere(&mut ctx, base.above(radius - 1), radius, style, Slot::Wall);
        }
        ctx.finish()
    }
}

/// A short stump and a log lying beside it, with moss and mushrooms.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallenTreeGenerator;

impl FeatureGenerator for FallenTreeGenerator {
    fn generate(&self, mut ctx: BuildContext<'_>) -> StructureResult {
        let style = ctx.palette("fallen_tree");
        let origin = ctx.origin();
        let log = match ctx.options().variant.as_deref() {
            Some(species) if TREE_SPECIES.contains(&species) => BlockDescriptor::new(format!("{species}_log")),
            _ => style.primary(Slot::Pillar),
        };

        let direction = ctx.rng.direction();
        let length = ctx.rng.next_int(4, 7);
        let stump = ctx.rng.next_int(1, 2);

        for h in 0..stump {
            ctx.place(origin.above(h), log.clone().with("axis", "y"));
        }
        for i in 0..length {
            let at = origin.step(direction, 2 + i);
            ctx.place(at, log.clone().axis(direction));
            let roll = ctx.rng.next_f64();
            if roll < 0.35 {
                ctx.place_style(at.above(1), style, Slot::Detail);
            } else if roll < 0.5 {
                ctx.place_style(at.above(1), style, Slot::Accent);
            }
        }
        tracing::trace!(%origin, ?direction, length, "fallen tree placed");
        ctx.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::testing::{contained, run};
    use crate::options::StructureOptions;

    #[test]
    fn test_well_layout() {
        let origin = Coordinate::new(0, 64, 0);
        let (result, canvas) = run(&WellGenerator, "well", origin, &StructureOptions::new(), 1);
        assert_eq!(canvas.get(origin).map(BlockDescriptor::kind), Some("water"));
        assert_eq!(canvas.get(origin.offset(1, 1, 1)).map(BlockDescriptor::kind), Some("oak_fence"));
        assert_eq!(canvas.count_kind("cobblestone_slab"), 9);
        assert!(result.rooms.is_empty());
        assert!(contained(&result, &canvas));
    }

    #[test]
    fn test_boulders_stay_near_origin() {
        let origin = Coordinate::new(10, 70, -4);
        let (result, canvas) = run(&BoulderPileGenerator, "boulder_pile", origin, &StructureOptions::new(), 3);
        assert!(canvas.count_non_air() > 0);
        let bounds = canvas.bounds().unwrap();
        assert!(bounds.min.x >= origin.x - 5 && bounds.max.x <= origin.x + 5);
        assert!(contained(&result, &canvas));
    }

    #[test]
    fn test_fallen_tree_uses_requested_species() {
        let options = StructureOptions::new().with_variant("birch");
        let (result, canvas) = run(&FallenTreeGenerator, "fallen_tree", Coordinate::new(0, 64, 0), &options, 9);
        assert!(canvas.count_kind("birch_log") >= 5);
        assert_eq!(canvas.count_kind("oak_log"), 0);
        assert!(contained(&result, &canvas));
    }
}
