//! Ruined nether portal.
//!
//! An obsidian frame, sometimes leaning, on a scorched netherrack apron.
//! Every block of the frame, the apron and the optional overburden goes
//! through the decay sample; frame corners and the apron rim decay first.

use std::collections::BTreeSet;

use bastion_shared::Direction;

use super::{chest, FeatureGenerator};
use crate::context::BuildContext;
use crate::palette::Slot;
use crate::primitives::DecayFactors;
use crate::result::StructureResult;

/// Known variants; anything else builds the standard one.
const VARIANTS: &[&str] = &["standard", "desert", "jungle", "mountain", "ocean"];

const CRYING_CHANCE: f64 = 0.15;
const TILT_CHANCE: f64 = 0.5;
const MAX_TILT_DEGREES: f64 = 15.0;
const FIRE_CHANCE: f64 = 0.12;
const BURIAL_CHANCE: f64 = 0.25;
const CHEST_CHANCE: f64 = 0.5;

/// How far a buried frame sinks.
const BURIAL_DEPTH: i32 = 3;

/// Ruined portal generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuinedPortalGenerator;

impl FeatureGenerator for RuinedPortalGenerator {
    #[allow(clippy::cast_possible_truncation)]
    fn generate(&self, mut ctx: BuildContext<'_>) -> StructureResult {
        let variant = ctx
            .options()
            .variant
            .as_deref()
            .filter(|v| VARIANTS.contains(v))
            .unwrap_or("standard");
        let style = ctx.palette(&format!("portal_{variant}"));
        let origin = ctx.origin();

        let width = ctx.rng.next_int(4, 6);
        let height = ctx.rng.next_int(5, 7);
        let along = if ctx.rng.chance(0.5) { Direction::East } else { Direction::South };
        let across = along.right();
        let tilt = if ctx.rng.chance(TILT_CHANCE) {
            ctx.rng.range_f64(-MAX_TILT_DEGREES, MAX_TILT_DEGREES).to_radians()
        } else {
            0.0
        };
        let rolled = ctx.rng.chance(BURIAL_CHANCE);
        let buried = ctx.options().buried.unwrap_or(rolled);
        let base = if buried { origin.below(BURIAL_DEPTH) } else { origin };

        // =====================================================================
        // Frame
        // =====================================================================
        let mut seen = BTreeSet::new();
        let mut frame = Vec::new();
        for v in 0..height {
            for u in 0..width {
                if u != 0 && u != width - 1 && v != 0 && v != height - 1 {
                    continue;
                }
                let lean = (f64::from(v) * tilt.sin()).round() as i32;
                let rise = (f64::from(v) * tilt.cos()).round() as i32;
                let at = base.step(along, u - width / 2).step(across, lean).above(rise);
                let corner = (u == 0 || u == width - 1) && (v == 0 || v == height - 1);
                let edge = if corner { 1.0 } else { 0.4 };
                // Rounding may fold two cells together; keep the first.
                if seen.insert(at) {
                    frame.push((at, DecayFactors::new(edge, f64::from(v) / f64::from(height - 1))));
                }
            }
        }
        for (at, factors) in &frame {
            let slot = if ctx.rng.chance(CRYING_CHANCE) { Slot::Accent } else { Slot::Wall };
            let block = ctx.pick(style, slot);
            ctx.place_decayed(*at, block, *factors);
        }

        // =====================================================================
        // Apron, fire, overburden
        // =====================================================================
        let radius = width / 2 + 3;
        let apron = base.below(1);
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dz * dz > radius * radius {
                    continue;
                }
                let at = apron.offset(dx, 0, dz);
                let factors = DecayFactors::radial(at, apron, radius, 1);
                let block = ctx.pick(style, Slot::Floor);
                let lit = ctx.rng.chance(FIRE_CHANCE);
                let kept = ctx.place_decayed(at, block, factors);
                let above = at.above(1);
                if kept && lit && !buried && !seen.contains(&above) {
                    ctx.place_style(above, style, Slot::Detail);
                }
            }
        }
        if buried {
            for h in 1..=BURIAL_DEPTH {
                for dz in -radius..=radius {
                    for dx in -radius..=radius {
                        let at = apron.offset(dx, h, dz);
                        if dx * dx + dz * dz > radius * radius || seen.contains(&at) {
                            continue;
                        }
                        let block = ctx.pick(style, Slot::Foundation);
                        let factors = DecayFactors::radial(at, apron, radius, BURIAL_DEPTH + 1);
                        ctx.place_decayed(at, block, factors);
                    }
                }
            }
        }

        let stocked = ctx.rng.chance(CHEST_CHANCE);
        if stocked {
            let at = origin.step(across, 2).step(along, width / 2 + 1);
            ctx.place_loot(at, chest(across.opposite(), "ruined_portal"));
        }

        tracing::debug!(%origin, variant, buried, stocked, frame = frame.len(), "ruined portal placed");
        ctx.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_shared::Coordinate;
    use crate::generators::testing::run;
    use crate::options::StructureOptions;

    fn frame_blocks(canvas: &crate::canvas::VoxelCanvas) -> usize {
        canvas.count_kind("obsidian") + canvas.count_kind("crying_obsidian")
    }

    #[test]
    fn test_intact_frame_is_complete() {
        let options = StructureOptions::new().with_degradation(0.0).with_buried(false);
        for seed in 0..10 {
            let (_, canvas) = run(&RuinedPortalGenerator, "ruined_portal", Coordinate::new(0, 64, 0), &options, seed);
            let blocks = frame_blocks(&canvas);
            // Perimeter of a 4x5 up to a 6x7 frame.
            assert!((14..=22).contains(&blocks), "seed {seed}: {blocks}");
        }
    }

    #[test]
    fn test_decay_only_removes() {
        let at = Coordinate::new(0, 64, 0);
        let light = StructureOptions::new().with_degradation(0.2);
        let heavy = StructureOptions::new().with_degradation(0.8);
        let (_, a) = run(&RuinedPortalGenerator, "ruined_portal", at, &light, 31);
        let (_, b) = run(&RuinedPortalGenerator, "ruined_portal", at, &heavy, 31);
        for (pos, _) in b.writes() {
            assert_eq!(a.get(*pos), b.get(*pos), "{pos} survives heavy decay only");
        }
        assert!(frame_blocks(&b) <= frame_blocks(&a));
    }

    #[test]
    fn test_variant_palette() {
        let options = StructureOptions::new().with_variant("desert").with_buried(true).with_degradation(0.0);
        let (_, canvas) = run(&RuinedPortalGenerator, "ruined_portal", Coordinate::new(0, 64, 0), &options, 2);
        assert!(canvas.count_kind("sandstone") > 0);
        assert_eq!(canvas.count_kind("vine"), 0);

        let unknown = StructureOptions::new().with_variant("no_such_variant").with_buried(true);
        let (_, canvas) = run(&RuinedPortalGenerator, "ruined_portal", Coordinate::new(0, 64, 0), &unknown, 2);
        assert_eq!(canvas.count_kind("sandstone"), 0);
    }
}
