//! # Style Tables
//!
//! Material sets consumed by every generator. A [`StyleTable`] maps a
//! semantic [`Slot`] to a small weighted set of block descriptors; the
//! [`Palettes`] registry holds one table per structure family and one per
//! village biome. Tables are built once and shared read-only across calls.

use std::collections::HashMap;

use bastion_shared::BlockDescriptor;

use crate::random::SeededRandom;

/// Semantic material slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Slot {
    /// Outer and inner walls
    Wall = 0,
    /// Walkable floor layer
    Floor = 1,
    /// Ceiling layer
    Ceiling = 2,
    /// Roofs above buildings
    Roof = 3,
    /// Trim and decoration accents
    Accent = 4,
    /// Light sources
    Light = 5,
    /// Columns and supports
    Pillar = 6,
    /// Roads and paths
    Path = 7,
    /// Interior fluid
    Fluid = 8,
    /// Window panes
    Window = 9,
    /// Small detail blocks
    Detail = 10,
    /// Foundation courses
    Foundation = 11,
}

impl Slot {
    /// Number of slots.
    pub const COUNT: usize = 12;

    /// Block used when a table leaves the slot empty.
    #[must_use]
    const fn fallback(self) -> &'static str {
        match self {
            Self::Light => "torch",
            Self::Fluid => "water",
            Self::Window => "glass_pane",
            Self::Path => "dirt_path",
            Self::Pillar => "oak_log",
            _ => "stone",
        }
    }
}

/// Biomes with their own village palette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Biome {
    /// Temperate grassland
    #[default]
    Plains = 0,
    /// Arid sand
    Desert = 1,
    /// Dry grassland with acacia
    Savanna = 2,
    /// Cold spruce forest
    Taiga = 3,
    /// Snow-covered tundra
    Snowy = 4,
}

impl Biome {
    /// Lenient biome lookup. Unrecognized names fall back to plains.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "desert" | "badlands" => Self::Desert,
            "savanna" | "savanna_plateau" => Self::Savanna,
            "taiga" | "old_growth_taiga" => Self::Taiga,
            "snowy" | "snowy_plains" | "snowy_tundra" | "tundra" | "snowy_taiga" => Self::Snowy,
            _ => Self::Plains,
        }
    }

    /// Registry key of the village palette.
    #[must_use]
    pub const fn village_palette(self) -> &'static str {
        match self {
            Self::Plains => "village_plains",
            Self::Desert => "village_desert",
            Self::Savanna => "village_savanna",
            Self::Taiga => "village_taiga",
            Self::Snowy => "village_snowy",
        }
    }
}

/// Slot -> weighted descriptors for one structure or biome.
#[derive(Clone, Debug)]
pub struct StyleTable {
    name: String,
    slots: [Vec<(BlockDescriptor, u32)>; Slot::COUNT],
}

impl StyleTable {
    /// Empty table; every slot answers with its fallback block.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: Default::default(),
        }
    }

    /// Sets a slot to a single block type.
    #[must_use]
    pub fn with(mut self, slot: Slot, kind: &str) -> Self {
        self.slots[slot as usize] = vec![(BlockDescriptor::new(kind), 1)];
        self
    }

    /// Sets a slot to a weighted set of block types.
    #[must_use]
    pub fn with_weighted(mut self, slot: Slot, entries: &[(&str, u32)]) -> Self {
        self.slots[slot as usize] = entries
            .iter()
            .map(|(kind, weight)| (BlockDescriptor::new(*kind), *weight))
            .collect();
        self
    }

    /// Sets a slot to a fully specified descriptor.
    #[must_use]
    pub fn with_block(mut self, slot: Slot, block: BlockDescriptor) -> Self {
        self.slots[slot as usize] = vec![(block, 1)];
        self
    }

    /// Table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First (dominant) descriptor of a slot. Draws nothing.
    #[must_use]
    pub fn primary(&self, slot: Slot) -> BlockDescriptor {
        self.slots[slot as usize]
            .first()
            .map_or_else(|| BlockDescriptor::new(slot.fallback()), |(block, _)| block.clone())
    }

    /// Weighted draw from a slot.
    ///
    /// Single-entry slots return without consuming the stream.
    pub fn pick(&self, slot: Slot, rng: &mut SeededRandom) -> BlockDescriptor {
        let entries = &self.slots[slot as usize];
        if entries.len() <= 1 {
            return self.primary(slot);
        }
        rng.pick_weighted(entries)
            .cloned()
            .unwrap_or_else(|| self.primary(slot))
    }
}

/// Registry of every style table, keyed by name.
#[derive(Clone, Debug)]
pub struct Palettes {
    tables: HashMap<String, StyleTable>,
    fallback: StyleTable,
}

impl Palettes {
    /// Built-in tables for all structure families and village biomes.
    #[must_use]
    pub fn standard() -> Self {
        let mut palettes = Self {
            tables: HashMap::new(),
            fallback: StyleTable::new("fallback"),
        };
        for table in builtin_tables() {
            palettes.insert(table);
        }
        palettes
    }

    /// Adds or replaces a table.
    pub fn insert(&mut self, table: StyleTable) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Looks up a table; unknown names get the stone fallback table.
    #[must_use]
    pub fn get(&self, name: &str) -> &StyleTable {
        self.tables.get(name).unwrap_or(&self.fallback)
    }

    /// Returns true if a table with that name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Village palette for a biome.
    #[must_use]
    pub fn village(&self, biome: Biome) -> &StyleTable {
        self.get(biome.village_palette())
    }
}

impl Default for Palettes {
    fn default() -> Self {
        Self::standard()
    }
}

#[allow(clippy::too_many_lines)]
fn builtin_tables() -> Vec<StyleTable> {
    use Slot::{
        Accent, Ceiling, Detail, Floor, Fluid, Foundation, Light, Path, Pillar, Roof, Wall, Window,
    };

    vec![
        // Villages
        StyleTable::new("village_plains")
            .with(Wall, "oak_planks")
            .with(Floor, "oak_planks")
            .with(Ceiling, "oak_planks")
            .with(Roof, "oak_stairs")
            .with(Accent, "stripped_oak_log")
            .with(Light, "torch")
            .with(Pillar, "oak_log")
            .with(Path, "dirt_path")
            .with(Window, "glass_pane")
            .with(Detail, "white_bed")
            .with(Foundation, "cobblestone"),
        StyleTable::new("village_desert")
            .with(Wall, "sandstone")
            .with(Floor, "smooth_sandstone")
            .with(Ceiling, "cut_sandstone")
            .with(Roof, "smooth_sandstone_slab")
            .with(Accent, "chiseled_sandstone")
            .with(Light, "torch")
            .with(Pillar, "cut_sandstone")
            .with(Path, "smooth_sandstone")
            .with(Window, "glass_pane")
            .with(Detail, "green_bed")
            .with(Foundation, "sandstone"),
        StyleTable::new("village_savanna")
            .with(Wall, "acacia_planks")
            .with(Floor, "acacia_planks")
            .with(Ceiling, "acacia_planks")
            .with(Roof, "acacia_stairs")
            .with(Accent, "orange_terracotta")
            .with(Light, "torch")
            .with(Pillar, "acacia_log")
            .with(Path, "dirt_path")
            .with(Window, "glass_pane")
            .with(Detail, "orange_bed")
            .with(Foundation, "cobblestone"),
        StyleTable::new("village_taiga")
            .with(Wall, "spruce_planks")
            .with(Floor, "spruce_planks")
            .with(Ceiling, "spruce_planks")
            .with(Roof, "spruce_stairs")
            .with(Accent, "stripped_spruce_log")
            .with(Light, "lantern")
            .with(Pillar, "spruce_log")
            .with(Path, "dirt_path")
            .with(Window, "glass_pane")
            .with(Detail, "brown_bed")
            .with(Foundation, "mossy_cobblestone"),
        StyleTable::new("village_snowy")
            .with(Wall, "spruce_planks")
            .with(Floor, "spruce_planks")
            .with(Ceiling, "spruce_planks")
            .with(Roof, "snow_block")
            .with(Accent, "blue_ice")
            .with(Light, "lantern")
            .with(Pillar, "stripped_spruce_log")
            .with(Path, "packed_ice")
            .with(Window, "glass_pane")
            .with(Detail, "light_blue_bed")
            .with(Foundation, "snow_block"),
        // Underground
        StyleTable::new("mineshaft")
            .with(Wall, "stone")
            .with(Floor, "oak_planks")
            .with(Ceiling, "stone")
            .with(Pillar, "oak_fence")
            .with(Accent, "oak_planks")
            .with(Light, "torch")
            .with(Detail, "cobweb"),
        StyleTable::new("stronghold")
            .with_weighted(Wall, &[("stone_bricks", 10)])
            .with(Floor, "stone_bricks")
            .with(Ceiling, "stone_bricks")
            .with(Accent, "chiseled_stone_bricks")
            .with(Light, "wall_torch")
            .with(Pillar, "stone_brick_wall")
            .with(Detail, "bookshelf")
            .with(Fluid, "lava"),
        StyleTable::new("dungeon")
            .with_weighted(Wall, &[("cobblestone", 3), ("mossy_cobblestone", 1)])
            .with_weighted(Floor, &[("mossy_cobblestone", 2), ("cobblestone", 1)])
            .with(Ceiling, "cobblestone")
            .with(Light, "torch"),
        StyleTable::new("ancient_city")
            .with_weighted(Wall, &[("deepslate_bricks", 6), ("cracked_deepslate_bricks", 2), ("deepslate_tiles", 2)])
            .with(Floor, "polished_deepslate")
            .with(Ceiling, "deepslate_tiles")
            .with(Foundation, "deepslate")
            .with(Accent, "chiseled_deepslate")
            .with(Pillar, "polished_deepslate_wall")
            .with(Light, "soul_lantern")
            .with(Detail, "sculk")
            .with(Path, "polished_deepslate"),
        // Water
        StyleTable::new("ocean_monument")
            .with_weighted(Wall, &[("prismarine_bricks", 5), ("prismarine", 3), ("dark_prismarine", 2)])
            .with(Floor, "prismarine_bricks")
            .with(Ceiling, "dark_prismarine")
            .with(Roof, "dark_prismarine")
            .with(Accent, "sea_lantern")
            .with(Light, "sea_lantern")
            .with(Pillar, "prismarine_bricks")
            .with(Window, "sea_lantern")
            .with(Fluid, "water")
            .with(Foundation, "prismarine"),
        StyleTable::new("ocean_ruins_warm")
            .with_weighted(Wall, &[("sandstone", 4), ("cut_sandstone", 2), ("chiseled_sandstone", 1)])
            .with(Floor, "sandstone")
            .with(Foundation, "sand")
            .with(Fluid, "water")
            .with(Detail, "seagrass"),
        StyleTable::new("ocean_ruins_cold")
            .with_weighted(Wall, &[("stone_bricks", 4), ("cracked_stone_bricks", 2), ("mossy_stone_bricks", 2)])
            .with(Floor, "stone_bricks")
            .with(Foundation, "gravel")
            .with(Fluid, "water")
            .with(Detail, "seagrass"),
        // Temples
        StyleTable::new("desert_pyramid")
            .with(Wall, "sandstone")
            .with(Floor, "sandstone")
            .with(Ceiling, "sandstone")
            .with(Accent, "orange_terracotta")
            .with(Pillar, "cut_sandstone")
            .with(Detail, "chiseled_sandstone")
            .with(Foundation, "sandstone"),
        StyleTable::new("jungle_temple")
            .with_weighted(Wall, &[("cobblestone", 3), ("mossy_cobblestone", 2)])
            .with(Floor, "cobblestone")
            .with(Ceiling, "mossy_cobblestone")
            .with(Accent, "chiseled_stone_bricks")
            .with(Pillar, "mossy_stone_bricks")
            .with(Detail, "vine")
            .with(Foundation, "cobblestone"),
        StyleTable::new("ruins")
            .with_weighted(Wall, &[("stone_bricks", 5), ("cracked_stone_bricks", 3), ("mossy_stone_bricks", 2)])
            .with(Floor, "cobblestone")
            .with(Foundation, "cobblestone")
            .with(Detail, "moss_carpet"),
        // Decorations
        StyleTable::new("well")
            .with(Wall, "cobblestone")
            .with(Floor, "cobblestone")
            .with(Roof, "cobblestone_slab")
            .with(Pillar, "oak_fence")
            .with(Fluid, "water"),
        StyleTable::new("boulder")
            .with_weighted(Wall, &[("mossy_cobblestone", 3), ("cobblestone", 2), ("andesite", 1)]),
        StyleTable::new("fallen_tree")
            .with(Pillar, "oak_log")
            .with(Detail, "moss_carpet")
            .with(Accent, "brown_mushroom"),
        // Ruined portals
        StyleTable::new("portal_standard")
            .with(Wall, "obsidian")
            .with(Accent, "crying_obsidian")
            .with_weighted(Floor, &[("netherrack", 6), ("magma_block", 1)])
            .with(Foundation, "stone")
            .with(Detail, "fire"),
        StyleTable::new("portal_desert")
            .with(Wall, "obsidian")
            .with(Accent, "crying_obsidian")
            .with_weighted(Floor, &[("netherrack", 4), ("magma_block", 1)])
            .with(Foundation, "sandstone")
            .with(Detail, "fire"),
        StyleTable::new("portal_jungle")
            .with(Wall, "obsidian")
            .with(Accent, "crying_obsidian")
            .with_weighted(Floor, &[("netherrack", 4), ("mossy_cobblestone", 2)])
            .with(Foundation, "mossy_stone_bricks")
            .with(Detail, "vine"),
        StyleTable::new("portal_mountain")
            .with(Wall, "obsidian")
            .with(Accent, "crying_obsidian")
            .with_weighted(Floor, &[("netherrack", 5), ("magma_block", 2)])
            .with(Foundation, "cobblestone")
            .with(Detail, "fire"),
        StyleTable::new("portal_ocean")
            .with(Wall, "obsidian")
            .with(Accent, "crying_obsidian")
            .with_weighted(Floor, &[("netherrack", 3), ("magma_block", 3)])
            .with(Foundation, "gravel")
            .with(Detail, "seagrass"),
    ]
}
