//! Block descriptors written by structure generators.
//!
//! Wire shape: `{ "type": "chest", "metadata": { "facing": "north", ... } }`.
//! Metadata is an ordered map so two identical descriptors always
//! serialize identically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::math::Direction;

/// A loose metadata / option value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean flag
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Text
    Text(String),
    /// Literal item list (chest contents)
    Items(Vec<ItemStack>),
}

impl Value {
    /// Returns the boolean, if this is one
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, accepting integral floats
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            #[allow(clippy::cast_possible_truncation)]
            Self::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            _ => None,
        }
    }

    /// Returns the number as a float
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the text, if this is text
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the item list, if this is one
    #[must_use]
    pub fn as_items(&self) -> Option<&[ItemStack]> {
        match self {
            Self::Items(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<ItemStack>> for Value {
    fn from(value: Vec<ItemStack>) -> Self {
        Self::Items(value)
    }
}

/// One stack of a literal chest item list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item type identifier
    #[serde(rename = "type")]
    pub kind: String,
    /// Stack size
    pub count: u32,
    /// Optional variant name (music disc track, enchantment, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ItemStack {
    /// Creates an unnamed stack
    #[must_use]
    pub fn new(kind: impl Into<String>, count: u32) -> Self {
        Self {
            kind: kind.into(),
            count,
            name: None,
        }
    }

    /// Attaches a variant name
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Block types a creature can stand in or walk through.
const PASSABLE: &[&str] = &[
    "air",
    "cave_air",
    "water",
    "bubble_column",
    "seagrass",
    "kelp",
    "rail",
    "powered_rail",
    "torch",
    "wall_torch",
    "soul_torch",
    "redstone_wire",
    "tripwire",
    "tripwire_hook",
    "stone_pressure_plate",
    "oak_pressure_plate",
    "lever",
    "carpet",
    "moss_carpet",
    "snow",
    "sculk_vein",
    "cobweb",
    "vine",
    "glow_lichen",
    "chest_minecart",
    "candle",
    "fire",
    "soul_fire",
    "short_grass",
    "flower_pot",
];

/// Immutable description of one block: a type id plus an open metadata bag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, Value>,
}

impl BlockDescriptor {
    /// Creates a descriptor without metadata
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Plain air
    #[must_use]
    pub fn air() -> Self {
        Self::new("air")
    }

    /// Adds or replaces one metadata entry
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Sets `facing`
    #[must_use]
    pub fn facing(self, direction: Direction) -> Self {
        self.with("facing", direction.as_str())
    }

    /// Sets `axis` from a horizontal direction
    #[must_use]
    pub fn axis(self, direction: Direction) -> Self {
        self.with("axis", direction.axis())
    }

    /// Marks the block as waterlogged
    #[must_use]
    pub fn waterlogged(self) -> Self {
        self.with("waterlogged", true)
    }

    /// Attaches a loot-table id (resolved by the host's loot registry)
    #[must_use]
    pub fn loot(self, table: impl Into<String>) -> Self {
        self.with("loot", table.into())
    }

    /// Attaches a literal item list
    #[must_use]
    pub fn items(self, items: Vec<ItemStack>) -> Self {
        self.with("items", items)
    }

    /// Sets the creature kind of a spawner block
    #[must_use]
    pub fn entity(self, kind: impl Into<String>) -> Self {
        self.with("entity", kind.into())
    }

    /// Block type id
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// All metadata entries
    #[must_use]
    pub const fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    /// One metadata entry
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Loot-table id, if one is attached
    #[must_use]
    pub fn loot_table(&self) -> Option<&str> {
        self.get("loot").and_then(Value::as_str)
    }

    /// Literal item list, if one is attached
    #[must_use]
    pub fn item_list(&self) -> Option<&[ItemStack]> {
        self.get("items").and_then(Value::as_items)
    }

    /// Returns true for air variants
    #[must_use]
    pub fn is_air(&self) -> bool {
        matches!(self.kind.as_str(), "air" | "cave_air")
    }

    /// Returns true for water and lava
    #[must_use]
    pub fn is_fluid(&self) -> bool {
        matches!(self.kind.as_str(), "water" | "lava")
    }

    /// Returns true if the block does not obstruct movement
    #[must_use]
    pub fn is_passable(&self) -> bool {
        PASSABLE.contains(&self.kind.as_str()) || self.kind.ends_with("_carpet")
    }

    /// Returns true if the block holds loot (chest, barrel, minecart, ...)
    #[must_use]
    pub fn is_container(&self) -> bool {
        self.get("loot").is_some() || self.get("items").is_some()
    }
}
