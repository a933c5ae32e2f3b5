//! Entity spawn requests shared between the structure engine and the
//! host's entity subsystem.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::block::Value;
use crate::math::Coordinate;

/// Options attached to a spawn (profession, `baby`, bound workstation, ...)
pub type SpawnOptions = BTreeMap<String, Value>;

/// A request to place one creature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnRequest {
    /// Entity kind (`villager`, `elder_guardian`, ...)
    pub kind: String,
    /// Spawn position
    pub position: Coordinate,
    /// Kind-specific options
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: SpawnOptions,
}

impl SpawnRequest {
    /// Creates a request without options
    #[must_use]
    pub fn new(kind: impl Into<String>, position: Coordinate) -> Self {
        Self {
            kind: kind.into(),
            position,
            options: SpawnOptions::new(),
        }
    }

    /// Adds one option
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// What a spawner hands back for a request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityHandle {
    /// A live entity was created by the host
    Live(u64),
    /// No live spawner was configured; the request is only described
    Described(SpawnRequest),
}

impl EntityHandle {
    /// Returns true if a live entity exists
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }
}
