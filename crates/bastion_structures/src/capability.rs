//! Host capabilities.
//!
//! The engine touches the outside world only through these traits: a block
//! writer (required), an entity spawner and a block reader (both optional).
//! Closures implement the writer and spawner traits directly.

use std::collections::BTreeMap;

use bastion_shared::{BlockDescriptor, Coordinate, EntityHandle, SpawnRequest};

/// Sink for block writes. Never read back by the engine.
pub trait BlockWriter {
    /// Sets the block at `at`, replacing whatever was there.
    fn set_block(&mut self, at: Coordinate, block: BlockDescriptor);
}

impl<F> BlockWriter for F
where
    F: FnMut(Coordinate, BlockDescriptor),
{
    fn set_block(&mut self, at: Coordinate, block: BlockDescriptor) {
        self(at, block);
    }
}

/// Read access to existing terrain, used for ground and ocean-floor probes.
pub trait BlockReader {
    /// Returns true if the cell holds a solid block.
    fn is_solid(&self, at: Coordinate) -> bool;

    /// Returns true if the cell holds water or lava.
    fn is_fluid(&self, at: Coordinate) -> bool {
        let _ = at;
        false
    }
}

/// Entity creation.
pub trait EntitySpawner {
    /// Spawns one entity and returns its handle.
    fn spawn(&mut self, request: &SpawnRequest) -> EntityHandle;
}

impl<F> EntitySpawner for F
where
    F: FnMut(&SpawnRequest) -> EntityHandle,
{
    fn spawn(&mut self, request: &SpawnRequest) -> EntityHandle {
        self(request)
    }
}

/// Everything a single generation call may use.
pub struct Capabilities<'a> {
    /// Block sink.
    pub writer: &'a mut dyn BlockWriter,
    /// Live entity spawner, if the host has one.
    pub spawner: Option<&'a mut dyn EntitySpawner>,
    /// Terrain probe, if the host has one.
    pub reader: Option<&'a dyn BlockReader>,
}

impl<'a> Capabilities<'a> {
    /// Writer only: geometry and loot, spawns described but not executed.
    pub fn new(writer: &'a mut dyn BlockWriter) -> Self {
        Self {
            writer,
            spawner: None,
            reader: None,
        }
    }

    /// Adds a live spawner.
    #[must_use]
    pub fn with_spawner(mut self, spawner: &'a mut dyn EntitySpawner) -> Self {
        self.spawner = Some(spawner);
        self
    }

    /// Adds a terrain reader.
    #[must_use]
    pub fn with_reader(mut self, reader: &'a dyn BlockReader) -> Self {
        self.reader = Some(reader);
        self
    }
}

/// Records every spawn request and forwards it to the host spawner when
/// one is configured. Without one, each request comes back as
/// [`EntityHandle::Described`].
pub struct SpawnerAdapter<'a> {
    spawner: Option<&'a mut dyn EntitySpawner>,
    issued: Vec<SpawnRequest>,
    by_kind: BTreeMap<String, Vec<Coordinate>>,
}

impl<'a> SpawnerAdapter<'a> {
    /// Wraps an optional host spawner.
    pub fn new(spawner: Option<&'a mut dyn EntitySpawner>) -> Self {
        Self {
            spawner,
            issued: Vec::new(),
            by_kind: BTreeMap::new(),
        }
    }

    /// Returns true if spawns reach a live entity system.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.spawner.is_some()
    }

    /// Issues one request.
    pub fn spawn(&mut self, request: SpawnRequest) -> EntityHandle {
        self.by_kind
            .entry(request.kind.clone())
            .or_default()
            .push(request.position);
        let handle = match self.spawner.as_deref_mut() {
            Some(spawner) => spawner.spawn(&request),
            None => EntityHandle::Described(request.clone()),
        };
        self.issued.push(request);
        handle
    }

    /// Requests issued so far, in order.
    #[must_use]
    pub fn issued(&self) -> &[SpawnRequest] {
        &self.issued
    }

    /// Consumes the adapter, returning the request log and the per-kind positions.
    #[must_use]
    pub fn into_records(self) -> (Vec<SpawnRequest>, BTreeMap<String, Vec<Coordinate>>) {
        (self.issued, self.by_kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_writer() {
        let mut seen = Vec::new();
        {
            let mut writer = |at: Coordinate, block: BlockDescriptor| seen.push((at, block));
            writer.set_block(Coordinate::new(1, 2, 3), BlockDescriptor::new("stone"));
        }
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1.kind(), "stone");
    }

    #[test]
    fn test_adapter_without_spawner_describes() {
        let mut adapter = SpawnerAdapter::new(None);
        let handle = adapter.spawn(SpawnRequest::new("villager", Coordinate::new(0, 64, 0)));
        assert!(!handle.is_live());
        assert!(matches!(handle, EntityHandle::Described(ref r) if r.kind == "villager"));
        let (issued, by_kind) = adapter.into_records();
        assert_eq!(issued.len(), 1);
        assert_eq!(by_kind["villager"], vec![Coordinate::new(0, 64, 0)]);
    }

    #[test]
    fn test_adapter_forwards_to_live_spawner() {
        let mut next_id = 0u64;
        let mut spawner = |_: &SpawnRequest| {
            next_id += 1;
            EntityHandle::Live(next_id)
        };
        let mut adapter = SpawnerAdapter::new(Some(&mut spawner));
        assert!(adapter.is_live());
        let first = adapter.spawn(SpawnRequest::new("guardian", Coordinate::ORIGIN));
        let second = adapter.spawn(SpawnRequest::new("guardian", Coordinate::ORIGIN));
        assert_eq!(first, EntityHandle::Live(1));
        assert_eq!(second, EntityHandle::Live(2));
        assert_eq!(adapter.issued().len(), 2);
    }
}
