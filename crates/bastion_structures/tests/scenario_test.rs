//! # Scenario Tests
//!
//! End-to-end requests through the dispatcher, checked against what a
//! host would see in its world and entity system.

use bastion_structures::{
    BlockDescriptor, Capabilities, Coordinate, EntityHandle, RoomKind, SpawnRequest, StructureGenerator,
    StructureOptions, VoxelCanvas,
};

#[test]
fn test_mineshaft_rails_and_cart() {
    let engine = StructureGenerator::new();
    let options = StructureOptions::new().with_seed(42);
    let mut canvas = VoxelCanvas::new();
    let result = engine
        .generate("mineshaft", Coordinate::new(0, 40, 0), &options, &mut canvas)
        .expect("mineshaft");

    let tuning = &engine.config().mineshaft;
    let main = result.corridors[0];
    assert_eq!(main.length(), tuning.medium_length);
    assert!(main.direction().is_some(), "main corridor runs along one axis");
    for (i, cell) in main.centre_line().into_iter().enumerate() {
        if i > 0 && i % usize::try_from(tuning.support_interval).unwrap() == 0 {
            continue;
        }
        let kind = canvas.get(cell).map(BlockDescriptor::kind);
        assert!(matches!(kind, Some("rail" | "chest_minecart")), "cell {i}: {kind:?}");
    }

    let carts = canvas.positions_of("chest_minecart");
    assert_eq!(carts.len(), 1);
    let cart = carts[0];
    let near_an_end = result.corridors.iter().any(|c| {
        let end = c.end;
        (cart.x - end.x).abs() + (cart.z - end.z).abs() <= 2 && cart.y == end.y
    });
    assert!(near_an_end, "cart at {cart} is not at a corridor end");
    let record = &result.loot_containers[0];
    assert_eq!(record.position, cart);
    assert_eq!(record.block, "chest_minecart");
}

#[test]
fn test_village_with_live_spawner() {
    let engine = StructureGenerator::new();
    let options = StructureOptions::new().with_seed(7).with_biome("plains").with_village_size(5);
    let mut canvas = VoxelCanvas::new();
    let mut spawned: Vec<SpawnRequest> = Vec::new();
    let mut next_id = 0_u64;
    let mut spawner = |request: &SpawnRequest| {
        spawned.push(request.clone());
        next_id += 1;
        EntityHandle::Live(next_id)
    };
    let caps = Capabilities::new(&mut canvas).with_spawner(&mut spawner);
    let result = engine
        .generate_with("village", Coordinate::new(0, 64, 0), &options, caps)
        .expect("village");

    assert_eq!(result.rooms_of(RoomKind::VillageCenter).count(), 1);
    assert_eq!(result.rooms.len(), 5);

    let beds: usize = result
        .rooms
        .iter()
        .filter_map(|room| room.village.as_ref())
        .map(|tags| tags.beds.len())
        .sum();
    let villagers = spawned.iter().filter(|s| s.kind == "villager").count();
    assert!(villagers <= beds, "{villagers} villagers for {beds} beds");
    assert_eq!(villagers, result.spawn_count("villager"));
    assert_eq!(spawned, result.spawns);
}

#[test]
fn test_village_without_spawner_is_geometry_only() {
    let engine = StructureGenerator::new();
    let options = StructureOptions::new().with_seed(7).with_village_size(5);
    let mut canvas = VoxelCanvas::new();
    let result = engine
        .generate("village", Coordinate::new(0, 64, 0), &options, &mut canvas)
        .expect("village");
    assert_eq!(result.rooms.len(), 5);
    assert!(canvas.count_non_air() > 0);
    // Requests are still described in the result.
    assert_eq!(result.spawns.len(), result.mob_spawns.values().map(Vec::len).sum::<usize>());
}

#[test]
fn test_ancient_city_echo_shards() {
    let engine = StructureGenerator::new();
    let options = StructureOptions::new().with_seed(12345);
    let mut canvas = VoxelCanvas::new();
    let result = engine
        .generate("ancient_city", Coordinate::new(0, 25, 0), &options, &mut canvas)
        .expect("ancient city");

    let treasure: Vec<_> = result.rooms_of(RoomKind::TreasureRoom).collect();
    assert!(!treasure.is_empty());
    let shards = treasure
        .iter()
        .flat_map(|room| result.loot_in(room))
        .flat_map(|loot| loot.items.iter())
        .find(|item| item.kind == "echo_shard")
        .expect("a treasure chest holds echo shards");
    assert!((1..=3).contains(&shards.count));
}

#[test]
fn test_stronghold_portal_room() {
    let engine = StructureGenerator::with_seed(3);
    let mut canvas = VoxelCanvas::new();
    let result = engine
        .generate("stronghold", Coordinate::new(0, 20, 0), &StructureOptions::new(), &mut canvas)
        .expect("stronghold");
    assert_eq!(result.rooms_of(RoomKind::PortalRoom).count(), 1);
    assert_eq!(canvas.count_kind("end_portal_frame"), 12);
    assert_eq!(result.rooms_of(RoomKind::Library).count(), 1);
}

#[test]
fn test_closure_writer_sees_every_write_in_order() {
    let engine = StructureGenerator::with_seed(8);
    let at = Coordinate::new(0, 30, 0);
    let options = StructureOptions::new();

    let mut log = Vec::new();
    let mut writer = |pos: Coordinate, block: BlockDescriptor| log.push((pos, block));
    engine.generate("dungeon", at, &options, &mut writer).expect("dungeon");

    let mut canvas = VoxelCanvas::new();
    engine.generate("dungeon", at, &options, &mut canvas).expect("dungeon");
    assert_eq!(log.as_slice(), canvas.writes());
}
