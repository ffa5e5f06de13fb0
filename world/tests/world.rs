use std::{rc::Rc, time::Duration};

use glam::Vec3;
use shroom_sniff_core::{
    Command, Event, EventBus, MushroomCategory, MushroomId, MushroomType, PointerState,
    PullCurve, RuntimeSettings, TypeFloatTable,
};
use shroom_sniff_system_collection::CollectionState;
use shroom_sniff_world::{self as world, query, World};

#[test]
fn configure_level_lays_out_requested_tiles() {
    let mut world = World::new();
    let mut bus = EventBus::new();

    world::apply(
        &mut world,
        Command::ConfigureLevel {
            tile_count: 7,
            tile_size: Vec3::new(2.0, 0.2, 2.0),
        },
        &mut bus,
    );

    assert_eq!(query::tiles(&world).len(), 7);
    assert_eq!(bus.drain(), vec![Event::LevelGenerated { tile_count: 7 }]);
    assert!(query::prefab_registry(&world).is_none());
}

#[test]
fn spawning_requires_a_registered_prefab() {
    let mut world = World::new();
    let mut bus = EventBus::new();

    world::apply(&mut world, spawn(MushroomCategory::P1, Vec3::ZERO), &mut bus);
    assert_eq!(query::active_mushroom_count(&world), 0, "no registry yet");

    register(&mut world, &mut bus, &[MushroomCategory::P1]);
    world::apply(&mut world, spawn(MushroomCategory::P2, Vec3::ZERO), &mut bus);
    assert_eq!(query::active_mushroom_count(&world), 0, "P2 is not registered");

    world::apply(&mut world, spawn(MushroomCategory::P1, Vec3::ZERO), &mut bus);
    assert_eq!(query::active_mushroom_count(&world), 1);
    assert_eq!(
        bus.drain(),
        vec![Event::MushroomSpawned {
            id: MushroomId::new(0),
            category: MushroomCategory::P1,
            kind: MushroomType::Small,
            position: Vec3::ZERO,
        }]
    );
}

#[test]
fn collected_mushrooms_return_to_the_pool_for_reuse() {
    let mut world = World::new();
    let mut bus = EventBus::new();
    register(&mut world, &mut bus, &[MushroomCategory::P1]);
    world::apply(&mut world, spawn(MushroomCategory::P1, Vec3::ZERO), &mut bus);
    let id = query::mushrooms(&world)[0].id();
    let _ = bus.drain();

    world::apply(&mut world, tick(1.0, press(id)), &mut bus);

    assert_eq!(query::active_mushroom_count(&world), 0);
    assert_eq!(query::pooled_mushroom_count(&world, MushroomCategory::P1), 1);
    assert!(bus.drain().contains(&Event::MushroomPulled {
        id,
        category: MushroomCategory::P1,
        kind: MushroomType::Small,
    }));

    world::apply(
        &mut world,
        spawn(MushroomCategory::P1, Vec3::new(1.0, 0.0, 0.0)),
        &mut bus,
    );
    assert_eq!(query::pooled_mushroom_count(&world, MushroomCategory::P1), 0);
    let reused = &query::mushrooms(&world)[0];
    assert_ne!(reused.id(), id, "reused entities receive fresh ids");
    assert_eq!(reused.state(), CollectionState::Idle);
    assert_eq!(reused.transform().position, Vec3::new(1.0, 0.0, 0.0));
}

#[test]
fn disabling_blocks_interaction() {
    let mut world = World::new();
    let mut bus = EventBus::new();
    register(&mut world, &mut bus, &[MushroomCategory::P1]);
    world::apply(&mut world, spawn(MushroomCategory::P1, Vec3::ZERO), &mut bus);
    let id = query::mushrooms(&world)[0].id();

    world::apply(&mut world, Command::SetMushroomsEnabled { enabled: false }, &mut bus);
    world::apply(&mut world, tick(5.0, press(id)), &mut bus);

    assert_eq!(query::active_mushroom_count(&world), 1);
    assert_eq!(
        query::mushroom(&world, id).map(|mushroom| mushroom.state()),
        Some(CollectionState::Disabled)
    );
    assert_eq!(query::mushroom_at(&world, Vec3::ZERO, 1.0), None);
}

#[test]
fn clearing_returns_every_mushroom_to_the_pool() {
    let mut world = World::new();
    let mut bus = EventBus::new();
    register(&mut world, &mut bus, &[MushroomCategory::P1, MushroomCategory::P2]);
    world::apply(&mut world, spawn(MushroomCategory::P1, Vec3::ZERO), &mut bus);
    world::apply(&mut world, spawn(MushroomCategory::P2, Vec3::ONE), &mut bus);
    world::apply(&mut world, spawn(MushroomCategory::P2, Vec3::X), &mut bus);

    world::apply(&mut world, Command::ClearMushrooms, &mut bus);

    assert_eq!(query::active_mushroom_count(&world), 0);
    assert_eq!(query::pooled_mushroom_count(&world, MushroomCategory::P1), 1);
    assert_eq!(query::pooled_mushroom_count(&world, MushroomCategory::P2), 2);
}

#[test]
fn mushroom_at_picks_the_nearest_within_radius() {
    let mut world = World::new();
    let mut bus = EventBus::new();
    register(&mut world, &mut bus, &[MushroomCategory::P1]);
    world::apply(&mut world, spawn(MushroomCategory::P1, Vec3::new(0.0, 0.0, 0.0)), &mut bus);
    world::apply(&mut world, spawn(MushroomCategory::P1, Vec3::new(0.6, 0.0, 0.0)), &mut bus);

    assert_eq!(
        query::mushroom_at(&world, Vec3::new(0.5, 3.0, 0.0), 0.5),
        Some(MushroomId::new(1)),
        "height is ignored"
    );
    assert_eq!(query::mushroom_at(&world, Vec3::new(5.0, 0.0, 5.0), 0.5), None);
}

fn register(world: &mut World, bus: &mut EventBus, categories: &[MushroomCategory]) {
    world::apply(
        world,
        Command::RegisterPrefabs {
            categories: categories.to_vec(),
        },
        bus,
    );
}

fn spawn(category: MushroomCategory, position: Vec3) -> Command {
    Command::SpawnMushroom {
        category,
        kind: MushroomType::Small,
        position,
        settings: Rc::new(RuntimeSettings {
            hold_to_collect_duration: 1.0,
            pull_curve: PullCurve::EaseInOut,
            pull_position_offset: Vec3::ZERO,
            pull_rotation_offset: Vec3::ZERO,
            pull_rotation_speed: 1.0,
            pull_scale_multiplier: Vec3::splat(0.7),
            size_multipliers: TypeFloatTable::default(),
        }),
    }
}

fn tick(seconds: f32, pointer: PointerState) -> Command {
    Command::Tick {
        dt: Duration::from_secs_f32(seconds),
        pointer,
    }
}

fn press(id: MushroomId) -> PointerState {
    PointerState {
        pressed: true,
        held: true,
        hovered: Some(id),
        ground_point: None,
    }
}
