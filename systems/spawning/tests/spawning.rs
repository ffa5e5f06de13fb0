use std::rc::Rc;

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shroom_sniff_core::{
    ChanceTable, CoinRewardConfig, Command, Event, EventBus, MushroomCategory, MushroomId,
    MushroomType, PrefabRegistry, PullCurve, RewardRange, RuntimeSettings, Table, Tile, TileId,
    TypeFloatTable,
};
use shroom_sniff_save::{MemoryStore, ProgressStore};
use shroom_sniff_system_settings::SpawnParameters;
use shroom_sniff_system_spawning::{SpawnError, SpawnReport, SpawnRequest, Spawner};

#[test]
fn single_category_and_type_fill_every_slot() {
    let tiles = grid(3, Vec3::new(2.0, 0.2, 2.0));
    let registry = PrefabRegistry::new(MushroomCategory::ALL);
    let parameters = parameters(2, 0.0);
    let mut spawner = Spawner::new(CoinRewardConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(0x1234_5678);
    let mut commands = Vec::new();

    let report = spawner
        .spawn_mushrooms(request(&tiles, Some(&registry), &parameters), &mut rng, &mut commands)
        .expect("spawn succeeds");

    assert_eq!(report, SpawnReport { spawned: 6, skipped: 0 });
    assert_eq!(spawner.total_spawned(), 6);
    assert_eq!(commands.len(), 6);
    for command in &commands {
        match command {
            Command::SpawnMushroom { category, kind, .. } => {
                assert_eq!(*category, MushroomCategory::P1);
                assert_eq!(*kind, MushroomType::Small);
            }
            other => panic!("unexpected command emitted: {other:?}"),
        }
    }
}

#[test]
fn spawned_positions_stay_on_their_tiles() {
    let tiles = grid(4, Vec3::new(2.0, 0.2, 2.0));
    let registry = PrefabRegistry::new(MushroomCategory::ALL);
    let parameters = parameters(3, 0.0);
    let mut spawner = Spawner::new(CoinRewardConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut commands = Vec::new();

    let _ = spawner
        .spawn_mushrooms(request(&tiles, Some(&registry), &parameters), &mut rng, &mut commands)
        .expect("spawn succeeds");

    let mut per_tile = vec![0; tiles.len()];
    for command in &commands {
        let Command::SpawnMushroom { position, .. } = command else {
            panic!("unexpected command emitted: {command:?}");
        };
        let owner = tiles
            .iter()
            .position(|tile| {
                (position.x - tile.center().x).abs() <= 1.0
                    && (position.z - tile.center().z).abs() <= 1.0
            })
            .expect("position lies on a tile");
        per_tile[owner] += 1;
    }
    assert_eq!(per_tile, vec![3; 4], "every tile receives its slots");
}

#[test]
fn saturated_tiles_skip_slots_without_counting_them() {
    let tiles = grid(3, Vec3::ZERO);
    let registry = PrefabRegistry::new([MushroomCategory::P1]);
    let parameters = parameters(4, 0.5);
    let mut spawner = Spawner::new(CoinRewardConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let mut commands = Vec::new();

    let report = spawner
        .spawn_mushrooms(request(&tiles, Some(&registry), &parameters), &mut rng, &mut commands)
        .expect("spawn succeeds");

    assert_eq!(report, SpawnReport { spawned: 3, skipped: 9 });
    assert_eq!(spawner.total_spawned(), 3);
    assert_eq!(commands.len(), 3);
}

#[test]
fn configuration_errors_abort_without_commands() {
    let tiles = grid(2, Vec3::ONE);
    let registry = PrefabRegistry::new([MushroomCategory::P1]);
    let mut spawner = Spawner::new(CoinRewardConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut commands = Vec::new();

    let valid = parameters(1, 0.0);
    assert_eq!(
        spawner.spawn_mushrooms(request(&tiles, None, &valid), &mut rng, &mut commands),
        Err(SpawnError::MissingPrefabRegistry)
    );
    assert_eq!(
        spawner.spawn_mushrooms(request(&[], Some(&registry), &valid), &mut rng, &mut commands),
        Err(SpawnError::NoTiles)
    );

    let mut unregistered = parameters(1, 0.0);
    unregistered.category_chances = ChanceTable::from_pairs([(MushroomCategory::P3, 5)]);
    assert_eq!(
        spawner.spawn_mushrooms(
            request(&tiles, Some(&registry), &unregistered),
            &mut rng,
            &mut commands
        ),
        Err(SpawnError::NoCategoryOptions)
    );

    let mut zero_types = parameters(1, 0.0);
    zero_types.type_chances = ChanceTable::from_pairs([(MushroomType::Small, 0)]);
    assert_eq!(
        spawner.spawn_mushrooms(
            request(&tiles, Some(&registry), &zero_types),
            &mut rng,
            &mut commands
        ),
        Err(SpawnError::NoTypeOptions)
    );

    assert!(commands.is_empty());
    assert_eq!(spawner.total_spawned(), 0);
}

#[test]
fn identical_seeds_spawn_identical_layouts() {
    let tiles = grid(5, Vec3::new(3.0, 0.2, 3.0));
    let registry = PrefabRegistry::new(MushroomCategory::ALL);
    let mut parameters = parameters(3, 0.4);
    parameters.category_chances = ChanceTable::from_pairs([
        (MushroomCategory::P1, 3),
        (MushroomCategory::P2, 1),
    ]);

    let run = |seed| {
        let mut spawner = Spawner::new(CoinRewardConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut commands = Vec::new();
        let _ = spawner
            .spawn_mushrooms(request(&tiles, Some(&registry), &parameters), &mut rng, &mut commands)
            .expect("spawn succeeds");
        commands
    };

    assert_eq!(run(77), run(77), "replay diverged between runs");
}

#[test]
fn rollup_pays_each_pull_and_signals_completion_once() {
    let tiles = grid(2, Vec3::new(2.0, 0.2, 2.0));
    let registry = PrefabRegistry::new(MushroomCategory::ALL);
    let parameters = parameters(1, 0.0);
    let rewards = CoinRewardConfig {
        type_ranges: Table::from_pairs([(MushroomType::Small, RewardRange::new(4, 4))]),
        ..CoinRewardConfig::default()
    };
    let mut spawner = Spawner::new(rewards);
    let mut store = MemoryStore::default();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut bus = EventBus::new();
    let mut commands = Vec::new();

    let _ = spawner
        .spawn_mushrooms(request(&tiles, Some(&registry), &parameters), &mut rng, &mut commands)
        .expect("spawn succeeds");
    assert_eq!(spawner.total_spawned(), 2);

    spawner.handle(&[pulled(1)], &mut store, &mut rng, &mut bus);
    assert_eq!(
        bus.drain(),
        vec![Event::CoinsAwarded {
            amount: 4,
            round_total: 4
        }]
    );

    spawner.handle(
        &[Event::LevelGenerated { tile_count: 2 }, pulled(2), pulled(3)],
        &mut store,
        &mut rng,
        &mut bus,
    );
    assert_eq!(
        bus.drain(),
        vec![
            Event::CoinsAwarded {
                amount: 4,
                round_total: 8
            },
            Event::AllMushroomsCollected { collected: 2 },
        ],
        "pulls after completion are ignored"
    );

    assert_eq!(spawner.collected(), 2);
    assert_eq!(spawner.coins_earned_this_round(), 8);
    assert_eq!(store.data().coins, 8);
    assert!(!spawner.is_listening());
}

#[test]
fn category_rewards_apply_when_type_has_none() {
    let tiles = grid(1, Vec3::ONE);
    let registry = PrefabRegistry::new(MushroomCategory::ALL);
    let parameters = parameters(1, 0.0);
    let rewards = CoinRewardConfig {
        type_ranges: Table::default(),
        category_ranges: Table::from_pairs([(MushroomCategory::P1, RewardRange::new(7, 7))]),
        default_range: RewardRange::new(1, 1),
    };
    let mut spawner = Spawner::new(rewards);
    let mut store = MemoryStore::default();
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut bus = EventBus::new();
    let mut commands = Vec::new();

    let _ = spawner
        .spawn_mushrooms(request(&tiles, Some(&registry), &parameters), &mut rng, &mut commands)
        .expect("spawn succeeds");
    spawner.handle(&[pulled(1)], &mut store, &mut rng, &mut bus);

    assert_eq!(spawner.coins_earned_this_round(), 7);
    assert_eq!(store.data().coins, 7);
}

#[test]
fn respawning_resets_round_counters() {
    let tiles = grid(1, Vec3::ONE);
    let registry = PrefabRegistry::new(MushroomCategory::ALL);
    let parameters = parameters(1, 0.0);
    let mut spawner = Spawner::new(CoinRewardConfig::default());
    let mut store = MemoryStore::default();
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let mut bus = EventBus::new();
    let mut commands = Vec::new();

    let _ = spawner
        .spawn_mushrooms(request(&tiles, Some(&registry), &parameters), &mut rng, &mut commands)
        .expect("spawn succeeds");
    spawner.handle(&[pulled(1)], &mut store, &mut rng, &mut bus);
    assert!(spawner.coins_earned_this_round() > 0);

    let _ = spawner
        .spawn_mushrooms(request(&tiles, Some(&registry), &parameters), &mut rng, &mut commands)
        .expect("spawn succeeds");

    assert_eq!(spawner.collected(), 0);
    assert_eq!(spawner.coins_earned_this_round(), 0);
    assert!(spawner.is_listening());
}

fn grid(count: u32, scale: Vec3) -> Vec<Tile> {
    (0..count)
        .map(|index| {
            Tile::new(
                TileId::new(index),
                Vec3::new(index as f32 * 10.0, 0.0, 0.0),
                scale,
            )
        })
        .collect()
}

fn parameters(per_tile: u32, spacing: f32) -> SpawnParameters {
    SpawnParameters {
        category_chances: ChanceTable::from_pairs([(MushroomCategory::P1, 1)]),
        type_chances: ChanceTable::from_pairs([(MushroomType::Small, 1)]),
        mushrooms_per_tile: per_tile,
        max_spawn_attempts: 12,
        minimum_spacing: TypeFloatTable::from_pairs([(MushroomType::Small, spacing)]),
        spawn_padding: TypeFloatTable::default(),
    }
}

fn request<'a>(
    tiles: &'a [Tile],
    prefabs: Option<&'a PrefabRegistry>,
    parameters: &'a SpawnParameters,
) -> SpawnRequest<'a> {
    SpawnRequest {
        tiles,
        prefabs,
        parameters,
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

fn pulled(id: u32) -> Event {
    Event::MushroomPulled {
        id: MushroomId::new(id),
        category: MushroomCategory::P1,
        kind: MushroomType::Small,
    }
}
