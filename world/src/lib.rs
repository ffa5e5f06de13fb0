#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Shroom Sniff.

mod level;
mod pool;

use std::time::Duration;

use log::warn;
use shroom_sniff_core::{
    Command, Event, EventBus, MushroomId, PointerState, PrefabRegistry, Tile, WELCOME_BANNER,
};
use shroom_sniff_system_collection::{CollectionState, Mushroom};

use crate::pool::MushroomPool;

/// Represents the authoritative Shroom Sniff world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tiles: Vec<Tile>,
    prefabs: Option<PrefabRegistry>,
    mushrooms: Vec<Mushroom>,
    pool: MushroomPool,
    next_mushroom_id: u32,
}

impl World {
    /// Creates an empty world with no tiles and no prefab registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            tiles: Vec::new(),
            prefabs: None,
            mushrooms: Vec::new(),
            pool: MushroomPool::default(),
            next_mushroom_id: 0,
        }
    }

    fn allocate_mushroom_id(&mut self) -> MushroomId {
        let id = MushroomId::new(self.next_mushroom_id);
        self.next_mushroom_id = self.next_mushroom_id.wrapping_add(1);
        id
    }

    fn tick_mushrooms(&mut self, dt: Duration, pointer: &PointerState, bus: &mut EventBus) {
        let seconds = dt.as_secs_f32();
        for mushroom in &mut self.mushrooms {
            mushroom.tick(seconds, pointer, bus);
        }

        let (collected, active): (Vec<_>, Vec<_>) = std::mem::take(&mut self.mushrooms)
            .into_iter()
            .partition(|mushroom| mushroom.state() == CollectionState::Collected);
        self.mushrooms = active;
        for mushroom in collected {
            self.pool.release(mushroom);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, publishing resulting events.
pub fn apply(world: &mut World, command: Command, bus: &mut EventBus) {
    match command {
        Command::ConfigureLevel {
            tile_count,
            tile_size,
        } => {
            world.tiles = level::generate_tiles(tile_count, tile_size);
            bus.publish(Event::LevelGenerated {
                tile_count: world.tiles.len() as u32,
            });
        }
        Command::RegisterPrefabs { categories } => {
            let registry = PrefabRegistry::new(categories);
            world.pool.register(registry.categories());
            world.prefabs = Some(registry);
        }
        Command::SpawnMushroom {
            category,
            kind,
            position,
            settings,
        } => {
            if !world
                .prefabs
                .as_ref()
                .is_some_and(|registry| registry.contains(category))
            {
                warn!("refusing to spawn {category:?} mushroom without a registered prefab");
                return;
            }

            let id = world.allocate_mushroom_id();
            let Some(mushroom) = world.pool.acquire(id, category, kind, position, settings) else {
                return;
            };
            world.mushrooms.push(mushroom);
            bus.publish(Event::MushroomSpawned {
                id,
                category,
                kind,
                position,
            });
        }
        Command::Tick { dt, pointer } => world.tick_mushrooms(dt, &pointer, bus),
        Command::SetMushroomsEnabled { enabled } => {
            for mushroom in &mut world.mushrooms {
                mushroom.set_enabled(enabled, bus);
            }
        }
        Command::ClearMushrooms => {
            for mushroom in std::mem::take(&mut world.mushrooms) {
                world.pool.release(mushroom);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec3;
    use shroom_sniff_core::{MushroomCategory, MushroomId, PrefabRegistry, Tile};
    use shroom_sniff_system_collection::Mushroom;

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Tiles of the current level in layout order.
    #[must_use]
    pub fn tiles(world: &World) -> &[Tile] {
        &world.tiles
    }

    /// Registered prefab categories, if a registry has been installed.
    #[must_use]
    pub fn prefab_registry(world: &World) -> Option<&PrefabRegistry> {
        world.prefabs.as_ref()
    }

    /// Mushrooms currently in the world, in spawn order.
    #[must_use]
    pub fn mushrooms(world: &World) -> &[Mushroom] {
        &world.mushrooms
    }

    /// Looks up an active mushroom.
    #[must_use]
    pub fn mushroom(world: &World, id: MushroomId) -> Option<&Mushroom> {
        world.mushrooms.iter().find(|mushroom| mushroom.id() == id)
    }

    /// Interactive mushroom nearest to `point` on the ground plane within `radius`.
    #[must_use]
    pub fn mushroom_at(world: &World, point: Vec3, radius: f32) -> Option<MushroomId> {
        let limit = radius * radius;
        world
            .mushrooms
            .iter()
            .filter(|mushroom| mushroom.is_interactive())
            .map(|mushroom| {
                let position = mushroom.transform().position;
                let offset = (position - point) * Vec3::new(1.0, 0.0, 1.0);
                (mushroom.id(), offset.length_squared())
            })
            .filter(|(_, distance)| *distance <= limit)
            .min_by(|left, right| left.1.total_cmp(&right.1))
            .map(|(id, _)| id)
    }

    /// Number of mushrooms currently in the world.
    #[must_use]
    pub fn active_mushroom_count(world: &World) -> usize {
        world.mushrooms.len()
    }

    /// Number of retired mushrooms waiting for reuse in `category`.
    #[must_use]
    pub fn pooled_mushroom_count(world: &World, category: MushroomCategory) -> usize {
        world.pool.idle_count(category)
    }
}
