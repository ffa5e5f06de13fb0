#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Shroom Sniff engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The composition root submits
//! [`Command`] values describing desired world mutations, the world executes
//! them via its `apply` entry point and publishes [`Event`] values onto the
//! round's [`EventBus`]. Systems drain that bus, query immutable snapshots,
//! and respond with new command batches or further notifications.

use std::{rc::Rc, time::Duration};

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

mod bus;
mod config;
mod curve;
mod table;
mod upgrade;

pub use bus::EventBus;
pub use config::{
    BigMushroomBonusPolicy, CoinRewardConfig, ConfigError, GameConfig, LevelConfig,
    MushroomConfig, RewardRange, RoundConfig, UpgradeCatalog,
};
pub use curve::{CurveKey, PullCurve};
pub use table::{ChanceTable, Table, TableEntry, TypeFloatTable};
pub use upgrade::{UnknownUpgradeId, UpgradeId, UpgradeKind, UpgradeTier};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Shroom Sniff.";

/// Coarse mushroom classification that selects the visual family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MushroomCategory {
    /// Starter family, always unlocked.
    P1,
    /// Second family.
    P2,
    /// Third family.
    P3,
    /// Fourth family.
    P4,
    /// Fifth family.
    P5,
}

impl MushroomCategory {
    /// Every category in declaration order.
    pub const ALL: [MushroomCategory; 5] = [
        MushroomCategory::P1,
        MushroomCategory::P2,
        MushroomCategory::P3,
        MushroomCategory::P4,
        MushroomCategory::P5,
    ];
}

/// Fine-grained mushroom classification driving size, spacing, padding and reward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MushroomType {
    /// Small mushroom.
    Small,
    /// Medium mushroom.
    Medium,
    /// Big mushroom, boosted by the big-mushroom chance upgrades.
    Big,
}

impl MushroomType {
    /// Every type in declaration order.
    pub const ALL: [MushroomType; 3] = [MushroomType::Small, MushroomType::Medium, MushroomType::Big];
}

/// Unique identifier assigned to a spawned mushroom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MushroomId(u32);

impl MushroomId {
    /// Creates a new mushroom identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of a tile within the generated level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(u32);

impl TileId {
    /// Creates a new tile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Placed surface that mushrooms spawn on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    id: TileId,
    center: Vec3,
    scale: Vec3,
}

impl Tile {
    /// Creates a tile centred on `center` whose footprint spans `scale`.
    #[must_use]
    pub const fn new(id: TileId, center: Vec3, scale: Vec3) -> Self {
        Self { id, center, scale }
    }

    /// Identifier of the tile.
    #[must_use]
    pub const fn id(&self) -> TileId {
        self.id
    }

    /// World position of the tile centre; `y` is the ground height.
    #[must_use]
    pub const fn center(&self) -> Vec3 {
        self.center
    }

    /// Full extent of the tile along each axis.
    #[must_use]
    pub const fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Half of the tile footprint along the horizontal axes, `x` and `z`.
    #[must_use]
    pub fn half_extents(&self) -> (f32, f32) {
        (self.scale.x * 0.5, self.scale.z * 0.5)
    }
}

/// Position, orientation and scale of a mushroom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// World-space orientation.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Transform {
    /// Creates an unrotated transform at `position` with uniform scale `scale`.
    #[must_use]
    pub fn at(position: Vec3, scale: f32) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::splat(scale),
        }
    }
}

/// Set of categories that have a visual prefab available for spawning.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrefabRegistry {
    categories: Vec<MushroomCategory>,
}

impl PrefabRegistry {
    /// Builds a registry from the provided categories, discarding duplicates.
    #[must_use]
    pub fn new(categories: impl IntoIterator<Item = MushroomCategory>) -> Self {
        let mut registered = Vec::new();
        for category in categories {
            if !registered.contains(&category) {
                registered.push(category);
            }
        }
        Self {
            categories: registered,
        }
    }

    /// Reports whether the category has a registered prefab.
    #[must_use]
    pub fn contains(&self, category: MushroomCategory) -> bool {
        self.categories.contains(&category)
    }

    /// Registered categories in registration order.
    #[must_use]
    pub fn categories(&self) -> &[MushroomCategory] {
        &self.categories
    }
}

/// Effective per-run parameters shared read-only by every spawned mushroom.
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeSettings {
    /// Seconds the pointer must be held to collect, already divided by the speed multiplier.
    pub hold_to_collect_duration: f32,
    /// Easing applied to the normalized charge before interpolating the pull.
    pub pull_curve: PullCurve,
    /// Offset added to the pointer ground point to form the pull destination.
    pub pull_position_offset: Vec3,
    /// Euler rotation in degrees reached at full charge.
    pub pull_rotation_offset: Vec3,
    /// Scales how much of the rotation offset is applied.
    pub pull_rotation_speed: f32,
    /// Target scale factor at full charge.
    pub pull_scale_multiplier: Vec3,
    /// Per-type size multipliers applied when a mushroom spawns.
    pub size_multipliers: TypeFloatTable,
}

impl RuntimeSettings {
    /// Smallest hold duration a mushroom will ever charge for.
    pub const MIN_HOLD_DURATION: f32 = 0.01;

    /// Hold duration used by the collection state machine.
    ///
    /// Non-positive durations fall back to one second; the result never drops
    /// below [`Self::MIN_HOLD_DURATION`].
    #[must_use]
    pub fn effective_hold_duration(&self) -> f32 {
        let duration = if self.hold_to_collect_duration <= 0.0 {
            1.0
        } else {
            self.hold_to_collect_duration
        };
        duration.max(Self::MIN_HOLD_DURATION)
    }

    /// Size multiplier for the provided type, if one is declared.
    #[must_use]
    pub fn size_multiplier(&self, kind: MushroomType) -> Option<f32> {
        self.size_multipliers.get(&kind).copied()
    }
}

/// Pointer state sampled by the input collaborator for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    /// The button went down during this tick.
    pub pressed: bool,
    /// The button is currently held.
    pub held: bool,
    /// Mushroom under the cursor, if any.
    pub hovered: Option<MushroomId>,
    /// Pointer position projected onto the ground plane.
    pub ground_point: Option<Vec3>,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Regenerates the tile grid.
    ConfigureLevel {
        /// Number of tiles to lay out; zero is treated as one.
        tile_count: u32,
        /// Footprint of every tile.
        tile_size: Vec3,
    },
    /// Installs the prefab registry used to spawn mushrooms.
    RegisterPrefabs {
        /// Categories that can be instantiated.
        categories: Vec<MushroomCategory>,
    },
    /// Requests that a mushroom be placed in the world.
    SpawnMushroom {
        /// Visual family of the mushroom.
        category: MushroomCategory,
        /// Fine-grained type of the mushroom.
        kind: MushroomType,
        /// Spawn position on the tile surface.
        position: Vec3,
        /// Parameters shared by every mushroom spawned this run.
        settings: Rc<RuntimeSettings>,
    },
    /// Advances every active mushroom by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
        /// Pointer state sampled for this tick.
        pointer: PointerState,
    },
    /// Enables or disables interaction with every active mushroom.
    SetMushroomsEnabled {
        /// Whether mushrooms accept pointer input.
        enabled: bool,
    },
    /// Returns every active mushroom to the pool.
    ClearMushrooms,
}

/// Notifications published onto the round's event bus.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The tile grid was regenerated.
    LevelGenerated {
        /// Number of tiles laid out.
        tile_count: u32,
    },
    /// A mushroom entered the world.
    MushroomSpawned {
        /// Identifier assigned by the world.
        id: MushroomId,
        /// Visual family of the mushroom.
        category: MushroomCategory,
        /// Fine-grained type of the mushroom.
        kind: MushroomType,
        /// Spawn position.
        position: Vec3,
    },
    /// The charge progress of a mushroom changed.
    ChargeProgressChanged {
        /// Mushroom whose charge changed.
        id: MushroomId,
        /// Normalized progress in `[0, 1]`.
        progress: f32,
    },
    /// A mushroom completed its charge and was pulled out of the ground.
    MushroomPulled {
        /// Mushroom that was pulled.
        id: MushroomId,
        /// Visual family of the mushroom.
        category: MushroomCategory,
        /// Fine-grained type of the mushroom.
        kind: MushroomType,
    },
    /// Coins were credited for a pulled mushroom.
    CoinsAwarded {
        /// Coins credited for this mushroom.
        amount: i64,
        /// Coins earned so far this round.
        round_total: i64,
    },
    /// Every mushroom spawned this round has been collected.
    AllMushroomsCollected {
        /// Number of mushrooms collected.
        collected: u32,
    },
    /// The round timer advanced by one whole second.
    TimerAdvanced {
        /// Whole seconds elapsed since the round started.
        elapsed_seconds: u32,
        /// Whole seconds left before time runs out, if the round is limited.
        remaining_seconds: Option<u32>,
    },
    /// The round time limit was reached.
    TimeUp {
        /// Whole seconds elapsed when time ran out.
        elapsed_seconds: u32,
    },
}
