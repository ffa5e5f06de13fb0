use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ChanceTable, MushroomCategory, MushroomType, PullCurve, RuntimeSettings, Table,
    TypeFloatTable, UpgradeId,
};

/// Static tuning authored outside the game and read-only at runtime.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Level layout defaults.
    pub level: LevelConfig,
    /// Spawning and collection defaults.
    pub mushrooms: MushroomConfig,
    /// Coin payout ranges.
    pub rewards: CoinRewardConfig,
    /// Round pacing.
    pub round: RoundConfig,
    /// Upgrade prices and bonus policy.
    pub upgrades: UpgradeCatalog,
}

impl GameConfig {
    /// Rejects values the simulation cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check_finite()?;
        if self.level.tile_size.cmple(Vec3::ZERO).any() {
            return Err(ConfigError::NonPositiveTileSize(self.level.tile_size));
        }

        let mushrooms = &self.mushrooms;
        if mushrooms.hold_to_collect_duration < RuntimeSettings::MIN_HOLD_DURATION {
            return Err(ConfigError::HoldDurationTooShort(
                mushrooms.hold_to_collect_duration,
            ));
        }
        if mushrooms.max_spawn_attempts_per_mushroom == 0 {
            return Err(ConfigError::ZeroSpawnAttempts);
        }
        for (table, values) in [
            ("minimum_spacing", &mushrooms.minimum_spacing),
            ("spawn_padding", &mushrooms.spawn_padding),
            ("size_multipliers", &mushrooms.size_multipliers),
        ] {
            if let Some((kind, value)) = values.iter().find(|(_, value)| **value < 0.0) {
                return Err(ConfigError::NegativeTypeValue {
                    table,
                    kind: *kind,
                    value: *value,
                });
            }
        }

        let rewards = &self.rewards;
        let ranges = rewards
            .type_ranges
            .iter()
            .map(|(_, range)| range)
            .chain(rewards.category_ranges.iter().map(|(_, range)| range))
            .chain(std::iter::once(&rewards.default_range));
        for range in ranges {
            if range.min > range.max {
                return Err(ConfigError::InvertedRewardRange {
                    min: range.min,
                    max: range.max,
                });
            }
        }

        if let Some((id, cost)) = self.upgrades.costs.iter().find(|(_, cost)| **cost < 0) {
            return Err(ConfigError::NegativeUpgradeCost {
                id: *id,
                cost: *cost,
            });
        }

        Ok(())
    }

    fn check_finite(&self) -> Result<(), ConfigError> {
        let mushrooms = &self.mushrooms;
        let vectors = [
            ("level.tile_size", self.level.tile_size),
            ("mushrooms.pull_position_offset", mushrooms.pull_position_offset),
            ("mushrooms.pull_rotation_offset", mushrooms.pull_rotation_offset),
            ("mushrooms.pull_scale_multiplier", mushrooms.pull_scale_multiplier),
        ];
        if let Some((field, _)) = vectors.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::NonFiniteValue { field: *field });
        }

        let scalars = [
            (
                "mushrooms.hold_to_collect_duration",
                mushrooms.hold_to_collect_duration,
            ),
            ("mushrooms.pull_rotation_speed", mushrooms.pull_rotation_speed),
        ];
        if let Some((field, _)) = scalars.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::NonFiniteValue { field: *field });
        }

        for (field, values) in [
            ("mushrooms.minimum_spacing", &mushrooms.minimum_spacing),
            ("mushrooms.spawn_padding", &mushrooms.spawn_padding),
            ("mushrooms.size_multipliers", &mushrooms.size_multipliers),
        ] {
            if values.iter().any(|(_, value)| !value.is_finite()) {
                return Err(ConfigError::NonFiniteValue { field });
            }
        }
        Ok(())
    }
}

/// Reasons a [`GameConfig`] is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Floating-point settings must be finite.
    #[error("{field} must be finite")]
    NonFiniteValue {
        /// Offending setting.
        field: &'static str,
    },
    /// Every tile dimension must be positive.
    #[error("tile size {0} must be positive on every axis")]
    NonPositiveTileSize(Vec3),
    /// Hold duration below the supported minimum.
    #[error("hold-to-collect duration {0} is below the minimum of 0.01 seconds")]
    HoldDurationTooShort(f32),
    /// At least one placement attempt is required.
    #[error("max spawn attempts per mushroom must be at least 1")]
    ZeroSpawnAttempts,
    /// Per-type spacing, padding and size values cannot be negative.
    #[error("{table} entry for {kind:?} is negative ({value})")]
    NegativeTypeValue {
        /// Name of the offending table.
        table: &'static str,
        /// Type whose entry is negative.
        kind: MushroomType,
        /// Offending value.
        value: f32,
    },
    /// Reward range whose minimum exceeds its maximum.
    #[error("coin reward range {min}..={max} is inverted")]
    InvertedRewardRange {
        /// Declared minimum.
        min: i64,
        /// Declared maximum.
        max: i64,
    },
    /// Upgrade priced below zero.
    #[error("upgrade {id} has negative cost {cost}")]
    NegativeUpgradeCost {
        /// Offending upgrade.
        id: UpgradeId,
        /// Declared cost.
        cost: i64,
    },
}

/// Level layout defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Number of tiles before upgrades.
    pub tile_count: u32,
    /// Footprint of a single tile.
    pub tile_size: Vec3,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            tile_count: 4,
            tile_size: Vec3::new(2.0, 0.2, 2.0),
        }
    }
}

/// Spawning and collection defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MushroomConfig {
    /// Weighted chance of each category being selected.
    pub category_chances: ChanceTable<MushroomCategory>,
    /// Weighted chance of each type being selected.
    pub type_chances: ChanceTable<MushroomType>,
    /// Spawn slots per tile.
    pub mushrooms_per_tile: u32,
    /// Placement attempts per slot before it is skipped.
    pub max_spawn_attempts_per_mushroom: u32,
    /// Minimum distance between mushrooms, per type.
    pub minimum_spacing: TypeFloatTable,
    /// Inset from the tile edge, per type.
    pub spawn_padding: TypeFloatTable,
    /// Spawn scale, per type.
    pub size_multipliers: TypeFloatTable,
    /// Seconds the pointer must be held to collect a mushroom.
    pub hold_to_collect_duration: f32,
    /// Easing applied to the charge progress.
    pub pull_curve: PullCurve,
    /// Offset added to the pointer ground point at full charge.
    pub pull_position_offset: Vec3,
    /// Euler rotation in degrees reached at full charge.
    pub pull_rotation_offset: Vec3,
    /// Scales the applied rotation.
    pub pull_rotation_speed: f32,
    /// Scale factor reached at full charge.
    pub pull_scale_multiplier: Vec3,
    /// Categories with a visual prefab; `None` means no registry is configured.
    pub prefabs: Option<Vec<MushroomCategory>>,
}

impl Default for MushroomConfig {
    fn default() -> Self {
        Self {
            category_chances: ChanceTable::from_pairs([
                (MushroomCategory::P1, 40),
                (MushroomCategory::P2, 25),
                (MushroomCategory::P3, 15),
                (MushroomCategory::P4, 12),
                (MushroomCategory::P5, 8),
            ]),
            type_chances: ChanceTable::from_pairs([
                (MushroomType::Small, 60),
                (MushroomType::Medium, 30),
                (MushroomType::Big, 10),
            ]),
            mushrooms_per_tile: 3,
            max_spawn_attempts_per_mushroom: 12,
            minimum_spacing: TypeFloatTable::from_pairs([
                (MushroomType::Small, 0.3),
                (MushroomType::Medium, 0.4),
                (MushroomType::Big, 0.6),
            ]),
            spawn_padding: TypeFloatTable::from_pairs([
                (MushroomType::Small, 0.1),
                (MushroomType::Medium, 0.15),
                (MushroomType::Big, 0.25),
            ]),
            size_multipliers: TypeFloatTable::from_pairs([
                (MushroomType::Small, 0.8),
                (MushroomType::Medium, 1.0),
                (MushroomType::Big, 1.4),
            ]),
            hold_to_collect_duration: 1.0,
            pull_curve: PullCurve::EaseInOut,
            pull_position_offset: Vec3::new(0.0, 0.2, 0.0),
            pull_rotation_offset: Vec3::new(0.0, 0.0, 10.0),
            pull_rotation_speed: 1.0,
            pull_scale_multiplier: Vec3::splat(0.7),
            prefabs: Some(MushroomCategory::ALL.to_vec()),
        }
    }
}

/// Inclusive coin range rolled when a mushroom is collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardRange {
    /// Smallest payout.
    pub min: i64,
    /// Largest payout.
    pub max: i64,
}

impl RewardRange {
    /// Creates a range spanning `min..=max`.
    #[must_use]
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }
}

impl Default for RewardRange {
    fn default() -> Self {
        Self::new(1, 5)
    }
}

/// Coin payout ranges looked up by type, then category, then default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinRewardConfig {
    /// Ranges keyed by type.
    pub type_ranges: Table<MushroomType, RewardRange>,
    /// Ranges keyed by category.
    pub category_ranges: Table<MushroomCategory, RewardRange>,
    /// Range used when neither table matches.
    pub default_range: RewardRange,
}

impl CoinRewardConfig {
    /// Range paid out for a mushroom of the given category and type.
    #[must_use]
    pub fn range_for(&self, category: MushroomCategory, kind: MushroomType) -> RewardRange {
        self.type_ranges
            .get(&kind)
            .or_else(|| self.category_ranges.get(&category))
            .copied()
            .unwrap_or(self.default_range)
    }
}

impl Default for CoinRewardConfig {
    fn default() -> Self {
        Self {
            type_ranges: Table::from_pairs([(MushroomType::Big, RewardRange::new(4, 8))]),
            category_ranges: Table::from_pairs([
                (MushroomCategory::P4, RewardRange::new(3, 6)),
                (MushroomCategory::P5, RewardRange::new(5, 10)),
            ]),
            default_range: RewardRange::new(1, 3),
        }
    }
}

/// Round pacing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Seconds before time runs out; zero disables the limit.
    pub time_limit_seconds: u32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            time_limit_seconds: 15,
        }
    }
}

/// How purchased big-mushroom bonuses are written to the save.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BigMushroomBonusPolicy {
    /// The applied bonus is tracked and replaced, so reapplying is stable.
    #[default]
    Recompute,
    /// The bonus is added on every application and keeps growing.
    Accumulate,
}

/// Upgrade prices and bonus policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeCatalog {
    /// Coin price of each upgrade; unlisted upgrades cannot be bought.
    pub costs: Table<UpgradeId, i64>,
    /// Big-mushroom bonus policy.
    pub big_mushroom_policy: BigMushroomBonusPolicy,
}

impl UpgradeCatalog {
    /// Price of `id`, if it is for sale.
    #[must_use]
    pub fn cost(&self, id: UpgradeId) -> Option<i64> {
        self.costs.get(&id).copied()
    }
}

impl Default for UpgradeCatalog {
    fn default() -> Self {
        Self {
            costs: Table::from_pairs([
                (UpgradeId::Tier1UnlockMushroom, 15),
                (UpgradeId::Tier1IncreaseSpeed, 10),
                (UpgradeId::Tier1AddTile, 12),
                (UpgradeId::Tier2UnlockMushroom, 40),
                (UpgradeId::Tier2IncreaseSpeed, 30),
                (UpgradeId::Tier2AddTile, 35),
                (UpgradeId::Tier2BigMushroomChance, 45),
                (UpgradeId::Tier3UnlockMushroom1, 90),
                (UpgradeId::Tier3UnlockMushroom2, 120),
                (UpgradeId::Tier3IncreaseSpeed, 80),
                (UpgradeId::Tier3Add3Tiles, 100),
                (UpgradeId::Tier3BigMushroomChance, 110),
            ]),
            big_mushroom_policy: BigMushroomBonusPolicy::Recompute,
        }
    }
}
