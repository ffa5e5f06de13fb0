#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Persisted player progress for Shroom Sniff.
//!
//! The save record is loaded once at process start and every mutation is
//! written straight through to storage. Mutations go through the
//! [`ProgressStore`] trait so gameplay code never cares whether progress lives
//! in a file or in memory.

use std::path::PathBuf;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use shroom_sniff_core::{
    ChanceTable, GameConfig, LevelConfig, MushroomCategory, MushroomConfig, MushroomType,
    TypeFloatTable,
};
use thiserror::Error;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Complete persisted record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveData {
    /// Coin balance.
    pub coins: i64,
    /// Level layout overrides.
    pub level_settings: LevelSettingsData,
    /// Spawning and collection overrides.
    pub mushroom_settings: MushroomSettingsData,
    /// Purchased upgrades.
    pub upgrade_data: UpgradeData,
}

impl SaveData {
    /// Builds the record a new player starts with.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            coins: 0,
            level_settings: LevelSettingsData::from_config(&config.level),
            mushroom_settings: MushroomSettingsData::from_config(&config.mushrooms),
            upgrade_data: UpgradeData::default(),
        }
    }
}

/// Level layout overrides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSettingsData {
    /// Tile count; zero defers to configuration.
    pub tile_count: u32,
    /// Tile footprint; ignored unless every component is positive.
    pub tile_size: Vec3,
}

impl LevelSettingsData {
    /// Copies the configured layout.
    #[must_use]
    pub fn from_config(config: &LevelConfig) -> Self {
        Self {
            tile_count: config.tile_count,
            tile_size: config.tile_size,
        }
    }
}

/// Spawning and collection overrides.
///
/// Zero scalars, zero vectors and empty tables defer to configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MushroomSettingsData {
    /// Spawn slots per tile.
    pub mushrooms_per_tile: u32,
    /// Placement attempts per slot.
    pub max_spawn_attempts_per_mushroom: u32,
    /// Seconds to hold before a mushroom is collected.
    pub hold_to_collect_duration: f32,
    /// Offset added to the pull destination.
    pub pull_position_offset: Vec3,
    /// Euler rotation in degrees at full charge.
    pub pull_rotation_offset: Vec3,
    /// Scales the applied rotation.
    pub pull_rotation_speed: f32,
    /// Scale factor at full charge.
    pub pull_scale_multiplier: Vec3,
    /// Category weights.
    pub category_chances: ChanceTable<MushroomCategory>,
    /// Type weights.
    pub type_chances: ChanceTable<MushroomType>,
    /// Minimum distance between mushrooms, per type.
    pub minimum_spacing: TypeFloatTable,
    /// Inset from the tile edge, per type.
    pub spawn_padding: TypeFloatTable,
    /// Spawn scale, per type.
    pub size_multipliers: TypeFloatTable,
    /// Big-mushroom bonus currently folded into `type_chances`.
    pub applied_big_mushroom_bonus: i32,
}

impl MushroomSettingsData {
    /// Copies the configured values.
    #[must_use]
    pub fn from_config(config: &MushroomConfig) -> Self {
        Self {
            mushrooms_per_tile: config.mushrooms_per_tile,
            max_spawn_attempts_per_mushroom: config.max_spawn_attempts_per_mushroom,
            hold_to_collect_duration: config.hold_to_collect_duration,
            pull_position_offset: config.pull_position_offset,
            pull_rotation_offset: config.pull_rotation_offset,
            pull_rotation_speed: config.pull_rotation_speed,
            pull_scale_multiplier: config.pull_scale_multiplier,
            category_chances: config.category_chances.clone(),
            type_chances: config.type_chances.clone(),
            minimum_spacing: config.minimum_spacing.clone(),
            spawn_padding: config.spawn_padding.clone(),
            size_multipliers: config.size_multipliers.clone(),
            applied_big_mushroom_bonus: 0,
        }
    }
}

/// Purchased upgrades.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeData {
    /// Identifiers of purchased upgrades in purchase order.
    pub purchased_upgrade_ids: Vec<String>,
    /// Coin balance recorded at the last purchase.
    pub current_currency: i64,
}

impl UpgradeData {
    /// Reports whether `id` has been purchased.
    #[must_use]
    pub fn has_purchased(&self, id: &str) -> bool {
        self.purchased_upgrade_ids.iter().any(|owned| owned == id)
    }

    /// Records a purchase, returning `false` when `id` was already owned.
    pub fn record_purchase(&mut self, id: &str, balance: i64) -> bool {
        if self.has_purchased(id) {
            return false;
        }
        self.purchased_upgrade_ids.push(id.to_owned());
        self.current_currency = balance;
        true
    }
}

/// Failures raised while persisting progress.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Reading or writing the save file failed.
    #[error("save file i/o failed at {path}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The save file does not contain a valid record.
    #[error("save file at {path} is not a valid save record")]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// The record could not be encoded.
    #[error("failed to encode save record")]
    Encode(#[source] serde_json::Error),
}

/// Write-through access to the persisted record.
///
/// Implementors supply storage through [`ProgressStore::replace`]; every other
/// mutation is expressed in terms of it. A successful mutation bumps
/// [`ProgressStore::revision`], which listeners poll in place of a change
/// notification. The in-memory record is updated even when the write fails.
pub trait ProgressStore {
    /// Current record.
    fn data(&self) -> &SaveData;

    /// Counter incremented by every mutation.
    fn revision(&self) -> u64;

    /// Replaces the whole record and persists it.
    fn replace(&mut self, data: SaveData) -> Result<(), SaveError>;

    /// Applies `mutate` to a copy of the record and persists the result.
    fn update(&mut self, mutate: impl FnOnce(&mut SaveData)) -> Result<(), SaveError> {
        let mut data = self.data().clone();
        mutate(&mut data);
        self.replace(data)
    }

    /// Overwrites the level layout overrides.
    fn update_level_settings(&mut self, settings: LevelSettingsData) -> Result<(), SaveError> {
        self.update(|data| data.level_settings = settings)
    }

    /// Overwrites the spawning and collection overrides.
    fn update_mushroom_settings(
        &mut self,
        settings: MushroomSettingsData,
    ) -> Result<(), SaveError> {
        self.update(|data| data.mushroom_settings = settings)
    }

    /// Overwrites the upgrade record.
    fn update_upgrade_data(&mut self, upgrades: UpgradeData) -> Result<(), SaveError> {
        self.update(|data| data.upgrade_data = upgrades)
    }

    /// Credits coins; non-positive amounts are ignored and reported as `false`.
    fn add_coins(&mut self, amount: i64) -> Result<bool, SaveError> {
        if amount <= 0 {
            return Ok(false);
        }
        self.update(|data| data.coins = data.coins.saturating_add(amount))?;
        Ok(true)
    }

    /// Debits coins.
    ///
    /// Returns `false` without touching the record when `amount` is not
    /// positive or exceeds the balance.
    fn spend_coins(&mut self, amount: i64) -> Result<bool, SaveError> {
        if amount <= 0 || amount > self.data().coins {
            return Ok(false);
        }
        self.update(|data| data.coins -= amount)?;
        Ok(true)
    }

    /// Discards all progress and rebuilds the record from configuration.
    fn reset_to_defaults(&mut self, config: &GameConfig) -> Result<(), SaveError> {
        self.replace(SaveData::from_config(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_configuration() {
        let mut config = GameConfig::default();
        config.level.tile_count = 7;
        config.mushrooms.mushrooms_per_tile = 5;

        let data = SaveData::from_config(&config);
        assert_eq!(data.coins, 0);
        assert_eq!(data.level_settings.tile_count, 7);
        assert_eq!(data.mushroom_settings.mushrooms_per_tile, 5);
        assert_eq!(
            data.mushroom_settings.category_chances,
            config.mushrooms.category_chances
        );
        assert!(data.upgrade_data.purchased_upgrade_ids.is_empty());
    }

    #[test]
    fn record_purchase_ignores_duplicates() {
        let mut upgrades = UpgradeData::default();
        assert!(upgrades.record_purchase("tier1_add_tile", 8));
        assert!(!upgrades.record_purchase("tier1_add_tile", 2));
        assert_eq!(upgrades.purchased_upgrade_ids, vec!["tier1_add_tile"]);
        assert_eq!(upgrades.current_currency, 8);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let data: SaveData = serde_json::from_str(r#"{"coins": 12}"#).expect("parses");
        assert_eq!(data.coins, 12);
        assert_eq!(data.mushroom_settings.applied_big_mushroom_bonus, 0);
        assert!(data.mushroom_settings.type_chances.is_empty());
    }
}
