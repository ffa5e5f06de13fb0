#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Merges persisted overrides with static configuration.
//!
//! Every resolver here is a pure function. An override wins only when it is
//! meaningfully set: positive scalars, non-zero vectors and non-empty tables.
//! Anything else falls back to the configured value.

use glam::Vec3;
use shroom_sniff_core::{
    ChanceTable, LevelConfig, MushroomCategory, MushroomConfig, MushroomType, RuntimeSettings,
    Table, TypeFloatTable,
};
use shroom_sniff_save::{LevelSettingsData, MushroomSettingsData};

/// Effective level layout for a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelLayout {
    /// Number of tiles, at least one.
    pub tile_count: u32,
    /// Footprint of every tile.
    pub tile_size: Vec3,
}

/// Effective spawn parameters for a run.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnParameters {
    /// Category weights.
    pub category_chances: ChanceTable<MushroomCategory>,
    /// Type weights.
    pub type_chances: ChanceTable<MushroomType>,
    /// Spawn slots per tile.
    pub mushrooms_per_tile: u32,
    /// Placement attempts per slot, at least one.
    pub max_spawn_attempts: u32,
    /// Minimum spacing per type; saved entries shadow configured ones.
    pub minimum_spacing: TypeFloatTable,
    /// Tile edge inset per type; saved entries shadow configured ones.
    pub spawn_padding: TypeFloatTable,
}

/// Builds the settings shared by every mushroom spawned this run.
///
/// The hold duration is divided by `speed_multiplier`; non-positive
/// multipliers are treated as `1.0`.
#[must_use]
pub fn resolve_runtime_settings(
    config: &MushroomConfig,
    overrides: &MushroomSettingsData,
    speed_multiplier: f32,
) -> RuntimeSettings {
    let speed = if speed_multiplier.is_finite() && speed_multiplier > 0.0 {
        speed_multiplier
    } else {
        1.0
    };
    let hold = scalar(
        overrides.hold_to_collect_duration,
        config.hold_to_collect_duration,
    );

    RuntimeSettings {
        hold_to_collect_duration: hold / speed,
        pull_curve: config.pull_curve.clone(),
        pull_position_offset: vector(overrides.pull_position_offset, config.pull_position_offset),
        pull_rotation_offset: vector(overrides.pull_rotation_offset, config.pull_rotation_offset),
        pull_rotation_speed: scalar(overrides.pull_rotation_speed, config.pull_rotation_speed),
        pull_scale_multiplier: vector(
            overrides.pull_scale_multiplier,
            config.pull_scale_multiplier,
        ),
        size_multipliers: table(&overrides.size_multipliers, &config.size_multipliers).clone(),
    }
}

/// Resolves chance tables, counts and per-type constraints for the spawner.
#[must_use]
pub fn resolve_spawn_parameters(
    config: &MushroomConfig,
    overrides: &MushroomSettingsData,
) -> SpawnParameters {
    SpawnParameters {
        category_chances: table(&overrides.category_chances, &config.category_chances).clone(),
        type_chances: table(&overrides.type_chances, &config.type_chances).clone(),
        mushrooms_per_tile: count(overrides.mushrooms_per_tile, config.mushrooms_per_tile),
        max_spawn_attempts: count(
            overrides.max_spawn_attempts_per_mushroom,
            config.max_spawn_attempts_per_mushroom,
        )
        .max(1),
        minimum_spacing: overrides.minimum_spacing.overlay(&config.minimum_spacing),
        spawn_padding: overrides.spawn_padding.overlay(&config.spawn_padding),
    }
}

/// Resolves the tile count and size used to generate the level.
#[must_use]
pub fn resolve_level_layout(config: &LevelConfig, overrides: &LevelSettingsData) -> LevelLayout {
    let usable = overrides.tile_size.is_finite() && overrides.tile_size.cmpgt(Vec3::ZERO).all();
    let tile_size = if usable {
        overrides.tile_size
    } else {
        config.tile_size
    };
    LevelLayout {
        tile_count: count(overrides.tile_count, config.tile_count).max(1),
        tile_size,
    }
}

fn scalar(saved: f32, configured: f32) -> f32 {
    if saved.is_finite() && saved > 0.0 {
        saved
    } else {
        configured
    }
}

fn count(saved: u32, configured: u32) -> u32 {
    if saved > 0 {
        saved
    } else {
        configured
    }
}

fn vector(saved: Vec3, configured: Vec3) -> Vec3 {
    if saved.is_finite() && saved != Vec3::ZERO {
        saved
    } else {
        configured
    }
}

fn table<'a, K: PartialEq, V>(
    saved: &'a Table<K, V>,
    configured: &'a Table<K, V>,
) -> &'a Table<K, V> {
    if saved.is_empty() {
        configured
    } else {
        saved
    }
}
