use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Progression tier an upgrade belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UpgradeTier {
    /// First tier.
    One,
    /// Second tier.
    Two,
    /// Third tier.
    Three,
}

/// Effect family of an upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpgradeKind {
    /// Adds a mushroom category to the spawn pool.
    UnlockMushroom,
    /// Shortens the hold-to-collect duration.
    IncreaseSpeed,
    /// Adds tiles to the level.
    AddTile,
    /// Raises the weight of big mushrooms.
    IncreaseBigMushroomChance,
}

/// Every purchasable upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UpgradeId {
    /// Unlocks the second mushroom family.
    #[serde(rename = "tier1_unlock_mushroom")]
    Tier1UnlockMushroom,
    /// First speed boost.
    #[serde(rename = "tier1_increase_speed")]
    Tier1IncreaseSpeed,
    /// Adds one tile.
    #[serde(rename = "tier1_add_tile")]
    Tier1AddTile,
    /// Unlocks the third mushroom family.
    #[serde(rename = "tier2_unlock_mushroom")]
    Tier2UnlockMushroom,
    /// Second speed boost.
    #[serde(rename = "tier2_increase_speed")]
    Tier2IncreaseSpeed,
    /// Adds one tile.
    #[serde(rename = "tier2_add_tile")]
    Tier2AddTile,
    /// First big-mushroom chance bonus.
    #[serde(rename = "tier2_big_mushroom_chance")]
    Tier2BigMushroomChance,
    /// Unlocks the fourth mushroom family.
    #[serde(rename = "tier3_unlock_mushroom_1")]
    Tier3UnlockMushroom1,
    /// Unlocks the fifth mushroom family.
    #[serde(rename = "tier3_unlock_mushroom_2")]
    Tier3UnlockMushroom2,
    /// Third speed boost.
    #[serde(rename = "tier3_increase_speed")]
    Tier3IncreaseSpeed,
    /// Adds three tiles.
    #[serde(rename = "tier3_add_3_tiles")]
    Tier3Add3Tiles,
    /// Second big-mushroom chance bonus.
    #[serde(rename = "tier3_big_mushroom_chance")]
    Tier3BigMushroomChance,
}

impl UpgradeId {
    /// Every upgrade ordered by tier.
    pub const ALL: [UpgradeId; 12] = [
        UpgradeId::Tier1UnlockMushroom,
        UpgradeId::Tier1IncreaseSpeed,
        UpgradeId::Tier1AddTile,
        UpgradeId::Tier2UnlockMushroom,
        UpgradeId::Tier2IncreaseSpeed,
        UpgradeId::Tier2AddTile,
        UpgradeId::Tier2BigMushroomChance,
        UpgradeId::Tier3UnlockMushroom1,
        UpgradeId::Tier3UnlockMushroom2,
        UpgradeId::Tier3IncreaseSpeed,
        UpgradeId::Tier3Add3Tiles,
        UpgradeId::Tier3BigMushroomChance,
    ];

    /// Identifier persisted in the save file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            UpgradeId::Tier1UnlockMushroom => "tier1_unlock_mushroom",
            UpgradeId::Tier1IncreaseSpeed => "tier1_increase_speed",
            UpgradeId::Tier1AddTile => "tier1_add_tile",
            UpgradeId::Tier2UnlockMushroom => "tier2_unlock_mushroom",
            UpgradeId::Tier2IncreaseSpeed => "tier2_increase_speed",
            UpgradeId::Tier2AddTile => "tier2_add_tile",
            UpgradeId::Tier2BigMushroomChance => "tier2_big_mushroom_chance",
            UpgradeId::Tier3UnlockMushroom1 => "tier3_unlock_mushroom_1",
            UpgradeId::Tier3UnlockMushroom2 => "tier3_unlock_mushroom_2",
            UpgradeId::Tier3IncreaseSpeed => "tier3_increase_speed",
            UpgradeId::Tier3Add3Tiles => "tier3_add_3_tiles",
            UpgradeId::Tier3BigMushroomChance => "tier3_big_mushroom_chance",
        }
    }

    /// Tier the upgrade belongs to.
    #[must_use]
    pub const fn tier(self) -> UpgradeTier {
        match self {
            UpgradeId::Tier1UnlockMushroom
            | UpgradeId::Tier1IncreaseSpeed
            | UpgradeId::Tier1AddTile => UpgradeTier::One,
            UpgradeId::Tier2UnlockMushroom
            | UpgradeId::Tier2IncreaseSpeed
            | UpgradeId::Tier2AddTile
            | UpgradeId::Tier2BigMushroomChance => UpgradeTier::Two,
            UpgradeId::Tier3UnlockMushroom1
            | UpgradeId::Tier3UnlockMushroom2
            | UpgradeId::Tier3IncreaseSpeed
            | UpgradeId::Tier3Add3Tiles
            | UpgradeId::Tier3BigMushroomChance => UpgradeTier::Three,
        }
    }

    /// Effect family of the upgrade.
    #[must_use]
    pub const fn kind(self) -> UpgradeKind {
        match self {
            UpgradeId::Tier1UnlockMushroom
            | UpgradeId::Tier2UnlockMushroom
            | UpgradeId::Tier3UnlockMushroom1
            | UpgradeId::Tier3UnlockMushroom2 => UpgradeKind::UnlockMushroom,
            UpgradeId::Tier1IncreaseSpeed
            | UpgradeId::Tier2IncreaseSpeed
            | UpgradeId::Tier3IncreaseSpeed => UpgradeKind::IncreaseSpeed,
            UpgradeId::Tier1AddTile | UpgradeId::Tier2AddTile | UpgradeId::Tier3Add3Tiles => {
                UpgradeKind::AddTile
            }
            UpgradeId::Tier2BigMushroomChance | UpgradeId::Tier3BigMushroomChance => {
                UpgradeKind::IncreaseBigMushroomChance
            }
        }
    }
}

impl fmt::Display for UpgradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an identifier that names no upgrade.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown upgrade id `{0}`")]
pub struct UnknownUpgradeId(pub String);

impl FromStr for UpgradeId {
    type Err = UnknownUpgradeId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        UpgradeId::ALL
            .into_iter()
            .find(|id| id.as_str() == value)
            .ok_or_else(|| UnknownUpgradeId(value.to_owned()))
    }
}
