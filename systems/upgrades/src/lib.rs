#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Upgrade effects and the purchase flow.
//!
//! Purchased upgrades are persisted as identifiers. At the start of every run
//! [`apply_upgrades_to_save_data`] folds them into the persisted level and
//! mushroom overrides: the tile count and category table are rebuilt from
//! configuration each time, and the big-mushroom bonus follows the catalog's
//! [`BigMushroomBonusPolicy`]. The speed multiplier is never persisted; it is
//! derived from [`UpgradeEffects`] and handed to the settings resolver.

use log::{info, warn};
use shroom_sniff_core::{
    BigMushroomBonusPolicy, ChanceTable, GameConfig, MushroomCategory, MushroomType,
    UpgradeCatalog, UpgradeId, UpgradeKind,
};
use shroom_sniff_save::{MushroomSettingsData, ProgressStore, SaveError, UpgradeData};

/// Hold speed gained per purchased speed upgrade.
pub const SPEED_BONUS_PER_UPGRADE: f32 = 0.1;

/// Big-mushroom weight gained per purchased chance upgrade.
pub const BIG_MUSHROOM_BONUS_PER_UPGRADE: i32 = 10;

/// Category that is available without any upgrade.
pub const STARTER_CATEGORY: MushroomCategory = MushroomCategory::P1;

/// Effects of the currently purchased upgrades.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpgradeEffects {
    owned: Vec<UpgradeId>,
}

impl UpgradeEffects {
    /// Collects the upgrades recorded in `data`, skipping unknown identifiers.
    #[must_use]
    pub fn from_upgrade_data(data: &UpgradeData) -> Self {
        let mut owned = Vec::new();
        for raw in &data.purchased_upgrade_ids {
            match raw.parse::<UpgradeId>() {
                Ok(id) if !owned.contains(&id) => owned.push(id),
                Ok(_) => {}
                Err(error) => warn!("ignoring purchased upgrade: {error}"),
            }
        }
        Self { owned }
    }

    /// Reports whether `id` is owned.
    #[must_use]
    pub fn owns(&self, id: UpgradeId) -> bool {
        self.owned.contains(&id)
    }

    /// Tiles added on top of the configured base.
    #[must_use]
    pub fn tile_bonus(&self) -> u32 {
        self.owned
            .iter()
            .map(|id| match id {
                UpgradeId::Tier1AddTile | UpgradeId::Tier2AddTile => 1,
                UpgradeId::Tier3Add3Tiles => 3,
                _ => 0,
            })
            .sum()
    }

    /// Categories allowed into the spawn pool, starter first.
    #[must_use]
    pub fn unlocked_categories(&self) -> Vec<MushroomCategory> {
        let mut unlocked = vec![STARTER_CATEGORY];
        for category in self.owned.iter().filter_map(|id| unlocked_category(*id)) {
            if !unlocked.contains(&category) {
                unlocked.push(category);
            }
        }
        unlocked
    }

    /// Hold speed multiplier, `1.0` without speed upgrades.
    #[must_use]
    pub fn speed_multiplier(&self) -> f32 {
        1.0 + SPEED_BONUS_PER_UPGRADE * self.count(UpgradeKind::IncreaseSpeed) as f32
    }

    /// Weight added to the big-mushroom type chance.
    #[must_use]
    pub fn big_mushroom_bonus(&self) -> i32 {
        let upgrades = self.count(UpgradeKind::IncreaseBigMushroomChance);
        BIG_MUSHROOM_BONUS_PER_UPGRADE * i32::try_from(upgrades).unwrap_or(i32::MAX)
    }

    fn count(&self, kind: UpgradeKind) -> usize {
        self.owned.iter().filter(|id| id.kind() == kind).count()
    }
}

fn unlocked_category(id: UpgradeId) -> Option<MushroomCategory> {
    match id {
        UpgradeId::Tier1UnlockMushroom => Some(MushroomCategory::P2),
        UpgradeId::Tier2UnlockMushroom => Some(MushroomCategory::P3),
        UpgradeId::Tier3UnlockMushroom1 => Some(MushroomCategory::P4),
        UpgradeId::Tier3UnlockMushroom2 => Some(MushroomCategory::P5),
        _ => None,
    }
}

/// Folds the purchased upgrades into the persisted overrides.
///
/// Writes the level overrides and then the mushroom overrides. Returns the
/// effects so the caller can derive the speed multiplier.
pub fn apply_upgrades_to_save_data<S: ProgressStore>(
    config: &GameConfig,
    store: &mut S,
) -> Result<UpgradeEffects, SaveError> {
    let effects = UpgradeEffects::from_upgrade_data(&store.data().upgrade_data);

    let mut level = store.data().level_settings.clone();
    level.tile_count = config.level.tile_count + effects.tile_bonus();
    store.update_level_settings(level)?;

    let unlocked = effects.unlocked_categories();
    let mut mushrooms = store.data().mushroom_settings.clone();
    mushrooms.category_chances = config.mushrooms.category_chances.clone();
    mushrooms
        .category_chances
        .retain(|category, _| unlocked.contains(category));
    apply_big_mushroom_bonus(
        &mut mushrooms,
        &config.mushrooms.type_chances,
        effects.big_mushroom_bonus(),
        config.upgrades.big_mushroom_policy,
    );
    store.update_mushroom_settings(mushrooms)?;

    info!(
        "applied {} upgrades: {} bonus tiles, {} categories, speed x{:.1}",
        effects.owned.len(),
        effects.tile_bonus(),
        unlocked.len(),
        effects.speed_multiplier()
    );
    Ok(effects)
}

fn apply_big_mushroom_bonus(
    settings: &mut MushroomSettingsData,
    configured: &ChanceTable<MushroomType>,
    bonus: i32,
    policy: BigMushroomBonusPolicy,
) {
    match policy {
        BigMushroomBonusPolicy::Recompute => {
            let mut previous = settings.applied_big_mushroom_bonus;
            if settings.type_chances.is_empty() {
                if bonus == 0 {
                    settings.applied_big_mushroom_bonus = 0;
                    return;
                }
                settings.type_chances = configured.clone();
                previous = 0;
            }
            match settings.type_chances.get_mut(&MushroomType::Big) {
                Some(weight) => *weight += bonus - previous,
                None => settings.type_chances.insert(MushroomType::Big, bonus),
            }
            settings.applied_big_mushroom_bonus = bonus;
        }
        BigMushroomBonusPolicy::Accumulate => {
            if let Some(weight) = settings.type_chances.get_mut(&MushroomType::Big) {
                *weight += bonus;
            }
        }
    }
}

/// Result of a purchase attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// Coins were spent and the upgrade recorded.
    Purchased {
        /// Coins left after the purchase.
        remaining: i64,
    },
    /// The upgrade was already owned; nothing changed.
    AlreadyOwned,
    /// The balance does not cover the price; nothing changed.
    InsufficientCoins {
        /// Price of the upgrade.
        cost: i64,
        /// Current balance.
        balance: i64,
    },
    /// The catalog does not list the upgrade.
    NotForSale,
}

/// Buys `id` if it is unowned, listed and affordable.
///
/// Spending and recording are two separate writes.
pub fn purchase_upgrade<S: ProgressStore>(
    catalog: &UpgradeCatalog,
    store: &mut S,
    id: UpgradeId,
) -> Result<PurchaseOutcome, SaveError> {
    if store.data().upgrade_data.has_purchased(id.as_str()) {
        return Ok(PurchaseOutcome::AlreadyOwned);
    }
    let Some(cost) = catalog.cost(id) else {
        return Ok(PurchaseOutcome::NotForSale);
    };

    let balance = store.data().coins;
    if !store.spend_coins(cost)? {
        return Ok(PurchaseOutcome::InsufficientCoins { cost, balance });
    }

    let remaining = store.data().coins;
    let mut upgrades = store.data().upgrade_data.clone();
    let _ = upgrades.record_purchase(id.as_str(), remaining);
    store.update_upgrade_data(upgrades)?;
    info!("purchased {id} for {cost} coins; {remaining} left");
    Ok(PurchaseOutcome::Purchased { remaining })
}

/// Unowned upgrades on sale, with their price, ordered by tier.
#[must_use]
pub fn available_upgrades(catalog: &UpgradeCatalog, data: &UpgradeData) -> Vec<(UpgradeId, i64)> {
    UpgradeId::ALL
        .into_iter()
        .filter(|id| !data.has_purchased(id.as_str()))
        .filter_map(|id| catalog.cost(id).map(|cost| (id, cost)))
        .collect()
}
