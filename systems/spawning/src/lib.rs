#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Mushroom spawner that populates every tile and rolls up collections.
//!
//! [`Spawner::spawn_mushrooms`] emits one [`Command::SpawnMushroom`] per
//! successfully placed slot and fixes the round's total. [`Spawner::handle`]
//! then consumes pulled notifications, pays out coins and announces
//! [`Event::AllMushroomsCollected`] exactly once.

use std::rc::Rc;

use glam::Vec3;
use log::{error, info};
use rand::{seq::SliceRandom, Rng};
use shroom_sniff_core::{
    CoinRewardConfig, Command, Event, EventBus, PrefabRegistry, RewardRange, RuntimeSettings,
    Tile,
};
use shroom_sniff_save::ProgressStore;
use shroom_sniff_system_placement::{solve, SpawnConstraint};
use shroom_sniff_system_selection::{choose, options_from_table, SelectionError};
use shroom_sniff_system_settings::SpawnParameters;
use thiserror::Error;

/// Inputs required to populate a level.
#[derive(Clone, Debug)]
pub struct SpawnRequest<'a> {
    /// Tiles to populate.
    pub tiles: &'a [Tile],
    /// Categories that can be instantiated; `None` when no registry is configured.
    pub prefabs: Option<&'a PrefabRegistry>,
    /// Effective chance tables, counts and constraints.
    pub parameters: &'a SpawnParameters,
    /// Settings handed to every spawned mushroom.
    pub settings: Rc<RuntimeSettings>,
}

/// Summary of a spawn pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpawnReport {
    /// Mushrooms placed.
    pub spawned: u32,
    /// Slots skipped because no valid position was found.
    pub skipped: u32,
}

/// Configuration problems that abort a spawn pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// No prefab registry is configured.
    #[error("no mushroom prefab registry is configured")]
    MissingPrefabRegistry,
    /// The level has no tiles.
    #[error("the level has no tiles to spawn on")]
    NoTiles,
    /// No category has both a positive chance and a registered prefab.
    #[error("no mushroom category has a positive chance and a registered prefab")]
    NoCategoryOptions,
    /// No type has a positive chance.
    #[error("no mushroom type has a positive chance")]
    NoTypeOptions,
    /// A weighted draw failed.
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Spawns mushrooms for a round and tracks its collection progress.
#[derive(Debug)]
pub struct Spawner {
    rewards: CoinRewardConfig,
    total: u32,
    collected: u32,
    coins_earned: i64,
    listening: bool,
}

impl Spawner {
    /// Creates a spawner paying out according to `rewards`.
    #[must_use]
    pub fn new(rewards: CoinRewardConfig) -> Self {
        Self {
            rewards,
            total: 0,
            collected: 0,
            coins_earned: 0,
            listening: false,
        }
    }

    /// Populates every tile and starts listening for pulled mushrooms.
    ///
    /// Counters are reset first. Configuration errors are logged and abort
    /// the pass without emitting any command.
    pub fn spawn_mushrooms<R: Rng + ?Sized>(
        &mut self,
        request: SpawnRequest<'_>,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) -> Result<SpawnReport, SpawnError> {
        self.total = 0;
        self.collected = 0;
        self.coins_earned = 0;
        self.listening = true;

        match self.populate(&request, rng, out) {
            Ok(report) => {
                self.total = report.spawned;
                info!(
                    "spawned {} mushrooms on {} tiles ({} slots skipped)",
                    report.spawned,
                    request.tiles.len(),
                    report.skipped
                );
                Ok(report)
            }
            Err(spawn_error) => {
                error!("mushroom spawn aborted: {spawn_error}");
                Err(spawn_error)
            }
        }
    }

    /// Rolls up pulled notifications into coins and the all-collected signal.
    ///
    /// Store write failures are logged; the round total still advances.
    pub fn handle<S: ProgressStore, R: Rng + ?Sized>(
        &mut self,
        events: &[Event],
        store: &mut S,
        rng: &mut R,
        bus: &mut EventBus,
    ) {
        for event in events {
            let Event::MushroomPulled { category, kind, .. } = event else {
                continue;
            };
            if !self.listening {
                continue;
            }

            self.collected += 1;
            let reward = roll_reward(self.rewards.range_for(*category, *kind), rng);
            self.coins_earned += reward;
            if let Err(save_error) = store.add_coins(reward) {
                error!("failed to persist {reward} coins: {save_error}");
            }
            bus.publish(Event::CoinsAwarded {
                amount: reward,
                round_total: self.coins_earned,
            });

            if self.total > 0 && self.collected >= self.total {
                self.listening = false;
                info!(
                    "all {} mushrooms collected for {} coins",
                    self.collected, self.coins_earned
                );
                bus.publish(Event::AllMushroomsCollected {
                    collected: self.collected,
                });
            }
        }
    }

    /// Stops reacting to pulled notifications until the next spawn pass.
    pub fn stop_listening(&mut self) {
        self.listening = false;
    }

    /// Mushrooms spawned this round.
    #[must_use]
    pub const fn total_spawned(&self) -> u32 {
        self.total
    }

    /// Mushrooms collected this round.
    #[must_use]
    pub const fn collected(&self) -> u32 {
        self.collected
    }

    /// Coins paid out this round.
    #[must_use]
    pub const fn coins_earned_this_round(&self) -> i64 {
        self.coins_earned
    }

    /// Reports whether pulled notifications are still being counted.
    #[must_use]
    pub const fn is_listening(&self) -> bool {
        self.listening
    }

    fn populate<R: Rng + ?Sized>(
        &self,
        request: &SpawnRequest<'_>,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) -> Result<SpawnReport, SpawnError> {
        let prefabs = request.prefabs.ok_or(SpawnError::MissingPrefabRegistry)?;
        if request.tiles.is_empty() {
            return Err(SpawnError::NoTiles);
        }

        let parameters = request.parameters;
        let categories = options_from_table(&parameters.category_chances, |category| {
            prefabs.contains(*category)
        });
        if categories.is_empty() {
            return Err(SpawnError::NoCategoryOptions);
        }
        let kinds = options_from_table(&parameters.type_chances, |_| true);
        if kinds.is_empty() {
            return Err(SpawnError::NoTypeOptions);
        }

        let mut order: Vec<&Tile> = request.tiles.iter().collect();
        order.shuffle(rng);

        let mut commands = Vec::new();
        let mut placed: Vec<Vec3> = Vec::new();
        let mut report = SpawnReport::default();
        for tile in order {
            for _ in 0..parameters.mushrooms_per_tile {
                let category = choose(&categories, rng)?;
                let kind = choose(&kinds, rng)?;
                let constraint = SpawnConstraint::for_type(
                    kind,
                    &parameters.minimum_spacing,
                    &parameters.spawn_padding,
                );
                let Some(position) =
                    solve(tile, constraint, &placed, parameters.max_spawn_attempts, rng)
                else {
                    report.skipped += 1;
                    continue;
                };

                placed.push(position);
                commands.push(Command::SpawnMushroom {
                    category,
                    kind,
                    position,
                    settings: Rc::clone(&request.settings),
                });
                report.spawned += 1;
            }
        }

        out.extend(commands);
        Ok(report)
    }
}

fn roll_reward<R: Rng + ?Sized>(range: RewardRange, rng: &mut R) -> i64 {
    let low = range.min.min(range.max);
    let high = range.min.max(range.max);
    rng.gen_range(low..=high)
}
