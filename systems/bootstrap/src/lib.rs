#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bootstrap system that assembles and drives Shroom Sniff rounds.
//!
//! [`Game`] owns the configuration, the progress store and the world. Each
//! round folds purchased upgrades into the save, resolves the effective
//! settings, populates the level and then advances the world, the spawner
//! and the round timer once per frame until every mushroom is collected or
//! time runs out.

use std::{rc::Rc, time::Duration};

use log::{error, info};
use rand::Rng;
use shroom_sniff_core::{
    Command, Event, EventBus, GameConfig, PointerState, PrefabRegistry, UpgradeId,
};
use shroom_sniff_save::{ProgressStore, SaveError};
use shroom_sniff_system_settings::{
    resolve_level_layout, resolve_runtime_settings, resolve_spawn_parameters,
};
use shroom_sniff_system_spawning::{SpawnError, SpawnReport, SpawnRequest, Spawner};
use shroom_sniff_system_timer::RoundTimer;
use shroom_sniff_system_upgrades::{
    apply_upgrades_to_save_data, available_upgrades, purchase_upgrade, PurchaseOutcome,
    UpgradeEffects,
};
use shroom_sniff_world::{self as world, query, World};
use thiserror::Error;

/// Why a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundEndReason {
    /// Every spawned mushroom was pulled.
    AllCollected,
    /// The round timer reached its limit.
    TimeUp,
}

/// Outcome recorded when a round ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundSummary {
    /// Why the round ended.
    pub reason: RoundEndReason,
    /// Coins paid out during the round.
    pub coins_earned: i64,
    /// Mushrooms pulled during the round.
    pub collected: u32,
    /// Mushrooms spawned for the round.
    pub total: u32,
    /// Whole seconds elapsed when the round ended.
    pub elapsed_seconds: u32,
}

/// Failure to start a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum StartRoundError {
    /// The level could not be populated.
    #[error(transparent)]
    Spawn(#[from] SpawnError),
}

/// State of the round in progress.
#[derive(Debug)]
pub struct Round {
    timer: RoundTimer,
    effects: UpgradeEffects,
    report: SpawnReport,
    paused: bool,
    summary: Option<RoundSummary>,
}

impl Round {
    /// Countdown for the round.
    #[must_use]
    pub const fn timer(&self) -> &RoundTimer {
        &self.timer
    }

    /// Upgrades in effect for the round.
    #[must_use]
    pub const fn effects(&self) -> &UpgradeEffects {
        &self.effects
    }

    /// Result of populating the level.
    #[must_use]
    pub const fn spawn_report(&self) -> SpawnReport {
        self.report
    }

    /// Reports whether the round is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Summary recorded when the round ended.
    #[must_use]
    pub const fn summary(&self) -> Option<RoundSummary> {
        self.summary
    }

    /// Reports whether the round has ended.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.summary.is_some()
    }

    fn finish(
        &mut self,
        reason: RoundEndReason,
        world: &mut World,
        spawner: &mut Spawner,
        bus: &mut EventBus,
    ) {
        if self.summary.is_some() {
            return;
        }

        self.timer.cancel();
        spawner.stop_listening();
        world::apply(world, Command::SetMushroomsEnabled { enabled: false }, bus);

        let summary = RoundSummary {
            reason,
            coins_earned: spawner.coins_earned_this_round(),
            collected: spawner.collected(),
            total: spawner.total_spawned(),
            elapsed_seconds: self.timer.elapsed_seconds(),
        };
        info!(
            "round ended ({reason:?}): {}/{} collected, {} coins in {}s",
            summary.collected, summary.total, summary.coins_earned, summary.elapsed_seconds
        );
        self.summary = Some(summary);
    }
}

/// Composition root tying configuration, persistence and the world together.
#[derive(Debug)]
pub struct Game<S: ProgressStore> {
    config: GameConfig,
    store: S,
    world: World,
    bus: EventBus,
    spawner: Spawner,
    round: Option<Round>,
}

impl<S: ProgressStore> Game<S> {
    /// Creates a game backed by `store`; no round is running yet.
    #[must_use]
    pub fn new(config: GameConfig, store: S) -> Self {
        let spawner = Spawner::new(config.rewards.clone());
        Self {
            config,
            store,
            world: World::new(),
            bus: EventBus::new(),
            spawner,
            round: None,
        }
    }

    /// Banner shown when the experience starts.
    #[must_use]
    pub fn welcome_banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    /// Starts a new round, abandoning the current one.
    ///
    /// Upgrade effects that fail to persist are logged and still applied to
    /// the round. A spawn failure leaves no round running and no pending
    /// events.
    pub fn start_round<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<SpawnReport, StartRoundError> {
        let _ = self.leave_round();
        let _ = self.bus.drain();

        let effects = match apply_upgrades_to_save_data(&self.config, &mut self.store) {
            Ok(effects) => effects,
            Err(save_error) => {
                error!("failed to persist upgrade effects: {save_error}");
                UpgradeEffects::from_upgrade_data(&self.store.data().upgrade_data)
            }
        };

        let data = self.store.data();
        let layout = resolve_level_layout(&self.config.level, &data.level_settings);
        let settings = Rc::new(resolve_runtime_settings(
            &self.config.mushrooms,
            &data.mushroom_settings,
            effects.speed_multiplier(),
        ));
        let parameters = resolve_spawn_parameters(&self.config.mushrooms, &data.mushroom_settings);

        world::apply(
            &mut self.world,
            Command::ConfigureLevel {
                tile_count: layout.tile_count,
                tile_size: layout.tile_size,
            },
            &mut self.bus,
        );
        if let Some(categories) = &self.config.mushrooms.prefabs {
            let wanted = PrefabRegistry::new(categories.iter().copied());
            if query::prefab_registry(&self.world) != Some(&wanted) {
                world::apply(
                    &mut self.world,
                    Command::RegisterPrefabs {
                        categories: wanted.categories().to_vec(),
                    },
                    &mut self.bus,
                );
            }
        }

        let mut commands = Vec::new();
        let request = SpawnRequest {
            tiles: query::tiles(&self.world),
            prefabs: query::prefab_registry(&self.world),
            parameters: &parameters,
            settings,
        };
        let report = match self.spawner.spawn_mushrooms(request, rng, &mut commands) {
            Ok(report) => report,
            Err(spawn_error) => {
                self.spawner.stop_listening();
                let _ = self.bus.drain();
                return Err(spawn_error.into());
            }
        };
        for command in commands {
            world::apply(&mut self.world, command, &mut self.bus);
        }

        self.round = Some(Round {
            timer: RoundTimer::new(self.config.round.time_limit_seconds),
            effects,
            report,
            paused: false,
            summary: None,
        });
        Ok(report)
    }

    /// Advances the running round by one frame and returns its events.
    ///
    /// Paused or finished rounds ignore the frame. Events published while
    /// setting up the round are returned by the first frame.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        dt: Duration,
        pointer: PointerState,
        rng: &mut R,
    ) -> Vec<Event> {
        let Some(round) = self.round.as_mut() else {
            return Vec::new();
        };
        if round.paused || round.is_over() {
            return Vec::new();
        }

        world::apply(&mut self.world, Command::Tick { dt, pointer }, &mut self.bus);
        round.timer.tick(dt, &mut self.bus);
        let mut frame = settle(&mut self.bus, &mut self.spawner, &mut self.store, rng);

        let reason = if frame
            .iter()
            .any(|event| matches!(event, Event::AllMushroomsCollected { .. }))
        {
            Some(RoundEndReason::AllCollected)
        } else if frame
            .iter()
            .any(|event| matches!(event, Event::TimeUp { .. }))
        {
            Some(RoundEndReason::TimeUp)
        } else {
            None
        };

        if let Some(reason) = reason {
            round.finish(reason, &mut self.world, &mut self.spawner, &mut self.bus);
            frame.extend(settle(
                &mut self.bus,
                &mut self.spawner,
                &mut self.store,
                rng,
            ));
        }
        frame
    }

    /// Pauses the running round. Returns `false` when nothing is running.
    pub fn pause(&mut self) -> bool {
        match self.round.as_mut() {
            Some(round) if !round.is_over() => {
                round.paused = true;
                round.timer.pause();
                true
            }
            _ => false,
        }
    }

    /// Resumes a paused round. Returns `false` when nothing is running.
    pub fn resume(&mut self) -> bool {
        match self.round.as_mut() {
            Some(round) if !round.is_over() => {
                round.paused = false;
                round.timer.resume();
                true
            }
            _ => false,
        }
    }

    /// Flips the pause state and returns whether the round is now paused.
    pub fn toggle_pause(&mut self) -> bool {
        let paused = self.round.as_ref().is_some_and(Round::is_paused);
        if paused {
            let _ = self.resume();
            false
        } else {
            self.pause()
        }
    }

    /// Ends the current round without a summary, returning its mushrooms to the pool.
    pub fn leave_round(&mut self) -> Option<RoundSummary> {
        let mut round = self.round.take()?;
        round.timer.cancel();
        self.spawner.stop_listening();
        world::apply(&mut self.world, Command::ClearMushrooms, &mut self.bus);
        let _ = self.bus.drain();
        round.summary
    }

    /// Buys an upgrade from the configured catalog.
    pub fn purchase_upgrade(&mut self, id: UpgradeId) -> Result<PurchaseOutcome, SaveError> {
        purchase_upgrade(&self.config.upgrades, &mut self.store, id)
    }

    /// Unowned upgrades on sale with their price.
    #[must_use]
    pub fn available_upgrades(&self) -> Vec<(UpgradeId, i64)> {
        available_upgrades(&self.config.upgrades, &self.store.data().upgrade_data)
    }

    /// Discards all progress and rebuilds the save from configuration.
    pub fn reset_progress(&mut self) -> Result<(), SaveError> {
        info!("resetting progress to configured defaults");
        self.store.reset_to_defaults(&self.config)
    }

    /// Configuration the game was started with.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Persisted progress.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// World holding the level and its mushrooms.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Round in progress or just finished.
    #[must_use]
    pub const fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Spawner tracking the round's collection progress.
    #[must_use]
    pub const fn spawner(&self) -> &Spawner {
        &self.spawner
    }
}

fn settle<S: ProgressStore, R: Rng + ?Sized>(
    bus: &mut EventBus,
    spawner: &mut Spawner,
    store: &mut S,
    rng: &mut R,
) -> Vec<Event> {
    let mut settled = Vec::new();
    loop {
        let events = bus.drain();
        if events.is_empty() {
            return settled;
        }
        spawner.handle(&events, store, rng, bus);
        settled.extend(events);
    }
}
