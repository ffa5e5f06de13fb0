#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Shroom Sniff rounds headlessly.

mod config;
mod player;

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use shroom_sniff_core::GameConfig;
use shroom_sniff_save::{FileStore, ProgressStore};
use shroom_sniff_system_bootstrap::{Game, Round, RoundSummary};
use shroom_sniff_system_upgrades::PurchaseOutcome;

use crate::player::ScriptedPlayer;

const MAX_FRAMES_PER_ROUND: u32 = 100_000;
const PLAYER_REACH: f32 = 0.3;

#[derive(Debug, Parser)]
#[command(name = "shroom-sniff")]
#[command(about = "Plays Shroom Sniff rounds with a scripted player")]
struct CliArgs {
    /// Game configuration TOML; the shipped asset is used when present.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Save file location.
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,
    /// Seed for every random draw; picked at random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of rounds to play.
    #[arg(long, default_value_t = 3)]
    rounds: u32,
    /// Simulated frame length in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Cursor speed of the scripted player in world units per second.
    #[arg(long, default_value_t = 6.0)]
    player_speed: f32,
    /// Buy every affordable upgrade between rounds.
    #[arg(long)]
    buy_upgrades: bool,
    /// Discard saved progress before playing.
    #[arg(long)]
    reset: bool,
}

/// Entry point for the Shroom Sniff command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CliArgs::parse();

    let config = load_config(args.config.as_deref())?;
    let save_path = args
        .save
        .clone()
        .unwrap_or_else(|| PathBuf::from(FileStore::DEFAULT_FILE_NAME));
    let store = FileStore::open(&save_path, &config);
    let mut game = Game::new(config, store);
    println!("{}", game.welcome_banner());

    if args.reset {
        game.reset_progress()
            .with_context(|| format!("failed to reset progress at {}", save_path.display()))?;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("using seed {seed}");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let frame = Duration::from_millis(args.frame_ms.max(1));

    for round_index in 1..=args.rounds {
        let _ = play_round(&mut game, &mut rng, round_index, frame, args.player_speed);

        if args.buy_upgrades {
            buy_affordable_upgrades(&mut game)?;
        }
    }

    println!("coins: {}", game.store().data().coins);
    Ok(())
}

/// Plays one round to completion. A round that cannot start is logged and
/// skipped so later rounds still get a chance.
fn play_round<S: ProgressStore, R: Rng + ?Sized>(
    game: &mut Game<S>,
    rng: &mut R,
    round_index: u32,
    frame: Duration,
    player_speed: f32,
) -> Option<RoundSummary> {
    let report = match game.start_round(rng) {
        Ok(report) => report,
        Err(start_error) => {
            error!("round {round_index} skipped: {start_error}");
            return None;
        }
    };
    info!(
        "round {round_index}: {} mushrooms ({} slots skipped)",
        report.spawned, report.skipped
    );

    let mut player = ScriptedPlayer::new(player_speed, PLAYER_REACH);
    let mut frames = 0;
    while !game.round().is_some_and(Round::is_over) && frames < MAX_FRAMES_PER_ROUND {
        let pointer = player.sample(game.world(), frame);
        for event in game.tick(frame, pointer, rng) {
            debug!("{event:?}");
        }
        frames += 1;
    }

    let summary = game.leave_round();
    match &summary {
        Some(summary) => println!(
            "round {round_index}: {:?} after {}s, collected {}/{}, earned {} coins",
            summary.reason,
            summary.elapsed_seconds,
            summary.collected,
            summary.total,
            summary.coins_earned
        ),
        None => warn!("round {round_index} did not finish within {MAX_FRAMES_PER_ROUND} frames"),
    }
    summary
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    if let Some(path) = path {
        return config::load(path);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        config::load(&default_path)
    } else {
        info!(
            "no game config at {}; using built-in defaults",
            default_path.display()
        );
        Ok(GameConfig::default())
    }
}

fn buy_affordable_upgrades<S: ProgressStore>(game: &mut Game<S>) -> Result<()> {
    for (id, cost) in game.available_upgrades() {
        let outcome = game
            .purchase_upgrade(id)
            .with_context(|| format!("failed to record purchase of {id}"))?;
        if let PurchaseOutcome::Purchased { remaining } = outcome {
            println!("bought {id} for {cost} coins ({remaining} left)");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shroom_sniff_core::{MushroomCategory, UpgradeId};
    use shroom_sniff_save::MemoryStore;

    #[test]
    fn a_round_that_cannot_start_is_skipped() {
        let mut config = GameConfig::default();
        config.mushrooms.prefabs = Some(Vec::new());
        let store = MemoryStore::from_config(&config);
        let mut game = Game::new(config, store);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let first = play_round(&mut game, &mut rng, 1, Duration::from_millis(16), 6.0);
        let second = play_round(&mut game, &mut rng, 2, Duration::from_millis(16), 6.0);

        assert_eq!(first, None);
        assert_eq!(second, None);
        assert!(game.round().is_none());
        assert_eq!(game.store().data().coins, 0);
    }

    #[test]
    fn later_rounds_play_after_a_skipped_one() {
        let mut config = GameConfig::default();
        config.level.tile_count = 2;
        config.round.time_limit_seconds = 120;
        config.mushrooms.prefabs = Some(vec![MushroomCategory::P2]);
        let cost = config
            .upgrades
            .cost(UpgradeId::Tier1UnlockMushroom)
            .expect("unlock upgrade is on sale");
        let mut store = MemoryStore::from_config(&config);
        assert_eq!(store.add_coins(cost).ok(), Some(true));
        let mut game = Game::new(config, store);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let frame = Duration::from_millis(16);

        let skipped = play_round(&mut game, &mut rng, 1, frame, 6.0);
        assert_eq!(skipped, None, "no prefab is unlocked yet");

        let outcome = game.purchase_upgrade(UpgradeId::Tier1UnlockMushroom);
        assert!(matches!(outcome, Ok(PurchaseOutcome::Purchased { .. })));

        let summary = play_round(&mut game, &mut rng, 2, frame, 6.0).expect("second round finishes");
        assert!(summary.total > 0);
        assert!(game.round().is_none(), "the finished round was left");
    }
}
