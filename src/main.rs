//! Entry point: plays the configured level pack headless with the autopilot.

use std::process::ExitCode;

use log::info;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use lavarunner::config::GameConfig;
use lavarunner::sim::pack;
use lavarunner::sim::parser::LevelParser;
use lavarunner::sim::runner::{run_game, CoinSeeker, RunOutcome};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig::load();
    let parser = LevelParser::with_overrides(
        config.symbols.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    )
    .with_finish_delay(config.timing.finish_delay);

    let levels = pack::load_levels(&config);
    info!("{} levels, seed {:#x}, {} attempts each", levels.len(), config.seed, config.max_attempts);

    let mut rng = Pcg32::seed_from_u64(config.seed);
    match run_game(&levels, &parser, &config, &mut rng, &mut CoinSeeker) {
        RunOutcome::Won => {
            println!("All {} levels cleared.", levels.len());
            ExitCode::SUCCESS
        }
        RunOutcome::GaveUp { level, name } => {
            println!("Gave up on level {} ({name}) after {} attempts.", level + 1, config.max_attempts);
            ExitCode::FAILURE
        }
    }
}
