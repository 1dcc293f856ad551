//! Frogger Sim headless runner
//!
//! Plays a scripted session on the virtual clock and logs the outcome.
//!
//! Usage: `frogger-sim [settings.json] [normal|hardcore] [keys...]`
//! Keys are `Up`/`Down`/`Left`/`Right` (or WASD), one every 250ms.

use std::process::ExitCode;

use frogger_sim::audio::LogAudio;
use frogger_sim::persistence::{MemoryStore, ScoreStore};
use frogger_sim::platform::{Driver, InputScript};
use frogger_sim::renderer::NullRenderer;
use frogger_sim::sim::Session;
use frogger_sim::{Difficulty, GameSettings, SortOrder};

/// Spacing between scripted key presses
const KEY_SPACING_MS: u64 = 250;
/// Give up after this much virtual time
const RUN_LIMIT_MS: u64 = 5 * 60 * 1000;
/// Default script: straight up the middle, again and again
const DEFAULT_KEYS: &str = "Up Up Up Up Up Up Left Up Up Up Up Up Up Up Up Up Up Up Up";

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Frogger Sim (headless) starting...");

    let mut args = std::env::args().skip(1).peekable();

    let settings = match args.next_if(|arg| arg.ends_with(".json")) {
        Some(path) => match load_settings(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => GameSettings::default(),
    };

    let difficulty = args
        .next_if(|arg| Difficulty::from_str(arg).is_some())
        .and_then(|arg| Difficulty::from_str(&arg))
        .unwrap_or_default();

    let keys: Vec<String> = args.collect();
    let keys = if keys.is_empty() {
        DEFAULT_KEYS.to_string()
    } else {
        keys.join(" ")
    };

    let session = match Session::new(settings, difficulty, seed()) {
        Ok(session) => session,
        Err(err) => {
            log::error!("Cannot start session: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut driver = Driver::new(session, LogAudio::new(), NullRenderer);
    let mut script = InputScript::from_keys(&keys, KEY_SPACING_MS);
    driver.run_script(&mut script, RUN_LIMIT_MS);
    driver.run_until(RUN_LIMIT_MS, |session| session.is_game_over());

    let session = driver.session();
    log::info!(
        "Finished after {:.1}s: phase {:?}, score {}, lives {}, level {}",
        driver.now_ms() as f64 / 1000.0,
        session.phase(),
        session.player().score(),
        session.player().lives(),
        session.level().id() + 1
    );

    let mut store = MemoryStore::new();
    store.append(session.score_record("player"));
    let board = store.leaderboard(SortOrder::Score);
    if board.is_empty() {
        log::info!("No score qualified for the leaderboard");
    }
    for (rank, record) in board.entries.iter().enumerate() {
        println!("{:>2}. {:<10} {:>6}  level {}", rank + 1, record.name, record.score, record.level);
    }

    ExitCode::SUCCESS
}

fn load_settings(path: &str) -> Result<GameSettings, String> {
    let json = std::fs::read_to_string(path).map_err(|err| format!("Cannot read {path}: {err}"))?;
    GameSettings::from_json(&json).map_err(|err| format!("Cannot load {path}: {err}"))
}

/// Seed from the wall clock; `FROGGER_SEED` pins it for reproducible runs
fn seed() -> u64 {
    if let Some(seed) = std::env::var("FROGGER_SEED").ok().and_then(|s| s.parse().ok()) {
        return seed;
    }
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}
