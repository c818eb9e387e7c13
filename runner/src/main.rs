mod config;
mod observer;

use clap::Parser;
use common::engine::session::{
    SessionClock, SessionCommand, SessionEnd, create_session, run_game_loop,
};
use common::stats::StatsStore;
use common::{log, logger};
use config::{CONFIG_FILE, get_config_manager};
use observer::LoggingObserver;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "neon_snake_runner", about = "Plays Neon Snake rounds on autopilot")]
struct Args {
    #[arg(long, default_value = CONFIG_FILE)]
    config: String,

    /// Overrides `runner.games` from the config file.
    #[arg(long)]
    games: Option<u32>,

    /// Seed of the first round; later rounds use the following seeds.
    #[arg(long)]
    seed: Option<u64>,

    /// Tick at the game's own speed instead of as fast as possible.
    #[arg(long)]
    realtime: bool,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Runner".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config = get_config_manager(&args.config).get_config()?;
    let stats = StatsStore::from_yaml_file(&config.runner.stats_file);
    let games = args.games.unwrap_or(config.runner.games).max(1);
    let clock = if args.realtime || config.runner.realtime {
        SessionClock::RealTime
    } else {
        SessionClock::Unthrottled
    };
    let first_seed = args.seed.unwrap_or_else(rand::random);

    log!(
        "Playing {} round(s) on a {}x{} field, {:?} walls, {:?} autopilot",
        games,
        config.game.field_width,
        config.game.field_height,
        config.game.wall_mode,
        config.runner.autopilot
    );

    for round in 1..=games {
        let seed = first_seed.wrapping_add(u64::from(round - 1));
        let session_state =
            create_session(&config.game, seed, Some(config.runner.autopilot), clock);
        session_state
            .game
            .lock()
            .await
            .set_best_score(stats.best_score()?);

        let observer = LoggingObserver::new(round);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let mut game_handle =
            tokio::spawn(run_game_loop(session_state, observer.clone(), command_rx));

        let mut interrupted = false;
        let summary = tokio::select! {
            result = &mut game_handle => result?,
            _ = tokio::signal::ctrl_c() => {
                log!("Interrupted, stopping round {}", round);
                interrupted = true;
                let _ = command_tx.send(SessionCommand::Quit);
                game_handle.await?
            }
        };

        match summary.end {
            SessionEnd::GameOver(reason) => {
                let new_record = stats.record_game(summary.score, summary.level)?;
                log!(
                    "Round {} (seed {}): {:?}, score {}, level {}, {} ticks, longest snake {}{}",
                    round,
                    summary.seed,
                    reason,
                    summary.score,
                    summary.level,
                    summary.ticks,
                    observer.longest_snake(),
                    if new_record { ", new high score!" } else { "" }
                );
            }
            SessionEnd::Quit | SessionEnd::Disconnected => {
                log!("Round {} stopped early at score {}, not recorded", round, summary.score);
            }
        }

        if interrupted {
            break;
        }
    }

    let totals = stats.load()?;
    log!(
        "High score {}, {} games played, average score {:.2}",
        totals.high_score,
        totals.total_games,
        totals.average_score()
    );

    Ok(())
}
