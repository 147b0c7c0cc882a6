use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use arena_royale::cli;
use arena_royale::config::BattleConfig;
use arena_royale::game::events::BattleEvent;
use arena_royale::game::game_loop::Battle;
use arena_royale::game::systems::spawn::SpawnMode;
use arena_royale::roster::PRESETS;
use arena_royale::runner::{self, RunOutcome};
use arena_royale::util::rng;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = cli::parse_args();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    if args.list_presets {
        for preset in PRESETS {
            println!("{}: {}", preset.name, preset.contenders.join(", "));
        }
        return Ok(());
    }
    if args.list_modes {
        for mode in SpawnMode::ALL {
            println!("{:<9} {}", mode.as_str(), mode.description());
        }
        return Ok(());
    }

    info!("Arena Royale v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = BattleConfig::load_or_default();
    args.apply(&mut config);
    config.validate().context("invalid battle configuration")?;
    info!(
        "Configuration loaded: {}x{} viewport, {} Hz, mode={}, realtime={}",
        config.width,
        config.height,
        config.tick_rate,
        config.spawn_mode.as_str(),
        config.realtime
    );

    let roster = args.roster().context("could not build the roster")?;
    info!("{} contenders: {}", roster.len(), roster.names().join(", "));

    let mut battle = Battle::new(config.width, config.height, rng::from_seed(config.seed));
    battle.start(&roster, config.spawn_mode);

    let print_events = args.events;
    let on_events = |battle: &Battle, events: &[BattleEvent]| {
        if !print_events {
            return;
        }
        for event in events {
            println!("{}", event.describe(battle.fighters()));
        }
    };

    let dt = config.tick_dt();
    let outcome = if config.realtime {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        };
        runner::run_realtime(&mut battle, dt, config.max_ticks, shutdown, on_events).await
    } else {
        runner::run_headless(&mut battle, dt, config.max_ticks, on_events)
    };

    match outcome {
        RunOutcome::Finished { ticks } => {
            info!("Battle finished after {} ticks", ticks);
        }
        RunOutcome::TickLimit { ticks } => {
            warn!("Battle stopped at the tick limit ({} ticks): {}", ticks, battle.status());
            anyhow::bail!("battle did not finish within {} ticks", ticks);
        }
        RunOutcome::Cancelled { ticks } => {
            info!("Battle cancelled after {} ticks", ticks);
            return Ok(());
        }
    }

    let summary = battle
        .summary()
        .context("battle finished without a summary")?;

    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("failed to encode summary")?;
        println!("{}", json);
    } else {
        println!("{}", summary.headline());
        for entry in &summary.results {
            println!("{}", entry.describe());
        }
    }

    Ok(())
}
