//! Cloud Jump headless runner
//!
//! Plays one mode session with the demo autopilot at fixed timestep, logs
//! the run and writes the records file.
//!
//! Usage: `cloud-jump [normal|lava|ice] [seed]`

use std::path::Path;

use anyhow::{Context, Result, bail};

use cloud_jump::persistence::{JsonFileStore, RecordStore};
use cloud_jump::settings::Settings;
use cloud_jump::sim::{Autopilot, GameEvent, InputEvent, TickInput, TickOutcome};
use cloud_jump::{GameMode, mode::ModeController};

fn main() -> Result<()> {
    env_logger::init();

    let mut settings = Settings::load(Path::new(Settings::FILE_NAME));
    let mut args = std::env::args().skip(1);
    if let Some(name) = args.next() {
        settings.mode = match GameMode::from_str(&name) {
            Some(mode) => mode,
            None => bail!("unknown mode `{}` (expected normal, lava or ice)", name),
        };
    }
    if let Some(seed) = args.next() {
        settings.seed = Some(seed.parse().with_context(|| format!("invalid seed `{}`", seed))?);
    }

    let seed = settings.seed.unwrap_or_else(rand::random);
    let mut controller =
        ModeController::new(settings.mode, seed).context("failed to start session")?;
    controller.set_show_trajectory(settings.show_trajectory);
    log::info!(
        "{} (music: {}, volume {:.2})",
        controller.theme().title,
        controller.theme().music,
        settings.effective_music_volume()
    );

    let mut pilot = Autopilot::new();
    let mut jumps = 0u32;
    for _ in 0..settings.max_ticks {
        let input = pilot.next_input(controller.state());
        let outcome = controller.tick(&input);

        for event in controller.drain_events() {
            match event {
                GameEvent::Jumped => jumps += 1,
                GameEvent::CoinCollected { run_total } => {
                    log::debug!("Coin! ({} this run)", run_total)
                }
                _ => {}
            }
        }

        if let TickOutcome::FellOff { score, coins } = outcome {
            log::info!("Fell off after {} jumps: score {}, coins {}", jumps, score, coins);
            controller.tick(&TickInput::new([InputEvent::ExitToMenu]));
            break;
        }
    }

    if !controller.is_exited() {
        log::info!("Tick limit reached, ending session");
        controller.tick(&TickInput::new([InputEvent::Quit]));
    }

    let mut store = JsonFileStore::in_dir(&settings.data_dir);
    let summary = controller
        .end_session(&mut store)
        .with_context(|| format!("failed to write {}", store.path().display()))?;

    println!(
        "{}: session best {} | record {} | coins +{}{}",
        controller.mode().as_str(),
        summary.best_score,
        store.load_or_default().best_for(controller.mode()),
        summary.coins_added,
        if summary.new_high_score { " | NEW HIGH SCORE" } else { "" }
    );
    Ok(())
}

