//! Game state and core simulation types

use serde::{Deserialize, Serialize};

use super::field::PlatformField;
use super::platform::{PlatformId, PlatformKind};
use super::player::Player;
use crate::consts::SCREEN_WIDTH;
use crate::error::SimError;
use crate::mode::GameMode;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player fell off the bottom; waiting for restart or menu
    GameOver,
    /// Left to the menu or quit; the state is finished
    Exited,
}

/// Discrete events for audio and other presentation collaborators
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ModeStarted { mode: GameMode },
    Jumped,
    Landed { kind: PlatformKind },
    /// A Breakable platform started its countdown
    BreakStarted { platform: PlatformId },
    PlatformBroke { platform: PlatformId },
    CoinCollected { run_total: u32 },
    FellOff { score: u64 },
    Restarted,
    ExitedToMenu,
    Quit,
}

/// Complete state of one mode session
#[derive(Debug, Clone)]
pub struct GameState {
    pub mode: GameMode,
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub field: PlatformField,
    /// Scrolling ticks this run
    pub score: u64,
    /// Coins collected this run
    pub coins: u32,
    /// Simulation tick counter (only advances while playing)
    pub time_ticks: u64,
    /// Scroll applied during the last tick
    pub scroll_speed: f32,
    /// Last known aim position (x), for the trajectory preview
    pub aim_x: f32,
    /// Include the jump preview in snapshots
    pub show_trajectory: bool,
    /// Events since the host last drained them
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new run of `mode` with the given seed
    pub fn new(mode: GameMode, seed: u64) -> Result<Self, SimError> {
        let config = mode.field_config();
        let field = PlatformField::new(config, mode.policy(), seed)?;
        let player = Player::new(field.config().screen_width, field.config().screen_height);

        log::info!("Starting {} mode with seed {}", mode.as_str(), seed);

        Ok(Self {
            mode,
            seed,
            phase: GamePhase::Playing,
            player,
            field,
            score: 0,
            coins: 0,
            time_ticks: 0,
            scroll_speed: 0.0,
            aim_x: SCREEN_WIDTH / 2.0,
            show_trajectory: true,
            events: vec![GameEvent::ModeStarted { mode }],
        })
    }

    /// Start a fresh run of the same mode. The field's RNG stream carries on,
    /// so the new layout differs from the previous run.
    pub fn restart(&mut self) {
        let config = self.field.config();
        self.player = Player::new(config.screen_width, config.screen_height);
        self.field.generate_initial();
        self.score = 0;
        self.coins = 0;
        self.time_ticks = 0;
        self.scroll_speed = 0.0;
        self.phase = GamePhase::Playing;
        self.push_event(GameEvent::Restarted);
        log::info!("Restarted {} mode", self.mode.as_str());
    }

    pub fn difficulty(&self) -> f32 {
        self.field.difficulty()
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }
}
