//! Game modes and the per-session mode controller
//!
//! A mode is pure configuration: a platform type policy, a field layout and a
//! presentation theme. The [`ModeController`] drives one mode session and owns
//! the in-memory record ledger until the session ends.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, StoreError};
use crate::highscores::{FlushSummary, SessionLedger};
use crate::persistence::RecordStore;
use crate::sim::{
    FieldConfig, FrameSnapshot, GameEvent, GamePhase, GameState, KindPolicy, PlatformKind,
    TickInput, TickOutcome, tick,
};

/// Presentation keys for a screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub title: &'static str,
    pub background: &'static str,
    pub music: &'static str,
}

/// Theme of the main menu
pub const MENU_THEME: Theme = Theme {
    title: "Cloud Jump",
    background: "sky",
    music: "menu",
};

/// Selectable game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Normal,
    Lava,
    Ice,
}

impl GameMode {
    pub const ALL: [GameMode; 3] = [GameMode::Normal, GameMode::Lava, GameMode::Ice];

    /// Persistence key
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Normal => "normal",
            GameMode::Lava => "lava",
            GameMode::Ice => "ice",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(GameMode::Normal),
            "lava" => Some(GameMode::Lava),
            "ice" => Some(GameMode::Ice),
            _ => None,
        }
    }

    pub fn theme(&self) -> Theme {
        match self {
            GameMode::Normal => Theme {
                title: "Cloud Jump",
                background: "sky",
                music: "normal",
            },
            GameMode::Lava => Theme {
                title: "Cloud Jump - Lava Mode",
                background: "lava",
                music: "lava",
            },
            GameMode::Ice => Theme {
                title: "Cloud Jump - Ice Mode",
                background: "ice",
                music: "ice",
            },
        }
    }

    /// Platform types streamed in by this mode
    pub fn policy(&self) -> KindPolicy {
        match self {
            GameMode::Normal => KindPolicy::default(),
            GameMode::Lava => KindPolicy::only(PlatformKind::Breakable),
            GameMode::Ice => KindPolicy::only(PlatformKind::Ice),
        }
    }

    pub fn field_config(&self) -> FieldConfig {
        match self {
            GameMode::Normal => FieldConfig::default(),
            GameMode::Lava | GameMode::Ice => FieldConfig {
                safe_start_rows: 0,
                ..FieldConfig::default()
            },
        }
    }
}

/// Runs one mode session: ticks the simulation, tracks finished runs and
/// writes them to storage once at the end
#[derive(Debug)]
pub struct ModeController {
    state: GameState,
    ledger: SessionLedger,
    /// The current run has not been added to the ledger yet
    run_open: bool,
}

impl ModeController {
    pub fn new(mode: GameMode, seed: u64) -> Result<Self, SimError> {
        Ok(Self {
            state: GameState::new(mode, seed)?,
            ledger: SessionLedger::new(),
            run_open: true,
        })
    }

    pub fn mode(&self) -> GameMode {
        self.state.mode
    }

    pub fn theme(&self) -> Theme {
        self.state.mode.theme()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn ledger(&self) -> &SessionLedger {
        &self.ledger
    }

    /// Turn the jump preview in snapshots on or off
    pub fn set_show_trajectory(&mut self, show: bool) {
        self.state.show_trajectory = show;
    }

    pub fn is_exited(&self) -> bool {
        self.state.phase == GamePhase::Exited
    }

    /// Advance one tick and record the run if it ended
    pub fn tick(&mut self, input: &TickInput) -> TickOutcome {
        let outcome = tick(&mut self.state, input);
        match outcome {
            TickOutcome::FellOff { score, coins } => {
                self.ledger.record_run(score, coins);
                self.run_open = false;
            }
            TickOutcome::Running { .. } if !self.run_open => {
                // A restart opened a fresh run
                self.run_open = true;
            }
            _ => {}
        }
        outcome
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        self.state.snapshot()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// Flush the session to `store`: best score is the max of stored and
    /// session scores, coins are added. A run still in progress counts as
    /// finished with its current score.
    pub fn end_session(&mut self, store: &mut impl RecordStore) -> Result<FlushSummary, StoreError> {
        if self.run_open && (self.state.score > 0 || self.state.coins > 0) {
            self.ledger.record_run(self.state.score, self.state.coins);
        }
        self.run_open = false;

        let mode = self.state.mode;
        let mut records = store.load_or_default();
        let summary = self.ledger.flush_into(&mut records, mode);
        store.save(&records)?;

        log::info!(
            "Session ended in {} mode: best {}, +{} coins{}",
            mode.as_str(),
            summary.best_score,
            summary.coins_added,
            if summary.new_high_score {
                " (new high score)"
            } else {
                ""
            }
        );
        Ok(summary)
    }
}
