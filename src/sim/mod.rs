//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (platforms in spawn order)
//! - No rendering, audio or storage dependencies

pub mod autopilot;
pub mod coin;
pub mod collision;
pub mod field;
pub mod platform;
pub mod player;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use coin::Coin;
pub use collision::{BodyProbe, Contact, landing_contact};
pub use field::{FieldConfig, KindPolicy, PlatformField, StepReport, TierThresholds};
pub use platform::{BreakState, Oscillation, Platform, PlatformId, PlatformKind, PlatformState};
pub use player::{AnimState, Landing, Player, StepResult};
pub use snapshot::{FrameSnapshot, PlatformView, PlayerView};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{InputEvent, TickInput, TickOutcome, tick};
