//! Cloud Jump - a charge-and-release jump arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, platforms, scrolling)
//! - `mode`: Game modes (normal, lava, ice) and their platform policies
//! - `highscores`: Per-mode best scores and coin totals
//! - `persistence`: Record storage backends
//! - `settings`: User preferences

pub mod error;
pub mod highscores;
pub mod mode;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use error::{SimError, StoreError};
pub use highscores::{Records, SessionLedger};
pub use mode::GameMode;
pub use settings::Settings;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate (one tick per rendered frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 400.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Player physics (pixels per tick, pixels per tick²)
    pub const GRAVITY: f32 = 0.5;
    pub const MAX_FALL_SPEED: f32 = 15.0;
    pub const MAX_CHARGE: f32 = 20.0;
    pub const CHARGE_RATE: f32 = 0.5;
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const JUMP_HORIZONTAL_FACTOR: f32 = 0.05;
    /// Aim offsets beyond this are clamped before computing vx
    pub const MAX_HORIZONTAL_DISTANCE: f32 = 150.0;
    /// |vx| below this snaps to zero while grounded
    pub const VELOCITY_SNAP: f32 = 0.1;

    /// Platform geometry
    pub const PLATFORM_HEIGHT: f32 = 10.0;
    pub const PLATFORM_WIDTH: f32 = 100.0;
    pub const PLATFORM_SPACING: f32 = 100.0;
    /// Minimum distance from the left screen edge for spawned platforms
    pub const PLATFORM_EDGE_MARGIN: f32 = 20.0;

    /// Friction coefficients (fraction of vx retained per grounded tick)
    pub const NORMAL_FRICTION: f32 = 0.85;
    pub const ICE_FRICTION: f32 = 0.98;
    pub const MOVING_FRICTION: f32 = 0.95;

    /// Rising Moving platforms push the player slightly harder than they move
    pub const MOVING_RISE_BOOST: f32 = 1.2;

    /// Breakable platforms vanish 1.8s after first landing
    pub const BREAK_TIME_TICKS: u32 = TICKS_PER_SECOND * 9 / 5;

    /// Platform field streaming
    pub const MIN_ACTIVE_PLATFORMS: usize = 13;
    pub const INITIAL_PLATFORMS: usize = 12;
    pub const DESPAWN_MARGIN: f32 = 50.0;
    /// Initial platforms (after the start platform) forced to Normal
    pub const SAFE_START_ROWS: usize = 3;

    /// Camera scroll
    pub const SCROLL_SPEED: f32 = 5.0;
    pub const SCROLL_MARGIN: f32 = 50.0;

    /// Coins
    pub const COIN_SIZE: f32 = 30.0;
    pub const COIN_SPAWN_CHANCE: f32 = 0.2;
    /// Gap between a coin's bottom edge and its platform's top
    pub const COIN_HOVER: f32 = 10.0;

    /// Trajectory preview length
    pub const TRAJECTORY_STEPS: usize = 50;
}

/// Axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap test (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Strict overlap of the horizontal ranges `[a_left, a_right)` and `[b_left, b_right)`
#[inline]
pub fn spans_overlap(a_left: f32, a_right: f32, b_left: f32, b_right: f32) -> bool {
    a_right > b_left && a_left < b_right
}
