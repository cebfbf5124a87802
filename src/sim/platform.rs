//! Platform entities
//!
//! Every platform shifts down with the camera scroll. Beyond that, behaviour is
//! a closed set of kinds: Normal and Ice are inert, Moving platforms bob up and
//! down around a scrolling origin, and Breakable platforms run a small
//! `Idle -> Breaking -> Removable` state machine once landed on.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::consts::*;

/// Stable identifier of a platform within its field
pub type PlatformId = u32;

/// Platform type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformKind {
    Normal,
    Moving,
    Breakable,
    Ice,
}

impl PlatformKind {
    /// Fraction of horizontal velocity a grounded player keeps per tick.
    /// Moving platforms use a separate retention applied by the player.
    pub fn friction(&self) -> f32 {
        match self {
            PlatformKind::Ice => ICE_FRICTION,
            _ => NORMAL_FRICTION,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKind::Normal => "normal",
            PlatformKind::Moving => "moving",
            PlatformKind::Breakable => "breakable",
            PlatformKind::Ice => "ice",
        }
    }

    /// Sprite file the renderer should use for this kind
    pub fn sprite_name(&self) -> &'static str {
        match self {
            PlatformKind::Normal => "normal_platform.png",
            PlatformKind::Moving => "sliding_platform.png",
            PlatformKind::Breakable => "breakable_platform.png",
            PlatformKind::Ice => "ice_platform.png",
        }
    }
}

/// Vertical oscillation of a Moving platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillation {
    /// Centre of the oscillation; follows the scroll
    pub origin_y: f32,
    pub amplitude: f32,
    /// Phase advance per tick (radians)
    pub angular_speed: f32,
    pub phase: f32,
}

impl Oscillation {
    /// Random oscillation: amplitude in [30, 60], speed in [0.02, 0.04), any phase
    pub fn random(origin_y: f32, rng: &mut impl Rng) -> Self {
        Self {
            origin_y,
            amplitude: rng.random_range(30u32..=60) as f32,
            angular_speed: rng.random_range(0.02..0.04),
            phase: rng.random_range(0.0..std::f32::consts::TAU),
        }
    }

    #[inline]
    pub fn current_y(&self) -> f32 {
        self.origin_y + self.phase.sin() * self.amplitude
    }
}

/// Breakable platform lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakState {
    Idle,
    /// Ticks elapsed since the first landing
    Breaking { timer: u32 },
    Removable,
}

/// Kind-specific state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlatformState {
    Normal,
    Ice,
    Moving(Oscillation),
    Breakable(BreakState),
}

/// A platform entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    /// `pos.y` before the most recent update
    pub prev_y: f32,
    pub state: PlatformState,
}

impl Platform {
    fn with_state(id: PlatformId, x: f32, y: f32, width: f32, state: PlatformState) -> Self {
        Self {
            id,
            pos: Vec2::new(x, y),
            width,
            prev_y: y,
            state,
        }
    }

    pub fn normal(id: PlatformId, x: f32, y: f32, width: f32) -> Self {
        Self::with_state(id, x, y, width, PlatformState::Normal)
    }

    pub fn ice(id: PlatformId, x: f32, y: f32, width: f32) -> Self {
        Self::with_state(id, x, y, width, PlatformState::Ice)
    }

    pub fn breakable(id: PlatformId, x: f32, y: f32, width: f32) -> Self {
        Self::with_state(id, x, y, width, PlatformState::Breakable(BreakState::Idle))
    }

    /// Moving platform centred on `origin_y`; placed on its curve immediately
    pub fn moving(id: PlatformId, x: f32, width: f32, oscillation: Oscillation) -> Self {
        let y = oscillation.current_y();
        Self::with_state(id, x, y, width, PlatformState::Moving(oscillation))
    }

    /// Build a platform of `kind`, drawing any random parameters from `rng`
    pub fn spawn(
        kind: PlatformKind,
        id: PlatformId,
        x: f32,
        y: f32,
        width: f32,
        rng: &mut impl Rng,
    ) -> Self {
        match kind {
            PlatformKind::Normal => Self::normal(id, x, y, width),
            PlatformKind::Ice => Self::ice(id, x, y, width),
            PlatformKind::Breakable => Self::breakable(id, x, y, width),
            PlatformKind::Moving => Self::moving(id, x, width, Oscillation::random(y, rng)),
        }
    }

    pub fn kind(&self) -> PlatformKind {
        match self.state {
            PlatformState::Normal => PlatformKind::Normal,
            PlatformState::Ice => PlatformKind::Ice,
            PlatformState::Moving(_) => PlatformKind::Moving,
            PlatformState::Breakable(_) => PlatformKind::Breakable,
        }
    }

    #[inline]
    pub fn friction(&self) -> f32 {
        self.kind().friction()
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, PLATFORM_HEIGHT)
    }

    /// Vertical displacement during the last update (positive = moving down)
    #[inline]
    pub fn delta_y(&self) -> f32 {
        self.pos.y - self.prev_y
    }

    /// Advance one tick and shift down by `scroll`
    pub fn update(&mut self, scroll: f32) {
        self.prev_y = self.pos.y;
        match &mut self.state {
            PlatformState::Moving(osc) => {
                osc.origin_y += scroll;
                osc.phase += osc.angular_speed;
                self.pos.y = osc.current_y();
            }
            PlatformState::Breakable(state) => {
                self.pos.y += scroll;
                if let BreakState::Breaking { timer } = state {
                    *timer += 1;
                    if *timer >= BREAK_TIME_TICKS {
                        *state = BreakState::Removable;
                    }
                }
            }
            PlatformState::Normal | PlatformState::Ice => {
                self.pos.y += scroll;
            }
        }
    }

    /// Landing hook. Returns true if this landing started a break countdown.
    pub fn on_landing(&mut self) -> bool {
        match &mut self.state {
            PlatformState::Breakable(state) if *state == BreakState::Idle => {
                *state = BreakState::Breaking { timer: 0 };
                true
            }
            _ => false,
        }
    }

    /// Breakable platforms whose countdown finished
    pub fn should_remove(&self) -> bool {
        matches!(self.state, PlatformState::Breakable(BreakState::Removable))
    }

    /// Break countdown progress in [0, 1] (0 for everything not breaking)
    pub fn break_progress(&self) -> f32 {
        match self.state {
            PlatformState::Breakable(BreakState::Breaking { timer }) => {
                (timer as f32 / BREAK_TIME_TICKS as f32).min(1.0)
            }
            PlatformState::Breakable(BreakState::Removable) => 1.0,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_scroll_shifts_static_platforms() {
        let mut p = Platform::normal(1, 50.0, 100.0, PLATFORM_WIDTH);
        p.update(5.0);
        assert_eq!(p.y(), 105.0);
        assert_eq!(p.prev_y, 100.0);
        assert_eq!(p.delta_y(), 5.0);
    }

    #[test]
    fn test_friction_by_kind() {
        assert_eq!(PlatformKind::Normal.friction(), 0.85);
        assert_eq!(PlatformKind::Ice.friction(), 0.98);
        assert_eq!(PlatformKind::Breakable.friction(), 0.85);
    }

    #[test]
    fn test_breakable_state_machine() {
        let mut p = Platform::breakable(1, 0.0, 300.0, PLATFORM_WIDTH);

        // Time alone never breaks an untouched platform
        for _ in 0..(BREAK_TIME_TICKS * 2) {
            p.update(0.0);
        }
        assert!(!p.should_remove());
        assert_eq!(p.state, PlatformState::Breakable(BreakState::Idle));

        assert!(p.on_landing());
        // Second landing does not restart the countdown
        p.update(0.0);
        assert!(!p.on_landing());
        assert_eq!(
            p.state,
            PlatformState::Breakable(BreakState::Breaking { timer: 1 })
        );

        for _ in 1..(BREAK_TIME_TICKS - 1) {
            p.update(0.0);
        }
        assert!(!p.should_remove());
        p.update(0.0);
        assert!(p.should_remove());
        assert_eq!(p.break_progress(), 1.0);
    }

    #[test]
    fn test_non_breakable_never_removed() {
        let mut rng = Pcg32::seed_from_u64(7);
        for kind in [PlatformKind::Normal, PlatformKind::Ice, PlatformKind::Moving] {
            let mut p = Platform::spawn(kind, 1, 0.0, 200.0, PLATFORM_WIDTH, &mut rng);
            assert!(!p.on_landing());
            for _ in 0..500 {
                p.update(0.0);
            }
            assert!(!p.should_remove());
            assert_eq!(p.kind(), kind);
        }
    }

    #[test]
    fn test_moving_random_parameters_in_range() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..200 {
            let osc = Oscillation::random(0.0, &mut rng);
            assert!((30.0..=60.0).contains(&osc.amplitude));
            assert!((0.02..0.04).contains(&osc.angular_speed));
            assert!((0.0..std::f32::consts::TAU).contains(&osc.phase));
        }
    }

    #[test]
    fn test_moving_tracks_previous_y() {
        let osc = Oscillation {
            origin_y: 200.0,
            amplitude: 40.0,
            angular_speed: 0.03,
            phase: 0.0,
        };
        let mut p = Platform::moving(1, 0.0, PLATFORM_WIDTH, osc);
        assert_eq!(p.y(), 200.0);
        p.update(0.0);
        let expected = 200.0 + 0.03f32.sin() * 40.0;
        assert!((p.y() - expected).abs() < 1e-4);
        assert_eq!(p.prev_y, 200.0);
        assert!(p.delta_y() > 0.0);
    }

    #[test]
    fn test_moving_bounded_over_1000_ticks() {
        let osc = Oscillation {
            origin_y: 250.0,
            amplitude: 40.0,
            angular_speed: 0.03,
            phase: 0.0,
        };
        let mut p = Platform::moving(1, 0.0, PLATFORM_WIDTH, osc);
        let mut origin = 250.0;
        for tick in 0..1000 {
            // Scroll on every third tick
            let scroll = if tick % 3 == 0 { SCROLL_SPEED } else { 0.0 };
            origin += scroll;
            p.update(scroll);
            assert!(p.y() >= origin - 40.0 - 1e-3, "tick {tick}: {}", p.y());
            assert!(p.y() <= origin + 40.0 + 1e-3, "tick {tick}: {}", p.y());
        }
    }

    proptest! {
        #[test]
        fn prop_moving_stays_within_amplitude(
            amplitude in 30.0f32..=60.0,
            speed in 0.02f32..0.04,
            phase in 0.0f32..std::f32::consts::TAU,
            ticks in 1usize..2000,
        ) {
            let osc = Oscillation { origin_y: 0.0, amplitude, angular_speed: speed, phase };
            let mut p = Platform::moving(1, 0.0, PLATFORM_WIDTH, osc);
            for _ in 0..ticks {
                p.update(0.0);
                prop_assert!(p.y().abs() <= amplitude + 1e-3);
            }
        }
    }
}
