//! Demo autopilot that plays the game through ordinary input events
//!
//! Used by the headless runner and for attract-mode style demos. It only sees
//! what a player would see and only acts through [`InputEvent`]s, so runs it
//! drives stay deterministic for a given seed.

use glam::Vec2;

use super::platform::Platform;
use super::state::{GamePhase, GameState};
use super::tick::{InputEvent, TickInput};
use crate::consts::*;

/// Extra height to clear above the target platform's top
const CLEARANCE: f32 = 15.0;
/// Targets closer than this above the player's feet are ignored
const MIN_RISE: f32 = 20.0;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// Charge to reach before releasing, while a press is held
    pending: Option<PendingJump>,
}

#[derive(Debug, Clone, Copy)]
struct PendingJump {
    charge: f32,
    aim: Vec2,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input for the next tick
    pub fn next_input(&mut self, state: &GameState) -> TickInput {
        if state.phase != GamePhase::Playing {
            self.pending = None;
            return TickInput::default();
        }

        let player = &state.player;
        if let Some(jump) = self.pending {
            if !player.charging {
                // Knocked off or the platform broke mid-charge
                self.pending = None;
            } else if player.charge >= jump.charge {
                self.pending = None;
                return TickInput::new([InputEvent::Release { aim: jump.aim }]);
            } else {
                return TickInput::new([InputEvent::Aim { aim: jump.aim }]);
            }
        }

        // Let ice slides settle before winding up
        if !player.grounded || player.vel.x.abs() > 0.5 {
            return TickInput::default();
        }

        let Some(jump) = plan_jump(state) else {
            return TickInput::default();
        };
        self.pending = Some(jump);
        TickInput::new([InputEvent::Press { aim: jump.aim }])
    }
}

/// Pick the nearest reachable platform above and work out charge and aim
fn plan_jump(state: &GameState) -> Option<PendingJump> {
    let player = &state.player;
    let feet = player.bottom();
    // Highest point a full charge reaches, counted from the feet
    let reach = MAX_CHARGE * MAX_CHARGE / (2.0 * GRAVITY) - CLEARANCE;

    let target = state
        .field
        .platforms()
        .iter()
        .filter(|p| Some(p.id) != player.current_platform)
        .filter(|p| {
            let rise = feet - p.y();
            rise >= MIN_RISE && rise <= reach
        })
        .max_by(|a, b| a.y().total_cmp(&b.y()))?;

    let rise = feet - target.y() + CLEARANCE;
    let launch_speed = (2.0 * GRAVITY * rise).sqrt();
    let charge = (launch_speed + CHARGE_RATE).min(MAX_CHARGE);

    Some(PendingJump {
        charge,
        aim: Vec2::new(aim_x(player.center().x, target, charge, rise), target.y()),
    })
}

/// Aim point that carries the body centre over the target's centre by the
/// time the jump comes back down to the target's top
fn aim_x(center_x: f32, target: &Platform, charge: f32, rise: f32) -> f32 {
    let wanted = (target.x() + target.width / 2.0) - center_x;
    let descent = (charge * charge - 2.0 * GRAVITY * (rise - CLEARANCE)).max(0.0).sqrt();
    let air_ticks = ((charge + descent) / GRAVITY).max(1.0);
    let dx = wanted / (JUMP_HORIZONTAL_FACTOR * air_ticks);
    center_x + dx.clamp(-MAX_HORIZONTAL_DISTANCE, MAX_HORIZONTAL_DISTANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::GameMode;
    use crate::sim::tick::{TickOutcome, tick};

    #[test]
    fn test_waits_while_airborne() {
        let state = GameState::new(GameMode::Normal, 1).unwrap();
        let mut pilot = Autopilot::new();
        assert!(pilot.next_input(&state).events.is_empty());
    }

    #[test]
    fn test_presses_then_releases() {
        let mut state = GameState::new(GameMode::Normal, 1).unwrap();
        for _ in 0..30 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.player.grounded);

        let mut pilot = Autopilot::new();
        let first = pilot.next_input(&state);
        assert!(matches!(first.events[..], [InputEvent::Press { .. }]));
        tick(&mut state, &first);

        let mut released = false;
        for _ in 0..60 {
            let input = pilot.next_input(&state);
            if matches!(input.events[..], [InputEvent::Release { .. }]) {
                released = true;
            }
            tick(&mut state, &input);
            if released {
                break;
            }
        }
        assert!(released);
        assert!(state.player.jumping);
    }

    #[test]
    fn test_autopilot_scores_in_normal_mode() {
        let mut state = GameState::new(GameMode::Normal, 2024).unwrap();
        let mut pilot = Autopilot::new();
        for _ in 0..3000 {
            let input = pilot.next_input(&state);
            if let TickOutcome::FellOff { .. } = tick(&mut state, &input) {
                break;
            }
        }
        assert!(state.score > 0);
    }
}
