//! Player body: charge-and-release jumping, projectile motion, landings
//!
//! Discrete-time integration with one tick as the time step:
//!
//! ```text
//! vy[n+1] = min(vy[n] + GRAVITY, MAX_FALL_SPEED)
//! x[n+1]  = x[n] + vx[n+1]
//! y[n+1]  = y[n] + vy[n+1]
//! ```
//!
//! The supporting platform is held as a [`PlatformId`] and looked up again
//! every tick, so a platform removed between ticks simply stops supporting.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{BodyProbe, Contact, landing_contact};
use super::platform::{Platform, PlatformId, PlatformKind};
use crate::Rect;
use crate::consts::*;

/// Animation tag for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimState {
    Idle,
    Charging,
    Jumping,
    Sliding,
}

/// A new landing detected during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    pub platform: PlatformId,
    pub kind: PlatformKind,
    pub contact: Contact,
    /// The landing started a Breakable platform's countdown
    pub started_break: bool,
}

/// Result of one physics step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepResult {
    /// The player dropped below the bottom of the screen
    FellOff,
    Continue {
        /// Player is high enough that the camera should scroll
        scroll: bool,
        landing: Option<Landing>,
    },
}

/// The player's kinematic state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    /// Side of the square body
    pub size: f32,
    /// Stored jump power, `0..=MAX_CHARGE`
    pub charge: f32,
    pub charging: bool,
    pub jumping: bool,
    pub grounded: bool,
    /// Supporting platform as of the last tick
    pub current_platform: Option<PlatformId>,
    pub facing_right: bool,
    /// Screen extent used for clamping and the fall-off test
    bounds: Vec2,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl Player {
    /// Spawn centred horizontally, just above the start platform
    pub fn new(screen_width: f32, screen_height: f32) -> Self {
        Self {
            pos: Vec2::new(
                screen_width / 2.0 - PLAYER_SIZE / 2.0,
                screen_height - 150.0,
            ),
            vel: Vec2::ZERO,
            size: PLAYER_SIZE,
            charge: 0.0,
            charging: false,
            jumping: false,
            grounded: false,
            current_platform: None,
            facing_right: false,
            bounds: Vec2::new(screen_width, screen_height),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }

    /// Begin charging. Ignored while airborne.
    pub fn start_charge(&mut self) {
        if self.grounded {
            self.charging = true;
            self.charge = 0.0;
        }
    }

    /// Turn toward the aim point while winding up
    pub fn aim_at(&mut self, aim_x: f32) {
        if self.charging {
            self.facing_right = aim_x > self.center().x;
        }
    }

    /// Launch toward `aim_x`. Ignored unless charging on the ground.
    /// Returns true if a jump was launched.
    pub fn release_jump(&mut self, aim_x: f32) -> bool {
        if !(self.charging && self.grounded) {
            return false;
        }

        let dx = (aim_x - self.center().x).clamp(-MAX_HORIZONTAL_DISTANCE, MAX_HORIZONTAL_DISTANCE);
        self.vel.y = -self.charge;
        self.vel.x = dx * JUMP_HORIZONTAL_FACTOR;
        self.jumping = true;
        self.charging = false;
        self.charge = 0.0;
        true
    }

    /// Advance one tick against the current platform set
    pub fn tick(&mut self, platforms: &mut [Platform]) -> StepResult {
        let prev_y = self.pos.y;
        let prev_platform = self.current_platform;
        let was_grounded = self.grounded;

        // Gravity, capped so a fall never skips more than one band per tick
        self.vel.y = (self.vel.y + GRAVITY).min(MAX_FALL_SPEED);

        // Ground friction from whatever still supports us
        if was_grounded {
            let support = prev_platform.and_then(|id| platforms.iter().find(|p| p.id == id));
            if let Some(platform) = support {
                let retention = match platform.kind() {
                    PlatformKind::Moving => MOVING_FRICTION,
                    _ => platform.friction(),
                };
                self.vel.x *= retention;
                if self.vel.x.abs() < VELOCITY_SNAP {
                    self.vel.x = 0.0;
                }
            }
        }

        self.pos += self.vel;

        let max_x = self.bounds.x - self.size;
        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
            self.vel.x = 0.0;
        } else if self.pos.x > max_x {
            self.pos.x = max_x;
            self.vel.x = 0.0;
        }

        let landing = self.resolve_landing(platforms, prev_y, prev_platform, was_grounded);

        if self.charging && self.grounded {
            // Ride a Moving platform while winding up
            let support = self
                .current_platform
                .and_then(|id| platforms.iter().find(|p| p.id == id));
            if let Some(platform) = support.filter(|p| p.kind() == PlatformKind::Moving) {
                self.pos.y = platform.y() - self.size;
                self.vel.y = platform.delta_y();
            }
            self.charge = (self.charge + CHARGE_RATE).min(MAX_CHARGE);
        }

        if self.jumping && self.vel.x != 0.0 {
            self.facing_right = self.vel.x > 0.0;
        } else if !self.charging && self.grounded && self.vel.x.abs() > 1.0 {
            self.facing_right = self.vel.x > 0.0;
        }

        if self.pos.y > self.bounds.y {
            return StepResult::FellOff;
        }

        StepResult::Continue {
            scroll: self.pos.y < self.bounds.y / 2.0 - SCROLL_MARGIN,
            landing,
        }
    }

    /// First platform (in field order) the player lands on wins
    fn resolve_landing(
        &mut self,
        platforms: &mut [Platform],
        prev_y: f32,
        prev_platform: Option<PlatformId>,
        was_grounded: bool,
    ) -> Option<Landing> {
        self.grounded = false;
        self.current_platform = None;

        let probe = BodyProbe {
            left: self.pos.x,
            right: self.pos.x + self.size,
            bottom: self.bottom(),
            prev_bottom: prev_y + self.size,
        };

        for platform in platforms.iter_mut() {
            let resting_here = was_grounded && prev_platform == Some(platform.id);
            if !(self.vel.y > 0.0 || resting_here) {
                continue;
            }
            let Some(contact) = landing_contact(&probe, platform) else {
                continue;
            };

            self.grounded = true;
            self.jumping = false;
            self.current_platform = Some(platform.id);
            self.pos.y = platform.y() - self.size;

            let kind = platform.kind();
            self.vel.y = match (contact, kind) {
                (Contact::Band, PlatformKind::Moving) => {
                    let dy = platform.delta_y();
                    if dy < 0.0 {
                        dy * MOVING_RISE_BOOST
                    } else if dy > 0.0 {
                        dy
                    } else {
                        0.0
                    }
                }
                _ => 0.0,
            };

            if resting_here {
                return None;
            }

            let started_break = platform.on_landing();
            log::debug!(
                "Landed on {} platform {} ({:?})",
                kind.as_str(),
                platform.id,
                contact
            );
            return Some(Landing {
                platform: platform.id,
                kind,
                contact,
                started_break,
            });
        }

        None
    }

    /// Animation tag derived from the physics flags
    pub fn anim_state(&self) -> AnimState {
        if self.charging {
            AnimState::Charging
        } else if self.jumping {
            AnimState::Jumping
        } else if self.grounded && self.vel.x.abs() > 1.0 {
            AnimState::Sliding
        } else {
            AnimState::Idle
        }
    }

    /// Charge as a fraction of the maximum
    pub fn charge_fraction(&self) -> f32 {
        self.charge / MAX_CHARGE
    }

    /// Points of the jump that releasing now toward `aim_x` would produce,
    /// traced from the body centre. Empty unless charging on the ground.
    pub fn predict_trajectory(&self, aim_x: f32) -> Vec<Vec2> {
        if !(self.charging && self.grounded) {
            return Vec::new();
        }

        let mut point = self.center();
        let dx = (aim_x - point.x).clamp(-MAX_HORIZONTAL_DISTANCE, MAX_HORIZONTAL_DISTANCE);
        let mut vel = Vec2::new(dx * JUMP_HORIZONTAL_FACTOR, -self.charge);

        let mut points = Vec::with_capacity(TRAJECTORY_STEPS);
        for _ in 0..TRAJECTORY_STEPS {
            vel.y += GRAVITY;
            point += vel;
            let on_screen = point.x >= 0.0 && point.x <= self.bounds.x;
            if on_screen && point.y <= self.bounds.y + 400.0 {
                points.push(point);
            }
            if !on_screen || point.y > self.bounds.y + 500.0 {
                break;
            }
        }
        points
    }
}
