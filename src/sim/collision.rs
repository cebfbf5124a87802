//! Landing detection between the player box and platform tops
//!
//! Platforms are one-way: only the player's bottom edge is tested, against a
//! thin band at the top of each platform. A fast fall can skip the band in a
//! single tick, so a swept check compares the previous and current bottom edge.

use super::platform::Platform;
use crate::consts::PLATFORM_HEIGHT;
use crate::spans_overlap;

/// How the player's bottom edge met a platform this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Bottom edge lies inside the landing band `[top, top + PLATFORM_HEIGHT]`
    Band,
    /// Bottom edge crossed the whole band during the tick
    Swept,
}

/// Player extent needed for landing tests
#[derive(Debug, Clone, Copy)]
pub struct BodyProbe {
    pub left: f32,
    pub right: f32,
    /// Bottom edge after integration
    pub bottom: f32,
    /// Bottom edge at the start of the tick
    pub prev_bottom: f32,
}

/// Test a single platform for a landing contact
pub fn landing_contact(probe: &BodyProbe, platform: &Platform) -> Option<Contact> {
    if !spans_overlap(probe.left, probe.right, platform.x(), platform.right()) {
        return None;
    }

    let top = platform.y();
    let band_bottom = top + PLATFORM_HEIGHT;

    if probe.bottom >= top && probe.bottom <= band_bottom {
        return Some(Contact::Band);
    }

    if probe.prev_bottom < top && probe.bottom > band_bottom {
        return Some(Contact::Swept);
    }

    None
}
