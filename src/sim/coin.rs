//! Collectible coins hovering above streamed-in platforms

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
}

impl Coin {
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(x, y),
        }
    }

    /// Coin centred over a platform's top edge
    pub fn above(id: u32, platform_x: f32, platform_y: f32, platform_width: f32) -> Self {
        Self::new(
            id,
            platform_x + (platform_width - COIN_SIZE) / 2.0,
            platform_y - COIN_HOVER - COIN_SIZE,
        )
    }

    pub fn update(&mut self, scroll: f32) {
        self.pos.y += scroll;
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, COIN_SIZE, COIN_SIZE)
    }
}
