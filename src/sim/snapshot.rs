//! Read-only frame views for renderers and HUDs

use glam::Vec2;
use serde::Serialize;

use super::platform::{PlatformId, PlatformKind};
use super::player::AnimState;
use super::state::{GamePhase, GameState};

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub size: f32,
    pub anim: AnimState,
    pub facing_right: bool,
    pub charge_fraction: f32,
    /// Jump preview, empty unless charging
    pub trajectory: Vec<Vec2>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformView {
    pub id: PlatformId,
    pub pos: Vec2,
    pub width: f32,
    pub kind: PlatformKind,
    pub sprite: &'static str,
    /// Breakable countdown, 0..=1
    pub break_progress: f32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub coins: u32,
    pub difficulty: f32,
    pub player: PlayerView,
    pub platforms: Vec<PlatformView>,
    pub coin_positions: Vec<Vec2>,
}

impl GameState {
    pub fn snapshot(&self) -> FrameSnapshot {
        let player = &self.player;
        FrameSnapshot {
            phase: self.phase,
            score: self.score,
            coins: self.coins,
            difficulty: self.difficulty(),
            player: PlayerView {
                pos: player.pos,
                size: player.size,
                anim: player.anim_state(),
                facing_right: player.facing_right,
                charge_fraction: player.charge_fraction(),
                trajectory: if self.show_trajectory {
                    player.predict_trajectory(self.aim_x)
                } else {
                    Vec::new()
                },
            },
            platforms: self
                .field
                .platforms()
                .iter()
                .map(|p| PlatformView {
                    id: p.id,
                    pos: p.pos,
                    width: p.width,
                    kind: p.kind(),
                    sprite: p.kind().sprite_name(),
                    break_progress: p.break_progress(),
                })
                .collect(),
            coin_positions: self.field.coins().iter().map(|c| c.pos).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use crate::mode::GameMode;
    use crate::sim::state::GameState;
    use crate::sim::tick::{InputEvent, TickInput, tick};

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(GameMode::Normal, 5).unwrap();
        let snap = state.snapshot();
        assert_eq!(snap.platforms.len(), state.field.platforms().len());
        assert!(snap.player.trajectory.is_empty());

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["phase"], "Playing");
        assert_eq!(json["platforms"][0]["kind"], "Normal");
        assert_eq!(json["platforms"][0]["sprite"], "normal_platform.png");
    }

    #[test]
    fn test_trajectory_follows_setting() {
        let mut state = GameState::new(GameMode::Normal, 5).unwrap();
        for _ in 0..30 {
            tick(&mut state, &TickInput::default());
        }
        let aim = Vec2::new(300.0, 100.0);
        tick(&mut state, &TickInput::new([InputEvent::Press { aim }]));
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.player.charging);
        assert!(!state.snapshot().player.trajectory.is_empty());

        state.show_trajectory = false;
        assert!(state.snapshot().player.trajectory.is_empty());
    }
}
