//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::player::StepResult;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// A discrete input event, applied in order before physics
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer/button pressed: begin charging
    Press { aim: Vec2 },
    /// Pointer/button released: jump toward `aim`
    Release { aim: Vec2 },
    /// Pointer moved; only updates the trajectory preview
    Aim { aim: Vec2 },
    /// Start a new run after game over
    Restart,
    /// Leave to the menu after game over
    ExitToMenu,
    /// Leave the session from any phase
    Quit,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub events: Vec<InputEvent>,
}

impl TickInput {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running { scrolled: bool },
    /// The run ended during this tick
    FellOff { score: u64, coins: u32 },
    /// Game over; waiting for restart or exit
    Halted,
    Exited,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    for event in &input.events {
        apply_input(state, *event);
    }

    match state.phase {
        GamePhase::GameOver => return TickOutcome::Halted,
        GamePhase::Exited => return TickOutcome::Exited,
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;

    let (scroll, landing) = match state.player.tick(state.field.platforms_mut()) {
        StepResult::FellOff => {
            state.phase = GamePhase::GameOver;
            state.scroll_speed = 0.0;
            state.push_event(GameEvent::FellOff { score: state.score });
            log::info!(
                "Game over in {} mode: score {}, coins {}",
                state.mode.as_str(),
                state.score,
                state.coins
            );
            return TickOutcome::FellOff {
                score: state.score,
                coins: state.coins,
            };
        }
        StepResult::Continue { scroll, landing } => (scroll, landing),
    };

    if let Some(landing) = landing {
        state.push_event(GameEvent::Landed { kind: landing.kind });
        if landing.started_break {
            state.push_event(GameEvent::BreakStarted {
                platform: landing.platform,
            });
        }
    }

    state.scroll_speed = if scroll { SCROLL_SPEED } else { 0.0 };
    if scroll {
        state.score += 1;
    }
    state.field.set_score(state.score);

    let report = state.field.step(state.scroll_speed);
    for platform in report.broken {
        state.push_event(GameEvent::PlatformBroke { platform });
    }

    let collected = state.field.collect_coins(&state.player.rect());
    if collected > 0 {
        state.coins += collected;
        state.push_event(GameEvent::CoinCollected {
            run_total: state.coins,
        });
    }

    TickOutcome::Running { scrolled: scroll }
}

fn apply_input(state: &mut GameState, event: InputEvent) {
    match (state.phase, event) {
        (GamePhase::Exited, _) => {}
        (_, InputEvent::Quit) => {
            state.phase = GamePhase::Exited;
            state.push_event(GameEvent::Quit);
        }
        (_, InputEvent::Aim { aim }) => {
            state.aim_x = aim.x;
            state.player.aim_at(aim.x);
        }
        (GamePhase::Playing, InputEvent::Press { aim }) => {
            state.aim_x = aim.x;
            state.player.start_charge();
            state.player.aim_at(aim.x);
        }
        (GamePhase::Playing, InputEvent::Release { aim }) => {
            state.aim_x = aim.x;
            if state.player.release_jump(aim.x) {
                state.push_event(GameEvent::Jumped);
            }
        }
        (GamePhase::GameOver, InputEvent::Restart) => state.restart(),
        (GamePhase::GameOver, InputEvent::ExitToMenu) => {
            state.phase = GamePhase::Exited;
            state.push_event(GameEvent::ExitedToMenu);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::GameMode;

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn run_until_game_over(state: &mut GameState, max_ticks: u32) -> Option<TickOutcome> {
        for _ in 0..max_ticks {
            let outcome = tick(state, &idle());
            if matches!(outcome, TickOutcome::FellOff { .. }) {
                return Some(outcome);
            }
        }
        None
    }

    #[test]
    fn test_idle_player_stays_on_start_platform() {
        let mut state = GameState::new(GameMode::Normal, 42).unwrap();
        for _ in 0..300 {
            assert_eq!(tick(&mut state, &idle()), TickOutcome::Running { scrolled: false });
        }
        assert!(state.player.grounded);
        assert_eq!(state.score, 0);
        assert_eq!(state.time_ticks, 300);
    }

    #[test]
    fn test_game_over_is_sticky() {
        let mut state = GameState::new(GameMode::Normal, 42).unwrap();
        state.player.pos.y = SCREEN_HEIGHT + 5.0;
        state.player.grounded = false;
        state.player.current_platform = None;

        let outcome = run_until_game_over(&mut state, 10).unwrap();
        assert_eq!(outcome, TickOutcome::FellOff { score: 0, coins: 0 });
        assert_eq!(state.phase, GamePhase::GameOver);

        let events = state.drain_events();
        let fell = events
            .iter()
            .filter(|e| matches!(e, GameEvent::FellOff { .. }))
            .count();
        assert_eq!(fell, 1);

        // Nothing moves after the run ends, and movement inputs are ignored
        let player_pos = state.player.pos;
        let ticks = state.time_ticks;
        let first_platform = state.field.platforms()[0].pos;
        let press = TickInput::new([
            InputEvent::Press { aim: Vec2::ZERO },
            InputEvent::Release { aim: Vec2::ZERO },
        ]);
        for _ in 0..20 {
            assert_eq!(tick(&mut state, &press), TickOutcome::Halted);
        }
        assert_eq!(state.player.pos, player_pos);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.field.platforms()[0].pos, first_platform);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = GameState::new(GameMode::Ice, 7).unwrap();
        state.player.pos.y = SCREEN_HEIGHT + 5.0;
        state.player.grounded = false;
        state.player.current_platform = None;
        run_until_game_over(&mut state, 10).unwrap();

        let outcome = tick(&mut state, &TickInput::new([InputEvent::Restart]));
        assert_eq!(outcome, TickOutcome::Running { scrolled: false });
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert!(state.drain_events().contains(&GameEvent::Restarted));
    }

    #[test]
    fn test_restart_ignored_while_playing() {
        let mut state = GameState::new(GameMode::Normal, 7).unwrap();
        state.drain_events();
        tick(&mut state, &TickInput::new([InputEvent::Restart]));
        assert!(!state.drain_events().contains(&GameEvent::Restarted));
    }

    #[test]
    fn test_exit_to_menu_after_game_over() {
        let mut state = GameState::new(GameMode::Normal, 7).unwrap();
        state.player.pos.y = SCREEN_HEIGHT + 5.0;
        state.player.grounded = false;
        state.player.current_platform = None;
        run_until_game_over(&mut state, 10).unwrap();

        let outcome = tick(&mut state, &TickInput::new([InputEvent::ExitToMenu]));
        assert_eq!(outcome, TickOutcome::Exited);
        assert_eq!(state.phase, GamePhase::Exited);
        // Restart no longer applies once exited
        assert_eq!(
            tick(&mut state, &TickInput::new([InputEvent::Restart])),
            TickOutcome::Exited
        );
    }

    #[test]
    fn test_quit_from_playing() {
        let mut state = GameState::new(GameMode::Normal, 7).unwrap();
        let outcome = tick(&mut state, &TickInput::new([InputEvent::Quit]));
        assert_eq!(outcome, TickOutcome::Exited);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_press_release_jumps() {
        let mut state = GameState::new(GameMode::Normal, 3).unwrap();
        for _ in 0..30 {
            tick(&mut state, &idle());
        }
        assert!(state.player.grounded);
        state.drain_events();
        let aim = Vec2::new(SCREEN_WIDTH / 2.0, 0.0);

        tick(&mut state, &TickInput::new([InputEvent::Press { aim }]));
        for _ in 0..10 {
            tick(&mut state, &idle());
        }
        assert!(state.player.charge > 0.0);

        tick(&mut state, &TickInput::new([InputEvent::Release { aim }]));
        assert!(state.player.jumping);
        assert!(state.player.vel.y < 0.0);
        assert!(state.drain_events().contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_scrolling_scores_one_per_tick() {
        let mut state = GameState::new(GameMode::Normal, 11).unwrap();
        // Hold the player high up in mid-air
        state.player.grounded = false;
        state.player.current_platform = None;
        state.player.pos.y = 50.0;
        state.player.vel.y = -10.0;

        let outcome = tick(&mut state, &idle());
        assert_eq!(outcome, TickOutcome::Running { scrolled: true });
        assert_eq!(state.score, 1);
        assert_eq!(state.scroll_speed, SCROLL_SPEED);
    }

    #[test]
    fn test_same_seed_same_run() {
        let script = |state: &mut GameState| {
            let aim = Vec2::new(300.0, 100.0);
            let mut trace = Vec::new();
            for i in 0..600u32 {
                let events = match i % 60 {
                    0 => vec![InputEvent::Press { aim }],
                    30 => vec![InputEvent::Release { aim }],
                    _ => Vec::new(),
                };
                tick(state, &TickInput::new(events));
                trace.push((state.player.pos, state.score));
            }
            trace
        };

        let mut a = GameState::new(GameMode::Normal, 99).unwrap();
        let mut b = GameState::new(GameMode::Normal, 99).unwrap();
        assert_eq!(script(&mut a), script(&mut b));
        let ids_a: Vec<_> = a.field.platforms().iter().map(|p| (p.id, p.pos)).collect();
        let ids_b: Vec<_> = b.field.platforms().iter().map(|p| (p.id, p.pos)).collect();
        assert_eq!(ids_a, ids_b);
    }
}
