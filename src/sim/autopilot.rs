//! Idle/demo mode - a simple AI that plays the arena
//!
//! Produces pointer intent only; it never touches state directly.

use super::state::GameState;
use crate::tuning::Tuning;

/// Where a descending ball will cross `line_y`, folding side-wall reflections
pub fn predict_landing_x(state: &GameState, tuning: &Tuning, line_y: f32) -> Option<f32> {
    let ball = &state.ball;
    if ball.is_stuck() || ball.vel.y <= 0.0 || ball.pos.y > line_y {
        return None;
    }

    let t = (line_y - ball.pos.y) / ball.vel.y;
    let raw_x = ball.pos.x + ball.vel.x * t;

    // Unfold the bounces between the two walls
    let span = (tuning.arena_width - 2.0 * ball.radius).max(1.0);
    let mut m = (raw_x - ball.radius).rem_euclid(2.0 * span);
    if m > span {
        m = 2.0 * span - m;
    }
    Some(ball.radius + m)
}

/// Pointer x the autopilot wants this frame
pub fn target_x(state: &GameState, tuning: &Tuning) -> f32 {
    let ball = &state.ball;
    if ball.is_stuck() {
        return state.paddle.center_x();
    }

    let line_y = state.paddle.y - ball.radius;
    match predict_landing_x(state, tuning, line_y) {
        Some(x) => {
            // Oscillating aim offset so rebounds don't repeat the same path
            let t = state.time;
            let aim = (t * 0.7).sin() * 0.45 + (t * 1.9).sin() * 0.2;
            x - aim * state.paddle.width / 2.0
        }
        // Rising: shadow the ball
        None => ball.pos.x,
    }
}

/// Whether the autopilot would launch now
pub fn wants_launch(state: &GameState) -> bool {
    state.phase.awaiting_launch() && !state.paused
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BallState, GamePhase};
    use glam::Vec2;

    fn flying(pos: Vec2, vel: Vec2) -> (GameState, Tuning) {
        let tuning = Tuning::default();
        let mut state = GameState::new(&tuning, 0.0);
        state.ball.state = BallState::Free;
        state.ball.pos = pos;
        state.ball.vel = vel;
        state.ball.speed = vel.length();
        state.phase = GamePhase::Playing;
        (state, tuning)
    }

    #[test]
    fn test_straight_drop() {
        let (state, tuning) = flying(Vec2::new(100.0, 300.0), Vec2::new(0.0, 200.0));
        let x = predict_landing_x(&state, &tuning, 593.0).unwrap();
        assert!((x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_folds_wall_bounce() {
        // Heads right at 45 degrees, hits the right wall and comes back
        let (state, tuning) = flying(Vec2::new(400.0, 300.0), Vec2::new(200.0, 200.0));
        let line_y = 400.0;
        let x = predict_landing_x(&state, &tuning, line_y).unwrap();
        let r = state.ball.radius;
        let wall = tuning.arena_width - r;
        // Unreflected x would be 500; mirrored about the wall
        assert!((x - (wall - (500.0 - wall))).abs() < 1e-3);
    }

    #[test]
    fn test_rising_ball_has_no_landing() {
        let (state, tuning) = flying(Vec2::new(100.0, 300.0), Vec2::new(50.0, -200.0));
        assert!(predict_landing_x(&state, &tuning, 593.0).is_none());
        assert_eq!(target_x(&state, &tuning), 100.0);
    }

    #[test]
    fn test_target_stays_near_landing() {
        let (state, tuning) = flying(Vec2::new(240.0, 300.0), Vec2::new(30.0, 200.0));
        let line_y = state.paddle.y - state.ball.radius;
        let landing = predict_landing_x(&state, &tuning, line_y).unwrap();
        let target = target_x(&state, &tuning);
        assert!((target - landing).abs() <= state.paddle.width / 2.0);
    }

    #[test]
    fn test_wants_launch_only_when_stuck() {
        let tuning = Tuning::default();
        let state = GameState::new(&tuning, 0.0);
        assert!(wants_launch(&state));
        let (flying_state, _) = flying(Vec2::new(100.0, 300.0), Vec2::new(0.0, 200.0));
        assert!(!wants_launch(&flying_state));
    }
}
