//! Game state and core simulation types
//!
//! Everything a renderer or HUD reads lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::stage;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball stuck to paddle, waiting for launch input
    Serve,
    /// Active gameplay
    Playing,
    /// Stage just cleared; ball stuck on the next layout, waiting for launch
    StageCleared,
    /// Run ended
    GameOver,
}

impl GamePhase {
    /// Phases where the ball rests on the paddle
    pub fn awaiting_launch(self) -> bool {
        matches!(self, GamePhase::Serve | GamePhase::StageCleared)
    }
}

/// Ball state - stuck to paddle or free-moving
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallState {
    /// Resting on the paddle at a horizontal offset from its center
    Stuck { offset: f32 },
    /// In flight
    Free,
}

/// Discrete key intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaddleDirection {
    Left,
    Right,
    #[default]
    None,
}

impl PaddleDirection {
    pub fn sign(self) -> f32 {
        match self {
            PaddleDirection::Left => -1.0,
            PaddleDirection::Right => 1.0,
            PaddleDirection::None => 0.0,
        }
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Center
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Scalar speed; `|vel| == speed` whenever the ball is free
    pub speed: f32,
    pub state: BallState,
    /// Simulation time (seconds) of the last speed increase
    pub last_speed_up: f32,
}

impl Ball {
    pub fn new(radius: f32, speed: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius,
            speed,
            state: BallState::Stuck { offset: 0.0 },
            last_speed_up: 0.0,
        }
    }

    pub fn is_stuck(&self) -> bool {
        matches!(self.state, BallState::Stuck { .. })
    }

    /// Pin a stuck ball above the paddle
    pub fn update_stuck(&mut self, paddle: &Paddle, lift: f32) {
        if let BallState::Stuck { offset } = self.state {
            self.pos = Vec2::new(
                paddle.center_x() + offset,
                paddle.y - self.radius - lift,
            );
        }
    }

    /// Stick the ball back on the paddle
    pub fn stick(&mut self, paddle: &Paddle, offset: f32, speed: f32, lift: f32) {
        self.state = BallState::Stuck { offset };
        self.vel = Vec2::ZERO;
        self.speed = speed;
        self.update_stuck(paddle, lift);
    }

    /// Change scalar speed without changing direction
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
        if !self.is_stuck() {
            self.vel = self.vel.normalize_or(Vec2::NEG_Y) * speed;
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    /// Top edge (fixed)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Discrete key speed (pixels/s)
    pub speed: f32,
}

impl Paddle {
    /// A paddle sized for `stage`, centered in the arena
    pub fn for_stage(tuning: &Tuning, stage: u32) -> Self {
        let width = stage::paddle_width_for_stage(tuning, stage);
        Self {
            x: (tuning.arena_width - width) / 2.0,
            y: tuning.paddle_y(),
            width,
            height: tuning.paddle_height,
            speed: tuning.paddle_speed,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Keep the paddle inside `[0, arena_width - width]`
    pub fn clamp_to(&mut self, arena_width: f32) {
        self.x = self.x.clamp(0.0, (arena_width - self.width).max(0.0));
    }

    /// Ease toward a pointer target (paddle center), frame-rate independent
    pub fn move_toward(&mut self, target_center: f32, dt: f32, rate: f32, arena_width: f32) {
        let max_x = (arena_width - self.width).max(0.0);
        let target = (target_center - self.width / 2.0).clamp(0.0, max_x);
        if rate <= 0.0 {
            self.x = target;
        } else {
            let t = 1.0 - (-rate * dt).exp();
            self.x += (target - self.x) * t;
        }
        self.clamp_to(arena_width);
    }

    /// Constant-speed key movement
    pub fn move_by(&mut self, direction: PaddleDirection, dt: f32, arena_width: f32) {
        self.x += direction.sign() * self.speed * dt;
        self.clamp_to(arena_width);
    }
}

/// A brick entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    /// Creation order within the stage
    pub id: u32,
    pub rect: Rect,
    pub hp: u8,
    pub max_hp: u8,
}

impl Brick {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_reinforced(&self) -> bool {
        self.max_hp > 1
    }
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Launched,
    WallBounce,
    /// `offset` is the normalized hit position, -1 (left edge) to 1 (right edge)
    PaddleHit { offset: f32 },
    BrickDamaged { id: u32, hp: u8, points: u64 },
    BrickDestroyed { id: u32, points: u64 },
    SpeedUp { speed: f32 },
    LifeLost { lives: u8 },
    StageCleared { stage: u32, bonus: u64 },
    RunOver { score: u64, stage: u32 },
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Current stage (1-based)
    pub stage: u32,
    /// Index into the tuning's pattern table for the current layout
    pub pattern_index: usize,
    pub lives: u8,
    pub score: u64,
    pub phase: GamePhase,
    pub paused: bool,
    /// Simulation clock (seconds of advanced time)
    pub time: f32,
    pub paddle: Paddle,
    pub ball: Ball,
    /// Live bricks in creation order
    pub bricks: Vec<Brick>,
    /// Events produced by the latest tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh run on stage 1 with the ball stuck at `serve_offset`
    pub fn new(tuning: &Tuning, serve_offset: f32) -> Self {
        let paddle = Paddle::for_stage(tuning, 1);
        let mut ball = Ball::new(tuning.ball_radius, stage::ball_speed_for_stage(tuning, 1));
        ball.stick(&paddle, serve_offset, ball.speed, tuning.ball_stuck_lift);

        Self {
            stage: 1,
            pattern_index: 0,
            lives: tuning.starting_lives,
            score: 0,
            phase: GamePhase::Serve,
            paused: false,
            time: 0.0,
            paddle,
            ball,
            bricks: stage::build_bricks(&tuning.patterns[0], tuning),
            events: Vec::new(),
        }
    }

    /// Put the ball back on the paddle with the stage's base speed
    pub fn restick_ball(&mut self, tuning: &Tuning, serve_offset: f32) {
        let speed = stage::ball_speed_for_stage(tuning, self.stage);
        self.ball
            .stick(&self.paddle, serve_offset, speed, tuning.ball_stuck_lift);
    }

    pub fn live_bricks(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter().filter(|b| b.is_alive())
    }

    pub fn is_stage_clear(&self) -> bool {
        self.live_bricks().next().is_none()
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let tuning = Tuning::default();
        let state = GameState::new(&tuning, 0.0);
        assert_eq!(state.stage, 1);
        assert_eq!(state.lives, tuning.starting_lives);
        assert_eq!(state.phase, GamePhase::Serve);
        assert!(state.ball.is_stuck());
        assert_eq!(state.bricks.len(), tuning.patterns[0].brick_count());
        assert_eq!(state.paddle.width, tuning.paddle_width);
    }

    #[test]
    fn test_stuck_ball_follows_paddle() {
        let tuning = Tuning::default();
        let mut state = GameState::new(&tuning, 12.0);
        state.paddle.x = 10.0;
        state.ball.update_stuck(&state.paddle, 1.0);
        assert_eq!(state.ball.pos.x, state.paddle.center_x() + 12.0);
        assert_eq!(state.ball.pos.y, state.paddle.y - state.ball.radius - 1.0);
    }

    #[test]
    fn test_paddle_move_toward_clamps() {
        let tuning = Tuning::default();
        let mut paddle = Paddle::for_stage(&tuning, 1);
        for _ in 0..200 {
            paddle.move_toward(-500.0, 1.0 / 60.0, 12.0, tuning.arena_width);
        }
        assert!(paddle.x.abs() < 0.01);
        paddle.move_toward(10_000.0, 1.0 / 60.0, 0.0, tuning.arena_width);
        assert_eq!(paddle.x, tuning.arena_width - paddle.width);
    }

    #[test]
    fn test_paddle_move_by() {
        let tuning = Tuning::default();
        let mut paddle = Paddle::for_stage(&tuning, 1);
        let start = paddle.x;
        paddle.move_by(PaddleDirection::Right, 0.1, tuning.arena_width);
        assert!((paddle.x - (start + paddle.speed * 0.1)).abs() < 1e-3);
        paddle.move_by(PaddleDirection::Left, 10.0, tuning.arena_width);
        assert_eq!(paddle.x, 0.0);
    }

    #[test]
    fn test_set_speed_keeps_direction() {
        let mut ball = Ball::new(7.0, 100.0);
        ball.state = BallState::Free;
        ball.vel = Vec2::new(60.0, -80.0);
        ball.set_speed(200.0);
        assert!((ball.vel - Vec2::new(120.0, -160.0)).length() < 1e-3);
    }
}
