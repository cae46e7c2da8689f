//! Brick Arena - a Breakout arena simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (paddle, ball, bricks, collisions, run state)
//! - `tuning`: Data-driven game balance and stage patterns
//!
//! Rendering, input plumbing and HUD live outside this crate. They talk to
//! [`sim::Arena`] through intent setters, `advance(dt)` and [`sim::Snapshot`].

pub mod sim;
pub mod tuning;

pub use sim::{Arena, GameEvent, GamePhase, PaddleDirection, Snapshot};
pub use tuning::{Cell, StagePattern, Tuning, TuningError};

/// Game configuration defaults (overridable through [`Tuning`])
pub mod consts {
    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 480.0;
    pub const ARENA_HEIGHT: f32 = 640.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 80.0;
    pub const PADDLE_MIN_WIDTH: f32 = 56.0;
    /// Width lost per stage after the first
    pub const PADDLE_SHRINK_PER_STAGE: f32 = 4.0;
    pub const PADDLE_HEIGHT: f32 = 12.0;
    /// Distance from the arena bottom to the paddle top
    pub const PADDLE_BOTTOM_OFFSET: f32 = 40.0;
    /// Discrete key speed (pixels/s)
    pub const PADDLE_SPEED: f32 = 480.0;
    /// Pointer smoothing rate (1/s)
    pub const PADDLE_SMOOTHING: f32 = 12.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 7.0;
    pub const BALL_START_SPEED: f32 = 260.0;
    pub const BALL_SPEED_PER_STAGE: f32 = 28.0;
    pub const BALL_MAX_SPEED: f32 = 620.0;
    /// Gap between the stuck ball and the paddle top
    pub const BALL_STUCK_LIFT: f32 = 1.0;

    /// Speed ramp while in flight
    pub const SPEED_RAMP_INTERVAL: f32 = 3.0;
    pub const SPEED_RAMP_STEP: f32 = 15.0;
    /// Speed multiplier on every paddle hit
    pub const PADDLE_HIT_SPEEDUP: f32 = 1.02;

    /// Reflection angles (degrees from the upward vertical)
    pub const PADDLE_MAX_BOUNCE_DEG: f32 = 60.0;
    pub const LAUNCH_MAX_DEG: f32 = 30.0;
    /// Angle floor (degrees from the horizontal)
    pub const MIN_ANGLE_FROM_HORIZONTAL_DEG: f32 = 15.0;
    /// Serve offset range as a fraction of the paddle half-width
    pub const SERVE_JITTER: f32 = 0.5;

    /// Run defaults
    pub const STARTING_LIVES: u8 = 3;
    pub const SCORE_BRICK_DESTROYED: u64 = 10;
    pub const SCORE_BRICK_DAMAGED: u64 = 5;
    pub const SCORE_STAGE_CLEAR: u64 = 100;

    /// Longest frame the simulation will integrate in one step (~30 FPS)
    pub const MAX_FRAME_DT: f32 = 0.033;

    /// Brick grid layout
    pub const BRICK_TOP: f32 = 70.0;
    pub const BRICK_MARGIN: f32 = 8.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
}
