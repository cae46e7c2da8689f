//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame deltas only (clamped per tick)
//! - Seeded RNG only
//! - Stable iteration order (bricks by creation id)
//! - No rendering or platform dependencies

pub mod arena;
pub mod autopilot;
pub mod collision;
pub mod stage;
pub mod state;
pub mod tick;

pub use arena::{Arena, BallView, BrickView, Snapshot};
pub use collision::{Rect, circle_rect_overlap, enforce_angle};
pub use state::{Ball, BallState, Brick, GameEvent, GamePhase, GameState, Paddle, PaddleDirection};
pub use tick::{TickInput, launch, tick};
