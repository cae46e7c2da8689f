//! The arena simulator: state, tuning, seeded RNG and buffered input intent
//!
//! Input handlers record intent (`set_paddle_target`, `move_paddle_by`) between
//! frames; `advance` is the only place that intent turns into motion.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::collision::Rect;
use super::state::{GameEvent, GamePhase, GameState, PaddleDirection};
use super::tick::{TickInput, launch, serve_offset, tick};
use crate::tuning::{Tuning, TuningError};

/// Ball as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallView {
    pub center: Vec2,
    pub radius: f32,
    pub stuck: bool,
}

/// Brick as seen by a renderer (`hp` drives color tiering)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BrickView {
    pub rect: Rect,
    pub hp: u8,
    pub max_hp: u8,
}

/// Read-only frame snapshot for the renderer and HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub arena: Vec2,
    pub paddle: Rect,
    pub ball: BallView,
    pub bricks: Vec<BrickView>,
    pub score: u64,
    pub lives: u8,
    pub stage: u32,
    pub phase: GamePhase,
    pub paused: bool,
}

/// A Breakout arena simulation
#[derive(Debug, Clone)]
pub struct Arena {
    tuning: Tuning,
    state: GameState,
    input: TickInput,
    seed: u64,
    rng: Pcg32,
}

impl Arena {
    /// Build an arena. Panics if `tuning` fails validation; use
    /// [`Arena::try_new`] for tuning that comes from outside the program.
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        match Self::try_new(tuning, seed) {
            Ok(arena) => arena,
            Err(e) => panic!("invalid tuning: {e}"),
        }
    }

    /// Build an arena, reporting invalid tuning
    pub fn try_new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let offset = serve_offset(&mut rng, &tuning, tuning.paddle_width);
        let state = GameState::new(&tuning, offset);
        log::info!(
            "Arena {}x{} ready (seed {}, {} lives, {} patterns)",
            tuning.arena_width,
            tuning.arena_height,
            seed,
            tuning.starting_lives,
            tuning.patterns.len()
        );
        Ok(Self {
            tuning,
            state,
            input: TickInput::default(),
            seed,
            rng,
        })
    }

    /// Advance by `dt` seconds and return the events since the last call
    /// (including launches triggered between frames)
    pub fn advance(&mut self, dt: f32) -> Vec<GameEvent> {
        tick(&mut self.state, &self.input, &self.tuning, &mut self.rng, dt);
        std::mem::take(&mut self.state.events)
    }

    /// Track a pointer: the paddle center eases toward `x`
    pub fn set_paddle_target(&mut self, x: f32) {
        self.input.target_x = Some(x);
    }

    /// Pointer left the play area; key intent becomes authoritative again
    pub fn clear_paddle_target(&mut self) {
        self.input.target_x = None;
    }

    /// Held key direction (`None` when released)
    pub fn move_paddle_by(&mut self, direction: PaddleDirection) {
        self.input.direction = direction;
    }

    /// Launch the stuck ball; returns false when there is nothing to launch
    pub fn launch_ball(&mut self) -> bool {
        launch(&mut self.state, &self.tuning)
    }

    pub fn pause(&mut self) {
        if self.state.phase != GamePhase::GameOver && !self.state.paused {
            self.state.paused = true;
            log::debug!("Paused at score {}", self.state.score);
        }
    }

    pub fn resume(&mut self) {
        self.state.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        if self.state.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Start over: stage 1, full lives, zero score
    pub fn reset_run(&mut self) {
        let offset = serve_offset(&mut self.rng, &self.tuning, self.tuning.paddle_width);
        self.state = GameState::new(&self.tuning, offset);
        self.input = TickInput::default();
        log::info!("Run reset");
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn lives(&self) -> u8 {
        self.state.lives
    }

    pub fn stage(&self) -> u32 {
        self.state.stage
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_run_over(&self) -> bool {
        self.state.phase == GamePhase::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        Snapshot {
            arena: Vec2::new(self.tuning.arena_width, self.tuning.arena_height),
            paddle: state.paddle.rect(),
            ball: BallView {
                center: state.ball.pos,
                radius: state.ball.radius,
                stuck: state.ball.is_stuck(),
            },
            bricks: state
                .live_bricks()
                .map(|b| BrickView {
                    rect: b.rect,
                    hp: b.hp,
                    max_hp: b.max_hp,
                })
                .collect(),
            score: state.score,
            lives: state.lives,
            stage: state.stage,
            phase: state.phase,
            paused: state.paused,
        }
    }

    /// Mutable state for test harnesses that need to stage a scenario
    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
