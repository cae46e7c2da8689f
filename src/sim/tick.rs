//! Simulation tick
//!
//! Advances the arena by one frame delta. The tick is the only writer of
//! paddle/ball/brick state; input only lands here through [`TickInput`].

use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::{
    bounce_off_brick, bounce_off_walls, circle_rect_overlap, deflect_direction, enforce_angle,
};
use super::stage;
use super::state::{BallState, GameEvent, GamePhase, GameState, PaddleDirection};
use crate::tuning::Tuning;

/// Buffered input intent consumed by the next tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer x position (paddle center target); overrides `direction`
    pub target_x: Option<f32>,
    /// Held key direction
    pub direction: PaddleDirection,
}

/// Random serve offset within `±serve_jitter` of the paddle half-width
pub fn serve_offset(rng: &mut Pcg32, tuning: &Tuning, paddle_width: f32) -> f32 {
    let span = tuning.serve_jitter * paddle_width / 2.0;
    if span > 0.0 {
        rng.random_range(-span..=span)
    } else {
        0.0
    }
}

/// Apply the angle floor using the tuning's limits
fn floor_angle(vel: glam::Vec2, speed: f32, tuning: &Tuning) -> glam::Vec2 {
    enforce_angle(
        vel,
        speed,
        tuning.min_angle_from_horizontal_deg.to_radians(),
        tuning.min_angle_from_vertical_deg.to_radians(),
    )
}

/// Launch a stuck ball. Returns false (no-op) unless the ball is waiting on
/// the paddle and the game is running.
pub fn launch(state: &mut GameState, tuning: &Tuning) -> bool {
    if state.paused || !state.phase.awaiting_launch() {
        return false;
    }
    let BallState::Stuck { offset } = state.ball.state else {
        return false;
    };

    let rel = offset / (state.paddle.width / 2.0);
    let dir = deflect_direction(rel, tuning.launch_max_deg.to_radians());
    let speed = state.ball.speed;

    state.ball.vel = floor_angle(dir * speed, speed, tuning);
    state.ball.state = BallState::Free;
    state.ball.last_speed_up = state.time;
    state.phase = GamePhase::Playing;
    state.emit(GameEvent::Launched);

    log::debug!(
        "Launch at {:.1} deg, speed {:.0}",
        state.ball.vel.x.atan2(-state.ball.vel.y).to_degrees(),
        speed
    );
    true
}

/// Advance the game state by `dt` seconds. Events are appended to
/// `state.events`.
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning, rng: &mut Pcg32, dt: f32) {
    // Don't tick if paused or game over
    if state.paused || state.phase == GamePhase::GameOver {
        return;
    }

    let dt = if dt > tuning.max_frame_dt {
        log::debug!("Clamped frame dt {:.4}s to {:.4}s", dt, tuning.max_frame_dt);
        tuning.max_frame_dt
    } else {
        dt.max(0.0)
    };
    state.time += dt;

    // Paddle: pointer wins over keys
    if let Some(target) = input.target_x {
        state
            .paddle
            .move_toward(target, dt, tuning.paddle_smoothing, tuning.arena_width);
    } else {
        state.paddle.move_by(input.direction, dt, tuning.arena_width);
    }

    if state.ball.is_stuck() {
        state.ball.update_stuck(&state.paddle, tuning.ball_stuck_lift);
        return;
    }

    // Speed ramp
    if state.time - state.ball.last_speed_up >= tuning.speed_ramp_interval {
        let old = state.ball.speed;
        let speed = (old + tuning.speed_ramp_step).min(tuning.ball_max_speed);
        state.ball.last_speed_up = state.time;
        if speed > old {
            state.ball.set_speed(speed);
            state.emit(GameEvent::SpeedUp { speed });
            log::debug!("Ball speed ramped to {:.0}", speed);
        }
    }

    let prev_pos = state.ball.pos;
    state.ball.pos += state.ball.vel * dt;

    // Walls
    let (pos, vel, hit_wall) = bounce_off_walls(
        state.ball.pos,
        state.ball.vel,
        state.ball.radius,
        tuning.arena_width,
    );
    state.ball.pos = pos;
    if hit_wall {
        state.ball.vel = floor_angle(vel, state.ball.speed, tuning);
        state.emit(GameEvent::WallBounce);
    }

    // Paddle
    let paddle = state.paddle.rect();
    let ball = &mut state.ball;
    let overlaps_vertically =
        ball.pos.y + ball.radius >= paddle.top() && ball.pos.y - ball.radius <= paddle.bottom();
    if overlaps_vertically && paddle.contains_x(ball.pos.x) && ball.vel.y > 0.0 {
        let rel = ((ball.pos.x - paddle.center_x()) / (paddle.size.x / 2.0)).clamp(-1.0, 1.0);
        let speed = (ball.speed * tuning.paddle_hit_speedup).min(tuning.ball_max_speed);
        let dir = deflect_direction(rel, tuning.paddle_max_bounce_deg.to_radians());

        ball.speed = speed;
        ball.vel = floor_angle(dir * speed, speed, tuning);
        ball.pos.y = paddle.top() - ball.radius - 0.1;
        state.emit(GameEvent::PaddleHit { offset: rel });
    }

    // Bricks: first overlap in creation order wins
    let hit = state
        .bricks
        .iter()
        .position(|b| {
            b.is_alive() && circle_rect_overlap(state.ball.pos, state.ball.radius, &b.rect)
        });
    if let Some(index) = hit {
        let brick = &mut state.bricks[index];
        let bounced = bounce_off_brick(prev_pos, state.ball.vel, &brick.rect);
        state.ball.vel = floor_angle(bounced, state.ball.speed, tuning);

        brick.hp -= 1;
        let id = brick.id;
        if brick.hp == 0 {
            let points = tuning.score_brick_destroyed;
            state.bricks.remove(index);
            state.score += points;
            state.emit(GameEvent::BrickDestroyed { id, points });
        } else {
            let hp = brick.hp;
            let points = tuning.score_brick_damaged;
            state.score += points;
            state.emit(GameEvent::BrickDamaged { id, hp, points });
        }
    }

    // Miss
    if state.ball.pos.y + state.ball.radius > tuning.arena_height {
        state.lives = state.lives.saturating_sub(1);
        state.emit(GameEvent::LifeLost { lives: state.lives });

        if state.lives == 0 {
            state.phase = GamePhase::GameOver;
            state.emit(GameEvent::RunOver {
                score: state.score,
                stage: state.stage,
            });
            log::info!(
                "Run over on stage {} with score {}",
                state.stage,
                state.score
            );
            return;
        }

        log::debug!("Life lost, {} remaining", state.lives);
        let offset = serve_offset(rng, tuning, state.paddle.width);
        state.restick_ball(tuning, offset);
        state.phase = GamePhase::Serve;
    }

    // Stage clear
    if state.is_stage_clear() {
        advance_stage(state, tuning, rng);
    }
}

/// Move to the next stage: bonus, new layout, fresh paddle, ball on the paddle
fn advance_stage(state: &mut GameState, tuning: &Tuning, rng: &mut Pcg32) {
    let cleared = state.stage;
    let bonus = tuning.score_stage_clear;
    state.score += bonus;
    state.stage += 1;

    state.pattern_index =
        stage::next_pattern_index(rng, tuning.patterns.len(), state.pattern_index);
    state.bricks = stage::build_bricks(&tuning.patterns[state.pattern_index], tuning);
    state.paddle = super::state::Paddle::for_stage(tuning, state.stage);

    let offset = serve_offset(rng, tuning, state.paddle.width);
    state.restick_ball(tuning, offset);
    state.phase = GamePhase::StageCleared;
    state.emit(GameEvent::StageCleared { stage: cleared, bonus });

    log::info!(
        "Stage {} cleared, entering stage {} ('{}'), score {}",
        cleared,
        state.stage,
        tuning.patterns[state.pattern_index].name,
        state.score
    );
}
