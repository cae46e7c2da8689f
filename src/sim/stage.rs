//! Stage layout and difficulty curve

use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::state::Brick;
use crate::tuning::{Cell, StagePattern, Tuning};

/// Build a fresh brick set from a pattern grid
pub fn build_bricks(pattern: &StagePattern, tuning: &Tuning) -> Vec<Brick> {
    let cols = pattern.columns();
    assert!(cols > 0, "stage pattern '{}' has no columns", pattern.name);

    let margin = tuning.brick_margin;
    let brick_w = (tuning.arena_width - margin * (cols as f32 + 1.0)) / cols as f32;
    let brick_h = tuning.brick_height;

    let mut bricks = Vec::with_capacity(pattern.brick_count());
    for (row, col, cell) in pattern.cells() {
        if cell == Cell::Empty {
            continue;
        }
        let hp = cell.hit_points();
        bricks.push(Brick {
            id: bricks.len() as u32,
            rect: Rect::new(
                margin + col as f32 * (brick_w + margin),
                tuning.brick_top + row as f32 * (brick_h + margin),
                brick_w,
                brick_h,
            ),
            hp,
            max_hp: hp,
        });
    }

    log::info!(
        "Stage layout '{}': {} bricks ({} reinforced)",
        pattern.name,
        bricks.len(),
        bricks.iter().filter(|b| b.is_reinforced()).count()
    );
    bricks
}

/// Paddle width for a stage (shrinks per stage down to the floor)
pub fn paddle_width_for_stage(tuning: &Tuning, stage: u32) -> f32 {
    let shrink = stage.saturating_sub(1) as f32 * tuning.paddle_shrink_per_stage;
    (tuning.paddle_width - shrink).max(tuning.paddle_min_width)
}

/// Base ball speed for a stage (grows per stage up to the cap)
pub fn ball_speed_for_stage(tuning: &Tuning, stage: u32) -> f32 {
    let boost = stage.saturating_sub(1) as f32 * tuning.ball_speed_per_stage;
    (tuning.ball_speed + boost).min(tuning.ball_max_speed)
}

/// Pick the next layout, avoiding an immediate repeat when possible
pub fn next_pattern_index(rng: &mut Pcg32, count: usize, current: usize) -> usize {
    if count <= 1 {
        return 0;
    }
    let pick = rng.random_range(0..count - 1);
    if pick >= current { pick + 1 } else { pick }
}
