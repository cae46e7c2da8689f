//! Collision detection and response for the rectangular arena
//!
//! Screen coordinates: `+y` points down, so "up" is negative `y`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    /// Whether `x` lies within the horizontal span (inclusive)
    #[inline]
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.left() && x <= self.right()
    }

    /// Closest point of the rectangle to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.pos, self.pos + self.size)
    }
}

/// Circle vs rectangle overlap (nearest-point distance <= radius)
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    center.distance_squared(rect.closest_point(center)) <= radius * radius
}

/// Which velocity component a brick hit inverts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitAxis {
    Horizontal,
    Vertical,
}

/// Infer the struck face from the ball center before the step.
///
/// Approximate: a previous position outside the brick's horizontal span means
/// a side hit, anything else is treated as a top/bottom hit. Diagonal corner
/// approaches can land on either axis.
pub fn infer_hit_axis(prev_pos: Vec2, rect: &Rect) -> HitAxis {
    if rect.contains_x(prev_pos.x) {
        HitAxis::Vertical
    } else {
        HitAxis::Horizontal
    }
}

/// Reflect velocity off a brick using [`infer_hit_axis`]
pub fn bounce_off_brick(prev_pos: Vec2, velocity: Vec2, rect: &Rect) -> Vec2 {
    match infer_hit_axis(prev_pos, rect) {
        HitAxis::Horizontal => Vec2::new(-velocity.x, velocity.y),
        HitAxis::Vertical => Vec2::new(velocity.x, -velocity.y),
    }
}

/// Direction for a hit offset `rel` in `[-1, 1]`, tilted up to `max_angle`
/// radians from the upward vertical
#[inline]
pub fn deflect_direction(rel: f32, max_angle: f32) -> Vec2 {
    let angle = rel.clamp(-1.0, 1.0) * max_angle;
    Vec2::new(angle.sin(), -angle.cos())
}

/// Angle floor correction.
///
/// Keeps the direction at least `min_from_horizontal` radians away from the
/// horizontal axis (and, when non-zero, `min_from_vertical` away from the
/// vertical), then rescales to `speed`. Component signs are preserved; a zero
/// vertical component counts as upward.
pub fn enforce_angle(
    velocity: Vec2,
    speed: f32,
    min_from_horizontal: f32,
    min_from_vertical: f32,
) -> Vec2 {
    let mut dir = velocity.normalize_or(Vec2::NEG_Y);

    let floor_y = min_from_horizontal.sin();
    if dir.y.abs() < floor_y {
        let sign_y = if dir.y > 0.0 { 1.0 } else { -1.0 };
        let sign_x = if dir.x < 0.0 { -1.0 } else { 1.0 };
        dir = Vec2::new(sign_x * (1.0 - floor_y * floor_y).sqrt(), sign_y * floor_y);
    }

    if min_from_vertical > 0.0 {
        let floor_x = min_from_vertical.sin();
        if dir.x.abs() < floor_x {
            let sign_x = if dir.x < 0.0 { -1.0 } else { 1.0 };
            let sign_y = if dir.y > 0.0 { 1.0 } else { -1.0 };
            dir = Vec2::new(sign_x * floor_x, sign_y * (1.0 - floor_x * floor_x).sqrt());
        }
    }

    dir * speed
}

/// Left/right/top wall response. Returns the corrected `(pos, vel)` and
/// whether any wall was hit. There is no bottom wall.
pub fn bounce_off_walls(pos: Vec2, vel: Vec2, radius: f32, width: f32) -> (Vec2, Vec2, bool) {
    let mut pos = pos;
    let mut vel = vel;
    let mut hit = false;

    if pos.x - radius < 0.0 {
        pos.x = radius;
        vel.x = -vel.x;
        hit = true;
    } else if pos.x + radius > width {
        pos.x = width - radius;
        vel.x = -vel.x;
        hit = true;
    }

    if pos.y - radius < 0.0 {
        pos.y = radius;
        vel.y = -vel.y;
        hit = true;
    }

    (pos, vel, hit)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-4;

    #[test]
    fn test_circle_rect_overlap() {
        let rect = Rect::new(100.0, 100.0, 50.0, 20.0);

        // Touching the top face
        assert!(circle_rect_overlap(Vec2::new(125.0, 95.0), 6.0, &rect));
        // Clear of the top face
        assert!(!circle_rect_overlap(Vec2::new(125.0, 90.0), 6.0, &rect));
        // Near a corner but outside the radius
        assert!(!circle_rect_overlap(Vec2::new(95.0, 95.0), 6.0, &rect));
        // Inside
        assert!(circle_rect_overlap(Vec2::new(120.0, 110.0), 6.0, &rect));
    }

    #[test]
    fn test_side_hit_inverts_horizontal() {
        let rect = Rect::new(100.0, 100.0, 50.0, 20.0);
        let vel = bounce_off_brick(Vec2::new(90.0, 110.0), Vec2::new(100.0, 40.0), &rect);
        assert_eq!(vel, Vec2::new(-100.0, 40.0));
    }

    #[test]
    fn test_face_hit_inverts_vertical() {
        let rect = Rect::new(100.0, 100.0, 50.0, 20.0);
        let vel = bounce_off_brick(Vec2::new(120.0, 130.0), Vec2::new(30.0, -100.0), &rect);
        assert_eq!(vel, Vec2::new(30.0, 100.0));
    }

    #[test]
    fn test_corner_hit_flips_one_axis() {
        let rect = Rect::new(100.0, 100.0, 50.0, 20.0);
        let vel = Vec2::new(80.0, 80.0);
        let out = bounce_off_brick(Vec2::new(95.0, 95.0), vel, &rect);
        let flipped_x = out == Vec2::new(-80.0, 80.0);
        let flipped_y = out == Vec2::new(80.0, -80.0);
        assert!(flipped_x || flipped_y);
    }

    #[test]
    fn test_deflect_center_is_straight_up() {
        let dir = deflect_direction(0.0, 60f32.to_radians());
        assert!(dir.x.abs() < TOL);
        assert!((dir.y + 1.0).abs() < TOL);
    }

    #[test]
    fn test_deflect_edge_is_capped() {
        let max = 60f32.to_radians();
        let dir = deflect_direction(3.0, max);
        let angle = dir.x.atan2(-dir.y);
        assert!((angle - max).abs() < TOL);
        assert!(dir.y < 0.0);
    }

    #[test]
    fn test_enforce_angle_lifts_flat_trajectory() {
        let min = 15f32.to_radians();
        let out = enforce_angle(Vec2::new(300.0, 1.0), 300.0, min, 0.0);
        assert!((out.length() - 300.0).abs() < 1e-2);
        assert!(out.x > 0.0 && out.y > 0.0);
        let from_horizontal = (out.y.abs() / out.length()).asin();
        assert!(from_horizontal >= min - TOL);
    }

    #[test]
    fn test_enforce_angle_zero_vertical_goes_up() {
        let out = enforce_angle(Vec2::new(-50.0, 0.0), 50.0, 15f32.to_radians(), 0.0);
        assert!(out.x < 0.0);
        assert!(out.y < 0.0);
    }

    #[test]
    fn test_enforce_angle_leaves_steep_alone() {
        let vel = Vec2::new(0.0, -200.0);
        let out = enforce_angle(vel, 200.0, 15f32.to_radians(), 0.0);
        assert!((out - vel).length() < 1e-3);
    }

    #[test]
    fn test_enforce_angle_vertical_floor() {
        let min_v = 10f32.to_radians();
        let out = enforce_angle(Vec2::new(0.0, -200.0), 200.0, 15f32.to_radians(), min_v);
        assert!(out.x > 0.0);
        assert!((out.x.abs() / 200.0).asin() >= min_v - TOL);
        assert!((out.length() - 200.0).abs() < 1e-2);
    }

    #[test]
    fn test_walls() {
        const RADIUS: f32 = 7.0;
        const WIDTH: f32 = 480.0;

        let (pos, vel, hit) =
            bounce_off_walls(Vec2::new(3.0, 100.0), Vec2::new(-50.0, 10.0), RADIUS, WIDTH);
        assert!(hit);
        assert_eq!(pos.x, RADIUS);
        assert!(vel.x > 0.0);

        let (pos, vel, hit) =
            bounce_off_walls(Vec2::new(200.0, 2.0), Vec2::new(10.0, -50.0), RADIUS, WIDTH);
        assert!(hit);
        assert_eq!(pos.y, RADIUS);
        assert!(vel.y > 0.0);

        // Bottom is open
        let (_, vel, hit) =
            bounce_off_walls(Vec2::new(200.0, 900.0), Vec2::new(10.0, 50.0), RADIUS, WIDTH);
        assert!(!hit);
        assert!(vel.y > 0.0);
    }
}
