//! Axis-aligned rectangles and penetration-resolving collision response.
//!
//! World space is y-down: `y` grows toward the floor, so "above" an obstacle
//! means a smaller `y`. Rectangles are anchored at their top-left corner.
//!
//! Resolution is **axis of least penetration**: when a moving body already
//! overlaps a static obstacle, the axis with the smaller overlap depth is the
//! one it gets pushed out along. Only the velocity component on that axis is
//! touched, which gives platformers the usual "land on top, bonk from below,
//! stop at walls" behavior without a swept test.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        other.x < self.right()
            && other.right() > self.x
            && other.y < self.bottom()
            && other.bottom() > self.y
    }
}

/// Which face of the obstacle the body was pushed out through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionSide {
    /// Landed on the obstacle's top face.
    Top,
    /// Struck the obstacle's bottom face while moving up.
    Bottom,
    /// Pushed out past the obstacle's left face.
    Left,
    /// Pushed out past the obstacle's right face.
    Right,
}

/// A moving rectangle with velocity and ground contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub grounded: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            grounded: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Push `body` out of `obstacle` along the axis of least penetration.
///
/// Returns `None` when the two do not overlap, or when they overlap but no
/// rule applies (e.g. a horizontal overlap with zero horizontal velocity).
/// Equal overlap depths resolve horizontally.
pub fn resolve_collision(body: &mut Body, obstacle: &Rect) -> Option<CollisionSide> {
    let rect = body.rect();
    if !rect.intersects(obstacle) {
        return None;
    }

    let overlap_x = (rect.right() - obstacle.x).min(obstacle.right() - rect.x);
    let overlap_y = (rect.bottom() - obstacle.y).min(obstacle.bottom() - rect.y);

    if overlap_x > overlap_y {
        if body.vel.y >= 0.0 && rect.y < obstacle.y {
            body.pos.y = obstacle.y - body.size.y;
            body.vel.y = 0.0;
            body.grounded = true;
            Some(CollisionSide::Top)
        } else if body.vel.y < 0.0 && rect.bottom() > obstacle.bottom() {
            body.pos.y = obstacle.bottom();
            body.vel.y = 0.0;
            Some(CollisionSide::Bottom)
        } else {
            None
        }
    } else if body.vel.x > 0.0 {
        body.pos.x = obstacle.x - body.size.x;
        Some(CollisionSide::Left)
    } else if body.vel.x < 0.0 {
        body.pos.x = obstacle.right();
        Some(CollisionSide::Right)
    } else {
        None
    }
}
