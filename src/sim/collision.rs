//! Axis-aligned collision checks
//!
//! Everything in the runner is a rectangle. Obstacles are tested with a
//! hitbox smaller than what is drawn, so grazing a corner does not end the
//! run; coins and the player use their full bounds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Horizontal inset of an obstacle hitbox, per side (fraction of width)
pub const OBSTACLE_INSET_X: f32 = 0.10;
/// Inset from the obstacle's top edge (fraction of height)
pub const OBSTACLE_INSET_TOP: f32 = 0.10;
/// Inset from the obstacle's bottom edge (fraction of height)
pub const OBSTACLE_INSET_BOTTOM: f32 = 0.05;

/// Rectangle with its top-left corner at `pos` (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
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

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap: rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Shrink by the given fractions of this rectangle's size
    pub fn inset(&self, x_frac: f32, top_frac: f32, bottom_frac: f32) -> Rect {
        let dx = self.size.x * x_frac;
        let top = self.size.y * top_frac;
        let bottom = self.size.y * bottom_frac;
        Rect {
            pos: Vec2::new(self.pos.x + dx, self.pos.y + top),
            size: Vec2::new(
                (self.size.x - 2.0 * dx).max(0.0),
                (self.size.y - top - bottom).max(0.0),
            ),
        }
    }
}

/// Collision bounds of an obstacle drawn at `visual`
pub fn obstacle_hitbox(visual: &Rect) -> Rect {
    visual.inset(OBSTACLE_INSET_X, OBSTACLE_INSET_TOP, OBSTACLE_INSET_BOTTOM)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_overlap() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let right = rect(10.0, 0.0, 10.0, 10.0);
        let below = rect(0.0, 10.0, 10.0, 10.0);
        assert!(!a.intersects(&right));
        assert!(!a.intersects(&below));
    }

    #[test]
    fn test_separated_on_one_axis() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 20.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_obstacle_hitbox_inset() {
        let visual = rect(100.0, 200.0, 40.0, 60.0);
        let hit = obstacle_hitbox(&visual);
        assert!((hit.left() - 104.0).abs() < 1e-4);
        assert!((hit.right() - 136.0).abs() < 1e-4);
        assert!((hit.top() - 206.0).abs() < 1e-4);
        assert!((hit.bottom() - 257.0).abs() < 1e-4);
    }

    #[test]
    fn test_grazing_visual_corner_is_forgiven() {
        // Player overlaps the obstacle's drawn bounds by 3 units horizontally,
        // less than the 4 unit inset
        let obstacle = rect(100.0, 200.0, 40.0, 60.0);
        let player = rect(63.0, 190.0, 40.0, 40.0);
        assert!(player.intersects(&obstacle));
        assert!(!player.intersects(&obstacle_hitbox(&obstacle)));
    }
}
