//! Axis-aligned boxes and velocity kinematics
//!
//! The small slice of an arcade physics engine the simulation needs: sprite
//! bounds, a collision body inside them, and semi-implicit Euler integration.
//! Screen coordinates: x grows right, y grows down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    /// Strict overlap (touching edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// A moving sprite with a collision body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Top-left of the sprite bounds
    pub pos: Vec2,
    pub vel: Vec2,
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Rendered sprite size
    pub size: Vec2,
    /// Collision body size, centred inside the sprite
    pub hitbox: Vec2,
}

impl Body {
    /// A body whose collision box matches its sprite
    pub fn solid(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            gravity: 0.0,
            size,
            hitbox: size,
        }
    }

    /// Rendered bounds
    pub fn bounds(&self) -> Rect {
        Rect {
            min: self.pos,
            size: self.size,
        }
    }

    /// Collision rectangle
    pub fn hitbox_rect(&self) -> Rect {
        Rect {
            min: self.pos + (self.size - self.hitbox) / 2.0,
            size: self.hitbox,
        }
    }

    /// Advance by one timestep
    pub fn integrate(&mut self, dt: f32) {
        self.vel.y += self.gravity * dt;
        self.pos += self.vel * dt;
    }

    /// Keep the collision body inside `[0, height]`, stopping vertical motion at the edge
    pub fn clamp_to_world(&mut self, height: f32) {
        let hit = self.hitbox_rect();
        if hit.top() < 0.0 {
            self.pos.y -= hit.top();
            self.vel.y = 0.0;
        } else if hit.bottom() > height {
            self.pos.y -= hit.bottom() - height;
            self.vel.y = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 60.0);
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(20.0, 0.0, 5.0, 5.0)));
        // Touching edges is not an overlap
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_hitbox_centred() {
        let mut body = Body::solid(Vec2::new(40.0, 300.0), Vec2::splat(48.0));
        body.hitbox = Vec2::new(48.0, 18.0);
        let hit = body.hitbox_rect();
        assert_eq!(hit.top(), 315.0);
        assert_eq!(hit.bottom(), 333.0);
        assert_eq!(body.bounds().bottom(), 348.0);
    }

    #[test]
    fn test_integrate_gravity() {
        let mut body = Body::solid(Vec2::ZERO, Vec2::ONE);
        body.gravity = 600.0;
        body.vel = Vec2::new(-200.0, -300.0);
        body.integrate(0.5);
        // Semi-implicit: velocity first, then position
        assert_eq!(body.vel, Vec2::new(-200.0, 0.0));
        assert_eq!(body.pos, Vec2::new(-100.0, 0.0));
    }

    #[test]
    fn test_clamp_to_world() {
        let mut body = Body::solid(Vec2::new(0.0, -5.0), Vec2::splat(10.0));
        body.vel.y = -50.0;
        body.clamp_to_world(100.0);
        assert_eq!(body.pos.y, 0.0);
        assert_eq!(body.vel.y, 0.0);

        body.pos.y = 95.0;
        body.vel.y = 50.0;
        body.clamp_to_world(100.0);
        assert_eq!(body.pos.y, 90.0);
        assert_eq!(body.vel.y, 0.0);
    }
}
