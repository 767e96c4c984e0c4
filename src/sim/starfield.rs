//! Parallax starfield
//!
//! Seeded so the same seed always yields the same sky. Stars drift left and
//! wrap to the right edge on a fresh random row.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::Bounds;
use crate::consts::REFERENCE_FRAME_MS;

/// Stars generated per depth level
pub const STARS_PER_DEPTH: u32 = 200;
/// Deepest supported field (2000 stars)
pub const MAX_STARFIELD_DEPTH: u32 = 10;

/// A single background star
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub radius: f32,
    /// Leftward drift per reference frame
    pub speed: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub struct Starfield {
    stars: Vec<Star>,
    bounds: Bounds,
    rng: Pcg32,
}

impl Starfield {
    /// Depth is capped at `MAX_STARFIELD_DEPTH`
    pub fn new(seed: u64, bounds: Bounds, depth: u32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let depth = depth.min(MAX_STARFIELD_DEPTH);
        let depth_f = depth as f32;
        let count = depth.saturating_mul(STARS_PER_DEPTH);

        let stars = (0..count)
            .map(|_| Star {
                pos: Vec2::new(
                    rng.random_range(bounds.min.x..=bounds.max.x),
                    rng.random_range(bounds.min.y..=bounds.max.y),
                ),
                radius: rng.random::<f32>() * depth_f * 0.5,
                speed: rng.random::<f32>() * depth_f * 0.05,
                opacity: rng.random::<f32>() * 0.5 + 0.5,
            })
            .collect();

        Self { stars, bounds, rng }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Drift every star left; `speed_multiplier` stretches the field during warp
    pub fn advance(&mut self, delta_ms: f32, speed_multiplier: f32) {
        if !delta_ms.is_finite() || delta_ms <= 0.0 || !speed_multiplier.is_finite() {
            return;
        }
        let scale = delta_ms / REFERENCE_FRAME_MS * speed_multiplier;
        for star in &mut self.stars {
            star.pos.x -= star.speed * scale;
            if star.pos.x < self.bounds.min.x {
                star.pos.x = self.bounds.max.x;
                star.pos.y = self
                    .rng
                    .random_range(self.bounds.min.y..=self.bounds.max.y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds::new(Vec2::ZERO, Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_same_seed_same_sky() {
        let a = Starfield::new(42, bounds(), 3);
        let b = Starfield::new(42, bounds(), 3);
        assert_eq!(a.stars(), b.stars());
        assert_eq!(a.stars().len(), 600);

        let c = Starfield::new(43, bounds(), 3);
        assert_ne!(a.stars(), c.stars());
    }

    #[test]
    fn test_star_attributes_in_range() {
        let field = Starfield::new(7, bounds(), 2);
        for star in field.stars() {
            assert!(bounds().contains(star.pos));
            assert!(star.radius >= 0.0 && star.radius < 1.0);
            assert!(star.speed >= 0.0 && star.speed < 0.1);
            assert!(star.opacity >= 0.5 && star.opacity < 1.0);
        }
    }

    #[test]
    fn test_depth_capped() {
        let field = Starfield::new(1, bounds(), u32::MAX);
        let expected = (MAX_STARFIELD_DEPTH * STARS_PER_DEPTH) as usize;
        assert_eq!(field.stars().len(), expected);
    }

    #[test]
    fn test_stars_wrap_and_stay_in_bounds() {
        let mut field = Starfield::new(9, bounds(), 3);
        for _ in 0..2000 {
            field.advance(REFERENCE_FRAME_MS, 40.0);
        }
        for star in field.stars() {
            assert!(star.pos.x <= 800.0);
            assert!(star.pos.y >= 0.0 && star.pos.y <= 600.0);
        }
    }

    #[test]
    fn test_deterministic_advance() {
        let mut a = Starfield::new(5, bounds(), 1);
        let mut b = Starfield::new(5, bounds(), 1);
        for _ in 0..500 {
            a.advance(16.0, 20.0);
            b.advance(16.0, 20.0);
        }
        assert_eq!(a.stars(), b.stars());
    }
}
