use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Background points scattered in a box around the scene. While generation is
// on the whole cloud is rerolled every frame, which reads as twinkling; while
// it is off the last cloud stays frozen.
pub struct Starfield {
    stars: Vec<Point3<f32>>,
    generating: bool,
    count: usize,
    rng: StdRng,
}

impl Starfield {
    pub fn new(count: usize) -> Self {
        Self::with_rng(count, StdRng::from_entropy())
    }

    // Deterministic variant, for tests.
    pub fn with_rng(count: usize, rng: StdRng) -> Self {
        Starfield {
            stars: Vec::with_capacity(count),
            generating: true,
            count,
            rng,
        }
    }

    pub fn stars(&self) -> &[Point3<f32>] {
        &self.stars
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn toggle(&mut self) {
        self.generating = !self.generating;
    }

    /// Rerolls the cloud inside a box sized by the window. Each coordinate
    /// runs from -d/3 to 2d/3 of its dimension, so the box leans away from
    /// the origin on purpose.
    pub fn refresh(&mut self, width: u32, height: u32) {
        if !self.generating {
            return;
        }
        let w = (width as i32).max(1);
        let h = (height as i32).max(1);
        self.stars.clear();
        for _ in 0..self.count {
            let x = self.rng.gen_range(0..w) - w / 3;
            let y = self.rng.gen_range(0..h) - h / 3;
            let z = self.rng.gen_range(0..h) - h / 3;
            self.stars.push(Point3::new(x as f32, y as f32, z as f32));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(count: usize) -> Starfield {
        Starfield::with_rng(count, StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_refresh_fills_to_count() {
        let mut field = seeded(250);
        assert!(field.stars().is_empty());
        field.refresh(800, 600);
        assert_eq!(field.stars().len(), 250);
    }

    #[test]
    fn test_cloud_stays_in_box() {
        let mut field = seeded(1000);
        field.refresh(900, 600);
        for star in field.stars() {
            assert!((-300.0..600.0).contains(&star.x), "x out of box: {}", star.x);
            assert!((-200.0..400.0).contains(&star.y), "y out of box: {}", star.y);
            assert!((-200.0..400.0).contains(&star.z), "z out of box: {}", star.z);
        }
    }

    #[test]
    fn test_reroll_changes_the_cloud() {
        let mut field = seeded(100);
        field.refresh(800, 600);
        let first = field.stars().to_vec();
        field.refresh(800, 600);
        assert_ne!(first, field.stars());
    }

    #[test]
    fn test_frozen_while_disabled() {
        let mut field = seeded(100);
        field.refresh(800, 600);
        let frozen = field.stars().to_vec();

        field.toggle();
        assert!(!field.is_generating());
        field.refresh(800, 600);
        field.refresh(1024, 768);
        assert_eq!(frozen, field.stars());

        field.toggle();
        field.refresh(800, 600);
        assert_ne!(frozen, field.stars());
    }
}
