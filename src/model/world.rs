use std::time::{Duration, Instant};

use anyhow::Result;

use super::body::CelestialBody;
use super::catalog;
use super::clock::OrbitTicker;
use super::craft::Craft;
use super::starfield::Starfield;

/// Degrees added to the orbit accumulator by one animation step.
pub const ORBIT_STEP: f64 = 5.0;
/// How much one speed keypress moves the frame interval.
pub const INTERVAL_STEP: Duration = Duration::from_millis(5);
/// The frame interval can never be driven below this.
pub const MIN_INTERVAL: Duration = Duration::from_millis(6);

// All the mutable state of the demo: one writer (the controller and the
// clock), one reader (the composer), one thread.
pub struct World {
    pub catalog: Vec<CelestialBody>,
    pub craft: Craft,
    pub starfield: Starfield,
    orbit_angle: f64, // degrees, grows without bound
    ticker: OrbitTicker,
}

impl World {
    pub fn new(star_count: usize, frame_interval: Duration) -> Result<Self> {
        let catalog = catalog::standard();
        catalog::validate(&catalog)?;
        Ok(World {
            catalog,
            craft: Craft::new(),
            starfield: Starfield::new(star_count),
            orbit_angle: 0.0,
            ticker: OrbitTicker::new(frame_interval.max(MIN_INTERVAL)),
        })
    }

    pub fn orbit_angle(&self) -> f64 {
        self.orbit_angle
    }

    pub fn is_animating(&self) -> bool {
        self.ticker.is_running()
    }

    pub fn frame_interval(&self) -> Duration {
        self.ticker.period()
    }

    /// Present bodies only; empty catalog slots never reach a renderer.
    pub fn bodies(&self) -> impl Iterator<Item = &CelestialBody> + '_ {
        self.catalog.iter().filter(|body| body.is_present())
    }

    pub fn toggle_animation(&mut self, now: Instant) {
        if self.ticker.is_running() {
            self.ticker.stop();
        } else {
            self.ticker.start(now);
        }
        log::debug!("animation running: {}", self.is_animating());
    }

    pub fn shorten_frame_interval(&mut self) {
        let shorter = self.ticker.period().saturating_sub(INTERVAL_STEP);
        self.ticker.set_period(shorter.max(MIN_INTERVAL));
        log::debug!("frame interval now {:?}", self.frame_interval());
    }

    pub fn lengthen_frame_interval(&mut self) {
        self.ticker.set_period(self.ticker.period() + INTERVAL_STEP);
        log::debug!("frame interval now {:?}", self.frame_interval());
    }

    /// Runs the animation cadence up to `now`, one orbit step per elapsed
    /// interval. Returns how many steps landed.
    pub fn advance(&mut self, now: Instant) -> u32 {
        let steps = self.ticker.poll(now);
        self.orbit_angle += ORBIT_STEP * f64::from(steps);
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::body::{BodyID, BodyRole};
    use nalgebra::Point3;

    const MS: Duration = Duration::from_millis(1);

    fn world() -> World {
        World::new(100, 100 * MS).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let world = world();
        assert!(!world.is_animating());
        assert_eq!(world.orbit_angle(), 0.0);
        assert_eq!(world.frame_interval(), 100 * MS);
        assert_eq!(world.bodies().count(), 10);
    }

    #[test]
    fn test_animation_toggles_and_steps() {
        let t0 = Instant::now();
        let mut world = world();

        world.toggle_animation(t0);
        assert!(world.is_animating());
        // The first step lands immediately on enable.
        assert_eq!(world.advance(t0), 1);
        assert_eq!(world.orbit_angle(), 5.0);
        assert_eq!(world.advance(t0 + 250 * MS), 2);
        assert_eq!(world.orbit_angle(), 15.0);
    }

    #[test]
    fn test_pause_preserves_the_accumulator() {
        let t0 = Instant::now();
        let mut world = world();

        world.toggle_animation(t0);
        world.advance(t0 + 300 * MS);
        let frozen = world.orbit_angle();

        world.toggle_animation(t0 + 301 * MS);
        assert!(!world.is_animating());
        assert_eq!(world.advance(t0 + Duration::from_secs(30)), 0);
        assert_eq!(world.orbit_angle(), frozen);

        // Resuming picks up where it left off, plus the immediate step.
        let t1 = t0 + Duration::from_secs(60);
        world.toggle_animation(t1);
        world.advance(t1);
        assert_eq!(world.orbit_angle(), frozen + ORBIT_STEP);
    }

    #[test]
    fn test_interval_floor() {
        let mut world = World::new(100, 10 * MS).unwrap();
        for _ in 0..10 {
            world.shorten_frame_interval();
            assert!(world.frame_interval() >= MIN_INTERVAL);
        }
        assert_eq!(world.frame_interval(), 6 * MS);
        world.lengthen_frame_interval();
        assert_eq!(world.frame_interval(), 11 * MS);
    }

    #[test]
    fn test_lengthen_is_unbounded() {
        let mut world = world();
        for _ in 0..100 {
            world.lengthen_frame_interval();
        }
        assert_eq!(world.frame_interval(), 600 * MS);
    }

    #[test]
    fn test_empty_slots_are_skipped() {
        let mut world = world();
        world.catalog.push(CelestialBody {
            id: BodyID(10),
            name: "ghost",
            offset: Point3::origin(),
            radius: 0.0,
            color: Point3::new(1.0, 1.0, 1.0),
            orbit_rate: 1.0,
            role: BodyRole::Planet,
        });
        assert_eq!(world.bodies().count(), 10);
    }
}
