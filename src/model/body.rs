use nalgebra::{Point3, Rotation3, Vector3};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

// How a body participates in the scene. Satellites carry their primary with
// them, so nothing ever has to guess roles from list positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRole {
    Sun,
    Planet,
    Moon { parent: BodyID },
    Ringed,
}

// All the immutable info about a body
#[derive(Debug, Clone)]
pub struct CelestialBody {
    pub id: BodyID,
    pub name: &'static str,
    pub offset: Point3<f32>,
    pub radius: f32,
    pub color: Point3<f32>,
    pub orbit_rate: f32,
    pub role: BodyRole,
}

impl CelestialBody {
    // A zero radius marks an empty catalog slot.
    pub fn is_present(&self) -> bool {
        self.radius > 0.0
    }

    pub fn is_satellite(&self) -> bool {
        matches!(self.role, BodyRole::Moon { .. })
    }

    /// Orientation of the body's orbital frame once the shared accumulator
    /// has reached `orbit_angle` degrees. Satellites compose a second, three
    /// times faster turn around x, which swings them around their primary
    /// instead of around the origin.
    pub fn orbit_rotation(&self, orbit_angle: f64) -> Rotation3<f32> {
        // Reduce in f64 before narrowing; the accumulator grows forever.
        let yaw_deg = (f64::from(self.orbit_rate) * orbit_angle).rem_euclid(360.0);
        let yaw = (yaw_deg.to_radians()) as f32;
        let around_y = Rotation3::from_axis_angle(&Vector3::y_axis(), yaw);
        match self.role {
            BodyRole::Moon { .. } => {
                around_y * Rotation3::from_axis_angle(&Vector3::x_axis(), 3.0 * yaw)
            }
            _ => around_y,
        }
    }

    /// Current world position of the body's center.
    pub fn position(&self, orbit_angle: f64) -> Point3<f32> {
        self.orbit_rotation(orbit_angle) * self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planet(offset: Point3<f32>, orbit_rate: f32) -> CelestialBody {
        CelestialBody {
            id: BodyID(1),
            name: "test",
            offset,
            radius: 1.0,
            color: Point3::new(1.0, 1.0, 1.0),
            orbit_rate,
            role: BodyRole::Planet,
        }
    }

    #[test]
    fn test_zero_rate_stays_put() {
        let sun = CelestialBody {
            orbit_rate: 0.0,
            role: BodyRole::Sun,
            ..planet(Point3::origin(), 0.0)
        };
        for angle in [0.0, 90.0, 1234.5] {
            approx::assert_relative_eq!(sun.position(angle), Point3::origin());
        }
    }

    #[test]
    fn test_quarter_turn() {
        let body = planet(Point3::new(10.0, 0.0, 0.0), 1.0);
        // A positive turn around y carries +x towards -z.
        approx::assert_relative_eq!(
            body.position(90.0),
            Point3::new(0.0, 0.0, -10.0),
            epsilon = 1e-4
        );
        approx::assert_relative_eq!(
            body.position(180.0),
            Point3::new(-10.0, 0.0, 0.0),
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_rate_scales_the_accumulator() {
        let body = planet(Point3::new(10.0, 0.0, 0.0), 0.5);
        approx::assert_relative_eq!(
            body.position(180.0),
            Point3::new(0.0, 0.0, -10.0),
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_full_turn_wraps() {
        let body = planet(Point3::new(10.0, 0.0, 0.0), 1.0);
        approx::assert_relative_eq!(body.position(720.0), body.position(0.0), epsilon = 1e-4);
    }

    #[test]
    fn test_satellite_swings_out_of_plane() {
        let moon = CelestialBody {
            role: BodyRole::Moon { parent: BodyID(3) },
            ..planet(Point3::new(97.35, 0.0, 7.2), 0.6)
        };
        // At 150 degrees of accumulator the yaw is 90 and the extra turn 270,
        // carrying the z-offset up into +y.
        approx::assert_relative_eq!(
            moon.position(150.0),
            Point3::new(0.0, 7.2, -97.35),
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_empty_slot_is_absent() {
        let slot = CelestialBody {
            radius: 0.0,
            ..planet(Point3::origin(), 0.0)
        };
        assert!(!slot.is_present());
        assert!(planet(Point3::origin(), 0.0).is_present());
    }
}
