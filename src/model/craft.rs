use nalgebra::{Point3, Vector3};

/// Degrees per turn keypress.
pub const TURN_STEP: f32 = 5.0;
/// World units per move keypress.
pub const MOVE_STEP: f32 = 1.0;

// The pilot's pose. Heading 0 faces -z, and turning left increases it.
// The craft never leaves the y = 0 plane.
#[derive(Debug, Clone)]
pub struct Craft {
    pub x: f32,
    pub z: f32,
    pub heading: f32, // degrees, kept in [0, 360)
}

impl Craft {
    pub fn new() -> Self {
        Craft {
            x: 0.0,
            z: 150.0,
            heading: 0.0,
        }
    }

    pub fn position(&self) -> Point3<f32> {
        Point3::new(self.x, 0.0, self.z)
    }

    /// Unit vector the nose points along.
    pub fn forward(&self) -> Vector3<f32> {
        let rad = self.heading.to_radians();
        Vector3::new(-rad.sin(), 0.0, -rad.cos())
    }

    pub fn turn_left(&mut self) {
        self.heading = (self.heading + TURN_STEP).rem_euclid(360.0);
    }

    pub fn turn_right(&mut self) {
        self.heading = (self.heading - TURN_STEP).rem_euclid(360.0);
    }

    // Movement is unconditional; there is nothing solid out here to hit.
    pub fn advance(&mut self) {
        let fwd = self.forward();
        self.x += MOVE_STEP * fwd.x;
        self.z += MOVE_STEP * fwd.z;
    }

    pub fn retreat(&mut self) {
        let fwd = self.forward();
        self.x -= MOVE_STEP * fwd.x;
        self.z -= MOVE_STEP * fwd.z;
    }
}
