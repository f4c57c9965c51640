mod body;
mod catalog;
mod clock;
mod craft;
mod starfield;
mod world;

pub use body::{BodyID, BodyRole, CelestialBody};
pub use clock::{FpsMeter, OrbitTicker};
pub use craft::Craft;
pub use starfield::Starfield;
pub use world::{World, INTERVAL_STEP, MIN_INTERVAL, ORBIT_STEP};
