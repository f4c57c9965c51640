use anyhow::{bail, Result};
use nalgebra::Point3;

use super::body::{BodyID, BodyRole, CelestialBody};

// Everything is sized relative to the blue planet in slot 3.
const BASE_RADIUS: f32 = 3.0;
// Baseline gap inserted between neighbors when laying the line-up out
// along the x-axis.
const SPACING: f32 = 15.0;

fn color(r: u8, g: u8, b: u8) -> Point3<f32> {
    Point3::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
    )
}

/// The compiled-in scene: a sun, seven planets, one moon, one ringed giant.
/// Positions chain outward from the sun, each body placed one gap past the
/// previous one; the moon shares its primary's x slot and sits a little off
/// in z.
pub fn standard() -> Vec<CelestialBody> {
    let radii = [
        BASE_RADIUS * 15.0,
        BASE_RADIUS * 0.5,
        BASE_RADIUS * 0.95,
        BASE_RADIUS,
        BASE_RADIUS * 0.4,
        BASE_RADIUS * 0.53,
        BASE_RADIUS * 5.0,
        BASE_RADIUS * 3.45,
        BASE_RADIUS * 2.0,
        BASE_RADIUS * 1.88,
    ];

    let x1 = radii[0] + radii[1] + SPACING;
    let x2 = x1 + radii[2] + SPACING;
    let x3 = x2 + radii[3] + SPACING;
    let moon_z = radii[3] + radii[4] + SPACING * 0.2;
    let x5 = x3 + radii[5] + SPACING;
    let x6 = x5 + radii[6] + SPACING;
    // The giants get wider gaps.
    let x7 = x6 + radii[7] + SPACING * 2.0;
    let x8 = x7 + radii[8] + SPACING * 1.5;
    let x9 = x8 + radii[9] + SPACING * 1.5;

    let table = [
        ("Sun", 0.0, 0.0, color(255, 165, 0), 0.0, BodyRole::Sun),
        ("Mercury", x1, 0.0, color(128, 128, 128), 1.0, BodyRole::Planet),
        ("Venus", x2, 0.0, color(255, 255, 224), 0.7, BodyRole::Planet),
        ("Earth", x3, 0.0, color(25, 155, 225), 0.6, BodyRole::Planet),
        (
            "Moon",
            x3,
            moon_z,
            color(211, 211, 211),
            0.6,
            BodyRole::Moon { parent: BodyID(3) },
        ),
        ("Mars", x5, 0.0, color(217, 87, 99), 0.5, BodyRole::Planet),
        ("Jupiter", x6, 0.0, color(239, 223, 173), 0.1, BodyRole::Planet),
        ("Saturn", x7, 0.0, color(236, 201, 136), 0.085, BodyRole::Ringed),
        ("Uranus", x8, 0.0, color(148, 224, 233), 0.07, BodyRole::Planet),
        ("Neptune", x9, 0.0, color(68, 110, 212), 0.065, BodyRole::Planet),
    ];

    table
        .iter()
        .zip(radii.iter())
        .enumerate()
        .map(
            |(i, (&(name, x, z, color, orbit_rate, role), &radius))| CelestialBody {
                id: BodyID(i),
                name,
                offset: Point3::new(x, 0.0, z),
                radius,
                color,
                orbit_rate,
                role,
            },
        )
        .collect()
}

/// Startup sanity check: ids must match slots, and every satellite must
/// trail a present, non-satellite primary.
pub fn validate(catalog: &[CelestialBody]) -> Result<()> {
    for (i, body) in catalog.iter().enumerate() {
        if body.id.0 != i {
            bail!("body {} carries id {:?} but sits in slot {}", body.name, body.id, i);
        }
        if let BodyRole::Moon { parent } = body.role {
            let primary = match catalog.get(parent.0) {
                Some(primary) => primary,
                None => bail!("{} orbits {:?}, which does not exist", body.name, parent),
            };
            if parent.0 >= i {
                bail!("{} must come after its primary {}", body.name, primary.name);
            }
            if !primary.is_present() {
                bail!("{} orbits an empty slot ({})", body.name, primary.name);
            }
            if primary.is_satellite() {
                bail!("{} cannot orbit another satellite ({})", body.name, primary.name);
            }
        }
    }
    Ok(())
}
