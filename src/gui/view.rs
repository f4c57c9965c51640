use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use kiss3d::camera::Camera;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::resource::Material;
use kiss3d::scene::SceneNode;
use kiss3d::window::Window;
use nalgebra::{Point2, Point3, Rotation3, Translation3, Vector3};

use super::camera::ChaseCamera;
use super::material::EmissiveMaterial;
use super::mesh;
use super::renderers::{
    circle_iter, CompoundRenderer, PlanViewRenderer, CHART_MAX_X, CHART_MAX_Y, CHART_MIN_X,
    CHART_MIN_Y, LAYER_BACKDROP, LAYER_BORDER, LAYER_CRAFT, LAYER_DISCS, LAYER_ORBITS,
    LAYER_RINGS, LAYER_STARS,
};
use crate::model::{BodyID, BodyRole, CelestialBody, World};

// The ring system around the ringed giant
const RING_COUNT: usize = 5;
const RING_TILT_DEG: f32 = 60.0;
const RING_SEGMENTS: usize = 50;
const RING_WIDTH: f32 = 3.0;

const ORBIT_SEGMENTS: usize = 50;

// The plan chart's camera: parked this high over the origin, looking
// straight down with north (-z) up the screen. The frustum is square with a
// 90 degree field of view, so at ground level the chart spans +/-250 and
// the projection is a bare divide by depth.
const PLAN_EYE_HEIGHT: f32 = 250.0;
const PLAN_NEAR: f32 = 5.0;

/// Projects a world point through the plan camera and into the chart's
/// corner of the window. Points behind the near plane or off the charted
/// square come back as None.
fn plan_project(world: &Point3<f32>, layer: f32) -> Option<Point3<f32>> {
    let depth = PLAN_EYE_HEIGHT - world.y;
    if depth < PLAN_NEAR {
        return None;
    }
    let map_x = world.x / depth;
    let map_y = -world.z / depth;
    if map_x.abs() > 1.0 || map_y.abs() > 1.0 {
        return None;
    }
    // Squeeze the chart into the bottom-right ninth of the window.
    Some(Point3::new((2.0 + map_x) / 3.0, (-2.0 + map_y) / 3.0, layer))
}

/// Chart units per world unit at the given elevation. Same divide-by-depth
/// as `plan_project`, so a body riding above the orbital plane paints a
/// bigger disc, exactly as its sphere would project.
fn plan_scale(world_y: f32) -> f32 {
    1.0 / ((PLAN_EYE_HEIGHT - world_y) * 3.0)
}

/// Feeds a world-space path through the plan projection. Only spans with
/// both endpoints on the chart get drawn, which breaks the path cleanly at
/// the chart edge.
fn add_projected_path(
    plan: &mut PlanViewRenderer,
    points: impl Iterator<Item = Point3<f32>>,
    layer: f32,
    color: Point3<f32>,
    width: f32,
) {
    let mut prev = None;
    for point in points {
        let projected = plan_project(&point, layer);
        if let (Some(a), Some(b)) = (prev, projected) {
            plan.add_segment(a, b, color, width);
        }
        prev = projected;
    }
}

pub struct View {
    // Object state
    body_nodes: HashMap<BodyID, SceneNode>,
    // Camera
    camera: ChaseCamera,
    // Misc
    renderer: CompoundRenderer,
}

impl View {
    pub fn new(world: &World, window: &mut Window) -> Self {
        let camera = ChaseCamera::new(window.width(), window.height());

        // The sun shares one emissive material; everything else keeps the
        // stock lit material.
        let sun_material: Rc<RefCell<Box<dyn Material + 'static>>> =
            Rc::new(RefCell::new(Box::new(EmissiveMaterial::new())));

        let mut body_nodes = HashMap::new();
        for body in world.bodies() {
            let node = Self::create_body_node(window, body, &sun_material);
            body_nodes.insert(body.id, node);
        }

        let mut view = Self {
            body_nodes,
            camera,
            renderer: CompoundRenderer::new(),
        };
        view.update_scene(world);

        view
    }

    fn create_body_node(
        window: &mut Window,
        body: &CelestialBody,
        sun_material: &Rc<RefCell<Box<dyn Material + 'static>>>,
    ) -> SceneNode {
        let sphere = mesh::uv_sphere(body.radius);
        let mut node = window.add_mesh(Rc::new(RefCell::new(sphere)), Vector3::new(1.0, 1.0, 1.0));
        node.set_color(body.color.x, body.color.y, body.color.z);
        if body.role == BodyRole::Sun {
            node.set_material(Rc::clone(sun_material));
        }
        node
    }

    /// Moves the retained spheres to their current orbital positions and
    /// re-aims the camera down the craft's nose.
    pub fn update_scene(&mut self, world: &World) {
        let angle = world.orbit_angle();
        for body in world.bodies() {
            if let Some(node) = self.body_nodes.get_mut(&body.id) {
                node.set_local_translation(Translation3::from(body.position(angle).coords));
            }
        }
        self.camera
            .set_pose(world.craft.position(), world.craft.forward());
    }

    // the big per-frame draw
    pub fn prerender(&mut self, world: &World, window: &mut Window, fps: u32) {
        self.draw_stars(world);
        self.draw_rings(world);
        self.draw_plan(world);
        self.draw_hud(world, window, fps);
    }

    fn draw_stars(&mut self, world: &World) {
        self.renderer.draw_stars(world.starfield.stars());
    }

    fn draw_rings(&mut self, world: &World) {
        let angle = world.orbit_angle();
        for body in world.bodies() {
            if body.role != BodyRole::Ringed {
                continue;
            }
            // Flat circles, tilted over and swung around with the body.
            let spin = body.orbit_rotation(angle);
            let tilt = Rotation3::from_axis_angle(&Vector3::x_axis(), RING_TILT_DEG.to_radians());
            for k in 1..=RING_COUNT {
                let radius = body.radius + 2.0 * k as f32;
                let path = circle_iter(radius, RING_SEGMENTS)
                    .map(|p| spin * (tilt * (body.offset + p.coords)));
                self.renderer.draw_ring(path, body.color, RING_WIDTH);
            }
        }
    }

    fn draw_plan(&mut self, world: &World) {
        let angle = world.orbit_angle();
        let white = Point3::new(1.0, 1.0, 1.0);
        let plan = self.renderer.plan();

        // Black backdrop over the whole chart.
        plan.add_quad(
            [
                Point3::new(CHART_MIN_X, CHART_MIN_Y, LAYER_BACKDROP),
                Point3::new(CHART_MAX_X, CHART_MIN_Y, LAYER_BACKDROP),
                Point3::new(CHART_MAX_X, CHART_MAX_Y, LAYER_BACKDROP),
                Point3::new(CHART_MIN_X, CHART_MAX_Y, LAYER_BACKDROP),
            ],
            Point3::new(0.0, 0.0, 0.0),
        );

        // Stars fall wherever the overhead camera happens to catch them.
        for star in world.starfield.stars() {
            if let Some(point) = plan_project(star, LAYER_STARS) {
                plan.add_point(point, white);
            }
        }

        for body in world.bodies() {
            // A white circle for the orbit track, radius from the resting
            // slot. The sun has no track.
            if body.offset.x > 0.0 {
                let track =
                    circle_iter(body.offset.x, ORBIT_SEGMENTS).map(|p| Point3::new(p.x, 0.0, p.y));
                add_projected_path(plan, track, LAYER_ORBITS, white, 1.0);
            }

            // The body itself as a filled disc, sized by its own depth.
            let position = body.position(angle);
            if let Some(center) = plan_project(&position, LAYER_DISCS) {
                plan.add_disc(center, body.radius * plan_scale(position.y), body.color);
            }

            // Ring circles ride along on the chart too.
            if body.role == BodyRole::Ringed {
                let spin = body.orbit_rotation(angle);
                let tilt =
                    Rotation3::from_axis_angle(&Vector3::x_axis(), RING_TILT_DEG.to_radians());
                for k in 1..=RING_COUNT {
                    let radius = body.radius + 2.0 * k as f32;
                    let ring = circle_iter(radius, RING_SEGMENTS)
                        .map(|p| spin * (tilt * (body.offset + p.coords)));
                    add_projected_path(plan, ring, LAYER_RINGS, body.color, RING_WIDTH);
                }
            }
        }

        // The craft marker, dropped once it flies off the chart. The craft
        // always rides at ground level.
        if let Some(center) = plan_project(&world.craft.position(), LAYER_CRAFT) {
            plan.set_marker(center, world.craft.heading, plan_scale(0.0), white);
        }

        // Separators along the chart's top and left edges.
        let corner = Point3::new(CHART_MIN_X, CHART_MAX_Y, LAYER_BORDER);
        plan.add_segment(
            Point3::new(CHART_MIN_X, CHART_MIN_Y, LAYER_BORDER),
            corner,
            white,
            2.0,
        );
        plan.add_segment(
            corner,
            Point3::new(CHART_MAX_X, CHART_MAX_Y, LAYER_BORDER),
            white,
            2.0,
        );
    }

    fn draw_hud(&mut self, world: &World, window: &mut Window, fps: u32) {
        let default_font = kiss3d::text::Font::default();
        window.draw_text(
            &self.status_text(world, fps),
            // draw_text wants physical pixels, width() hands back logical ones
            &Point2::new(window.width() as f32 * 2.0 - 600.0, 0.0),
            60.0,
            &default_font,
            &Point3::new(1.0, 1.0, 1.0),
        );
    }

    fn status_text(&self, world: &World, fps: u32) -> String {
        format!(
            "FPS: {}
Interval: {} ms
Animation: {}
Heading: {:.0}
Position: ({:.0}, {:.0})",
            fps,
            world.frame_interval().as_millis(),
            if world.is_animating() {
                "running"
            } else {
                "paused"
            },
            world.craft.heading,
            world.craft.x,
            world.craft.z,
        )
    }

    pub fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, Some(&mut self.renderer), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_project_centers_the_origin() {
        let point = plan_project(&Point3::origin(), -0.5).unwrap();
        approx::assert_relative_eq!(point, Point3::new(2.0 / 3.0, -2.0 / 3.0, -0.5));
    }

    #[test]
    fn test_plan_project_north_is_up() {
        let north = plan_project(&Point3::new(0.0, 0.0, -100.0), -0.5).unwrap();
        let center = plan_project(&Point3::origin(), -0.5).unwrap();
        assert!(north.y > center.y);
        approx::assert_relative_eq!(north.x, center.x);
    }

    #[test]
    fn test_plan_project_elevation_swings_outward() {
        // The chart narrows with depth, so a raised point lands further from
        // the center than a grounded one at the same x.
        let ground = plan_project(&Point3::new(100.0, 0.0, 0.0), -0.5).unwrap();
        let raised = plan_project(&Point3::new(100.0, 125.0, 0.0), -0.5).unwrap();
        assert!(raised.x > ground.x);
    }

    #[test]
    fn test_plan_project_drops_points_behind_the_eye() {
        assert!(plan_project(&Point3::new(0.0, 246.0, 0.0), -0.5).is_none());
        assert!(plan_project(&Point3::new(0.0, 400.0, 0.0), -0.5).is_none());
    }

    #[test]
    fn test_plan_project_drops_points_off_the_chart() {
        assert!(plan_project(&Point3::new(300.0, 0.0, 0.0), -0.5).is_none());
        assert!(plan_project(&Point3::new(0.0, 0.0, 260.0), -0.5).is_none());
    }

    #[test]
    fn test_plan_project_covers_the_outermost_track() {
        // The widest orbit sits at x = 240.93, inside the chart's +/-250.
        let point = plan_project(&Point3::new(240.93, 0.0, 0.0), -0.5);
        assert!(point.is_some());
    }

    #[test]
    fn test_plan_scale_grows_with_elevation() {
        // One world unit at ground level spans 1/750 of the window; the
        // moon climbs a few units toward the eye and paints bigger.
        approx::assert_relative_eq!(plan_scale(0.0), 1.0 / 750.0);
        approx::assert_relative_eq!(plan_scale(7.2), 1.0 / ((250.0 - 7.2) * 3.0));
        assert!(plan_scale(7.2) > plan_scale(0.0));
        assert!(plan_scale(-7.2) < plan_scale(0.0));
    }
}
