use kiss3d::camera::Camera;
use kiss3d::context::Context;
use kiss3d::renderer::Renderer;
use kiss3d::resource::{
    AllocationType, BufferType, Effect, GPUVec, ShaderAttribute, ShaderUniform,
};

use nalgebra::Point3;

// Depth layers for the overlay, in window NDC. The main camera's near plane
// is at distance 5, so everything in the scene lands at a depth above
// -0.999; drawing the overlay below that makes it win the depth test against
// all scene geometry, and each layer here beats the ones listed before it.
pub const LAYER_BACKDROP: f32 = -0.9990;
pub const LAYER_STARS: f32 = -0.9991;
pub const LAYER_ORBITS: f32 = -0.9992;
pub const LAYER_DISCS: f32 = -0.9994;
pub const LAYER_RINGS: f32 = -0.9995;
pub const LAYER_CRAFT: f32 = -0.9996;
pub const LAYER_BORDER: f32 = -0.9998;

// The chart owns the bottom-right ninth of the window. Submitted primitives
// are clipped to this rectangle so nothing bleeds past the separators into
// the main view.
pub const CHART_MIN_X: f32 = 1.0 / 3.0;
pub const CHART_MAX_X: f32 = 1.0;
pub const CHART_MIN_Y: f32 = -1.0;
pub const CHART_MAX_Y: f32 = -1.0 / 3.0;

const DISC_SEGMENTS: usize = 16;

// Farthest any footprint vertex sits from the marker's center.
const MARKER_REACH: f32 = 10.0;

struct LineBatch {
    width: f32,
    // Segment endpoints, stored as (pt, color, pt, color)
    data: Vec<Point3<f32>>,
}

struct MarkerPose {
    // xy is the window NDC position, z the depth layer
    center: Point3<f32>,
    rot_c: f32,
    rot_s: f32,
    // Window NDC units per footprint unit
    scale: f32,
    color: Point3<f32>,
}

/// Draws the plan chart: flat primitives given directly in window NDC, plus
/// the craft marker as a retained triangle posed by uniforms.
///
/// Everything here is opaque and carries an explicit depth layer, so the
/// depth test does the stacking and the submission order is irrelevant.
/// Whatever gets submitted is confined to the chart rectangle: triangles
/// and segments are clipped at its edges, points and marker poses that
/// would stick out are dropped.
pub struct PlanViewRenderer {
    // OpenGL stuff
    flat_shader: Effect,
    pos: ShaderAttribute<Point3<f32>>,
    color: ShaderAttribute<Point3<f32>>,
    point_size: ShaderUniform<f32>,
    marker_shader: Effect,
    marker_local: ShaderAttribute<Point3<f32>>,
    marker_center: ShaderUniform<Point3<f32>>,
    marker_rot_c: ShaderUniform<f32>,
    marker_rot_s: ShaderUniform<f32>,
    marker_scale: ShaderUniform<f32>,
    marker_color: ShaderUniform<Point3<f32>>,
    // Data storage
    triangles: Vec<Point3<f32>>,
    points: Vec<Point3<f32>>,
    line_batches: Vec<LineBatch>,
    marker_footprint: GPUVec<Point3<f32>>,
    marker_pose: Option<MarkerPose>,
    star_size: f32,
}

impl PlanViewRenderer {
    pub fn new(star_size: f32) -> Self {
        let mut flat_shader = Effect::new_from_str(FLAT_VERTEX_SRC, FLAT_FRAGMENT_SRC);
        flat_shader.use_program();
        let pos = flat_shader
            .get_attrib::<Point3<f32>>("position")
            .expect("Failed to get shader attribute.");
        let color = flat_shader
            .get_attrib::<Point3<f32>>("color")
            .expect("Failed to get shader attribute.");
        let point_size = flat_shader
            .get_uniform::<f32>("point_size")
            .expect("Failed to get shader uniform.");

        let mut marker_shader = Effect::new_from_str(MARKER_VERTEX_SRC, MARKER_FRAGMENT_SRC);
        marker_shader.use_program();

        PlanViewRenderer {
            pos,
            color,
            point_size,
            flat_shader,
            marker_local: marker_shader
                .get_attrib::<Point3<f32>>("local")
                .expect("Failed to get shader attribute."),
            marker_center: marker_shader
                .get_uniform::<Point3<f32>>("center")
                .expect("Failed to get shader uniform."),
            marker_rot_c: marker_shader
                .get_uniform::<f32>("rot_c")
                .expect("Failed to get shader uniform."),
            marker_rot_s: marker_shader
                .get_uniform::<f32>("rot_s")
                .expect("Failed to get shader uniform."),
            marker_scale: marker_shader
                .get_uniform::<f32>("scale")
                .expect("Failed to get shader uniform."),
            marker_color: marker_shader
                .get_uniform::<Point3<f32>>("color")
                .expect("Failed to get shader uniform."),
            marker_shader,
            triangles: vec![],
            points: vec![],
            line_batches: vec![],
            // Silhouette of the craft: apex forward, base behind. Built once
            // and posed with uniforms each frame.
            marker_footprint: GPUVec::new(
                vec![
                    Point3::new(0.0, 0.0, -MARKER_REACH),
                    Point3::new(-5.0, 0.0, 0.0),
                    Point3::new(5.0, 0.0, 0.0),
                ],
                BufferType::Array,
                AllocationType::StaticDraw,
            ),
            marker_pose: None,
            star_size,
        }
    }

    pub fn add_point(&mut self, point: Point3<f32>, color: Point3<f32>) {
        if !chart_contains(&point) {
            return;
        }
        self.points.push(point);
        self.points.push(color);
    }

    pub fn add_segment(
        &mut self,
        a: Point3<f32>,
        b: Point3<f32>,
        color: Point3<f32>,
        width: f32,
    ) {
        let (a, b) = match clip_segment_to_chart(a, b) {
            Some(clipped) => clipped,
            None => return,
        };
        let idx = match self.line_batches.iter().position(|batch| batch.width == width) {
            Some(idx) => idx,
            None => {
                self.line_batches.push(LineBatch {
                    width,
                    data: vec![],
                });
                self.line_batches.len() - 1
            }
        };
        let data = &mut self.line_batches[idx].data;
        data.push(a);
        data.push(color);
        data.push(b);
        data.push(color);
    }

    pub fn add_triangle(
        &mut self,
        a: Point3<f32>,
        b: Point3<f32>,
        c: Point3<f32>,
        color: Point3<f32>,
    ) {
        let polygon = clip_triangle_to_chart([a, b, c]);
        // Fanning a convex polygon keeps the winding.
        for i in 1..polygon.len().saturating_sub(1) {
            self.triangles.push(polygon[0]);
            self.triangles.push(color);
            self.triangles.push(polygon[i]);
            self.triangles.push(color);
            self.triangles.push(polygon[i + 1]);
            self.triangles.push(color);
        }
    }

    /// Corners must be given counterclockwise.
    pub fn add_quad(&mut self, corners: [Point3<f32>; 4], color: Point3<f32>) {
        self.add_triangle(corners[0], corners[1], corners[2], color);
        self.add_triangle(corners[0], corners[2], corners[3], color);
    }

    /// Filled circle around `center`, radius in window NDC units. The depth
    /// layer is taken from the center's z.
    pub fn add_disc(&mut self, center: Point3<f32>, radius: f32, color: Point3<f32>) {
        use std::f32::consts::TAU;

        for i in 0..DISC_SEGMENTS {
            let theta1 = (i as f32) / (DISC_SEGMENTS as f32) * TAU;
            let theta2 = ((i + 1) as f32) / (DISC_SEGMENTS as f32) * TAU;
            self.add_triangle(
                center,
                Point3::new(
                    center.x + radius * theta1.cos(),
                    center.y + radius * theta1.sin(),
                    center.z,
                ),
                Point3::new(
                    center.x + radius * theta2.cos(),
                    center.y + radius * theta2.sin(),
                    center.z,
                ),
                color,
            );
        }
    }

    /// Poses the craft marker for this frame. Skipping the call leaves the
    /// marker out entirely. The footprint lives on the GPU and cannot be
    /// clipped per vertex, so a pose that would poke past the chart edge is
    /// dropped whole instead.
    pub fn set_marker(
        &mut self,
        center: Point3<f32>,
        heading_deg: f32,
        scale: f32,
        color: Point3<f32>,
    ) {
        if !marker_fits(&center, MARKER_REACH * scale) {
            return;
        }
        let heading = heading_deg.to_radians();
        self.marker_pose = Some(MarkerPose {
            center,
            rot_c: heading.cos(),
            rot_s: heading.sin(),
            scale,
            color,
        });
    }

    fn render_flat(&mut self) {
        self.flat_shader.use_program();
        self.pos.enable();
        self.color.enable();

        self.point_size.upload(&self.star_size);

        let ctxt = Context::get();

        if !self.triangles.is_empty() {
            let mut buffer = GPUVec::new(
                std::mem::take(&mut self.triangles),
                BufferType::Array,
                AllocationType::StreamDraw,
            );
            self.pos.bind_sub_buffer(&mut buffer, 1, 0);
            self.color.bind_sub_buffer(&mut buffer, 1, 1);
            ctxt.draw_arrays(Context::TRIANGLES, 0, (buffer.len() / 2) as i32);
        }

        if !self.points.is_empty() {
            let mut buffer = GPUVec::new(
                std::mem::take(&mut self.points),
                BufferType::Array,
                AllocationType::StreamDraw,
            );
            self.pos.bind_sub_buffer(&mut buffer, 1, 0);
            self.color.bind_sub_buffer(&mut buffer, 1, 1);
            ctxt.draw_arrays(Context::POINTS, 0, (buffer.len() / 2) as i32);
        }

        for batch in self.line_batches.drain(..) {
            let mut buffer = GPUVec::new(batch.data, BufferType::Array, AllocationType::StreamDraw);
            self.pos.bind_sub_buffer(&mut buffer, 1, 0);
            self.color.bind_sub_buffer(&mut buffer, 1, 1);
            ctxt.line_width(batch.width);
            ctxt.draw_arrays(Context::LINES, 0, (buffer.len() / 2) as i32);
        }
        ctxt.line_width(1.0);

        self.pos.disable();
        self.color.disable();
    }

    fn render_marker(&mut self) {
        let pose = match self.marker_pose.take() {
            Some(pose) => pose,
            None => return,
        };

        self.marker_shader.use_program();
        self.marker_local.enable();

        self.marker_local.bind_sub_buffer(&mut self.marker_footprint, 0, 0);
        self.marker_center.upload(&pose.center);
        self.marker_rot_c.upload(&pose.rot_c);
        self.marker_rot_s.upload(&pose.rot_s);
        self.marker_scale.upload(&pose.scale);
        self.marker_color.upload(&pose.color);

        let ctxt = Context::get();
        ctxt.draw_arrays(Context::TRIANGLES, 0, self.marker_footprint.len() as i32);

        self.marker_local.disable();
    }
}

impl Renderer for PlanViewRenderer {
    fn render(&mut self, _: usize, _: &mut dyn Camera) {
        let flat_empty =
            self.triangles.is_empty() && self.points.is_empty() && self.line_batches.is_empty();
        if !flat_empty {
            self.render_flat();
        }
        self.render_marker();
    }
}

fn chart_contains(point: &Point3<f32>) -> bool {
    (CHART_MIN_X..=CHART_MAX_X).contains(&point.x)
        && (CHART_MIN_Y..=CHART_MAX_Y).contains(&point.y)
}

/// True when a marker footprint of the given reach stays entirely on the
/// chart.
fn marker_fits(center: &Point3<f32>, reach: f32) -> bool {
    center.x - CHART_MIN_X >= reach
        && CHART_MAX_X - center.x >= reach
        && center.y - CHART_MIN_Y >= reach
        && CHART_MAX_Y - center.y >= reach
}

/// Clips a segment to the chart rectangle. None when no part of it touches
/// the chart.
fn clip_segment_to_chart(a: Point3<f32>, b: Point3<f32>) -> Option<(Point3<f32>, Point3<f32>)> {
    let delta = b - a;
    let mut t0 = 0.0_f32;
    let mut t1 = 1.0_f32;
    for (start, d, min, max) in [
        (a.x, delta.x, CHART_MIN_X, CHART_MAX_X),
        (a.y, delta.y, CHART_MIN_Y, CHART_MAX_Y),
    ] {
        if d == 0.0 {
            if start < min || start > max {
                return None;
            }
        } else {
            let (near, far) = ((min - start) / d, (max - start) / d);
            let (near, far) = if near <= far { (near, far) } else { (far, near) };
            t0 = t0.max(near);
            t1 = t1.min(far);
            if t0 > t1 {
                return None;
            }
        }
    }
    Some((a + t0 * delta, a + t1 * delta))
}

/// Clips a triangle to the chart rectangle, one edge at a time. The result
/// is a convex polygon with the original winding, possibly empty.
fn clip_triangle_to_chart(corners: [Point3<f32>; 3]) -> Vec<Point3<f32>> {
    let mut polygon = corners.to_vec();
    polygon = clip_against(&polygon, |p| p.x - CHART_MIN_X);
    polygon = clip_against(&polygon, |p| CHART_MAX_X - p.x);
    polygon = clip_against(&polygon, |p| p.y - CHART_MIN_Y);
    polygon = clip_against(&polygon, |p| CHART_MAX_Y - p.y);
    polygon
}

// One Sutherland-Hodgman pass: keeps the part of the polygon where `dist`
// is nonnegative, inserting the boundary crossings.
fn clip_against<F>(polygon: &[Point3<f32>], dist: F) -> Vec<Point3<f32>>
where
    F: Fn(&Point3<f32>) -> f32,
{
    let mut kept = Vec::with_capacity(polygon.len() + 1);
    for (i, a) in polygon.iter().enumerate() {
        let b = &polygon[(i + 1) % polygon.len()];
        let (da, db) = (dist(a), dist(b));
        if da >= 0.0 {
            kept.push(*a);
        }
        if (da < 0.0) != (db < 0.0) {
            let t = da / (da - db);
            kept.push(a + t * (b - a));
        }
    }
    kept
}

/// Vertex shader for flat primitives already in window NDC.
static FLAT_VERTEX_SRC: &str = "#version 100
    attribute vec3 position;
    attribute vec3 color;
    varying   vec3 vColor;
    uniform   float point_size;
    void main() {
        gl_Position = vec4(position, 1.0);
        gl_PointSize = point_size;
        vColor = color;
    }";

/// Fragment shader for flat primitives.
static FLAT_FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    varying vec3 vColor;
    void main() {
        gl_FragColor = vec4(vColor, 1.0);
    }";

/// Vertex shader for the craft marker. Spins the footprint by the craft
/// heading and drops it onto the chart; north in the footprint's frame
/// (negative z) points up the screen.
static MARKER_VERTEX_SRC: &str = "#version 100
    attribute vec3 local;
    uniform   vec3 center;
    uniform   float rot_c;
    uniform   float rot_s;
    uniform   float scale;
    void main() {
        float wx = local.x * rot_c + local.z * rot_s;
        float wz = -local.x * rot_s + local.z * rot_c;
        gl_Position = vec4(center.x + wx * scale, center.y - wz * scale, center.z, 1.0);
    }";

/// Fragment shader for the craft marker.
static MARKER_FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    uniform vec3 color;
    void main() {
        gl_FragColor = vec4(color, 1.0);
    }";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_contains_is_inclusive_at_the_edges() {
        assert!(chart_contains(&Point3::new(CHART_MIN_X, CHART_MAX_Y, -0.5)));
        assert!(chart_contains(&Point3::new(2.0 / 3.0, -2.0 / 3.0, -0.5)));
        assert!(!chart_contains(&Point3::new(0.0, -2.0 / 3.0, -0.5)));
        assert!(!chart_contains(&Point3::new(2.0 / 3.0, 0.0, -0.5)));
    }

    #[test]
    fn test_segments_clip_at_the_chart_edge() {
        // Runs from the chart interior into the main view; the kept part
        // stops at the left separator.
        let inside = Point3::new(2.0 / 3.0, -2.0 / 3.0, -0.5);
        let outside = Point3::new(0.0, -2.0 / 3.0, -0.5);
        let (a, b) = clip_segment_to_chart(inside, outside).unwrap();
        approx::assert_relative_eq!(a, inside);
        approx::assert_relative_eq!(b, Point3::new(CHART_MIN_X, -2.0 / 3.0, -0.5));
    }

    #[test]
    fn test_segments_outside_the_chart_are_dropped() {
        let a = Point3::new(-0.5, 0.5, -0.5);
        let b = Point3::new(0.2, 0.5, -0.5);
        assert!(clip_segment_to_chart(a, b).is_none());
    }

    #[test]
    fn test_separator_segments_survive_whole() {
        // The border lines run exactly along the chart edge.
        let a = Point3::new(CHART_MIN_X, CHART_MIN_Y, -0.5);
        let b = Point3::new(CHART_MIN_X, CHART_MAX_Y, -0.5);
        let (ca, cb) = clip_segment_to_chart(a, b).unwrap();
        approx::assert_relative_eq!(ca, a);
        approx::assert_relative_eq!(cb, b);
    }

    #[test]
    fn test_triangles_clip_to_the_chart() {
        // Apex pokes over the top separator; clipping yields a quad whose
        // points all stay on the chart.
        let polygon = clip_triangle_to_chart([
            Point3::new(0.5, -0.4, -0.5),
            Point3::new(0.9, -0.4, -0.5),
            Point3::new(0.7, -0.2, -0.5),
        ]);
        assert_eq!(polygon.len(), 4);
        for point in &polygon {
            assert!(point.x >= CHART_MIN_X - 1e-6 && point.x <= CHART_MAX_X + 1e-6);
            assert!(point.y >= CHART_MIN_Y - 1e-6 && point.y <= CHART_MAX_Y + 1e-6);
        }
    }

    #[test]
    fn test_triangles_inside_the_chart_are_untouched() {
        let corners = [
            Point3::new(0.5, -0.5, -0.5),
            Point3::new(0.6, -0.5, -0.5),
            Point3::new(0.55, -0.4, -0.5),
        ];
        assert_eq!(clip_triangle_to_chart(corners), corners.to_vec());
    }

    #[test]
    fn test_triangles_outside_the_chart_vanish() {
        let polygon = clip_triangle_to_chart([
            Point3::new(-0.5, 0.5, -0.5),
            Point3::new(-0.4, 0.5, -0.5),
            Point3::new(-0.45, 0.6, -0.5),
        ]);
        assert!(polygon.is_empty());
    }

    #[test]
    fn test_marker_withdraws_before_poking_past_the_edge() {
        let reach = MARKER_REACH / 750.0;
        let snug = Point3::new(CHART_MIN_X + reach / 2.0, -2.0 / 3.0, -0.5);
        assert!(!marker_fits(&snug, reach));
        let clear = Point3::new(2.0 / 3.0, -2.0 / 3.0, -0.5);
        assert!(marker_fits(&clear, reach));
    }
}
