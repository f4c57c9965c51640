use kiss3d::camera::Camera;
use kiss3d::context::Context;
use kiss3d::renderer::Renderer;
use kiss3d::resource::{
    AllocationType, BufferType, Effect, GPUVec, ShaderAttribute, ShaderUniform,
};

use nalgebra::{Matrix4, Point3};

struct PathData {
    // Path segments, stored as (pt, color, pt, color)
    // Already evaluated in world space
    lines: GPUVec<Point3<f32>>,
    width: f32,
}

/// Draws wide line paths in world space. Used for the ring circles around
/// the ringed giant; paths are resubmitted every frame since the rings spin
/// with their body.
pub struct RingRenderer {
    // OpenGL stuff
    shader: Effect,
    pos: ShaderAttribute<Point3<f32>>,
    color: ShaderAttribute<Point3<f32>>,
    view: ShaderUniform<Matrix4<f32>>,
    proj: ShaderUniform<Matrix4<f32>>,
    // Data storage
    paths: Vec<PathData>,
}

impl RingRenderer {
    pub fn new() -> Self {
        let mut shader = Effect::new_from_str(VERTEX_SRC, FRAGMENT_SRC);

        shader.use_program();

        RingRenderer {
            pos: shader
                .get_attrib::<Point3<f32>>("position")
                .expect("Failed to get shader attribute."),
            color: shader
                .get_attrib::<Point3<f32>>("color")
                .expect("Failed to get shader attribute."),
            view: shader
                .get_uniform::<Matrix4<f32>>("view")
                .expect("Failed to get shader uniform."),
            proj: shader
                .get_uniform::<Matrix4<f32>>("proj")
                .expect("Failed to get shader uniform."),
            shader,
            paths: vec![],
        }
    }

    pub fn add_path(
        &mut self,
        points: impl Iterator<Item = Point3<f32>>,
        color: Point3<f32>,
        width: f32,
    ) {
        // Collect points and put them into the GPUVec
        let points: Vec<_> = points.collect();
        let mut data = Vec::with_capacity(4 * points.len());
        for pts in points.windows(2) {
            data.push(pts[0]);
            data.push(color);
            data.push(pts[1]);
            data.push(color);
        }

        self.paths.push(PathData {
            lines: GPUVec::new(data, BufferType::Array, AllocationType::StreamDraw),
            width,
        });
    }
}

impl Renderer for RingRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        if self.paths.is_empty() {
            return;
        }

        self.shader.use_program();
        self.pos.enable();
        self.color.enable();

        camera.upload(pass, &mut self.proj, &mut self.view);

        let ctxt = Context::get();
        for path in self.paths.iter_mut() {
            self.pos.bind_sub_buffer(&mut path.lines, 1, 0);
            self.color.bind_sub_buffer(&mut path.lines, 1, 1);

            ctxt.line_width(path.width);
            ctxt.draw_arrays(Context::LINES, 0, (path.lines.len() / 2) as i32);
        }
        ctxt.line_width(1.0);

        self.pos.disable();
        self.color.disable();

        self.paths.clear();
    }
}

/// Vertex shader used to display ring paths.
static VERTEX_SRC: &str = "#version 100
    attribute vec3 position;
    attribute vec3 color;
    varying   vec3 vColor;
    uniform   mat4 proj;
    uniform   mat4 view;
    void main() {
        gl_Position = proj * view * vec4(position, 1.0);
        vColor = color;
    }";

/// Fragment shader used to display ring paths.
static FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    varying vec3 vColor;
    void main() {
        gl_FragColor = vec4(vColor, 1.0);
    }";
