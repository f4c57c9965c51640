use kiss3d::camera::Camera;
use kiss3d::context::Context;
use kiss3d::renderer::Renderer;
use kiss3d::resource::{
    AllocationType, BufferType, Effect, GPUVec, ShaderAttribute, ShaderUniform,
};

use nalgebra::{Matrix4, Point3};

/// Draws the background starfield as a cloud of fixed-size points.
///
/// The cloud is in world coordinates, so stars that fall inside the system
/// get occluded by the planets like everything else.
pub struct StarRenderer {
    // OpenGL stuff
    shader: Effect,
    pos: ShaderAttribute<Point3<f32>>,
    view: ShaderUniform<Matrix4<f32>>,
    proj: ShaderUniform<Matrix4<f32>>,
    color: ShaderUniform<Point3<f32>>,
    point_size: ShaderUniform<f32>,
    // Data storage
    points: Vec<Point3<f32>>,
    size: f32,
}

impl StarRenderer {
    pub fn new(size: f32) -> Self {
        let mut shader = Effect::new_from_str(VERTEX_SRC, FRAGMENT_SRC);

        shader.use_program();

        StarRenderer {
            pos: shader
                .get_attrib::<Point3<f32>>("position")
                .expect("Failed to get shader attribute."),
            view: shader
                .get_uniform::<Matrix4<f32>>("view")
                .expect("Failed to get shader uniform."),
            proj: shader
                .get_uniform::<Matrix4<f32>>("proj")
                .expect("Failed to get shader uniform."),
            color: shader
                .get_uniform::<Point3<f32>>("color")
                .expect("Failed to get shader uniform."),
            point_size: shader
                .get_uniform::<f32>("point_size")
                .expect("Failed to get shader uniform."),
            shader,
            points: vec![],
            size,
        }
    }

    /// Replaces the cloud drawn this frame. The field rerolls every frame
    /// while it is live, so there is nothing worth retaining.
    pub fn set_stars(&mut self, stars: &[Point3<f32>]) {
        self.points.clear();
        self.points.extend_from_slice(stars);
    }
}

impl Renderer for StarRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        if self.points.is_empty() {
            return;
        }

        let mut star_points = GPUVec::new(
            std::mem::take(&mut self.points),
            BufferType::Array,
            AllocationType::StreamDraw,
        );

        self.shader.use_program();
        self.pos.enable();

        camera.upload(pass, &mut self.proj, &mut self.view);
        self.color.upload(&Point3::new(1.0, 1.0, 1.0));
        self.point_size.upload(&self.size);

        self.pos.bind_sub_buffer(&mut star_points, 0, 0);

        let ctxt = Context::get();
        ctxt.draw_arrays(Context::POINTS, 0, star_points.len() as i32);

        self.pos.disable();
    }
}

/// Vertex shader used to display stars.
static VERTEX_SRC: &str = "#version 100
    attribute vec3 position;
    uniform   mat4 proj;
    uniform   mat4 view;
    uniform   float point_size;
    void main() {
        gl_Position = proj * view * vec4(position, 1.0);
        gl_PointSize = point_size;
    }";

/// Fragment shader used to display stars.
static FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    uniform vec3 color;
    void main() {
        gl_FragColor = vec4(color, 1.0);
    }";
