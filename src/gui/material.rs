use kiss3d::camera::Camera;
use kiss3d::context::Context;
use kiss3d::light::Light;
use kiss3d::resource::{Effect, Material, Mesh, ShaderAttribute, ShaderUniform};
use kiss3d::scene::ObjectData;

use nalgebra::{Isometry3, Matrix3, Matrix4, Point3, Vector3};

/// Material for the sun. The scene light sits at the camera, which shades
/// every sphere on its sunward side; the sun itself must ignore that light
/// or it renders as a dark ball in the middle of the system. Every fragment
/// gets the node's color at full brightness.
pub struct EmissiveMaterial {
    shader: Effect,
    position: ShaderAttribute<Point3<f32>>,
    transform: ShaderUniform<Matrix4<f32>>,
    scale: ShaderUniform<Matrix3<f32>>,
    view: ShaderUniform<Matrix4<f32>>,
    proj: ShaderUniform<Matrix4<f32>>,
    color: ShaderUniform<Point3<f32>>,
}

impl EmissiveMaterial {
    pub fn new() -> Self {
        let mut shader = Effect::new_from_str(VERTEX_SRC, FRAGMENT_SRC);

        shader.use_program();

        EmissiveMaterial {
            position: shader
                .get_attrib::<Point3<f32>>("position")
                .expect("Failed to get shader attribute."),
            transform: shader
                .get_uniform::<Matrix4<f32>>("transform")
                .expect("Failed to get shader uniform."),
            scale: shader
                .get_uniform::<Matrix3<f32>>("scale")
                .expect("Failed to get shader uniform."),
            view: shader
                .get_uniform::<Matrix4<f32>>("view")
                .expect("Failed to get shader uniform."),
            proj: shader
                .get_uniform::<Matrix4<f32>>("proj")
                .expect("Failed to get shader uniform."),
            color: shader
                .get_uniform::<Point3<f32>>("color")
                .expect("Failed to get shader uniform."),
            shader,
        }
    }
}

impl Material for EmissiveMaterial {
    fn render(
        &mut self,
        pass: usize,
        transform: &Isometry3<f32>,
        scale: &Vector3<f32>,
        camera: &mut dyn Camera,
        _light: &Light,
        data: &ObjectData,
        mesh: &mut Mesh,
    ) {
        self.shader.use_program();
        self.position.enable();

        camera.upload(pass, &mut self.proj, &mut self.view);
        self.transform.upload(&transform.to_homogeneous());
        self.scale.upload(&Matrix3::from_diagonal(scale));
        self.color.upload(data.color());

        mesh.bind_coords(&mut self.position);
        mesh.bind_faces();

        Context::get().draw_elements(
            Context::TRIANGLES,
            mesh.num_pts() as i32,
            Context::UNSIGNED_SHORT,
            0,
        );

        mesh.unbind();
        self.position.disable();
    }
}

/// Vertex shader: the usual transform chain, no lighting inputs.
static VERTEX_SRC: &str = "#version 100
    attribute vec3 position;
    uniform   mat4 transform;
    uniform   mat3 scale;
    uniform   mat4 proj;
    uniform   mat4 view;
    void main() {
        gl_Position = proj * view * transform * vec4(scale * position, 1.0);
    }";

/// Fragment shader: unshaded flat color.
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
