use std::f32::consts::PI;

use kiss3d::camera::Camera;
use kiss3d::event::WindowEvent;
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector3};

// Clipping planes sized for the system: the nearest planet surface the craft
// can brush is a few units out, and the far corner of the starfield box sits
// inside 500.
const Z_NEAR: f32 = 5.0;
const Z_FAR: f32 = 500.0;

// This camera rides the craft's nose. There is no mouse or keyboard input
// here at all; the craft model owns the pose, and the view pushes it in once
// per frame. The eye floats ten units ahead of the craft along its heading
// and looks one unit further, so the craft itself is never on screen and the
// horizon stays level.
pub struct ChaseCamera {
    // -- pose --
    eye: Point3<f32>,
    target: Point3<f32>,
    // -- perspective --
    width: u32,
    height: u32,
    fovy: f32,
}

impl ChaseCamera {
    pub fn new(width: u32, height: u32) -> Self {
        ChaseCamera {
            eye: Point3::origin(),
            target: Point3::new(0.0, 0.0, -1.0),
            width,
            height,
            fovy: PI / 2.0,
        }
    }

    /// Re-derives the camera placement from the craft pose.
    pub fn set_pose(&mut self, position: Point3<f32>, forward: Vector3<f32>) {
        self.eye = position + 10.0 * forward;
        self.target = position + 11.0 * forward;
    }

    fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(
            self.width as f32 / self.height as f32,
            self.fovy,
            Z_NEAR,
            Z_FAR,
        )
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection().into_inner()
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }
}

impl Camera for ChaseCamera {
    fn handle_event(&mut self, _canvas: &Canvas, event: &WindowEvent) {
        if let WindowEvent::FramebufferSize(w, h) = *event {
            self.width = w;
            self.height = h;
        }
    }

    fn eye(&self) -> Point3<f32> {
        self.eye
    }

    fn view_transform(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye, &self.target, &Vector3::y())
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation().try_inverse().unwrap()
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.projection().znear(), self.projection().zfar())
    }

    fn update(&mut self, _canvas: &Canvas) {}

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection_matrix());
        view.upload(&self.view_matrix());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eye_leads_the_craft() {
        let mut camera = ChaseCamera::new(800, 600);
        camera.set_pose(Point3::new(0.0, 0.0, 150.0), Vector3::new(0.0, 0.0, -1.0));
        approx::assert_relative_eq!(camera.eye(), Point3::new(0.0, 0.0, 140.0));
    }

    #[test]
    fn test_view_faces_down_the_heading() {
        // Facing west from the start pad: west should map to the view's -z.
        let mut camera = ChaseCamera::new(800, 600);
        camera.set_pose(Point3::new(0.0, 0.0, 150.0), Vector3::new(-1.0, 0.0, 0.0));

        let view = camera.view_transform();
        let ahead = view * Point3::new(-20.0, 0.0, 150.0);
        approx::assert_relative_eq!(ahead, Point3::new(0.0, 0.0, -10.0), epsilon = 1e-4);
    }
}
