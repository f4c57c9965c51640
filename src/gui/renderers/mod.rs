use kiss3d::camera::Camera;
use kiss3d::renderer::Renderer;
use nalgebra::Point3;

use self::ring_renderer::RingRenderer;
use self::star_renderer::StarRenderer;

mod plan_view;
mod ring_renderer;
mod star_renderer;
mod utils;

pub use plan_view::{
    PlanViewRenderer, CHART_MAX_X, CHART_MAX_Y, CHART_MIN_X, CHART_MIN_Y, LAYER_BACKDROP,
    LAYER_BORDER, LAYER_CRAFT, LAYER_DISCS, LAYER_ORBITS, LAYER_RINGS, LAYER_STARS,
};
pub use utils::circle_iter;

// Stars get the same point size in the flight view and on the plan chart.
const STAR_POINT_SIZE: f32 = 2.0;

pub struct CompoundRenderer {
    star_renderer: StarRenderer,
    ring_renderer: RingRenderer,
    plan_renderer: PlanViewRenderer,
}

impl CompoundRenderer {
    pub fn new() -> Self {
        CompoundRenderer {
            star_renderer: StarRenderer::new(STAR_POINT_SIZE),
            ring_renderer: RingRenderer::new(),
            plan_renderer: PlanViewRenderer::new(STAR_POINT_SIZE),
        }
    }

    pub fn draw_stars(&mut self, stars: &[Point3<f32>]) {
        self.star_renderer.set_stars(stars);
    }

    pub fn draw_ring(
        &mut self,
        path: impl Iterator<Item = Point3<f32>>,
        color: Point3<f32>,
        width: f32,
    ) {
        self.ring_renderer.add_path(path, color, width);
    }

    pub fn plan(&mut self) -> &mut PlanViewRenderer {
        &mut self.plan_renderer
    }
}

impl Renderer for CompoundRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        self.star_renderer.render(pass, camera);
        self.ring_renderer.render(pass, camera);
        self.plan_renderer.render(pass, camera);
    }
}
