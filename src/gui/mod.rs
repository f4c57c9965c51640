use std::time::Instant;

use kiss3d::camera::Camera;
use kiss3d::event::EventManager;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};

use self::view::View;
use crate::model::{FpsMeter, World};

mod camera;
mod controller;
mod material;
mod mesh;
mod renderers;
mod view;

pub use controller::Controller;

pub struct Simulation {
    world: World,
    view: View,
    controller: Controller,
    fps: FpsMeter,
}

impl Simulation {
    pub fn new(world: World, window: &mut Window) -> Self {
        let view = View::new(&world, window);
        Self {
            world,
            view,
            controller: Controller::new(),
            fps: FpsMeter::new(Instant::now()),
        }
    }

    fn process_user_input(&mut self, mut events: EventManager, now: Instant) {
        // Process events
        for event in events.iter() {
            self.controller
                .process_event(&event.value, &mut self.world, now);
        }
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        self.view.cameras_and_effect_and_renderer()
    }

    fn step(&mut self, window: &mut Window) {
        let now = Instant::now();

        self.process_user_input(window.events(), now);
        if self.controller.quit_requested() {
            window.close();
            return;
        }

        // Orbit steps land first, then the starfield reroll, so everything
        // drawn this frame agrees on the time.
        self.world.advance(now);
        self.world
            .starfield
            .refresh(window.width(), window.height());

        self.view.update_scene(&self.world);
        self.view.prerender(&self.world, window, self.fps.previous());

        if let Some(count) = self.fps.frame(now) {
            println!("FPS = {}", count);
        }
    }
}
