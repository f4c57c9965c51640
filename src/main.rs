use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;

use sunward::gui::Simulation;
use sunward::model::World;

#[derive(Debug, Parser)]
struct Args {
    /// Window width in pixels
    #[arg(long, default_value_t = 1366)]
    width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = 768)]
    height: u32,

    /// Number of background stars
    #[arg(long, default_value_t = 1000)]
    stars: usize,

    /// Starting animation interval in milliseconds
    #[arg(long, default_value_t = 100)]
    interval_ms: u64,
}

fn print_interaction() {
    println!("Interactions:");
    println!("\tPress the left/right arrow keys to turn the craft.");
    println!("\tPress the up/down arrow keys to move the craft.");
    println!("\tPress space to toggle the animation on and off.");
    println!("\tPress the +/- keys to speed up/slow down the animation.");
    println!("\tPress s to freeze the starfield.");
    println!("\tPress escape to exit.");
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let world = World::new(args.stars, Duration::from_millis(args.interval_ms))?;
    log::info!(
        "{} bodies, {} stars, {} ms starting interval",
        world.catalog.len(),
        args.stars,
        args.interval_ms,
    );

    print_interaction();

    let mut window = Window::new_with_size("Solar System", args.width, args.height);
    window.set_light(Light::StickToCamera);
    window.set_framerate_limit(Some(60));

    let simulation = Simulation::new(world, &mut window);
    window.render_loop(simulation);

    Ok(())
}
