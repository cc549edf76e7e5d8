//! # Stress Demo
//!
//! Runs the debug overlay headless for a number of frames, interleaving a
//! fixed-rate physics step with render frames, and logs pool statistics once
//! per simulated second.

use std::path::PathBuf;

use clap::Parser;
use debug_overlay_demos::scene::{self, OrbitCamera};
use debug_overlay_drawer::{DebugDrawer, DrawerSettings, LoggingSink, Stats};

#[derive(Parser, Debug)]
#[command(name = "stress_demo", about = "Headless debug overlay stress test", version)]
struct Args {
    /// Number of render frames to simulate.
    #[arg(long, default_value = "600")]
    frames: u64,

    /// Render frame rate.
    #[arg(long, default_value = "60")]
    fps: f32,

    /// Physics steps per second.
    #[arg(long, default_value = "50")]
    physics_hz: f32,

    /// Animated boxes drawn every frame.
    #[arg(long, default_value = "500")]
    objects: u32,

    /// Drawer settings file (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Draw the bounds of every visible instance.
    #[arg(long)]
    show_bounds: bool,
}

fn log_stats(frame: u64, stats: &Stats) {
    log::info!(
        "frame {frame}: {} instances ({} physics), {} lines ({} physics), {} visible, {} created",
        stats.instances,
        stats.instances_physics,
        stats.lines,
        stats.lines_physics,
        stats.total_visible,
        stats.total_created,
    );
    log::debug!(
        "cull {}us/{}us, fill {}us/{}us",
        stats.time_culling_instances_usec,
        stats.time_culling_lines_usec,
        stats.time_filling_buffers_instances_usec,
        stats.time_filling_buffers_lines_usec,
    );
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting debug overlay stress demo");
    log::info!("Core version: {}", debug_overlay_core::VERSION);

    let mut settings = match &args.config {
        Some(path) => match DrawerSettings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => DrawerSettings::default(),
    };
    settings.drawer.visible_instance_bounds |= args.show_bounds;

    let drawer = DebugDrawer::new(settings, LoggingSink);
    let camera = OrbitCamera::default();

    let fps = args.fps.max(1.0);
    let frame_delta = 1.0 / fps;
    let physics_delta = 1.0 / args.physics_hz.max(1.0);
    let mut physics_accumulator = 0.0;
    let mut physics_steps = 0u64;
    let mut time = 0.0f32;

    for frame in 0..args.frames {
        physics_accumulator += frame_delta;
        while physics_accumulator >= physics_delta {
            physics_accumulator -= physics_delta;
            drawer.physics_process_start(physics_delta);
            scene::draw_physics_step(&drawer, time, physics_steps);
            drawer.physics_process_end(physics_delta);
            physics_steps += 1;
        }

        scene::draw_frame(&drawer, time, args.objects);
        scene::draw_security_camera(&drawer);
        drawer.process(frame_delta, &[camera.render_view(time)]);

        time += frame_delta;
        if frame % fps as u64 == 0 {
            log_stats(frame, &drawer.get_stats());
        }
    }

    log_stats(args.frames, &drawer.get_stats());
    log::info!("Done after {physics_steps} physics steps");
}
