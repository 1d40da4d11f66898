mod app;
mod gpu;

use std::error::Error;
use std::time::Instant;

use winit::event_loop::{ControlFlow, EventLoop};

use particle_network::capability::{detect_hints, profile_or_conservative};
use particle_network::config::{flag_value, has_flag, HEADLESS_TICK_SECONDS};
use particle_network::{FieldConfig, FieldError, ParticleField, PointerState};

use crate::app::App;

/// Viewport assumed when there is no window
const HEADLESS_VIEWPORT: (u32, u32) = (1280, 720);
const DEFAULT_HEADLESS_FRAMES: u32 = 600;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let config = FieldConfig::from_args(&args)?;

    if has_flag(&args, "--headless") {
        let frames = match flag_value(&args, "--frames")? {
            Some(raw) => raw.parse::<u32>().map_err(|_| FieldError::InvalidArgument {
                flag: "--frames",
                value: raw.to_string(),
            })?,
            None => DEFAULT_HEADLESS_FRAMES,
        };
        run_headless(&config, frames)?;
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}

/// Drive the field without a renderer, logging once per simulated second
fn run_headless(config: &FieldConfig, frames: u32) -> Result<(), FieldError> {
    let profile = profile_or_conservative(detect_hints(config.count, None), config.count);
    let mut field = ParticleField::new(config, profile, HEADLESS_VIEWPORT)?;

    let ticks_per_second = (1.0 / HEADLESS_TICK_SECONDS).round() as u32;
    let started = Instant::now();
    let mut total_edges = 0usize;

    for frame in 0..frames {
        // Slow circle so the pointer nudge is exercised
        let t = frame as f32 * HEADLESS_TICK_SECONDS;
        let pointer = PointerState::new((t * 0.5).cos(), (t * 0.5).sin());

        field.tick(HEADLESS_TICK_SECONDS, Some(pointer));
        // Nothing consumes the upload
        field.mark_uploaded();
        total_edges += field.last_edge_count();

        if (frame + 1) % ticks_per_second == 0 {
            log::info!(
                "t={:.1}s particles={} edges={}",
                field.clock().total_seconds(),
                field.store().len(),
                field.last_edge_count()
            );
        }
    }

    let elapsed = started.elapsed();
    log::info!(
        "Done: {} frames in {:.2?} ({:.3} ms/frame), mean {:.1} edges/frame",
        frames,
        elapsed,
        elapsed.as_secs_f64() * 1000.0 / frames.max(1) as f64,
        total_edges as f64 / frames.max(1) as f64
    );
    Ok(())
}
