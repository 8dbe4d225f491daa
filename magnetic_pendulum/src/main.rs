//! Headless Magnetic Pendulum
//!
//! Runs the many-body pendulum fan against a render sink that logs instead of
//! drawing, while a scripted "user" changes magnets and restarts the fan the
//! way UI controls would.
//!
//! Set `RUST_LOG=debug` to see every parameter change.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use glam::DVec2;
use log::info;
use magnetic_pendulum::{
    AnimationLoop, Frame, LoopConfig, Polarity, RenderSink, SimulationConfig, SimulationController,
};

const BODIES: usize = 200;
const FRAMES: usize = 3000;
const LOG_EVERY: usize = 250;

/// Closes itself after a fixed number of frames, like a window the user shuts.
struct LogSink {
    frames: AtomicUsize,
    limit: usize,
}

impl RenderSink for LogSink {
    fn is_alive(&self) -> bool {
        self.frames.load(Ordering::Acquire) < self.limit
    }

    fn present(&self, frame: &Frame) {
        let n = self.frames.fetch_add(1, Ordering::AcqRel) + 1;
        if n % LOG_EVERY != 0 {
            return;
        }

        let spread = frame
            .positions
            .iter()
            .map(|p| p.distance(frame.positions[0]))
            .fold(0.0, f64::max);
        // Oldest trail point is drawn transparent, newest at 60% opacity.
        let tail = &frame.trails[0];
        let faded = tail
            .iter()
            .enumerate()
            .filter(|(i, _)| (*i as f64 / tail.len() as f64) * 0.6 < 0.1)
            .count();

        info!(
            "frame {n}: t = {:.3}, body 0 at ({:.3}, {:.3}), fan spread {:.3}, {faded}/{} trail points nearly invisible",
            frame.time,
            frame.positions[0].x,
            frame.positions[0].y,
            spread,
            tail.len()
        );
    }
}

fn main() -> magnetic_pendulum::Result<()> {
    common::init_logging();

    let controller = SimulationController::new(SimulationConfig::many_body(BODIES))?;
    let sink = Arc::new(LogSink {
        frames: AtomicUsize::new(0),
        limit: FRAMES,
    });
    let mut animation = AnimationLoop::new(controller.clone(), Arc::clone(&sink), LoopConfig::default());

    animation.toggle()?;

    thread::sleep(Duration::from_millis(500));
    controller.set_magnet_count(5)?;
    controller.set_magnet_strength(1.5)?;

    thread::sleep(Duration::from_millis(500));
    controller.set_polarity(Polarity::Repel);
    controller.set_friction(0.15)?;

    thread::sleep(Duration::from_millis(500));
    controller.toggle_polarity();
    controller.reinitialize_at(DVec2::new(-0.8, 1.2))?;

    if let Err(err) = controller.set_magnet_count(42) {
        info!("rejected as expected: {err}");
    }

    let steps = animation.wait().unwrap_or(0);
    let energy = controller.read(|sim| sim.kinetic_energy());
    info!("finished after {steps} steps, kinetic energy {energy:.4}");

    Ok(())
}
