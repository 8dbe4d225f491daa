//! Start/stop animation loop driving a [`SimulationController`]
//!
//! While running, a background thread repeatedly:
//! 1. asks the sink whether it is still alive, stopping if not
//! 2. steps the simulation
//! 3. hands the frame to the sink
//! 4. sleeps for the idle interval
//!
//! Stopping is observed at the top of the next iteration, so it takes at
//! most one step plus one idle interval.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{error, info, warn};

use crate::config::LoopConfig;
use crate::controller::SimulationController;
use crate::error::Result;
use crate::simulation::Frame;

/// Whatever draws the frames: a plot window, a recorder, a test probe.
pub trait RenderSink: Send + Sync + 'static {
    /// Polled once per iteration; `false` ends the loop.
    fn is_alive(&self) -> bool;

    fn present(&self, frame: &Frame);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

pub struct AnimationLoop<S: RenderSink> {
    controller: SimulationController,
    sink: Arc<S>,
    config: LoopConfig,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<u64>>,
}

impl<S: RenderSink> AnimationLoop<S> {
    pub fn new(controller: SimulationController, sink: Arc<S>, config: LoopConfig) -> Self {
        Self {
            controller,
            sink,
            config,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    pub fn state(&self) -> LoopState {
        if self.running.load(Ordering::Acquire) {
            LoopState::Running
        } else {
            LoopState::Stopped
        }
    }

    pub fn controller(&self) -> &SimulationController {
        &self.controller
    }

    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    pub fn start(&mut self) -> Result<()> {
        if self.state() == LoopState::Running {
            return Ok(());
        }
        // A previous run may have ended on its own (closed sink).
        self.wait();

        self.running.store(true, Ordering::Release);
        let controller = self.controller.clone();
        let sink = Arc::clone(&self.sink);
        let running = Arc::clone(&self.running);
        let idle = self.config.idle_interval;

        let spawned = thread::Builder::new()
            .name("animation-loop".into())
            .spawn(move || run(&controller, sink.as_ref(), &running, idle));

        match spawned {
            Ok(handle) => {
                info!("animation loop started");
                self.worker = Some(handle);
                Ok(())
            }
            Err(err) => {
                self.running.store(false, Ordering::Release);
                Err(err.into())
            }
        }
    }

    /// Request a stop and wait for the worker to finish its current iteration.
    pub fn stop(&mut self) -> Option<u64> {
        self.running.store(false, Ordering::Release);
        self.wait()
    }

    pub fn toggle(&mut self) -> Result<LoopState> {
        match self.state() {
            LoopState::Running => {
                self.stop();
            }
            LoopState::Stopped => self.start()?,
        }
        Ok(self.state())
    }

    /// Block until the current run ends on its own, returning its step count.
    pub fn wait(&mut self) -> Option<u64> {
        let handle = self.worker.take()?;
        match handle.join() {
            Ok(steps) => Some(steps),
            Err(_) => {
                self.running.store(false, Ordering::Release);
                error!("animation loop panicked");
                None
            }
        }
    }
}

impl<S: RenderSink> Drop for AnimationLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<S: RenderSink>(
    controller: &SimulationController,
    sink: &S,
    running: &AtomicBool,
    idle: Duration,
) -> u64 {
    let mut steps = 0;

    while running.load(Ordering::Acquire) {
        if !sink.is_alive() {
            info!("render sink closed after {steps} steps");
            break;
        }

        match controller.step() {
            Ok(frame) => sink.present(&frame),
            Err(err) => {
                warn!("stopping animation loop: {err}");
                break;
            }
        }
        steps += 1;

        thread::sleep(idle);
    }

    running.store(false, Ordering::Release);
    info!("animation loop stopped");
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use std::sync::atomic::AtomicUsize;
    use std::time::Instant;

    /// Dies on the `close_on`-th liveness check.
    struct Probe {
        checks: AtomicUsize,
        frames: AtomicUsize,
        close_on: usize,
    }

    impl Probe {
        fn closing_on(close_on: usize) -> Arc<Self> {
            Arc::new(Self {
                checks: AtomicUsize::new(0),
                frames: AtomicUsize::new(0),
                close_on,
            })
        }
    }

    impl RenderSink for Probe {
        fn is_alive(&self) -> bool {
            self.checks.fetch_add(1, Ordering::SeqCst) + 1 < self.close_on
        }

        fn present(&self, _frame: &Frame) {
            self.frames.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn controller() -> SimulationController {
        SimulationController::new(SimulationConfig::default()).unwrap()
    }

    #[test]
    fn starts_stopped() {
        let animation = AnimationLoop::new(controller(), Probe::closing_on(usize::MAX), LoopConfig::default());
        assert_eq!(animation.state(), LoopState::Stopped);
    }

    #[test]
    fn closed_sink_ends_the_loop() {
        let sink = Probe::closing_on(3);
        let mut animation = AnimationLoop::new(controller(), Arc::clone(&sink), LoopConfig::default());

        animation.start().unwrap();
        assert_eq!(animation.wait(), Some(2));
        assert_eq!(animation.state(), LoopState::Stopped);
        assert_eq!(sink.frames.load(Ordering::SeqCst), 2);
        assert_eq!(animation.controller().read(|sim| sim.steps()), 2);
    }

    #[test]
    fn toggle_stops_promptly() {
        let sink = Probe::closing_on(usize::MAX);
        let config = LoopConfig {
            idle_interval: Duration::from_millis(2),
        };
        let mut animation = AnimationLoop::new(controller(), Arc::clone(&sink), config);

        assert_eq!(animation.toggle().unwrap(), LoopState::Running);
        while sink.frames.load(Ordering::SeqCst) < 3 {
            thread::yield_now();
        }

        let started = Instant::now();
        assert_eq!(animation.toggle().unwrap(), LoopState::Stopped);
        assert!(started.elapsed() < Duration::from_secs(1));

        let presented = sink.frames.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(10));
        assert_eq!(sink.frames.load(Ordering::SeqCst), presented);
        assert_eq!(animation.controller().read(|sim| sim.steps()) as usize, presented);
    }

    #[test]
    fn restarts_after_sink_closed_run() {
        let sink = Probe::closing_on(2);
        let mut animation = AnimationLoop::new(controller(), Arc::clone(&sink), LoopConfig::default());

        animation.start().unwrap();
        assert_eq!(animation.wait(), Some(1));

        // the probe stays closed, so a restart ends immediately
        animation.start().unwrap();
        assert_eq!(animation.wait(), Some(0));
        assert_eq!(sink.frames.load(Ordering::SeqCst), 1);
    }
}
