//! Magnetic Pendulum Simulation
//!
//! Damped pendulums swinging over a ring of magnets, advanced one fixed step
//! at a time by an animation loop while the magnet layout and physical
//! parameters are changed live:
//!
//! - **Force model**: linear restoring force, velocity damping, and an
//!   inverse-cube pull or push from each magnet below the pendulum plane
//! - **Integrators**: fixed-step RK4 and adaptive Dormand–Prince 5(4)
//! - **Trails**: a fixed-length ring buffer of recent positions per body
//! - **Controller**: a lock-guarded handle shared by the animation thread and UI callbacks
//! - **Animation loop**: start/stop background stepping that ends when its render sink closes

pub mod animation;
pub mod config;
pub mod controller;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod magnets;
pub mod seeding;
pub mod simulation;
pub mod state;
pub mod trajectory;

pub use animation::{AnimationLoop, LoopState, RenderSink};
pub use config::{LoopConfig, SimulationConfig};
pub use controller::SimulationController;
pub use error::{PendulumError, Result};
pub use integrator::{Integrator, Method};
pub use magnets::{Magnet, MagnetArray, PhysicalParameters, Polarity};
pub use seeding::SeedPolicy;
pub use simulation::{Frame, Simulation};
pub use state::VectorState;
pub use trajectory::TrajectoryHistory;
