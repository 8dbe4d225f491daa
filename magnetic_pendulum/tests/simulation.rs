use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use glam::DVec2;
use magnetic_pendulum::{
    AnimationLoop, Frame, Integrator, LoopConfig, LoopState, MagnetArray, Method,
    PhysicalParameters, Polarity, RenderSink, SeedPolicy, Simulation, SimulationConfig,
    SimulationController, TrajectoryHistory, VectorState,
};

/// Build a simulation with a fixed RNG seed
fn simulation(config: SimulationConfig) -> Simulation {
    Simulation::new(config.with_rng_seed(42)).expect("valid config")
}

// ==================================================================================
// Equilibrium
// ==================================================================================

#[test]
fn rest_at_origin_stays_at_rest() {
    let magnets = MagnetArray::new(4, 1.0, 0.0).layout();
    let params = PhysicalParameters::new(1.0, 0.3, 0.3);

    for method in [Method::Rk4, Method::default()] {
        for dt in [1e-4, 0.005, 0.1, 1.0] {
            let mut integrator = Integrator::new(VectorState::at_rest(&[DVec2::ZERO; 3]), method);
            for _ in 0..10 {
                let state = integrator.advance(dt, &params, &magnets).unwrap();
                assert!(state.as_slice().iter().all(|&v| v == 0.0));
            }
        }
    }
}

#[test]
fn simulation_at_origin_without_magnet_strength_never_moves() {
    let config = SimulationConfig::many_body(5)
        .with_initial_point(DVec2::ZERO)
        .with_magnets(MagnetArray::new(3, 1.0, 0.0));
    let mut sim = simulation(config);

    for _ in 0..100 {
        let frame = sim.step().unwrap();
        assert!(frame.positions.iter().all(|&p| p == DVec2::ZERO));
    }
}

// ==================================================================================
// Reinitialize
// ==================================================================================

#[test]
fn reinitialize_clears_every_trail() {
    let trail = 50;
    for bodies in [1, 3, 40] {
        for magnets in [1, 4, 10] {
            let config = SimulationConfig::many_body(bodies)
                .with_trail_capacity(trail)
                .with_magnets(
                    MagnetArray::new(magnets, 1.2, 0.8)
                        .with_count_bounds(1..=10)
                        .with_polarity(if magnets % 2 == 0 { Polarity::Repel } else { Polarity::Attract }),
                );
            let mut sim = simulation(config);

            for _ in 0..trail {
                sim.step().unwrap();
            }

            let fresh: Vec<DVec2> = (0..bodies)
                .map(|i| DVec2::new(-0.5 + 0.01 * i as f64, 0.75))
                .collect();
            sim.reinitialize(&fresh).unwrap();

            assert_eq!(sim.time(), 0.0);
            assert_eq!(sim.positions(), &fresh[..]);
            for (history, &p) in sim.trails().iter().zip(&fresh) {
                assert_eq!(history.snapshot(), vec![p; trail]);
            }
            assert!(sim.state().velocities().all(|v| v == DVec2::ZERO));
        }
    }
}

#[test]
fn reinitialize_at_seeds_a_tight_arc_at_rest() {
    let spread = 0.05;
    let mut sim = simulation(SimulationConfig::many_body(200));
    for _ in 0..25 {
        sim.step().unwrap();
    }

    let point = DVec2::new(-1.1, 0.6);
    sim.reinitialize_at(point).unwrap();

    assert_eq!(sim.body_count(), 200);
    for p in sim.positions() {
        assert_abs_diff_eq!(p.length(), point.length(), epsilon = 1e-12);
        assert!(p.perp_dot(point).atan2(p.dot(point)).abs() <= spread / 2.0 + 1e-12);
    }
    assert!(sim.state().velocities().all(|v| v == DVec2::ZERO));
}

#[test]
fn cluster_policy_reinitializes_near_the_point() {
    let config = SimulationConfig::default().with_seed_policy(SeedPolicy::Cluster {
        count: 30,
        radius: 0.1,
    });
    let mut sim = simulation(config);
    sim.step().unwrap();

    let point = DVec2::new(0.4, -0.9);
    sim.reinitialize_at(point).unwrap();
    assert!(sim.positions().iter().all(|p| p.distance(point) <= 0.1 + 1e-12));
}

// ==================================================================================
// Magnet controls
// ==================================================================================

#[test]
fn magnet_count_is_idempotent() {
    let mut sim = simulation(SimulationConfig::many_body(2));

    sim.set_magnet_count(7).unwrap();
    let first = sim.magnets().to_vec();
    sim.set_magnet_count(7).unwrap();
    assert_eq!(sim.magnets(), &first[..]);

    sim.set_magnet_count(2).unwrap();
    sim.set_magnet_count(7).unwrap();
    assert_eq!(sim.magnets(), &first[..]);
}

#[test]
fn polarity_toggled_twice_restores_strengths() {
    let mut sim = simulation(SimulationConfig::many_body(2));
    sim.set_magnet_strength(0.6).unwrap();
    let original: Vec<f64> = sim.magnets().iter().map(|m| m.strength).collect();

    assert_eq!(sim.toggle_polarity(), Polarity::Repel);
    assert!(sim
        .magnets()
        .iter()
        .zip(&original)
        .all(|(m, &s)| m.strength == -s));

    assert_eq!(sim.toggle_polarity(), Polarity::Attract);
    let restored: Vec<f64> = sim.magnets().iter().map(|m| m.strength).collect();
    assert_eq!(restored, original);
}

#[test]
fn single_body_demo_keeps_three_magnets() {
    let mut sim = simulation(SimulationConfig::single_body());
    assert_eq!(sim.magnets().len(), 3);
    assert!(sim.set_magnet_count(4).is_err());
    assert_eq!(sim.magnets().len(), 3);
}

#[test]
fn parameter_change_applies_from_next_step() {
    let mut a = simulation(SimulationConfig::default());
    let mut b = simulation(SimulationConfig::default());
    let before = b.positions().to_vec();

    b.set_friction(2.0).unwrap();
    assert_eq!(b.positions(), &before[..]);
    assert_eq!(b.frame().trails, a.frame().trails);

    let fa = a.step().unwrap();
    let fb = b.step().unwrap();
    assert_ne!(fa.positions, fb.positions);
}

// ==================================================================================
// Damped oscillator
// ==================================================================================

#[test]
fn first_step_follows_damped_oscillator() {
    let (k, gamma) = (1.0, 0.3);
    let start = DVec2::new(1.5, 1.5);
    let config = SimulationConfig::single_body()
        .with_physics(PhysicalParameters::new(k, gamma, 0.3))
        .with_magnets(MagnetArray::new(1, 0.0, 0.0))
        .with_initial_point(start);
    let mut sim = simulation(config);
    assert_eq!(sim.magnets()[0].position, DVec2::ZERO);

    let frame = sim.step().unwrap();
    let p = frame.positions[0];

    assert!(p.length() < start.length());
    assert_eq!(p.x, p.y);

    // x(t) = x0·e^{-γt/2}(cos ωt + γ/(2ω)·sin ωt), ω = sqrt(k - γ²/4)
    let t = 0.005;
    let omega = (k - gamma * gamma / 4.0_f64).sqrt();
    let expected = start.x
        * (-gamma * t / 2.0).exp()
        * ((omega * t).cos() + gamma / (2.0 * omega) * (omega * t).sin());
    assert_relative_eq!(p.x, expected, epsilon = 1e-10);
}

#[test]
fn rk4_and_dormand_prince_agree() {
    let base = SimulationConfig::many_body(10).with_initial_point(DVec2::new(0.9, 0.4));
    let mut rk4 = simulation(base.clone().with_method(Method::Rk4));
    let mut dopri = simulation(base);

    for _ in 0..400 {
        rk4.step().unwrap();
        dopri.step().unwrap();
    }
    for (a, b) in rk4.positions().iter().zip(dopri.positions()) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-6);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-6);
    }
}

// ==================================================================================
// Trails
// ==================================================================================

#[test]
fn trail_keeps_last_five_of_seven() {
    let mut trail = TrajectoryHistory::new(5, DVec2::ZERO).unwrap();
    let points: Vec<DVec2> = (0..7).map(|i| DVec2::new(i as f64, (i * i) as f64)).collect();
    for &p in &points {
        trail.push(p);
    }
    assert_eq!(trail.snapshot(), points[2..].to_vec());
}

// ==================================================================================
// Animation loop
// ==================================================================================

struct CountingSink {
    checks: AtomicUsize,
    frames: AtomicUsize,
}

impl RenderSink for CountingSink {
    fn is_alive(&self) -> bool {
        self.checks.fetch_add(1, Ordering::SeqCst) < 2
    }

    fn present(&self, frame: &Frame) {
        assert_eq!(frame.positions.len(), frame.trails.len());
        self.frames.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn loop_stops_when_sink_closes_on_third_check() {
    let controller = SimulationController::new(SimulationConfig::many_body(3)).unwrap();
    let sink = Arc::new(CountingSink {
        checks: AtomicUsize::new(0),
        frames: AtomicUsize::new(0),
    });
    let mut animation = AnimationLoop::new(controller.clone(), Arc::clone(&sink), LoopConfig::default());

    assert_eq!(animation.toggle().unwrap(), LoopState::Running);
    assert_eq!(animation.wait(), Some(2));

    assert_eq!(animation.state(), LoopState::Stopped);
    assert_eq!(sink.checks.load(Ordering::SeqCst), 3);
    assert_eq!(sink.frames.load(Ordering::SeqCst), 2);
    assert_eq!(controller.frame().step_index, 2);
}
