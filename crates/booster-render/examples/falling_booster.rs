//! Falling booster demo -- a booster drops onto the pad under a simple
//! throttle controller while the painter draws every frame.
//!
//! Run with:
//!   cargo run --example falling_booster --features display -p booster-render
//!
//! Headless, saving the final frame:
//!   cargo run --example falling_booster -p booster-render -- \
//!       --mode rgb_array --snapshot landing.png

use std::path::PathBuf;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use tracing_subscriber::EnvFilter;

use booster_render::prelude::*;
use booster_render::rapier2d::prelude::*;

const DT: Real = 1.0 / 60.0;
const GRAVITY: Real = -9.81;
const PARTICLE_TTL: f32 = 1.0;
const PARTICLE_RADIUS: Real = 0.25;

#[derive(Parser)]
#[command(name = "falling_booster", about = "Paint a booster landing simulation")]
struct Cli {
    /// Output mode: "human" opens a window, anything else stays headless
    #[arg(short, long, default_value = "human")]
    mode: String,

    /// Stop after this many frames even if the booster has not landed
    #[arg(short, long, default_value = "900")]
    frames: u64,

    /// Starting altitude of the fuselage center (m)
    #[arg(short, long, default_value = "80.0")]
    altitude: Real,

    /// RNG seed for exhaust particle spread
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Save the last headless frame to this PNG file
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Mark the fuselage center of mass with a debug cross
    #[arg(long)]
    markers: bool,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

struct Simulation {
    pipeline: PhysicsPipeline,
    integration_params: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    terrain: RigidBodyHandle,
    launch_pad: RigidBodyHandle,
    fuselage: RigidBodyHandle,
    nozzle: RigidBodyHandle,
    legs: Vec<RigidBodyHandle>,
    side_thrusters: Vec<RigidBodyHandle>,
    particles: Vec<Particle>,
    markers: Vec<Point<Real>>,
    rng: Pcg64,
}

impl Simulation {
    fn new(altitude: Real, seed: u64) -> Self {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let mut impulse_joints = ImpulseJointSet::new();

        let terrain = bodies.insert(RigidBodyBuilder::fixed().build());
        colliders.insert_with_parent(
            ColliderBuilder::polyline(
                vec![
                    point![-200.0, 6.0],
                    point![-60.0, 2.0],
                    point![-15.0, 5.0],
                    point![15.0, 5.0],
                    point![60.0, 3.0],
                    point![200.0, 8.0],
                ],
                None,
            )
            .build(),
            terrain,
            &mut bodies,
        );
        colliders.insert_with_parent(
            ColliderBuilder::cuboid(200.0, 2.0)
                .translation(vector![0.0, 1.0])
                .build(),
            terrain,
            &mut bodies,
        );

        let launch_pad = bodies.insert(
            RigidBodyBuilder::fixed()
                .translation(vector![0.0, 5.5])
                .build(),
        );
        colliders.insert_with_parent(
            ColliderBuilder::cuboid(8.0, 0.5).build(),
            launch_pad,
            &mut bodies,
        );

        let part = |bodies: &mut RigidBodySet,
                    colliders: &mut ColliderSet,
                    offset: Vector<Real>,
                    collider: Collider| {
            let handle = bodies.insert(
                RigidBodyBuilder::dynamic()
                    .translation(vector![0.0, altitude] + offset)
                    .build(),
            );
            colliders.insert_with_parent(collider, handle, bodies);
            handle
        };

        let fuselage = part(
            &mut bodies,
            &mut colliders,
            vector![0.0, 0.0],
            ColliderBuilder::cuboid(0.6, 4.5).density(2.0).build(),
        );
        let nozzle = part(
            &mut bodies,
            &mut colliders,
            vector![0.0, -5.0],
            ColliderBuilder::convex_hull(&[
                point![-0.3, 0.5],
                point![0.3, 0.5],
                point![0.5, -0.5],
                point![-0.5, -0.5],
            ])
            .unwrap_or_else(|| ColliderBuilder::cuboid(0.4, 0.5))
            .build(),
        );
        impulse_joints.insert(
            fuselage,
            nozzle,
            FixedJointBuilder::new()
                .local_anchor1(point![0.0, -4.5])
                .local_anchor2(point![0.0, 0.5]),
            true,
        );

        let mut legs = Vec::new();
        let mut side_thrusters = Vec::new();
        for side in [-1.0, 1.0] {
            let leg = part(
                &mut bodies,
                &mut colliders,
                vector![side * 1.4, -3.5],
                ColliderBuilder::triangle(
                    point![0.0, 1.5],
                    point![side * 1.2, -1.5],
                    point![side * 0.8, -1.5],
                )
                .friction(1.0)
                .build(),
            );
            impulse_joints.insert(
                fuselage,
                leg,
                FixedJointBuilder::new()
                    .local_anchor1(point![side * 0.6, -2.0])
                    .local_anchor2(point![side * -0.8, 1.5]),
                true,
            );
            legs.push(leg);

            let thruster = part(
                &mut bodies,
                &mut colliders,
                vector![side * 0.8, 4.0],
                ColliderBuilder::cuboid(0.2, 0.2).build(),
            );
            impulse_joints.insert(
                fuselage,
                thruster,
                FixedJointBuilder::new()
                    .local_anchor1(point![side * 0.6, 4.0])
                    .local_anchor2(point![side * -0.2, 0.0]),
                true,
            );
            side_thrusters.push(thruster);
        }

        Self {
            pipeline: PhysicsPipeline::new(),
            integration_params: IntegrationParameters {
                dt: DT,
                ..Default::default()
            },
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders,
            impulse_joints,
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            terrain,
            launch_pad,
            fuselage,
            nozzle,
            legs,
            side_thrusters,
            particles: Vec::new(),
            markers: Vec::new(),
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    /// Throttle the main engine, emit exhaust, age particles, step physics.
    fn step(&mut self, show_markers: bool) {
        let throttle = {
            let Some(fuselage) = self.bodies.get_mut(self.fuselage) else {
                return;
            };
            // Aim for a descent rate that shrinks with altitude.
            let target_vy = -(fuselage.translation().y * 0.25).clamp(1.0, 15.0);
            let error = target_vy - fuselage.linvel().y;
            let throttle = (1.0 + 0.4 * error).clamp(0.0, 2.5);
            let weight = fuselage.mass() * -GRAVITY * 1.6;
            fuselage.reset_forces(true);
            let up = fuselage.rotation() * vector![0.0, 1.0];
            fuselage.add_force(up * weight * throttle, true);
            throttle
        };

        self.age_particles();
        if throttle > 0.1 {
            self.emit_particle();
        }

        self.markers.clear();
        if show_markers {
            if let Some(fuselage) = self.bodies.get(self.fuselage) {
                self.markers.push(*fuselage.center_of_mass());
            }
        }

        self.pipeline.step(
            &vector![0.0, GRAVITY],
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    fn emit_particle(&mut self) {
        let Some(nozzle) = self.bodies.get(self.nozzle) else {
            return;
        };
        let exit = nozzle.position() * point![0.0, -0.6];
        let spread = self.rng.gen_range(-3.0..3.0);
        let speed = self.rng.gen_range(15.0..25.0);
        let velocity = nozzle.rotation() * vector![spread, -speed] + nozzle.linvel();

        let body = self.bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(exit.coords)
                .linvel(velocity)
                .build(),
        );
        self.colliders.insert_with_parent(
            ColliderBuilder::ball(PARTICLE_RADIUS)
                .density(0.01)
                .build(),
            body,
            &mut self.bodies,
        );
        self.particles.push(Particle {
            body,
            ttl: PARTICLE_TTL,
        });
    }

    fn age_particles(&mut self) {
        for particle in &mut self.particles {
            particle.ttl -= DT * 0.8;
        }
        let (alive, dead): (Vec<_>, Vec<_>) =
            self.particles.drain(..).partition(|p| p.ttl > 0.0);
        for particle in dead {
            self.bodies.remove(
                particle.body,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
        }
        self.particles = alive;
    }

    fn landed(&self) -> bool {
        let Some(fuselage) = self.bodies.get(self.fuselage) else {
            return true;
        };
        fuselage.linvel().norm() < 0.05 && fuselage.translation().y < 20.0
    }

    fn scene(&self) -> Result<LandingScene<'_>, PaintError> {
        let fuselage = self
            .bodies
            .get(self.fuselage)
            .ok_or(PaintError::MissingBody(self.fuselage))?;
        Ok(LandingScene {
            bodies: &self.bodies,
            colliders: &self.colliders,
            terrain: self.terrain,
            launch_pad: self.launch_pad,
            fuselage: self.fuselage,
            nozzle: Some(self.nozzle),
            legs: &self.legs,
            side_thrusters: &self.side_thrusters,
            particles: &self.particles,
            markers: &self.markers,
            state: BoosterState::from_body(fuselage),
        })
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let mode = RenderMode::parse(&cli.mode);
    let mut painter = Painter::new(mode);
    let mut sim = Simulation::new(cli.altitude, cli.seed);
    let mut last_frame = None;

    for frame in 0..cli.frames {
        sim.step(cli.markers);
        if let Some(rgb) = painter.paint(&sim.scene()?)? {
            last_frame = Some(rgb);
        }
        if sim.landed() {
            tracing::info!(frame, "booster at rest");
            break;
        }
    }

    painter.dispose();

    match (cli.snapshot, last_frame) {
        (Some(path), Some(frame)) => {
            frame.into_image().save(&path)?;
            println!("saved final frame to {}", path.display());
        }
        (Some(_), None) => {
            anyhow::bail!("--snapshot needs a headless mode (e.g. --mode rgb_array)");
        }
        (None, _) => {}
    }

    let state = sim.scene()?.state;
    println!(
        "final state: x={:.2} y={:.2} vx={:.2} vy={:.2} angle={:.2}",
        state.x, state.y, state.vx, state.vy, state.angle
    );
    Ok(())
}
