//! Headless frame composition benchmarks.
//!
//! Measures one full `Painter::paint` call in `RgbArray` mode (sky fill,
//! every body, particles, HUD, flip, copy-out) for a landing scene with a
//! growing exhaust plume. At 60 FPS the whole frame budget is 16.67 ms.
//!
//! Run with: `cargo bench --bench paint_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use booster_render::prelude::*;
use booster_render::rapier2d::prelude::*;

// ---------------------------------------------------------------------------
// Scene fixture
// ---------------------------------------------------------------------------

struct BenchWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    terrain: RigidBodyHandle,
    launch_pad: RigidBodyHandle,
    fuselage: RigidBodyHandle,
    nozzle: RigidBodyHandle,
    legs: Vec<RigidBodyHandle>,
    particles: Vec<Particle>,
}

impl BenchWorld {
    fn new(particle_count: usize) -> Self {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let mut attach = |bodies: &mut RigidBodySet, body: RigidBody, collider: Collider| {
            let handle = bodies.insert(body);
            colliders.insert_with_parent(collider, handle, bodies);
            handle
        };

        let terrain = attach(
            &mut bodies,
            RigidBodyBuilder::fixed().translation(vector![0.0, 2.5]).build(),
            ColliderBuilder::cuboid(500.0, 2.5).build(),
        );
        let launch_pad = attach(
            &mut bodies,
            RigidBodyBuilder::fixed().translation(vector![0.0, 5.5]).build(),
            ColliderBuilder::cuboid(6.0, 0.5).build(),
        );
        let fuselage = attach(
            &mut bodies,
            RigidBodyBuilder::dynamic().translation(vector![0.0, 25.0]).build(),
            ColliderBuilder::cuboid(0.5, 4.0).build(),
        );
        let nozzle = attach(
            &mut bodies,
            RigidBodyBuilder::dynamic().translation(vector![0.0, 20.5]).build(),
            ColliderBuilder::cuboid(0.4, 0.5).build(),
        );
        let legs = [-1.2, 1.2]
            .into_iter()
            .map(|dx| {
                attach(
                    &mut bodies,
                    RigidBodyBuilder::dynamic()
                        .translation(vector![dx, 22.0])
                        .rotation(dx * 0.3)
                        .build(),
                    ColliderBuilder::cuboid(0.15, 1.5).build(),
                )
            })
            .collect();

        let mut rng = Pcg64::seed_from_u64(7);
        let particles = (0..particle_count)
            .map(|_| {
                let at = vector![rng.gen_range(-3.0..3.0), rng.gen_range(5.0..20.0)];
                let body = attach(
                    &mut bodies,
                    RigidBodyBuilder::dynamic().translation(at).build(),
                    ColliderBuilder::ball(0.3).build(),
                );
                Particle {
                    body,
                    ttl: rng.gen_range(0.0..1.2),
                }
            })
            .collect();

        Self {
            bodies,
            colliders,
            terrain,
            launch_pad,
            fuselage,
            nozzle,
            legs,
            particles,
        }
    }

    fn scene(&self) -> LandingScene<'_> {
        LandingScene {
            bodies: &self.bodies,
            colliders: &self.colliders,
            terrain: self.terrain,
            launch_pad: self.launch_pad,
            fuselage: self.fuselage,
            nozzle: Some(self.nozzle),
            legs: &self.legs,
            side_thrusters: &[],
            particles: &self.particles,
            markers: &[],
            state: BoosterState::from_body(&self.bodies[self.fuselage]),
        }
    }
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_headless_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("headless_frame");
    for particle_count in [0usize, 100, 1_000] {
        let world = BenchWorld::new(particle_count);
        let mut painter = Painter::new(RenderMode::RgbArray);
        group.bench_with_input(
            BenchmarkId::from_parameter(particle_count),
            &particle_count,
            |b, _| {
                b.iter(|| {
                    let frame = painter.paint(&world.scene()).expect("paint");
                    black_box(frame);
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_headless_frame);
criterion_main!(benches);
