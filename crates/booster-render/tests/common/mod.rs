//! Shared rapier fixture for the integration tests.
//!
//! The booster stands at `x = 30`, so with the default 600 px viewport and
//! 10 px/m scale the camera's left edge sits at world `x = 0` and, while the
//! booster is low enough for the vertical clamp to apply, world `(x, y)`
//! lands on frame pixel `(col, row) = (10x, 599 - 10y)`.

#![allow(dead_code)]

use booster_render::prelude::*;
use booster_render::rapier2d::prelude::*;

/// Horizontal position of the booster in every fixture.
pub const BOOSTER_X: Real = 30.0;

pub const SKY: [u8; 3] = [135, 206, 235];
pub const GROUND: [u8; 3] = [50, 205, 50];
pub const FUSELAGE: [u8; 3] = [255, 255, 255];
pub const NOZZLE: [u8; 3] = [0, 0, 0];
pub const RED: [u8; 3] = [255, 0, 0];

/// A small landing world owning its rapier sets and role handles.
pub struct TestWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub terrain: RigidBodyHandle,
    pub launch_pad: RigidBodyHandle,
    pub fuselage: RigidBodyHandle,
    pub nozzle: Option<RigidBodyHandle>,
    pub legs: Vec<RigidBodyHandle>,
    pub side_thrusters: Vec<RigidBodyHandle>,
    pub particles: Vec<Particle>,
    pub markers: Vec<Point<Real>>,
}

impl TestWorld {
    /// Ground slab covering `y in [0, 5]`, a pad, and a booster whose
    /// fuselage center sits at `altitude`.
    pub fn new(altitude: Real) -> Self {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        let terrain = bodies.insert(RigidBodyBuilder::fixed().build());
        colliders.insert_with_parent(
            ColliderBuilder::cuboid(200.0, 2.5)
                .translation(vector![0.0, 2.5])
                .build(),
            terrain,
            &mut bodies,
        );
        colliders.insert_with_parent(
            ColliderBuilder::polyline(
                vec![point![-200.0, 5.0], point![0.0, 5.0], point![200.0, 5.0]],
                None,
            )
            .build(),
            terrain,
            &mut bodies,
        );

        let launch_pad = bodies.insert(
            RigidBodyBuilder::fixed()
                .translation(vector![BOOSTER_X, 5.5])
                .build(),
        );
        colliders.insert_with_parent(
            ColliderBuilder::cuboid(6.0, 0.5).build(),
            launch_pad,
            &mut bodies,
        );

        let mut world = Self {
            bodies,
            colliders,
            terrain,
            launch_pad,
            fuselage: RigidBodyHandle::invalid(),
            nozzle: None,
            legs: Vec::new(),
            side_thrusters: Vec::new(),
            particles: Vec::new(),
            markers: Vec::new(),
        };

        world.fuselage =
            world.add_dynamic(point![BOOSTER_X, altitude], ColliderBuilder::cuboid(0.5, 4.0));
        world.nozzle = Some(world.add_dynamic(
            point![BOOSTER_X, altitude - 4.5],
            ColliderBuilder::cuboid(0.4, 0.5),
        ));
        for side in [-1.0, 1.0] {
            let leg = world.add_dynamic(
                point![BOOSTER_X + side * 1.2, altitude - 3.0],
                ColliderBuilder::cuboid(0.15, 1.5),
            );
            world.legs.push(leg);
            let thruster = world.add_dynamic(
                point![BOOSTER_X + side * 0.7, altitude + 3.5],
                ColliderBuilder::cuboid(0.2, 0.2),
            );
            world.side_thrusters.push(thruster);
        }
        world
    }

    /// Insert a dynamic body with one collider and settle its mass properties.
    pub fn add_dynamic(&mut self, at: Point<Real>, collider: ColliderBuilder) -> RigidBodyHandle {
        let handle = self.bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(at.coords)
                .build(),
        );
        self.colliders
            .insert_with_parent(collider.build(), handle, &mut self.bodies);
        self.bodies[handle].recompute_mass_properties_from_colliders(&self.colliders);
        handle
    }

    /// Add an exhaust particle ball of radius 0.3.
    pub fn add_particle(&mut self, at: Point<Real>, ttl: f32) -> RigidBodyHandle {
        let body = self.add_dynamic(at, ColliderBuilder::ball(0.3));
        self.particles.push(Particle { body, ttl });
        body
    }

    /// Borrow the world as a paintable scene.
    pub fn scene(&self) -> LandingScene<'_> {
        let state = self
            .bodies
            .get(self.fuselage)
            .map(BoosterState::from_body)
            .unwrap_or_default();
        LandingScene {
            bodies: &self.bodies,
            colliders: &self.colliders,
            terrain: self.terrain,
            launch_pad: self.launch_pad,
            fuselage: self.fuselage,
            nozzle: self.nozzle,
            legs: &self.legs,
            side_thrusters: &self.side_thrusters,
            particles: &self.particles,
            markers: &self.markers,
            state,
        }
    }
}

/// Frame row for a world height while the camera is floor-clamped.
pub fn row(y: Real) -> usize {
    (599.0 - y * 10.0).round() as usize
}

/// Frame column for a world `x` in every fixture.
pub fn col(x: Real) -> usize {
    (x * 10.0).round() as usize
}
