//! Read-only world snapshot consumed by the painter.
//!
//! A [`LandingScene`] borrows the rapier body and collider sets owned by the
//! simulation, plus the handles that give each body its role in the scene
//! (terrain, launch pad, booster parts, exhaust particles). The painter never
//! mutates or retains any of it past one [`paint`](crate::render::Painter::paint)
//! call.

use rapier2d::dynamics::{RigidBody, RigidBodyHandle, RigidBodySet};
use rapier2d::geometry::ColliderSet;
use rapier2d::math::{Point, Real};

use crate::error::PaintError;

/// A transient exhaust particle: a body plus its remaining life.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// The particle's rigid body.
    pub body: RigidBodyHandle,
    /// Remaining lifetime fraction in `[0, inf)`. Only used for coloring.
    pub ttl: f32,
}

/// Kinematic readouts shown in the HUD.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoosterState {
    /// Horizontal velocity (m/s).
    pub vx: f32,
    /// Vertical velocity (m/s).
    pub vy: f32,
    /// Horizontal position (m).
    pub x: f32,
    /// Vertical position (m).
    pub y: f32,
    /// Angular velocity (rad/s).
    pub w: f32,
    /// Orientation angle (rad).
    pub angle: f32,
}

impl BoosterState {
    /// Read the HUD values straight off a rapier body.
    pub fn from_body(body: &RigidBody) -> Self {
        let linvel = body.linvel();
        let translation = body.translation();
        Self {
            vx: linvel.x,
            vy: linvel.y,
            x: translation.x,
            y: translation.y,
            w: body.angvel(),
            angle: body.rotation().angle(),
        }
    }
}

/// Everything the painter needs to draw one frame.
///
/// The fuselage doubles as the camera's tracked body.
#[derive(Clone, Copy)]
pub struct LandingScene<'a> {
    /// Rigid bodies of the simulation.
    pub bodies: &'a RigidBodySet,
    /// Colliders attached to those bodies.
    pub colliders: &'a ColliderSet,
    /// Ground body.
    pub terrain: RigidBodyHandle,
    /// Landing pad body.
    pub launch_pad: RigidBodyHandle,
    /// Booster fuselage. Also the body the camera follows.
    pub fuselage: RigidBodyHandle,
    /// Main engine nozzle, absent once detached.
    pub nozzle: Option<RigidBodyHandle>,
    /// Landing legs in paint order.
    pub legs: &'a [RigidBodyHandle],
    /// Side (cold gas) thrusters in paint order.
    pub side_thrusters: &'a [RigidBodyHandle],
    /// Live exhaust particles in paint order.
    pub particles: &'a [Particle],
    /// World positions of debug `+` markers. Usually empty.
    pub markers: &'a [Point<Real>],
    /// HUD readouts.
    pub state: BoosterState,
}

impl LandingScene<'_> {
    /// Look up a body, failing if the handle is stale.
    pub fn body(&self, handle: RigidBodyHandle) -> Result<&RigidBody, PaintError> {
        self.bodies
            .get(handle)
            .ok_or(PaintError::MissingBody(handle))
    }

    /// World-space center of mass of the tracked body.
    pub fn tracked_center(&self) -> Result<Point<Real>, PaintError> {
        Ok(*self.body(self.fuselage)?.center_of_mass())
    }
}
