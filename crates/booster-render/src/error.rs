//! Error types for frame painting.

use rapier2d::dynamics::RigidBodyHandle;
use rapier2d::geometry::ColliderHandle;
use rapier2d::parry::shape::ShapeType;

use crate::config::ConfigError;

/// Errors raised while painting a frame or managing the display session.
///
/// Every variant except the display ones aborts the current frame before
/// anything is returned or presented.
#[derive(Debug, thiserror::Error)]
pub enum PaintError {
    /// A fixture carries a shape with no rasterization rule. This is an
    /// integration error: the physics side created geometry the painter
    /// cannot show, and skipping it would hide simulation state.
    #[error("no painter implemented for shape kind {kind:?}")]
    UnsupportedShapeKind {
        /// The offending parry shape kind.
        kind: ShapeType,
    },

    /// The scene references a body that is not in its body set.
    #[error("body {0:?} is not present in the rigid body set")]
    MissingBody(RigidBodyHandle),

    /// A body lists a collider that is not in the scene's collider set.
    #[error("collider {0:?} is not present in the collider set")]
    MissingCollider(ColliderHandle),

    /// The window or GPU surface could not be created.
    #[error("failed to initialize display: {0}")]
    DisplayInit(String),

    /// The composed frame could not be presented.
    #[error("failed to present frame: {0}")]
    Present(String),

    /// The painter configuration was rejected.
    #[error("invalid painter configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}
