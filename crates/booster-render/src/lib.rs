//! Booster Render -- 2D frame painter for a rocket-booster landing simulation.
//!
//! This crate reads the current state of a rapier2d physics world (terrain,
//! launch pad, booster parts, exhaust particles) and composes it into a
//! square RGB frame. The frame is either presented in an OS window
//! (interactive mode, behind the `display` feature) or handed back as a
//! `(height, width, 3)` pixel array for programmatic consumers such as a
//! training loop (headless mode).
//!
//! The physics world itself is not simulated here -- callers step rapier
//! and pass a borrowed [`LandingScene`](scene::LandingScene) snapshot to
//! [`Painter::paint`](render::Painter::paint) once per frame.
//!
//! # Quick Start
//!
//! ```no_run
//! use booster_render::prelude::*;
//! # fn scene() -> LandingScene<'static> { unimplemented!() }
//!
//! let mut painter = Painter::new(RenderMode::RgbArray);
//! let frame = painter.paint(&scene())?.expect("headless mode returns a frame");
//! assert_eq!(frame.shape(), (600, 600, 3));
//! # Ok::<(), booster_render::error::PaintError>(())
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod render;
pub mod scene;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

/// Re-export the physics crate so callers build scenes against the same version.
pub use rapier2d;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common painter usage.
pub mod prelude {
    pub use crate::config::{ConfigError, PainterConfig};
    pub use crate::error::PaintError;
    pub use crate::render::{Camera, Painter, RenderMode, RgbFrame, Shape};
    pub use crate::scene::{BoosterState, LandingScene, Particle};
}
