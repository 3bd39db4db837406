//! Frame composition and output.
//!
//! The CPU-side pipeline (camera, canvas, shape rasterization, HUD text and
//! the [`Painter`] that orders them) is always compiled. The interactive
//! window lives in `display`, which is only built with the `display`
//! feature; without it a stand-in session reports
//! [`PaintError::DisplayInit`](crate::error::PaintError::DisplayInit) on the
//! first interactive frame.

pub mod camera;
pub mod canvas;
pub mod pacer;
pub mod painter;
pub mod shape;
pub mod text;

#[cfg(feature = "display")]
mod display;

#[cfg(not(feature = "display"))]
#[path = "no_display.rs"]
mod display;

pub use camera::Camera;
pub use canvas::Canvas;
pub use pacer::FramePacer;
pub use painter::{particle_color, Painter, RenderMode, RgbFrame};
pub use shape::Shape;
pub use text::{hud_lines, TextRenderer};
