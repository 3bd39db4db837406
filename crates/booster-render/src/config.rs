//! Painter configuration.
//!
//! [`PainterConfig`] carries the fixed constants that form the painter's
//! contract surface: the square viewport size, the world-to-pixel scale and
//! the interactive frame rate. It derives serde so callers can embed it in
//! whatever configuration format they already load; this crate never reads
//! configuration files itself.

use serde::{Deserialize, Serialize};

/// Side length of the square viewport, in pixels.
pub const VIEWPORT_SIZE: u32 = 600;

/// Pixels per simulation unit (metre).
pub const PIXELS_UNITS_SCALE: f32 = 10.0;

/// Frames per second targeted by the interactive frame pacer.
pub const RENDER_FPS: u32 = 60;

/// Caption of the interactive window.
pub const WINDOW_TITLE: &str = "Falcon 9 Landing";

/// Reasons a [`PainterConfig`] is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The viewport must be at least one pixel wide.
    #[error("viewport_size must be positive")]
    EmptyViewport,

    /// The world-to-pixel scale must be a positive finite number.
    #[error("pixels_per_unit must be positive and finite, got {0}")]
    InvalidScale(f32),

    /// The interactive frame rate must be positive.
    #[error("render_fps must be positive")]
    ZeroFrameRate,

    /// HUD glyph pixels must be at least one frame pixel.
    #[error("hud_glyph_scale must be positive")]
    ZeroGlyphScale,
}

/// Configuration for a [`Painter`](crate::render::Painter).
///
/// Missing fields fall back to the crate constants when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PainterConfig {
    /// Side length of the square viewport in pixels.
    pub viewport_size: u32,
    /// World units to pixels scale factor.
    pub pixels_per_unit: f32,
    /// Target frame rate in interactive mode. Ignored when headless.
    pub render_fps: u32,
    /// Caption of the interactive window.
    pub window_title: String,
    /// Size of one HUD glyph pixel, in frame pixels.
    pub hud_glyph_scale: u32,
}

impl Default for PainterConfig {
    fn default() -> Self {
        Self {
            viewport_size: VIEWPORT_SIZE,
            pixels_per_unit: PIXELS_UNITS_SCALE,
            render_fps: RENDER_FPS,
            window_title: WINDOW_TITLE.to_owned(),
            hud_glyph_scale: 1,
        }
    }
}

impl PainterConfig {
    /// Check every field against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport_size == 0 {
            return Err(ConfigError::EmptyViewport);
        }
        if !self.pixels_per_unit.is_finite() || self.pixels_per_unit <= 0.0 {
            return Err(ConfigError::InvalidScale(self.pixels_per_unit));
        }
        if self.render_fps == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }
        if self.hud_glyph_scale == 0 {
            return Err(ConfigError::ZeroGlyphScale);
        }
        Ok(())
    }
}
