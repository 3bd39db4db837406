//! Scene composition and the two output sinks.
//!
//! [`Painter::paint`] draws one [`LandingScene`] back to front onto a fresh
//! [`Canvas`], flips it into image orientation, then either presents it in a
//! window ([`RenderMode::Human`]) or returns it as an [`RgbFrame`]
//! ([`RenderMode::RgbArray`]).
//!
//! # Draw order
//!
//! sky, terrain, launch pad, nozzle, fuselage, legs, side thrusters,
//! particles, markers, HUD. There is no depth buffer; later layers simply
//! overwrite earlier ones.

use image::{Rgb, RgbImage};
use rapier2d::math::{Point, Real, Vector};

use super::camera::Camera;
use super::canvas::Canvas;
use super::display::DisplaySession;
use super::shape::paint_body;
use super::text::{hud_lines, TextRenderer};
use crate::config::PainterConfig;
use crate::error::PaintError;
use crate::scene::{BoosterState, LandingScene};

const SKY: Rgb<u8> = Rgb([135, 206, 235]);
const GROUND: Rgb<u8> = Rgb([50, 205, 50]);
const LAUNCH_PAD: Rgb<u8> = Rgb([140, 140, 140]);
const NOZZLE: Rgb<u8> = Rgb([0, 0, 0]);
const FUSELAGE: Rgb<u8> = Rgb([255, 255, 255]);
const LEG: Rgb<u8> = Rgb([50, 50, 50]);
const SIDE_THRUSTER: Rgb<u8> = Rgb([160, 160, 160]);
const HUD_TEXT: Rgb<u8> = Rgb([255, 0, 0]);
const MARKER: Rgb<u8> = Rgb([255, 0, 0]);

/// Left edge of the HUD block, in pixels.
const HUD_LEFT: i32 = 10;

/// Fraction of the frame height where the first HUD line sits (pre-flip).
const HUD_TOP_FRACTION: f32 = 0.9;

/// Half the arm length of a debug marker, in world units.
const MARKER_HALF_SIZE: Real = 0.1;

// ---------------------------------------------------------------------------
// RenderMode
// ---------------------------------------------------------------------------

/// Where finished frames go. Fixed for the lifetime of a [`Painter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Present each frame in an OS window, paced to the configured rate.
    Human,
    /// Return each frame as an [`RgbFrame`]; never opens a window.
    RgbArray,
}

impl RenderMode {
    /// `"human"` selects [`Human`](Self::Human); every other string is headless.
    pub fn parse(name: &str) -> Self {
        if name == "human" {
            Self::Human
        } else {
            Self::RgbArray
        }
    }
}

// ---------------------------------------------------------------------------
// RgbFrame
// ---------------------------------------------------------------------------

/// A finished headless frame: `(height, width, 3)` bytes, row-major, row 0
/// at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbFrame {
    image: RgbImage,
}

impl RgbFrame {
    /// Array dimensions as `(height, width, channels)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.image.height() as usize, self.image.width() as usize, 3)
    }

    /// RGB value at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the frame.
    pub fn pixel(&self, row: usize, col: usize) -> [u8; 3] {
        self.image.get_pixel(col as u32, row as u32).0
    }

    /// The raw bytes in `(row, col, channel)` order.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Unwrap into an `image` buffer, e.g. to save it as PNG.
    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

// ---------------------------------------------------------------------------
// Particle color
// ---------------------------------------------------------------------------

/// Unrounded particle color channels for a remaining lifetime.
///
/// Fresh particles (`ttl >= 1`) are orange, dying ones (`ttl <= 0`) blue.
fn particle_channels(ttl: f32) -> [f32; 3] {
    let p = if ttl.is_nan() { 0.0 } else { ttl.clamp(0.0, 1.0) };
    [255.0 * p, 255.0 * p * 0.2, 255.0 * (1.0 - p)]
}

/// Color of an exhaust particle with the given remaining lifetime.
pub fn particle_color(ttl: f32) -> Rgb<u8> {
    let [r, g, b] = particle_channels(ttl);
    Rgb([r.round() as u8, g.round() as u8, b.round() as u8])
}

// ---------------------------------------------------------------------------
// Painter
// ---------------------------------------------------------------------------

/// Composes landing scenes into frames and routes them to the output sink.
pub struct Painter {
    config: PainterConfig,
    mode: RenderMode,
    camera: Camera,
    text: TextRenderer,
    /// Created by the first interactive frame; outlives [`Painter::dispose`].
    display: Option<DisplaySession>,
    frames: u64,
}

impl Painter {
    /// Create a painter with the default configuration.
    pub fn new(mode: RenderMode) -> Self {
        Self::build(mode, PainterConfig::default())
    }

    /// Create a painter with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PaintError::InvalidConfig`] if the configuration does not
    /// validate.
    pub fn with_config(mode: RenderMode, config: PainterConfig) -> Result<Self, PaintError> {
        config.validate()?;
        Ok(Self::build(mode, config))
    }

    fn build(mode: RenderMode, config: PainterConfig) -> Self {
        let side = config.viewport_size;
        Self {
            camera: Camera::new(side, side, config.pixels_per_unit),
            config,
            mode,
            text: TextRenderer::new(),
            display: None,
            frames: 0,
        }
    }

    /// The output mode chosen at construction.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// The camera as positioned by the most recent frame.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The active configuration.
    pub fn config(&self) -> &PainterConfig {
        &self.config
    }

    /// Whether a display window is currently open.
    pub fn session_active(&self) -> bool {
        self.display.as_ref().is_some_and(DisplaySession::is_open)
    }

    /// Paint one frame of `scene`.
    ///
    /// Returns `Some(frame)` in [`RenderMode::RgbArray`] and `None` after
    /// presenting in [`RenderMode::Human`]. The first interactive frame opens
    /// the window, as does the first one after [`dispose`](Self::dispose);
    /// later ones reuse it and block until the frame interval has elapsed.
    ///
    /// # Errors
    ///
    /// Any shape or lookup failure aborts the frame before it is returned or
    /// presented. Interactive mode additionally reports
    /// [`PaintError::DisplayInit`] and [`PaintError::Present`].
    pub fn paint(&mut self, scene: &LandingScene<'_>) -> Result<Option<RgbFrame>, PaintError> {
        let canvas = self.compose(scene)?;
        self.frames += 1;

        match self.mode {
            RenderMode::RgbArray => Ok(Some(RgbFrame {
                image: canvas.into_image(),
            })),
            RenderMode::Human => {
                self.present(canvas.image())?;
                Ok(None)
            }
        }
    }

    /// Close the display window, if one is open.
    ///
    /// Safe to call any number of times, including before the first frame.
    /// The event loop itself lives until the painter is dropped.
    pub fn dispose(&mut self) {
        if let Some(display) = self.display.as_mut().filter(|d| d.is_open()) {
            display.close_window();
            tracing::info!(frames = self.frames, "painter disposed");
        }
    }

    fn compose(&mut self, scene: &LandingScene<'_>) -> Result<Canvas, PaintError> {
        self.camera.track(scene.tracked_center()?);

        let mut canvas = Canvas::new(self.camera.width, self.camera.height);
        canvas.fill(SKY);

        let camera = &self.camera;
        paint_body(&mut canvas, camera, scene, scene.terrain, GROUND)?;
        paint_body(&mut canvas, camera, scene, scene.launch_pad, LAUNCH_PAD)?;
        if let Some(nozzle) = scene.nozzle {
            paint_body(&mut canvas, camera, scene, nozzle, NOZZLE)?;
        }
        paint_body(&mut canvas, camera, scene, scene.fuselage, FUSELAGE)?;
        for &leg in scene.legs {
            paint_body(&mut canvas, camera, scene, leg, LEG)?;
        }
        for &thruster in scene.side_thrusters {
            paint_body(&mut canvas, camera, scene, thruster, SIDE_THRUSTER)?;
        }
        for particle in scene.particles {
            paint_body(
                &mut canvas,
                camera,
                scene,
                particle.body,
                particle_color(particle.ttl),
            )?;
        }
        for &marker in scene.markers {
            paint_marker(&mut canvas, camera, marker);
        }

        self.paint_hud(&mut canvas, &scene.state);
        canvas.flip_vertical();

        tracing::debug!(
            frame = self.frames,
            particles = scene.particles.len(),
            center_x = self.camera.center().x,
            center_y = self.camera.center().y,
            "frame composed"
        );
        Ok(canvas)
    }

    fn paint_hud(&self, canvas: &mut Canvas, state: &BoosterState) {
        let scale = self.config.hud_glyph_scale;
        let line_height = self.text.line_height(scale) as f32;
        let top = HUD_TOP_FRACTION * self.camera.height as f32;
        for (i, line) in hud_lines(state).iter().enumerate() {
            let y = (top - i as f32 * line_height) as i32;
            self.text
                .draw_flipped(canvas, line, HUD_LEFT, y, scale, HUD_TEXT);
        }
    }

    fn present(&mut self, frame: &RgbImage) -> Result<(), PaintError> {
        if self.display.is_none() {
            self.display = Some(DisplaySession::new()?);
        }
        let Some(display) = self.display.as_mut() else {
            return Ok(());
        };
        if !display.is_open() {
            display.open_window(&self.config)?;
        }
        display.present(frame, self.config.render_fps)
    }
}

impl Drop for Painter {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Draw a small `+` centered on a world position.
fn paint_marker(canvas: &mut Canvas, camera: &Camera, at: Point<Real>) {
    let across = Vector::new(MARKER_HALF_SIZE, 0.0);
    let up = Vector::new(0.0, MARKER_HALF_SIZE);
    canvas.line(
        camera.to_pixels(at - across),
        camera.to_pixels(at + across),
        1,
        MARKER,
    );
    canvas.line(camera.to_pixels(at - up), camera.to_pixels(at + up), 1, MARKER);
}
