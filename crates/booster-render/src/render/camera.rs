//! Viewport camera and world-to-pixel mapping.

use rapier2d::math::{Point, Real, Vector};

/// A fixed-size pixel viewport that follows a tracked body.
///
/// Pixel coordinates produced by [`to_pixels`](Self::to_pixels) keep the
/// world's Y-up convention; the painter flips the finished frame once so
/// that row 0 ends up at the top of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// World units to pixels.
    pub pixels_per_unit: Real,
    center: Point<Real>,
}

impl Camera {
    /// Create a camera centered on its own viewport, i.e. looking at the
    /// world region `[0, width] x [0, height]` pixels.
    pub fn new(width: u32, height: u32, pixels_per_unit: Real) -> Self {
        Self {
            width,
            height,
            pixels_per_unit,
            center: Point::new(width as Real / 2.0, height as Real / 2.0),
        }
    }

    /// Re-center on a tracked world position.
    ///
    /// The vertical center never drops below half the viewport height, so the
    /// frame never shows anything beneath the ground plane. Neither the
    /// horizontal axis nor the top is bounded.
    pub fn track(&mut self, target: Point<Real>) {
        let desired = target * self.pixels_per_unit;
        let floor = self.height as Real / 2.0;
        let y = if desired.y <= floor { floor } else { desired.y };
        self.center = Point::new(desired.x, y);
    }

    /// Current camera center in pixel space.
    pub fn center(&self) -> Point<Real> {
        self.center
    }

    /// Lower-left pixel of the viewport in world-scaled pixel space.
    ///
    /// Named after the screen corner it becomes once the frame is flipped.
    pub fn top_left(&self) -> Point<Real> {
        self.center - Vector::new(self.width as Real / 2.0, self.height as Real / 2.0)
    }

    /// Map a world point to (unflipped) viewport pixels.
    pub fn to_pixels(&self, world: Point<Real>) -> Point<Real> {
        let origin = self.top_left();
        Point::new(
            world.x * self.pixels_per_unit - origin.x,
            world.y * self.pixels_per_unit - origin.y,
        )
    }

    /// Scale a world length (e.g. a radius) to pixels.
    pub fn to_pixel_length(&self, length: Real) -> Real {
        length * self.pixels_per_unit
    }
}
