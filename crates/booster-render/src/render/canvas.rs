//! Software frame buffer and drawing primitives.
//!
//! [`Canvas`] wraps an [`image::RgbImage`] and exposes just the primitives
//! the painter needs: solid fill, scanline polygon fill, filled discs, and
//! thick line strips. All coordinates are viewport pixels; anything outside
//! the buffer is clipped.

use image::{Rgb, RgbImage};
use rapier2d::math::{Point, Real};

/// A viewport-sized RGB pixel surface, recreated for every frame.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    /// Create a black canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Read a pixel, or `None` outside the buffer.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb<u8>> {
        self.in_bounds(x, y)
            .then(|| *self.image.get_pixel(x as u32, y as u32))
    }

    /// Fill the whole canvas with one color.
    pub fn fill(&mut self, color: Rgb<u8>) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    /// Set a single pixel, ignoring out-of-bounds writes.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb<u8>) {
        if self.in_bounds(x, y) {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    /// Fill the inclusive horizontal span `x1..=x2` on row `y`.
    pub fn hline(&mut self, x1: i32, x2: i32, y: i32, color: Rgb<u8>) {
        if y < 0 || y >= self.height() as i32 {
            return;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width() as i32 - 1);
        for x in start..=end {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    /// Fill a closed polygon using even-odd scanline sampling at pixel centers.
    ///
    /// Fewer than three vertices draw nothing.
    pub fn fill_polygon(&mut self, vertices: &[Point<Real>], color: Rgb<u8>) {
        if vertices.len() < 3 {
            return;
        }

        let (min_y, max_y) = vertices
            .iter()
            .fold((Real::MAX, Real::MIN), |(lo, hi), v| (lo.min(v.y), hi.max(v.y)));
        let first_row = (min_y.floor() as i32).max(0);
        let last_row = (max_y.ceil() as i32).min(self.height() as i32 - 1);

        let n = vertices.len();
        let mut crossings: Vec<Real> = Vec::with_capacity(n);
        for y in first_row..=last_row {
            crossings.clear();
            let yc = y as Real + 0.5;
            for i in 0..n {
                let a = vertices[i];
                let b = vertices[(i + 1) % n];
                if (a.y <= yc && b.y > yc) || (b.y <= yc && a.y > yc) {
                    crossings.push(a.x + (yc - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
            crossings.sort_unstable_by(Real::total_cmp);
            for pair in crossings.chunks_exact(2) {
                // Pixel x is covered when its center x + 0.5 lies in [left, right).
                let start = (pair[0] - 0.5).ceil() as i32;
                let end = (pair[1] - 0.5).ceil() as i32 - 1;
                if start <= end {
                    self.hline(start, end, y, color);
                }
            }
        }
    }

    /// Fill a disc. The center is rounded to the nearest pixel; a zero
    /// radius still paints the center pixel. Only rows inside the buffer
    /// are visited.
    pub fn fill_circle(&mut self, center: Point<Real>, radius: i32, color: Rgb<u8>) {
        if radius < 0 || !center.x.is_finite() || !center.y.is_finite() {
            return;
        }
        let cx = center.x.round() as i64;
        let cy = center.y.round() as i64;
        let radius = i64::from(radius);
        let last_col = i64::from(self.width()) - 1;
        let first_row = cy.saturating_sub(radius).max(0);
        let last_row = cy.saturating_add(radius).min(i64::from(self.height()) - 1);

        let r2 = radius * radius;
        for y in first_row..=last_row {
            let dy = y - cy;
            let half = ((r2 - dy * dy) as f64).sqrt().floor() as i64;
            let start = cx.saturating_sub(half).max(0);
            let end = cx.saturating_add(half).min(last_col);
            if start <= end {
                self.hline(start as i32, end as i32, y as i32, color);
            }
        }
    }

    /// Draw a straight line of the given stroke width (Bresenham, with
    /// parallel copies offset along the normal for wider strokes).
    ///
    /// Each copy is clipped to the buffer before rasterizing, so endpoints
    /// far outside the viewport cost nothing extra.
    pub fn line(&mut self, from: Point<Real>, to: Point<Real>, width: u32, color: Rgb<u8>) {
        let (ax, ay) = (f64::from(from.x), f64::from(from.y));
        let (bx, by) = (f64::from(to.x), f64::from(to.y));
        if ![ax, ay, bx, by].iter().all(|v| v.is_finite()) {
            return;
        }

        if width <= 1 {
            self.clipped_segment(ax, ay, bx, by, color);
            return;
        }

        let (dx, dy) = (bx - ax, by - ay);
        let len = dx.hypot(dy);
        if len < 1e-3 {
            self.fill_circle(from, width as i32 / 2, color);
            return;
        }

        let (nx, ny) = (-dy / len, dx / len);
        let first = -f64::from(width / 2);
        for i in 0..width {
            let offset = first + f64::from(i);
            let ox = (nx * offset).round();
            let oy = (ny * offset).round();
            self.clipped_segment(ax + ox, ay + oy, bx + ox, by + oy, color);
        }
    }

    /// Draw an open line strip through `points`.
    pub fn polyline(&mut self, points: &[Point<Real>], width: u32, color: Rgb<u8>) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], width, color);
        }
    }

    /// Mirror the canvas top-to-bottom in place.
    pub fn flip_vertical(&mut self) {
        image::imageops::flip_vertical_in_place(&mut self.image);
    }

    /// Borrow the underlying image.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Consume the canvas, returning the underlying image.
    pub fn into_image(self) -> RgbImage {
        self.image
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }

    /// Liang-Barsky clip against the buffer (plus a one pixel margin for
    /// endpoint rounding), then rasterize what is left.
    fn clipped_segment(&mut self, ax: f64, ay: f64, bx: f64, by: f64, color: Rgb<u8>) {
        let (xmin, ymin) = (-1.0, -1.0);
        let xmax = f64::from(self.width());
        let ymax = f64::from(self.height());
        let (dx, dy) = (bx - ax, by - ay);

        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;
        for (p, q) in [(-dx, ax - xmin), (dx, xmax - ax), (-dy, ay - ymin), (dy, ymax - ay)] {
            if p == 0.0 {
                if q < 0.0 {
                    return;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return;
                }
                t1 = t1.min(r);
            }
        }

        let x0 = (ax + t0 * dx).round() as i64;
        let y0 = (ay + t0 * dy).round() as i64;
        let x1 = (ax + t1 * dx).round() as i64;
        let y1 = (ay + t1 * dy).round() as i64;
        self.bresenham(x0, y0, x1, y1, color);
    }

    fn bresenham(&mut self, mut x0: i64, mut y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set_pixel(x0 as i32, y0 as i32, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}
