//! Property tests for the camera and the world-to-pixel mapping.

use booster_render::render::{particle_color, Camera};
use booster_render::rapier2d::math::{Point, Real};
use proptest::prelude::*;

/// Finite world coordinates over a generous range.
fn coord() -> impl Strategy<Value = Real> {
    (-100_000i32..100_000i32).prop_map(|v| v as Real * 0.01)
}

fn viewport() -> impl Strategy<Value = u32> {
    16u32..2048
}

fn scale() -> impl Strategy<Value = Real> {
    (1u32..64).prop_map(|s| s as Real * 0.5)
}

proptest! {
    #[test]
    fn vertical_center_never_drops_below_half_height(
        x in coord(),
        y in coord(),
        height in viewport(),
        pixels_per_unit in scale(),
    ) {
        let mut camera = Camera::new(600, height, pixels_per_unit);
        camera.track(Point::new(x, y));

        let floor = height as Real / 2.0;
        prop_assert!(camera.center().y >= floor);
        if y * pixels_per_unit > floor {
            prop_assert_eq!(camera.center().y, y * pixels_per_unit);
        } else {
            prop_assert_eq!(camera.center().y, floor);
        }
        prop_assert_eq!(camera.center().x, x * pixels_per_unit);
        prop_assert!(camera.top_left().y >= 0.0);
    }

    #[test]
    fn mapping_preserves_offsets(
        tracked in (coord(), coord()),
        a in (coord(), coord()),
        b in (coord(), coord()),
        pixels_per_unit in scale(),
    ) {
        let mut camera = Camera::new(600, 600, pixels_per_unit);
        camera.track(Point::new(tracked.0, tracked.1));

        let pa = camera.to_pixels(Point::new(a.0, a.1));
        let pb = camera.to_pixels(Point::new(b.0, b.1));
        let world_dx = (b.0 - a.0) * pixels_per_unit;
        let world_dy = (b.1 - a.1) * pixels_per_unit;

        // Tolerance grows with magnitude to absorb f32 rounding.
        let tol = 1e-3 * (1.0 + pa.coords.abs().max() + pb.coords.abs().max());
        prop_assert!(((pb.x - pa.x) - world_dx).abs() <= tol);
        prop_assert!(((pb.y - pa.y) - world_dy).abs() <= tol);
    }

    #[test]
    fn tracked_point_maps_to_viewport_middle_when_unclamped(
        x in coord(),
        y in 31.0f32..10_000.0,
    ) {
        let mut camera = Camera::new(600, 600, 10.0);
        camera.track(Point::new(x, y));
        let p = camera.to_pixels(Point::new(x, y));
        let tol = 1e-3 * (1.0 + (x * 10.0).abs() + y * 10.0);
        prop_assert!((p.x - 300.0).abs() <= tol);
        prop_assert!((p.y - 300.0).abs() <= tol);
    }

    #[test]
    fn particle_color_is_blue_to_orange(ttl in -10.0f32..10.0) {
        let [r, g, b] = particle_color(ttl).0;
        let p = ttl.clamp(0.0, 1.0);
        prop_assert_eq!(r, (255.0 * p).round() as u8);
        prop_assert!(g <= 51);
        prop_assert!(u16::from(r) + u16::from(b) >= 254 && u16::from(r) + u16::from(b) <= 256);
    }
}
