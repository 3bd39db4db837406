//! Fixture shapes and their rasterization.
//!
//! Physics colliders come in many parry shape kinds. The painter knows how
//! to draw exactly three families, captured by [`Shape`]:
//!
//! | parry kind | [`Shape`] | Drawn as |
//! |------------|-----------|----------|
//! | `Segment`, `Polyline` | `Polyline` | open 2 px line strips |
//! | `Cuboid`, `ConvexPolygon`, `Triangle` | `Polygon` | filled polygon |
//! | `Ball` | `Circle` | filled disc |
//!
//! Any other kind is rejected with [`PaintError::UnsupportedShapeKind`]
//! rather than skipped.

use image::Rgb;
use rapier2d::dynamics::RigidBodyHandle;
use rapier2d::math::{Isometry, Point, Real};
use rapier2d::parry::shape::{Polyline as ParryPolyline, Shape as ParryShape, TypedShape};

use super::camera::Camera;
use super::canvas::Canvas;
use crate::error::PaintError;
use crate::scene::LandingScene;

/// Stroke width of polyline (edge) shapes, in pixels.
pub const POLYLINE_WIDTH: u32 = 2;

/// A fixture shape resolved into world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Open line strips. Each inner list is one connected run; a polyline
    /// whose index pairs are not chained end to start yields several.
    Polyline(Vec<Vec<Point<Real>>>),
    /// Filled closed polygon.
    Polygon(Vec<Point<Real>>),
    /// Filled disc.
    Circle {
        /// World-space center.
        center: Point<Real>,
        /// Radius in world units.
        radius: Real,
    },
}

impl Shape {
    /// Resolve a parry shape placed at `pose` (its world isometry).
    ///
    /// Polylines follow their index pairs: consecutive pairs sharing an
    /// endpoint extend the same strip, anything else starts a new one.
    ///
    /// # Errors
    ///
    /// Returns [`PaintError::UnsupportedShapeKind`] for shape kinds outside
    /// the table in the module docs.
    pub fn from_collider_shape(
        shape: &dyn ParryShape,
        pose: &Isometry<Real>,
    ) -> Result<Self, PaintError> {
        let place = |p: &Point<Real>| pose * p;
        let resolved = match shape.as_typed_shape() {
            TypedShape::Segment(segment) => {
                Shape::Polyline(vec![vec![place(&segment.a), place(&segment.b)]])
            }
            TypedShape::Polyline(polyline) => Shape::Polyline(polyline_strips(polyline, pose)),
            TypedShape::Cuboid(cuboid) => {
                let h = cuboid.half_extents;
                let corners = [
                    Point::new(-h.x, -h.y),
                    Point::new(h.x, -h.y),
                    Point::new(h.x, h.y),
                    Point::new(-h.x, h.y),
                ];
                Shape::Polygon(corners.iter().map(place).collect())
            }
            TypedShape::ConvexPolygon(polygon) => {
                Shape::Polygon(polygon.points().iter().map(place).collect())
            }
            TypedShape::Triangle(triangle) => Shape::Polygon(vec![
                place(&triangle.a),
                place(&triangle.b),
                place(&triangle.c),
            ]),
            TypedShape::Ball(ball) => Shape::Circle {
                center: place(&Point::origin()),
                radius: ball.radius,
            },
            _ => {
                return Err(PaintError::UnsupportedShapeKind {
                    kind: shape.shape_type(),
                })
            }
        };
        Ok(resolved)
    }

    /// Draw this shape through `camera` onto `canvas`.
    pub fn rasterize(&self, canvas: &mut Canvas, camera: &Camera, color: Rgb<u8>) {
        match self {
            Shape::Polyline(strips) => {
                for strip in strips {
                    let pixels: Vec<_> = strip.iter().map(|v| camera.to_pixels(*v)).collect();
                    canvas.polyline(&pixels, POLYLINE_WIDTH, color);
                }
            }
            Shape::Polygon(vertices) => {
                let pixels: Vec<_> = vertices.iter().map(|v| camera.to_pixels(*v)).collect();
                canvas.fill_polygon(&pixels, color);
            }
            Shape::Circle { center, radius } => {
                let radius_px = camera.to_pixel_length(*radius) as i32;
                canvas.fill_circle(camera.to_pixels(*center), radius_px, color);
            }
        }
    }
}

/// Split a polyline into connected runs of its index pairs, in world space.
fn polyline_strips(polyline: &ParryPolyline, pose: &Isometry<Real>) -> Vec<Vec<Point<Real>>> {
    let vertices = polyline.vertices();
    let mut strips = Vec::new();
    let mut strip: Vec<Point<Real>> = Vec::new();
    let mut tail = None;
    for &[a, b] in polyline.indices() {
        let (Some(start), Some(end)) = (vertices.get(a as usize), vertices.get(b as usize)) else {
            continue;
        };
        if tail != Some(a) && !strip.is_empty() {
            strips.push(std::mem::take(&mut strip));
        }
        if strip.is_empty() {
            strip.push(pose * start);
        }
        strip.push(pose * end);
        tail = Some(b);
    }
    if !strip.is_empty() {
        strips.push(strip);
    }
    strips
}

/// Paint every fixture of a body in one color.
///
/// Fixtures are resolved and drawn in the body's collider order; the first
/// unsupported or dangling fixture aborts with an error.
pub(crate) fn paint_body(
    canvas: &mut Canvas,
    camera: &Camera,
    scene: &LandingScene<'_>,
    handle: RigidBodyHandle,
    color: Rgb<u8>,
) -> Result<(), PaintError> {
    let body = scene.body(handle)?;
    for &collider_handle in body.colliders() {
        let collider = scene
            .colliders
            .get(collider_handle)
            .ok_or(PaintError::MissingCollider(collider_handle))?;
        let pose = match collider.position_wrt_parent() {
            Some(local) => body.position() * local,
            None => *collider.position(),
        };
        Shape::from_collider_shape(collider.shape(), &pose)?.rasterize(canvas, camera, color);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use rapier2d::geometry::SharedShape;
    use rapier2d::na::{self as nalgebra, point, vector};
    use rapier2d::parry::shape::ShapeType;

    use super::*;

    fn approx(a: Point<Real>, b: Point<Real>) -> bool {
        (a - b).norm() < 1e-4
    }

    #[test]
    fn cuboid_resolves_to_rotated_polygon() {
        let shape = SharedShape::cuboid(2.0, 1.0);
        let pose = Isometry::new(vector![10.0, 5.0], FRAC_PI_2);
        let Shape::Polygon(vertices) = Shape::from_collider_shape(&*shape, &pose).unwrap() else {
            panic!("cuboid should resolve to a polygon");
        };
        assert_eq!(vertices.len(), 4);
        // (-2, -1) rotated by 90 degrees is (1, -2).
        assert!(approx(vertices[0], Point::new(11.0, 3.0)), "{:?}", vertices[0]);
    }

    #[test]
    fn segment_resolves_to_two_point_polyline() {
        let shape = SharedShape::segment(point![-1.0, 0.0], point![1.0, 0.0]);
        let pose = Isometry::translation(0.0, 3.0);
        assert_eq!(
            Shape::from_collider_shape(&*shape, &pose).unwrap(),
            Shape::Polyline(vec![vec![Point::new(-1.0, 3.0), Point::new(1.0, 3.0)]])
        );
    }

    #[test]
    fn polyline_keeps_vertex_order() {
        let shape = SharedShape::polyline(
            vec![point![0.0, 0.0], point![1.0, 1.0], point![2.0, 0.0]],
            None,
        );
        let Shape::Polyline(strips) =
            Shape::from_collider_shape(&*shape, &Isometry::identity()).unwrap()
        else {
            panic!("polyline should resolve to a polyline");
        };
        assert_eq!(strips.len(), 1);
        assert_eq!(strips[0][1], Point::new(1.0, 1.0));
        assert_eq!(strips[0].len(), 3);
    }

    #[test]
    fn chained_index_pairs_share_a_strip() {
        let shape = SharedShape::polyline(
            vec![
                point![0.0, 0.0],
                point![1.0, 0.0],
                point![2.0, 0.0],
                point![5.0, 0.0],
                point![6.0, 0.0],
            ],
            Some(vec![[0, 1], [1, 2], [3, 4]]),
        );
        let Shape::Polyline(strips) =
            Shape::from_collider_shape(&*shape, &Isometry::identity()).unwrap()
        else {
            panic!("polyline should resolve to a polyline");
        };
        assert_eq!(
            strips,
            vec![
                vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)],
                vec![Point::new(5.0, 0.0), Point::new(6.0, 0.0)],
            ]
        );
    }

    #[test]
    fn disjoint_index_pairs_leave_the_gap_unpainted() {
        // Two horizontal edges, one at y = 0 and one at y = 2 (world).
        let shape = SharedShape::polyline(
            vec![
                point![0.0, 0.0],
                point![1.0, 0.0],
                point![1.0, 2.0],
                point![0.0, 2.0],
            ],
            Some(vec![[0, 1], [2, 3]]),
        );
        let resolved = Shape::from_collider_shape(&*shape, &Isometry::identity()).unwrap();
        let Shape::Polyline(strips) = &resolved else {
            panic!("polyline should resolve to a polyline");
        };
        assert_eq!(strips.len(), 2);

        let camera = Camera::new(100, 100, 10.0);
        let mut canvas = Canvas::new(100, 100);
        let red = Rgb([255, 0, 0]);
        resolved.rasterize(&mut canvas, &camera, red);

        assert_eq!(canvas.pixel(5, 0), Some(red));
        assert_eq!(canvas.pixel(5, 20), Some(red));
        // A bridging 1 -> 2 edge would run down column 10.
        assert!((3..18).all(|y| canvas.pixel(10, y) != Some(red)));
    }

    #[test]
    fn triangle_and_convex_polygon_resolve_to_polygons() {
        let triangle = SharedShape::triangle(point![0.0, 0.0], point![1.0, 0.0], point![0.0, 1.0]);
        assert!(matches!(
            Shape::from_collider_shape(&*triangle, &Isometry::identity()),
            Ok(Shape::Polygon(v)) if v.len() == 3
        ));

        let hull = SharedShape::convex_hull(&[
            point![0.0, 0.0],
            point![2.0, 0.0],
            point![2.0, 1.0],
            point![1.0, 2.0],
            point![0.0, 1.0],
        ])
        .expect("non-degenerate hull");
        assert!(matches!(
            Shape::from_collider_shape(&*hull, &Isometry::identity()),
            Ok(Shape::Polygon(v)) if v.len() == 5
        ));
    }

    #[test]
    fn ball_resolves_to_circle_at_pose() {
        let shape = SharedShape::ball(0.5);
        let pose = Isometry::new(vector![4.0, 2.0], 1.0);
        assert_eq!(
            Shape::from_collider_shape(&*shape, &pose).unwrap(),
            Shape::Circle {
                center: Point::new(4.0, 2.0),
                radius: 0.5
            }
        );
    }

    #[test]
    fn capsule_is_unsupported() {
        let shape = SharedShape::capsule_y(1.0, 0.5);
        let err = Shape::from_collider_shape(&*shape, &Isometry::identity()).unwrap_err();
        assert!(matches!(
            err,
            PaintError::UnsupportedShapeKind {
                kind: ShapeType::Capsule
            }
        ));
    }

    #[test]
    fn circle_radius_scales_with_camera() {
        let camera = Camera::new(100, 100, 10.0);
        let mut canvas = Canvas::new(100, 100);
        let red = Rgb([255, 0, 0]);
        Shape::Circle {
            center: Point::new(5.0, 5.0),
            radius: 1.0,
        }
        .rasterize(&mut canvas, &camera, red);
        assert_eq!(canvas.pixel(50, 50), Some(red));
        assert_eq!(canvas.pixel(60, 50), Some(red));
        assert_ne!(canvas.pixel(61, 50), Some(red));
    }
}
