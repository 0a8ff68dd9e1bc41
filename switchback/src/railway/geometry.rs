//! World-space points and curve evaluation.

use std::ops::{Add, Mul, Sub};
use crate::input::level::GridPos;

const TILE_WIDTH: f64 = 1.0;
const TILE_HEIGHT: f64 = 0.5;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Point) -> f64 {
        (other - self).length()
    }

    /// Unit vector in the same direction. The zero vector stays zero.
    pub fn normalized(self) -> Point {
        let len = self.length();
        if len < 1e-9 {
            Point::ZERO
        } else {
            self * (1.0 / len)
        }
    }

    pub fn lerp(self, other: Point, t: f64) -> Point {
        self + (other - self) * t
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, o: Point) -> Point { Point::new(self.x + o.x, self.y + o.y) }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, o: Point) -> Point { Point::new(self.x - o.x, self.y - o.y) }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, s: f64) -> Point { Point::new(self.x * s, self.y * s) }
}

/// Isometric projection used for every node and control point.
pub fn grid_to_world(grid: GridPos) -> Point {
    let (gx, gy) = grid;
    Point {
        x: (gx - gy) * (TILE_WIDTH * 0.5),
        y: (gx + gy) * (TILE_HEIGHT * 0.5),
    }
}

pub fn quadratic_bezier(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
}

pub fn cubic_bezier(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

#[test]
fn test_projection() {
    assert_eq!(grid_to_world((0.0, 0.0)), Point::ZERO);
    assert_eq!(grid_to_world((4.0, -4.0)), Point::new(4.0, 0.0));
    assert_eq!(grid_to_world((2.0, 2.0)), Point::new(0.0, 1.0));
}

#[test]
fn test_bezier_endpoints() {
    let a = Point::new(0.0, 0.0);
    let c = Point::new(1.0, 2.0);
    let d = Point::new(3.0, 2.0);
    let b = Point::new(4.0, 0.0);
    assert_eq!(quadratic_bezier(a, c, b, 0.0), a);
    assert_eq!(quadratic_bezier(a, c, b, 1.0), b);
    assert_eq!(cubic_bezier(a, c, d, b, 0.0), a);
    assert_eq!(cubic_bezier(a, c, d, b, 1.0), b);
    // Symmetric control polygon puts the midpoint on the axis of symmetry.
    let mid = cubic_bezier(a, c, d, b, 0.5);
    assert!((mid.x - 2.0).abs() < 1e-12);
}

#[test]
fn test_normalized_zero() {
    assert_eq!(Point::ZERO.normalized(), Point::ZERO);
    assert!((Point::new(3.0, 4.0).normalized().length() - 1.0).abs() < 1e-12);
}
