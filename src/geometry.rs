//! Planar geometry primitives used by the sweep
//!
//! The sweep line advances toward increasing y. A site `s` with the sweep at
//! `y = d` (where `d >= s.y`) defines the parabola of points equidistant from
//! `s` and the sweep line; it opens toward decreasing y and the beachline is
//! the upper envelope of these parabolas.

use glam::DVec2;

/// Immutable 2D point value type
pub type Point = DVec2;

/// A circle through three sites
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    /// Sweep coordinate at which the circle has been fully passed
    ///
    /// This is the circle's extreme point in the sweep direction, the moment
    /// the vertex at its center becomes final.
    #[inline]
    pub fn sweep_key(&self) -> f64 {
        self.center.y + self.radius
    }

    /// Point on the circle touched last by the sweep line
    #[inline]
    pub fn event_point(&self) -> Point {
        Point::new(self.center.x, self.sweep_key())
    }
}

/// Twice the signed area of triangle `(a, b, c)`
///
/// Positive when `a -> b -> c` turns counter-clockwise (y up).
#[inline]
pub fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b - a).perp_dot(c - a)
}

/// Whether `a`, `b`, `c` lie on one line within `epsilon`
///
/// The tolerance is on the sine of the angle at `a`, so scaling all three
/// points does not change the answer.
#[inline]
pub fn nearly_collinear(a: Point, b: Point, c: Point, epsilon: f64) -> bool {
    orientation(a, b, c).abs() <= epsilon * (b - a).length() * (c - a).length()
}

/// Circumscribed circle of three points
///
/// Returns `None` when the points are collinear within `epsilon` (see
/// [`nearly_collinear`]) or the arithmetic produced a non-finite center.
pub fn circumcircle(a: Point, b: Point, c: Point, epsilon: f64) -> Option<Circle> {
    if nearly_collinear(a, b, c, epsilon) {
        return None;
    }

    // solve relative to `a` to keep precision away from the origin
    let ab = b - a;
    let ac = c - a;
    let d = 2.0 * ab.perp_dot(ac);
    let ab2 = ab.length_squared();
    let ac2 = ac.length_squared();

    let offset = Point::new(
        (ac.y * ab2 - ab.y * ac2) / d,
        (ab.x * ac2 - ac.x * ab2) / d,
    );
    let center = a + offset;
    let radius = offset.length();

    if center.is_finite() && radius.is_finite() {
        Some(Circle { center, radius })
    } else {
        None
    }
}

/// y of the parabola for `site` at `x`, with the sweep line at `directrix`
///
/// Undefined (non-finite) when the site lies on the sweep line.
#[inline]
pub fn parabola_y(site: Point, x: f64, directrix: f64) -> f64 {
    let dx = x - site.x;
    (dx * dx + site.y * site.y - directrix * directrix) / (2.0 * (site.y - directrix))
}

/// x of the breakpoint between the arc of `left` and the arc of `right`
///
/// Solves the quadratic formed by the two parabolas sharing the directrix and
/// picks the root where `left`'s arc hands over to `right`'s: of the two
/// intersections, the narrower parabola (site nearer the sweep) dominates the
/// interval between them.
pub fn breakpoint_x(left: Point, right: Point, directrix: f64) -> f64 {
    if left.y == right.y {
        return (left.x + right.x) * 0.5;
    }

    let dl = 2.0 * (left.y - directrix);
    let dr = 2.0 * (right.y - directrix);
    if dl == 0.0 {
        return left.x;
    }
    if dr == 0.0 {
        return right.x;
    }

    let a = 1.0 / dl - 1.0 / dr;
    let b = -2.0 * (left.x / dl - right.x / dr);
    let c = (left.x * left.x + left.y * left.y - directrix * directrix) / dl
        - (right.x * right.x + right.y * right.y - directrix * directrix) / dr;

    if a == 0.0 {
        return -c / b;
    }

    // rounding can push a tangent intersection slightly negative
    let sqrt_disc = (b * b - 4.0 * a * c).max(0.0).sqrt();
    let x1 = (-b + sqrt_disc) / (2.0 * a);
    let x2 = (-b - sqrt_disc) / (2.0 * a);

    if left.y > right.y {
        x1.max(x2)
    } else {
        x1.min(x2)
    }
}
