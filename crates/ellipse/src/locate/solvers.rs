//! Circle/circle, circle/line and ratio-locus solvers.
//!
//! - `trilaterate`: strict two-circle intersection on the left of A→B.
//! - `circle_circle_intersections`: clamped variant for noisy radii (0–2 points).
//! - `line_circle_intersections`: ray/line against a circle (0–2 points).
//! - `ratio_locus_point`: closed-form polar solve of `|PF| = e · dist(P, directrix)`.

use nalgebra::Vector2;

use crate::cfg::HEIGHT_EPS;
use crate::error::ConstructError;
use crate::Point2;

/// Foot of the common chord and its half-length squared for two circles.
///
/// Returns `(d, u, a, h_sq)` with `u` the unit vector A→B.
#[inline]
fn chord(a: Point2, b: Point2, r1: f64, r2: f64) -> Option<(f64, Vector2<f64>, f64, f64)> {
    let ab = b - a;
    let d = ab.norm();
    if !d.is_finite() || d <= 0.0 {
        return None;
    }
    let u = ab / d;
    let along = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    Some((d, u, along, r1 * r1 - along * along))
}

#[inline]
fn left_normal(u: Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-u.y, u.x)
}

/// Relative slack on `h²` so tangent circles survive rounding.
#[inline]
fn height_slack(r: f64) -> f64 {
    HEIGHT_EPS * r.abs().max(1.0).powi(2)
}

fn solve_strict(
    a: Point2,
    b: Point2,
    r1: f64,
    r2: f64,
) -> Result<(Point2, Vector2<f64>), ConstructError> {
    let unsat = || ConstructError::Unsatisfiable {
        r1,
        r2,
        d: (b - a).norm(),
    };
    if !(r1.is_finite() && r2.is_finite()) || r1 < 0.0 || r2 < 0.0 {
        return Err(unsat());
    }
    let (_, u, along, h_sq) = chord(a, b, r1, r2).ok_or_else(unsat)?;
    if h_sq < -height_slack(r1) {
        return Err(unsat());
    }
    let h = h_sq.max(0.0).sqrt();
    Ok((a + u * along, left_normal(u) * h))
}

/// Point C left of A→B with `|CA| = r1` and `|CB| = r2`.
///
/// Fails with `Unsatisfiable` when the circles do not meet (`r1² < a²`) or
/// when A and B coincide.
pub fn trilaterate(a: Point2, b: Point2, r1: f64, r2: f64) -> Result<Point2, ConstructError> {
    let (foot, offset) = solve_strict(a, b, r1, r2)?;
    Ok(foot + offset)
}

/// Mirror image of `trilaterate` across the line AB.
pub fn trilaterate_mirrored(
    a: Point2,
    b: Point2,
    r1: f64,
    r2: f64,
) -> Result<Point2, ConstructError> {
    let (foot, offset) = solve_strict(a, b, r1, r2)?;
    Ok(foot - offset)
}

/// Both solutions `(left, right)` of A→B.
pub fn trilaterate_pair(
    a: Point2,
    b: Point2,
    r1: f64,
    r2: f64,
) -> Result<(Point2, Point2), ConstructError> {
    let (foot, offset) = solve_strict(a, b, r1, r2)?;
    Ok((foot + offset, foot - offset))
}

/// Clamped two-circle intersection.
///
/// `h = sqrt(max(0, ra² − a²))`: circles that miss each other yield the single
/// nearest point on the centre line. Tangent circles also yield one point, and
/// coincident centres yield none. With two points the one left of A→B comes first.
pub fn circle_circle_intersections(
    center_a: Point2,
    radius_a: f64,
    center_b: Point2,
    radius_b: f64,
) -> Vec<Point2> {
    let Some((d, u, along, h_sq)) = chord(center_a, center_b, radius_a, radius_b) else {
        return Vec::new();
    };
    if h_sq < 0.0 {
        tracing::debug!(radius_a, radius_b, d, "circles miss; clamping to centre line");
    }
    let foot = center_a + u * along;
    if h_sq <= height_slack(radius_a) {
        return vec![foot];
    }
    let h = h_sq.sqrt();
    let offset = left_normal(u) * h;
    vec![foot + offset, foot - offset]
}

/// Intersections of the line `origin + t·direction` with a circle, by increasing `t`.
pub fn line_circle_intersections(
    origin: Point2,
    direction: Vector2<f64>,
    center: Point2,
    radius: f64,
) -> Vec<Point2> {
    let len = direction.norm();
    if !len.is_finite() || len <= 0.0 {
        return Vec::new();
    }
    let u = direction / len;
    let f = origin - center;
    let b = f.dot(&u);
    let disc = b * b - (f.norm_squared() - radius * radius);
    if disc < -height_slack(radius) {
        return Vec::new();
    }
    if disc <= height_slack(radius) {
        return vec![origin - u * b];
    }
    let root = disc.sqrt();
    vec![origin + u * (-b - root), origin + u * (-b + root)]
}

/// Point P on the ray `focus + r·direction` with `|PF| / dist(P, directrix) = e`.
///
/// The directrix is the vertical line `x = directrix_x`. Closed form:
/// `r = e·|p| / (1 − e·sgn(p)·uₓ)` with `p = focus.x − directrix_x`.
/// Returns `LocusNotFound` when no root lies in `(0, search_bound]` or when
/// the recomputed ratio misses `e` by more than `tolerance`.
pub fn ratio_locus_point(
    focus: Point2,
    directrix_x: f64,
    eccentricity: f64,
    direction: Vector2<f64>,
    search_bound: f64,
    tolerance: f64,
) -> Result<Point2, ConstructError> {
    let not_found = ConstructError::LocusNotFound {
        eccentricity,
        angle: direction.y.atan2(direction.x),
    };
    let len = direction.norm();
    let p = focus.x - directrix_x;
    if !len.is_finite() || len <= 0.0 || p == 0.0 || !(eccentricity > 0.0) {
        return Err(not_found);
    }
    let u = direction / len;
    let side = p.signum();
    let denom = 1.0 - eccentricity * side * u.x;
    if denom <= 0.0 {
        return Err(not_found);
    }
    let r = eccentricity * p.abs() / denom;
    if !r.is_finite() || r <= 0.0 || r > search_bound {
        return Err(not_found);
    }
    let point = focus + u * r;
    let pm = (point.x - directrix_x).abs();
    if pm <= 0.0 || ((point - focus).norm() / pm - eccentricity).abs() > tolerance {
        return Err(not_found);
    }
    Ok(point)
}
