//! Periodic Catmull-Rom → cubic Bézier fitting for closed contours.
//!
//! For segment i (indices mod N): p0=P[i−1], p1=P[i], p2=P[i+1], p3=P[i+2],
//! `cp1 = p1 + (p2 − p0)/6`, `cp2 = p2 − (p3 − p1)/6`.

use serde::Serialize;

use crate::assemble::EllipseContour;
use crate::cfg::MIN_CONTOUR_POINTS;
use crate::error::ConstructError;
use crate::Point2;

/// One cubic Bézier segment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CubicSegment {
    pub start: Point2,
    pub ctrl1: Point2,
    pub ctrl2: Point2,
    pub end: Point2,
}

impl CubicSegment {
    /// Bernstein evaluation at `t ∈ [0, 1]`.
    pub fn eval(&self, t: f64) -> Point2 {
        let s = 1.0 - t;
        self.start * (s * s * s)
            + self.ctrl1 * (3.0 * s * s * t)
            + self.ctrl2 * (3.0 * s * t * t)
            + self.end * (t * t * t)
    }
    /// Derivative at `t`.
    pub fn tangent(&self, t: f64) -> Point2 {
        let s = 1.0 - t;
        (self.ctrl1 - self.start) * (3.0 * s * s)
            + (self.ctrl2 - self.ctrl1) * (6.0 * s * t)
            + (self.end - self.ctrl2) * (3.0 * t * t)
    }
}

/// Closed sequence of cubic segments; segment i ends where segment i+1 starts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClosedCurve {
    pub segments: Vec<CubicSegment>,
}

impl ClosedCurve {
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
    /// Exact endpoint continuity including the wrap-around.
    pub fn is_closed(&self) -> bool {
        let n = self.segments.len();
        n > 0 && (0..n).all(|i| self.segments[i].end == self.segments[(i + 1) % n].start)
    }
    /// Polyline approximation with `per_segment` samples per segment (start inclusive).
    pub fn sample(&self, per_segment: usize) -> Vec<Point2> {
        let k = per_segment.max(1);
        self.segments
            .iter()
            .flat_map(|seg| (0..k).map(move |j| seg.eval(j as f64 / k as f64)))
            .collect()
    }
}

fn distinct_count(points: &[Point2]) -> usize {
    points
        .iter()
        .enumerate()
        .filter(|&(i, p)| !points[..i].contains(p))
        .count()
}

/// Fit a smooth closed curve through `points` (cyclic order).
///
/// Repeated points do not count towards the four-point minimum.
pub fn fit_closed(points: &[Point2]) -> Result<ClosedCurve, ConstructError> {
    let distinct = distinct_count(points);
    if distinct < MIN_CONTOUR_POINTS {
        return Err(ConstructError::InsufficientPoints {
            found: distinct,
            required: MIN_CONTOUR_POINTS,
        });
    }
    let n = points.len();
    let at = |i: usize| points[i % n];
    let segments = (0..n)
        .map(|i| {
            let p0 = at(i + n - 1);
            let p1 = at(i);
            let p2 = at(i + 1);
            let p3 = at(i + 2);
            CubicSegment {
                start: p1,
                ctrl1: p1 + (p2 - p0) / 6.0,
                ctrl2: p2 - (p3 - p1) / 6.0,
                end: p2,
            }
        })
        .collect();
    Ok(ClosedCurve { segments })
}

/// Fit through an assembled contour.
#[inline]
pub fn fit_contour(contour: &EllipseContour) -> Result<ClosedCurve, ConstructError> {
    fit_closed(contour.points())
}
