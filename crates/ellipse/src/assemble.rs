//! Point assembly: raw construction points → one simple closed contour.
//!
//! Model
//! - Greedy dedup in input order (first representative wins).
//! - Angular sort around a reference centre (known ellipse centre, else the
//!   mean of the kept points). One rule for every method; no quadrant logic.
//! - The sorted sequence is cyclic; the last point connects back to the first.

use serde::Serialize;

use crate::cfg::{EngineCfg, ANGLE_EPS, MIN_CONTOUR_POINTS};
use crate::error::ConstructError;
use crate::Point2;

/// Ordered, closed loop of distinct points.
///
/// Invariants:
/// - At least `MIN_CONTOUR_POINTS` points, more if `EngineCfg::min_points` asks for it.
/// - No two points closer than `EngineCfg::dedup_eps`.
/// - Polar angles around `center` strictly increase along the sequence.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EllipseContour {
    points: Vec<Point2>,
    center: Point2,
}

impl EllipseContour {
    #[inline]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }
    #[inline]
    pub fn center(&self) -> Point2 {
        self.center
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    /// Consecutive pairs including the closing edge (last → first).
    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

/// Merge points within `eps` of an already kept point.
pub fn dedup(raw: &[Point2], eps: f64) -> Vec<Point2> {
    let mut kept: Vec<Point2> = Vec::with_capacity(raw.len());
    for p in raw {
        if !(p.x.is_finite() && p.y.is_finite()) {
            continue;
        }
        if kept.iter().all(|q| (q - p).norm() >= eps) {
            kept.push(*p);
        }
    }
    kept
}

fn mean(points: &[Point2]) -> Point2 {
    let sum = points.iter().fold(Point2::zeros(), |acc, p| acc + p);
    sum / points.len().max(1) as f64
}

/// Angle in `(-π, π]`; `+ 0.0` turns a negative zero offset into `+0.0` so the
/// negative x-ray always maps to `π`.
#[inline]
fn polar_angle(p: Point2, c: Point2) -> f64 {
    ((p.y - c.y) + 0.0).atan2(p.x - c.x)
}

/// Order a raw point set into an `EllipseContour`.
pub fn assemble(
    raw: &[Point2],
    known_center: Option<Point2>,
    cfg: EngineCfg,
) -> Result<EllipseContour, ConstructError> {
    let required = cfg.min_points.max(MIN_CONTOUR_POINTS);
    let insufficient = |found| ConstructError::InsufficientPoints { found, required };
    let kept = dedup(raw, cfg.dedup_eps);
    if kept.len() < required {
        return Err(insufficient(kept.len()));
    }
    let center = known_center.unwrap_or_else(|| mean(&kept));

    let mut keyed: Vec<(f64, f64, Point2)> = kept
        .into_iter()
        .filter(|p| (p - center).norm() > 0.0)
        .map(|p| (polar_angle(p, center), (p - center).norm(), p))
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(b.1.total_cmp(&a.1)));

    // Same direction from the centre: keep the farthest point (sorted first).
    let mut points: Vec<Point2> = Vec::with_capacity(keyed.len());
    let mut last_angle: Option<f64> = None;
    for (angle, _, p) in keyed {
        if last_angle.is_some_and(|prev| angle - prev <= ANGLE_EPS) {
            continue;
        }
        last_angle = Some(angle);
        points.push(p);
    }
    if points.len() < required {
        return Err(insufficient(points.len()));
    }
    tracing::debug!(points = points.len(), raw = raw.len(), "assembled contour");
    Ok(EllipseContour { points, center })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn ellipse_points(n: usize, a: f64, b: f64, phase: f64) -> Vec<Point2> {
        (0..n)
            .map(|k| {
                let t = phase + k as f64 * std::f64::consts::TAU / n as f64;
                vector![a * t.cos(), b * t.sin()]
            })
            .collect()
    }

    fn assert_contour_invariants(c: &EllipseContour, eps: f64) {
        let pts = c.points();
        for i in 0..pts.len() {
            for j in (i + 1)..pts.len() {
                assert!((pts[i] - pts[j]).norm() >= eps);
            }
        }
        for w in pts.windows(2) {
            assert!(polar_angle(w[1], c.center()) > polar_angle(w[0], c.center()));
        }
    }

    #[test]
    fn shuffled_ellipse_points_come_back_in_angular_order() {
        let mut pts = ellipse_points(16, 100.0, 60.0, 0.1);
        let mut rng = StdRng::seed_from_u64(7);
        for i in (1..pts.len()).rev() {
            pts.swap(i, rng.gen_range(0..=i));
        }
        let c = assemble(&pts, None, EngineCfg::default()).unwrap();
        assert_eq!(c.len(), 16);
        assert_contour_invariants(&c, 1.0);
        assert_eq!(c.edges().count(), 16);
    }

    #[test]
    fn near_duplicates_are_merged_first_wins() {
        let mut pts = ellipse_points(8, 50.0, 30.0, 0.0);
        pts.push(pts[0] + vector![0.4, 0.3]);
        pts.push(pts[3] + vector![-0.2, 0.1]);
        let c = assemble(&pts, Some(Point2::zeros()), EngineCfg::default()).unwrap();
        assert_eq!(c.len(), 8);
        assert!(c.points().contains(&vector![50.0, 0.0]));
    }

    #[test]
    fn too_few_points_is_reported() {
        let pts = vec![
            vector![0.0, 0.0],
            vector![10.0, 0.0],
            vector![0.0, 10.0],
            vector![0.2, 0.2],
        ];
        assert_eq!(
            assemble(&pts, None, EngineCfg::default()),
            Err(ConstructError::InsufficientPoints {
                found: 3,
                required: 4
            })
        );
    }

    #[test]
    fn collinear_with_centre_keeps_the_outer_point() {
        let mut pts = ellipse_points(6, 40.0, 40.0, 0.0);
        pts.push(vector![20.0, 0.0]);
        let c = assemble(&pts, Some(Point2::zeros()), EngineCfg::default()).unwrap();
        assert_eq!(c.len(), 6);
        assert!(!c.points().contains(&vector![20.0, 0.0]));
    }

    #[test]
    fn configured_minimum_below_four_is_raised() {
        let pts = vec![vector![10.0, 0.0], vector![0.0, 10.0]];
        let cfg = EngineCfg {
            min_points: 2,
            ..EngineCfg::default()
        };
        assert_eq!(
            assemble(&pts, None, cfg),
            Err(ConstructError::InsufficientPoints {
                found: 2,
                required: 4
            })
        );
    }

    #[test]
    fn negative_zero_on_the_left_ray_keeps_one_point() {
        let mut pts = ellipse_points(6, 40.0, 40.0, 0.5);
        pts.push(vector![-30.0, -0.0]);
        pts.push(vector![-50.0, 0.0]);
        let c = assemble(&pts, Some(Point2::zeros()), EngineCfg::default()).unwrap();
        assert_eq!(c.len(), 7);
        assert!(c.points().contains(&vector![-50.0, 0.0]));
        assert!(!c.points().contains(&vector![-30.0, 0.0]));
        assert_contour_invariants(&c, 1.0);
    }

    #[test]
    fn non_finite_points_are_dropped() {
        let mut pts = ellipse_points(5, 40.0, 20.0, 0.3);
        pts.push(vector![f64::NAN, 1.0]);
        let c = assemble(&pts, None, EngineCfg::default()).unwrap();
        assert_eq!(c.len(), 5);
    }

    proptest! {
        #[test]
        fn assembled_contour_is_strictly_angular(
            seed in any::<u64>(),
            n in 4usize..60,
            a in 20.0f64..300.0,
            b in 20.0f64..300.0,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let pts: Vec<Point2> = (0..n)
                .map(|_| {
                    let t: f64 = rng.gen::<f64>() * std::f64::consts::TAU;
                    let s: f64 = rng.gen_range(0.9..1.1);
                    vector![a * s * t.cos(), b * s * t.sin()]
                })
                .collect();
            match assemble(&pts, Some(Point2::zeros()), EngineCfg::default()) {
                Ok(c) => assert_contour_invariants(&c, 1.0),
                Err(ConstructError::InsufficientPoints { found, .. }) => prop_assert!(found < 4),
                Err(e) => prop_assert!(false, "unexpected {e}"),
            }
        }
    }
}
