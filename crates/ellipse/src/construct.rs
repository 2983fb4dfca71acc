//! Per-method construction drivers.
//!
//! Each driver turns validated parameters into named points, tagged groups of
//! draw ops, and the raw point set that the assembler closes into a contour.
//! Coordinates are display units (mm × scale), y up, with the ellipse centre
//! at a known position. Solver failures are recorded in `degraded` and the
//! affected point is skipped; the rest of the construction still renders.

use nalgebra::{vector, Vector2};
use serde::Serialize;

use crate::cfg::EngineCfg;
use crate::draw::{DrawOp, Style};
use crate::error::ConstructError;
use crate::locate::{
    circle_circle_intersections, line_circle_intersections, ratio_locus_point, trilaterate,
};
use crate::plan::{ratio_text, AxesParams, FeatureId, FocusDirectrixParams, Method, TriangleParams};
use crate::Point2;

/// Half-length (display units) of a compass mark around an intersection.
const MARK_HALF_LENGTH: f64 = 14.0;
/// Distance of text labels from the point they annotate.
const LABEL_OFFSET: f64 = 12.0;
/// Rays drawn from the focus, spread evenly over the located points.
const MAX_RAYS: usize = 12;
/// Perpendiculars drawn to the directrix.
const MAX_PERPENDICULARS: usize = 8;

/// At most `max` items taken at evenly spaced indices.
fn spread<T: Copy>(items: &[T], max: usize) -> Vec<T> {
    let n = max.min(items.len());
    (0..n).map(|i| items[i * items.len() / n]).collect()
}

/// Labelled construction point ("A", "F", "C", ...).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NamedPoint {
    pub label: String,
    pub position: Point2,
}

/// Draw ops belonging to one feature. The `Curve` group carries no ops; the
/// engine fills it with the fitted curve.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureGroup {
    pub id: FeatureId,
    pub ops: Vec<DrawOp>,
}

/// Full geometry of one method, independent of the current step.
#[derive(Clone, Debug, Default)]
pub struct Construction {
    pub named: Vec<NamedPoint>,
    pub features: Vec<FeatureGroup>,
    /// Unordered points on the ellipse (RawPointSet).
    pub raw: Vec<Point2>,
    pub center: Point2,
    pub degraded: Vec<ConstructError>,
}

impl Construction {
    fn name(&mut self, label: &str, position: Point2) {
        self.named.push(NamedPoint {
            label: label.to_owned(),
            position,
        });
    }

    fn group(&mut self, id: FeatureId, ops: Vec<DrawOp>) {
        self.features.push(FeatureGroup { id, ops });
    }

    fn degrade(&mut self, err: ConstructError) {
        tracing::debug!(%err, "construction point skipped");
        self.degraded.push(err);
    }

    pub fn named_point(&self, label: &str) -> Option<Point2> {
        self.named
            .iter()
            .find(|n| n.label == label)
            .map(|n| n.position)
    }

    pub fn feature(&self, id: FeatureId) -> Option<&FeatureGroup> {
        self.features.iter().find(|g| g.id == id)
    }

    /// Curve placeholder followed by the "ELLIPSE" caption above the top of the raw points.
    fn finish(&mut self, caption: String) {
        self.group(FeatureId::Curve, Vec::new());
        let top = self
            .raw
            .iter()
            .map(|p| p.y)
            .fold(self.center.y, f64::max);
        let anchor = vector![self.center.x, top + 2.0 * LABEL_OFFSET];
        self.group(
            FeatureId::CurveLabel,
            vec![
                DrawOp::text(anchor + vector![0.0, LABEL_OFFSET], "ELLIPSE", Style::Label),
                DrawOp::text(anchor, caption, Style::Label),
            ],
        );
    }
}

/// Build the construction for `method`.
pub fn build(method: &Method, cfg: EngineCfg) -> Construction {
    let c = match method {
        Method::FocusDirectrix(p) => focus_directrix(p, cfg),
        Method::ArcCircleFromAxes(p) => from_axes(p),
        Method::ArcCircleFromTriangle(p) => from_triangle(p, false),
        Method::ArcCircleMirrored(p) => from_triangle(p, true),
    };
    tracing::debug!(
        method = %method.kind(),
        raw = c.raw.len(),
        degraded = c.degraded.len(),
        "construction built"
    );
    c
}

/// Compass marks and intersections for each `(r1 about c1, r2 about c2)` pair.
fn compass_pairs(c1: Point2, c2: Point2, radii: &[(f64, f64)]) -> (Vec<DrawOp>, Vec<Point2>) {
    let mut arcs = Vec::new();
    let mut pts = Vec::new();
    for &(r1, r2) in radii {
        for pt in circle_circle_intersections(c1, r1, c2, r2) {
            arcs.push(DrawOp::compass_mark(c1, r1, pt, MARK_HALF_LENGTH));
            arcs.push(DrawOp::compass_mark(c2, r2, pt, MARK_HALF_LENGTH));
            pts.push(pt);
        }
    }
    (arcs, pts)
}

fn markers(pts: &[Point2]) -> Vec<DrawOp> {
    pts.iter()
        .map(|p| DrawOp::point(*p, None, Style::Marker))
        .collect()
}

fn focus_directrix(p: &FocusDirectrixParams, cfg: EngineCfg) -> Construction {
    let mut c = Construction::default();
    let s = p.scale;
    let e = p.eccentricity;
    let dist = p.focus_distance_mm * s;
    let directrix_x = 0.0;
    let focus = vector![directrix_x + dist, 0.0];

    // Polar form r = l / (1 − e cos θ) with semi-latus rectum l = e·dist.
    let latus = e * dist;
    let semi_minor = latus / (1.0 - e * e).sqrt();
    c.center = vector![focus.x + latus * e / (1.0 - e * e), 0.0];

    let half = semi_minor * 1.25 + 2.0 * LABEL_OFFSET;
    let a = vector![directrix_x, half];
    let b = vector![directrix_x, -half];
    c.name("A", a);
    c.name("B", b);
    c.name("F", focus);
    c.group(
        FeatureId::Directrix,
        vec![
            DrawOp::segment(a, b, Style::Primary),
            DrawOp::text(a + vector![0.0, LABEL_OFFSET], "A", Style::Label),
            DrawOp::text(b - vector![0.0, LABEL_OFFSET], "B", Style::Label),
            DrawOp::text(
                a + vector![-6.0 * LABEL_OFFSET, 2.0 * LABEL_OFFSET],
                "Directrix AB",
                Style::Label,
            ),
        ],
    );
    c.group(
        FeatureId::Focus,
        vec![DrawOp::point(focus, Some("F"), Style::Accent)],
    );
    let foot = vector![directrix_x, focus.y];
    c.group(
        FeatureId::FocusDistance,
        vec![
            DrawOp::segment(foot, focus, Style::Dashed),
            DrawOp::text(
                (foot + focus) / 2.0 + vector![0.0, LABEL_OFFSET],
                format!("{} mm", p.focus_distance_mm),
                Style::Label,
            ),
        ],
    );

    let bound = p.search_bound_mm * s;
    let mut located: Vec<Point2> = Vec::with_capacity(p.samples);
    for k in 0..p.samples {
        let theta = k as f64 * std::f64::consts::TAU / p.samples as f64;
        let dir = Vector2::new(theta.cos(), theta.sin());
        match ratio_locus_point(focus, directrix_x, e, dir, bound, cfg.locus_tolerance) {
            Ok(pt) => located.push(pt),
            Err(err) => c.degrade(err),
        }
    }

    c.group(
        FeatureId::Rays,
        spread(&located, MAX_RAYS)
            .into_iter()
            .map(|pt| DrawOp::segment(focus, pt, Style::Construction))
            .collect(),
    );
    c.group(
        FeatureId::Perpendiculars,
        spread(&located, MAX_PERPENDICULARS)
            .into_iter()
            .map(|pt| DrawOp::segment(pt, vector![directrix_x, pt.y], Style::Dashed))
            .collect(),
    );
    c.group(
        FeatureId::LocusPoints,
        located
            .iter()
            .enumerate()
            .step_by(2)
            .map(|(i, pt)| DrawOp::point(*pt, Some(&format!("P{}", i + 1)), Style::Marker))
            .collect(),
    );
    c.raw = located;
    c.finish(format!("(e = {} < 1)", ratio_text(e)));
    c
}

fn from_triangle(p: &TriangleParams, mirrored: bool) -> Construction {
    let mut c = Construction::default();
    let s = p.scale;
    let half = p.baseline_mm * s / 2.0;
    let o = Point2::zeros();
    let a = vector![-half, 0.0];
    let b = vector![half, 0.0];
    let ext = p.extension_mm * s;
    let a_ext = a - vector![ext, 0.0];
    let b_ext = b + vector![ext, 0.0];
    let perp = vector![0.0, p.perpendicular_mm * s];
    c.center = o;

    c.name("A", a);
    c.name("B", b);
    c.group(
        FeatureId::Baseline,
        vec![
            DrawOp::segment(a, b, Style::Primary),
            DrawOp::point(a, Some("A"), Style::Primary),
            DrawOp::point(b, Some("B"), Style::Primary),
        ],
    );

    match trilaterate(a, b, p.apex_from_a_mm * s, p.apex_from_b_mm * s) {
        Ok(apex) => {
            c.name("C", apex);
            c.group(
                FeatureId::TriangleApex,
                vec![
                    DrawOp::point(apex, Some("C"), Style::Accent),
                    DrawOp::segment(a, apex, Style::Dashed),
                    DrawOp::segment(apex, b, Style::Dashed),
                ],
            );
        }
        Err(err) => c.degrade(err),
    }

    c.name("O", o);
    c.group(
        FeatureId::CenterPerpendicular,
        vec![
            DrawOp::point(o, Some("O"), Style::Accent),
            DrawOp::segment(o + perp, o - perp, Style::Construction),
        ],
    );

    c.name("A'", a_ext);
    c.name("B'", b_ext);
    c.group(
        FeatureId::ExtendedEnds,
        vec![
            DrawOp::segment(a_ext, a, Style::Construction),
            DrawOp::segment(b, b_ext, Style::Construction),
            DrawOp::point(a_ext, Some("A'"), Style::Accent),
            DrawOp::point(b_ext, Some("B'"), Style::Accent),
        ],
    );

    let divisions: Vec<Point2> = (1..=p.divisions)
        .map(|i| a + vector![i as f64 * p.division_spacing_mm * s, 0.0])
        .collect();
    c.group(
        FeatureId::Divisions,
        divisions
            .iter()
            .enumerate()
            .map(|(k, q)| DrawOp::point(*q, Some(&(k + 1).to_string()), Style::Accent))
            .collect(),
    );

    for (k, q) in divisions.iter().enumerate() {
        let ra = (a_ext - q).norm();
        let rb = (b_ext - q).norm();
        let mut radii = vec![(ra, rb)];
        if mirrored {
            radii.push((rb, ra));
        }
        let (arcs, pts) = compass_pairs(a, b, &radii);
        c.group(FeatureId::DivisionArcs(k), arcs);
        c.group(FeatureId::DivisionPoints(k), markers(&pts));
        c.raw.extend(pts);
    }

    let (arcs, pts) = compass_pairs(a, b, &[((a_ext - o).norm(), (b_ext - o).norm())]);
    c.group(FeatureId::MinorAxisArcs, arcs);
    c.group(FeatureId::MinorAxisPoints, markers(&pts));
    c.raw.extend(pts);

    let (arcs, pts) = compass_pairs(
        a,
        b,
        &[
            ((a_ext - a).norm(), (b_ext - a).norm()),
            ((a_ext - b).norm(), (b_ext - b).norm()),
        ],
    );
    c.group(FeatureId::VertexArcs, arcs);
    c.group(FeatureId::VertexPoints, markers(&pts));
    c.raw.extend(pts);

    c.finish("(Smooth curve)".to_owned());
    c
}

fn from_axes(p: &AxesParams) -> Construction {
    let mut c = Construction::default();
    let s = p.scale;
    let semi_major = p.major_axis_mm * s / 2.0;
    let semi_minor = p.minor_axis_mm * s / 2.0;
    let o = Point2::zeros();
    let a_ext = vector![-semi_major, 0.0];
    let b_ext = vector![semi_major, 0.0];
    let top = vector![0.0, semi_minor];
    let bottom = vector![0.0, -semi_minor];
    c.center = o;

    for (label, pt) in [("A'", a_ext), ("B'", b_ext), ("C", top), ("D", bottom), ("O", o)] {
        c.name(label, pt);
    }
    c.group(
        FeatureId::Axes,
        vec![
            DrawOp::segment(a_ext, b_ext, Style::Primary),
            DrawOp::segment(top, bottom, Style::Primary),
            DrawOp::point(a_ext, Some("A'"), Style::Primary),
            DrawOp::point(b_ext, Some("B'"), Style::Primary),
            DrawOp::point(top, Some("C"), Style::Primary),
            DrawOp::point(bottom, Some("D"), Style::Primary),
            DrawOp::point(o, Some("O"), Style::Accent),
        ],
    );
    c.raw.extend([a_ext, b_ext, top, bottom]);

    // |CF| = a puts the foci where the circle about C meets the major axis.
    let foci = line_circle_intersections(a_ext, b_ext - a_ext, top, semi_major);
    let (f1, f2) = match foci.as_slice() {
        [f1, f2] => (*f1, *f2),
        _ => {
            c.degrade(ConstructError::Unsatisfiable {
                r1: semi_major,
                r2: semi_major,
                d: semi_minor,
            });
            c.finish("(Smooth curve)".to_owned());
            return c;
        }
    };
    c.name("F1", f1);
    c.name("F2", f2);
    c.group(
        FeatureId::FocusArcs,
        vec![
            DrawOp::compass_mark(top, semi_major, f1, MARK_HALF_LENGTH),
            DrawOp::compass_mark(top, semi_major, f2, MARK_HALF_LENGTH),
        ],
    );
    c.group(
        FeatureId::Foci,
        vec![
            DrawOp::point(f1, Some("F1"), Style::Accent),
            DrawOp::point(f2, Some("F2"), Style::Accent),
        ],
    );

    let n = p.divisions;
    let divisions: Vec<Point2> = (1..=n)
        .map(|j| f1 + (o - f1) * (j as f64 / (n + 1) as f64))
        .collect();
    c.group(
        FeatureId::Divisions,
        divisions
            .iter()
            .enumerate()
            .map(|(k, q)| DrawOp::point(*q, Some(&(k + 1).to_string()), Style::Accent))
            .collect(),
    );
    for (k, q) in divisions.iter().enumerate() {
        let r1 = (a_ext - q).norm();
        let r2 = (b_ext - q).norm();
        let (arcs, pts) = compass_pairs(f1, f2, &[(r1, r2), (r2, r1)]);
        c.group(FeatureId::DivisionArcs(k), arcs);
        c.group(FeatureId::DivisionPoints(k), markers(&pts));
        c.raw.extend(pts);
    }

    c.finish("(Smooth curve)".to_owned());
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::MethodKind;

    fn built(kind: MethodKind) -> Construction {
        build(&Method::defaults(kind), EngineCfg::default())
    }

    /// |PF1| + |PF2| for every raw point.
    fn focal_sums(c: &Construction, f1: Point2, f2: Point2) -> Vec<f64> {
        c.raw
            .iter()
            .map(|p| (p - f1).norm() + (p - f2).norm())
            .collect()
    }

    #[test]
    fn triangle_apex_matches_reference_values() {
        let c = built(MethodKind::ArcCircleFromTriangle);
        let apex = c.named_point("C").unwrap();
        let a = c.named_point("A").unwrap();
        // 60.125 mm along AB, 44.833 mm above it, at 3.5 display units per mm.
        assert!((apex.x - (a.x + 60.125 * 3.5)).abs() < 1e-9);
        assert!((apex.y - 44.833 * 3.5).abs() < 0.01);
    }

    #[test]
    fn triangle_points_lie_on_the_ellipse_with_foci_a_and_b() {
        let c = built(MethodKind::ArcCircleFromTriangle);
        let (a, b) = (c.named_point("A").unwrap(), c.named_point("B").unwrap());
        let major = (c.named_point("B'").unwrap() - c.named_point("A'").unwrap()).norm();
        for s in focal_sums(&c, a, b) {
            assert!((s - major).abs() < 1e-3, "focal sum {s} vs {major}");
        }
        // 4 divisions × 2, minor axis × 2, vertices × 2
        assert_eq!(c.raw.len(), 12);
        assert!(c.degraded.is_empty());
    }

    #[test]
    fn mirrored_variant_is_symmetric_about_the_minor_axis() {
        let c = built(MethodKind::ArcCircleMirrored);
        assert_eq!(c.raw.len(), 20);
        for p in &c.raw {
            let mirror = vector![-p.x, p.y];
            assert!(
                c.raw.iter().any(|q| (q - mirror).norm() < 1e-6),
                "no mirror for {p:?}"
            );
        }
    }

    #[test]
    fn axes_method_finds_foci_and_points() {
        let c = built(MethodKind::ArcCircleFromAxes);
        let f1 = c.named_point("F1").unwrap();
        let f2 = c.named_point("F2").unwrap();
        // c² = a² − b² with a = 60 mm, b = 40 mm
        let focal = (60.0f64.powi(2) - 40.0f64.powi(2)).sqrt() * 3.5;
        assert!((f1.x + focal).abs() < 1e-9 && (f2.x - focal).abs() < 1e-9);
        for s in focal_sums(&c, f1, f2) {
            assert!((s - 120.0 * 3.5).abs() < 1e-6);
        }
        assert_eq!(c.raw.len(), 4 + 4 * 4);
        assert!(c.feature(FeatureId::Curve).unwrap().ops.is_empty());
        assert_eq!(c.feature(FeatureId::FocusArcs).unwrap().ops.len(), 2);
    }

    #[test]
    fn focus_directrix_points_keep_the_ratio() {
        let c = built(MethodKind::FocusDirectrix);
        let f = c.named_point("F").unwrap();
        assert_eq!(c.raw.len(), 24);
        for p in &c.raw {
            let ratio = (p - f).norm() / p.x.abs();
            assert!((ratio - 2.0 / 3.0).abs() < 0.01);
        }
        assert_eq!(c.feature(FeatureId::Rays).unwrap().ops.len(), 12);
        assert_eq!(c.feature(FeatureId::Perpendiculars).unwrap().ops.len(), 8);
        assert_eq!(c.feature(FeatureId::LocusPoints).unwrap().ops.len(), 12);
        // Known centre is midway between the vertices on the axis.
        let xs: Vec<f64> = c.raw.iter().map(|p| p.x).collect();
        let (lo, hi) = xs
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(l, h), x| (l.min(*x), h.max(*x)));
        assert!(((lo + hi) / 2.0 - c.center.x).abs() < 1e-6);
    }

    #[test]
    fn short_search_bound_degrades_instead_of_failing() {
        let method = Method::FocusDirectrix(FocusDirectrixParams {
            search_bound_mm: 100.0,
            ..Default::default()
        });
        let c = build(&method, EngineCfg::default());
        assert!(!c.degraded.is_empty());
        assert_eq!(c.raw.len() + c.degraded.len(), 24);
        assert!(c
            .degraded
            .iter()
            .all(|e| matches!(e, ConstructError::LocusNotFound { .. })));
    }

    #[test]
    fn spread_picks_evenly_and_caps_at_the_input() {
        let xs: Vec<usize> = (0..24).collect();
        assert_eq!(spread(&xs, 8), vec![0, 3, 6, 9, 12, 15, 18, 21]);
        assert_eq!(spread(&xs[..5], 8), vec![0, 1, 2, 3, 4]);
        assert!(spread(&xs[..0], 8).is_empty());
    }

    #[test]
    fn every_group_is_in_the_reveal_table() {
        for kind in MethodKind::ALL {
            let plan = crate::plan::ConstructionPlan::defaults(kind).unwrap();
            let c = build(plan.method(), EngineCfg::default());
            for g in &c.features {
                assert!(plan.rule(g.id).is_some(), "{kind}: {:?} has no rule", g.id);
            }
        }
    }
}
