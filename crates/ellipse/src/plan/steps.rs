//! Step lists and reveal tables, one per method.
//!
//! Each step names the features it introduces. `Since` features stay visible
//! from their step on; `During` features (compass arcs) only while their step
//! is current.

use serde::Serialize;

use super::method::{AxesParams, FocusDirectrixParams, Method, TriangleParams};

/// Drawable feature of a construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureId {
    Directrix,
    Focus,
    FocusDistance,
    Rays,
    Perpendiculars,
    LocusPoints,
    Baseline,
    Axes,
    TriangleApex,
    CenterPerpendicular,
    ExtendedEnds,
    FocusArcs,
    Foci,
    Divisions,
    DivisionArcs(usize),
    DivisionPoints(usize),
    MinorAxisArcs,
    MinorAxisPoints,
    VertexArcs,
    VertexPoints,
    Curve,
    CurveLabel,
}

/// When a feature is eligible for drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RevealRule {
    Since(usize),
    During(usize),
}

impl RevealRule {
    #[inline]
    pub fn admits(self, step: usize) -> bool {
        match self {
            RevealRule::Since(s) => step >= s,
            RevealRule::During(s) => step == s,
        }
    }
}

/// One numbered construction step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConstructionStep {
    pub index: usize,
    pub label: String,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct StepTable {
    pub steps: Vec<ConstructionStep>,
    pub reveal: Vec<(FeatureId, RevealRule)>,
}

impl StepTable {
    fn step(mut self, label: String, since: &[FeatureId], during: &[FeatureId]) -> Self {
        let index = self.steps.len();
        self.reveal
            .extend(since.iter().map(|f| (*f, RevealRule::Since(index))));
        self.reveal
            .extend(during.iter().map(|f| (*f, RevealRule::During(index))));
        self.steps.push(ConstructionStep { index, label });
        self
    }
}

/// Eccentricity as a short decimal ("0.667", "0.5").
pub(crate) fn ratio_text(e: f64) -> String {
    let s = format!("{e:.3}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub(crate) fn table_for(method: &Method) -> StepTable {
    match method {
        Method::FocusDirectrix(p) => focus_directrix(p),
        Method::ArcCircleFromAxes(p) => from_axes(p),
        Method::ArcCircleFromTriangle(p) => from_triangle(p, false),
        Method::ArcCircleMirrored(p) => from_triangle(p, true),
    }
}

fn focus_directrix(p: &FocusDirectrixParams) -> StepTable {
    use FeatureId::*;
    let e = ratio_text(p.eccentricity);
    StepTable::default()
        .step("Draw the directrix line AB of any length".into(), &[Directrix], &[])
        .step(
            format!("Mark focus point F at {} mm from AB", p.focus_distance_mm),
            &[Focus, FocusDistance],
            &[],
        )
        .step(
            format!("From F, draw rays in {} equally spaced directions", p.samples),
            &[Rays],
            &[],
        )
        .step(
            format!("On each ray locate point P such that PF/PM = {e}"),
            &[Perpendiculars],
            &[],
        )
        .step("Mark all points P that satisfy the ratio".into(), &[LocusPoints], &[])
        .step("Join all points with a smooth curve".into(), &[Curve], &[])
        .step(
            format!("The curve formed is an ELLIPSE (e = {e} < 1)"),
            &[CurveLabel],
            &[],
        )
}

fn from_triangle(p: &TriangleParams, mirrored: bool) -> StepTable {
    use FeatureId::*;
    let n = p.divisions;
    let mut t = StepTable::default()
        .step(
            format!("Construct horizontal line AB of {} mm", p.baseline_mm),
            &[Baseline],
            &[],
        )
        .step(
            format!(
                "Mark point C above AB such that AC = {} mm and BC = {} mm; join triangle ABC",
                p.apex_from_a_mm, p.apex_from_b_mm
            ),
            &[TriangleApex],
            &[],
        )
        .step(
            format!(
                "Draw the perpendicular through the midpoint O of AB, {} mm up and down",
                p.perpendicular_mm
            ),
            &[CenterPerpendicular],
            &[],
        )
        .step(
            format!("Extend AO and BO by {} mm to mark A' and B'", p.extension_mm),
            &[ExtendedEnds],
            &[],
        )
        .step(
            format!(
                "From A towards O mark {n} points {} mm apart, numbered 1 to {n}",
                p.division_spacing_mm
            ),
            &[Divisions],
            &[],
        );
    for k in 0..n {
        let i = k + 1;
        let label = if mirrored {
            format!(
                "Radius A'-{i} about A and B'-{i} about B, then swap the radii; mark the four intersections"
            )
        } else {
            format!("Radius A'-{i} about A and B'-{i} about B; mark the intersecting arcs")
        };
        t = t.step(label, &[DivisionPoints(k)], &[DivisionArcs(k)]);
    }
    t.step(
        "Radius A'-O about A and B'-O about B cut the perpendicular (minor axis)".into(),
        &[MinorAxisPoints],
        &[MinorAxisArcs],
    )
    .step(
        "Radii A'-A and B'-A about A and B locate the vertices A' and B'".into(),
        &[VertexPoints],
        &[VertexArcs],
    )
    .step(
        "Connect all intersection points with a smooth curve to form the ellipse".into(),
        &[Curve, CurveLabel],
        &[],
    )
}

fn from_axes(p: &AxesParams) -> StepTable {
    use FeatureId::*;
    let n = p.divisions;
    let mut t = StepTable::default()
        .step(
            format!(
                "Draw major axis A'B' of {} mm and minor axis CD of {} mm bisecting each other at O",
                p.major_axis_mm, p.minor_axis_mm
            ),
            &[Axes],
            &[],
        )
        .step(
            format!(
                "With C as centre and radius {} mm cut A'B' at the foci F1 and F2",
                p.major_axis_mm / 2.0
            ),
            &[Foci],
            &[FocusArcs],
        )
        .step(
            format!("Mark {n} equally spaced points between F1 and O"),
            &[Divisions],
            &[],
        );
    for k in 0..n {
        let i = k + 1;
        t = t.step(
            format!("Radii A'-{i} and B'-{i} about F1 and F2; mark the four intersections"),
            &[DivisionPoints(k)],
            &[DivisionArcs(k)],
        );
    }
    t.step(
        "Join all points with a smooth curve to form the ellipse".into(),
        &[Curve, CurveLabel],
        &[],
    )
}
