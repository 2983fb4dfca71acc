//! Construction methods and their literal parameters (millimetres).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Focus–directrix method: the locus of points with `PF / PM = e`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusDirectrixParams {
    /// Distance from the focus F to the directrix AB.
    pub focus_distance_mm: f64,
    pub eccentricity: f64,
    /// Number of equally spaced ray directions sampled from F.
    pub samples: usize,
    /// Longest ray searched for a locus point.
    pub search_bound_mm: f64,
    /// Display units per millimetre.
    pub scale: f64,
}

impl Default for FocusDirectrixParams {
    fn default() -> Self {
        Self {
            focus_distance_mm: 65.0,
            eccentricity: 2.0 / 3.0,
            samples: 24,
            search_bound_mm: 150.0,
            scale: 3.77,
        }
    }
}

/// Arc-of-circle method seeded by a reference triangle ABC on the baseline AB.
///
/// A and B act as foci; A′ and B′ (AB extended by `extension_mm`) are the
/// vertices. Division points run from A towards the midpoint O.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangleParams {
    pub baseline_mm: f64,
    /// |AC|
    pub apex_from_a_mm: f64,
    /// |BC|
    pub apex_from_b_mm: f64,
    /// Half-length of the perpendicular through O.
    pub perpendicular_mm: f64,
    pub extension_mm: f64,
    pub division_spacing_mm: f64,
    pub divisions: usize,
    pub scale: f64,
}

impl Default for TriangleParams {
    fn default() -> Self {
        Self {
            baseline_mm: 100.0,
            apex_from_a_mm: 75.0,
            apex_from_b_mm: 60.0,
            perpendicular_mm: 60.0,
            extension_mm: 17.5,
            division_spacing_mm: 10.0,
            divisions: 4,
            scale: 3.5,
        }
    }
}

/// Arc-of-circle method from given major and minor axes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesParams {
    pub major_axis_mm: f64,
    pub minor_axis_mm: f64,
    /// Division points between F1 and O.
    pub divisions: usize,
    pub scale: f64,
}

impl Default for AxesParams {
    fn default() -> Self {
        Self {
            major_axis_mm: 120.0,
            minor_axis_mm: 80.0,
            divisions: 4,
            scale: 3.5,
        }
    }
}

/// Parameter-free method tag (CLI flags, step tables).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MethodKind {
    FocusDirectrix,
    ArcCircleFromAxes,
    ArcCircleFromTriangle,
    ArcCircleMirrored,
}

impl MethodKind {
    pub const ALL: [MethodKind; 4] = [
        MethodKind::FocusDirectrix,
        MethodKind::ArcCircleFromAxes,
        MethodKind::ArcCircleFromTriangle,
        MethodKind::ArcCircleMirrored,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MethodKind::FocusDirectrix => "focus-directrix",
            MethodKind::ArcCircleFromAxes => "arc-circle-from-axes",
            MethodKind::ArcCircleFromTriangle => "arc-circle-from-triangle",
            MethodKind::ArcCircleMirrored => "arc-circle-mirrored",
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MethodKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MethodKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = MethodKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown method '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// Construction method with its parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum Method {
    FocusDirectrix(FocusDirectrixParams),
    ArcCircleFromAxes(AxesParams),
    ArcCircleFromTriangle(TriangleParams),
    ArcCircleMirrored(TriangleParams),
}

impl Method {
    /// Method with the literal parameters of the classic textbook exercise.
    pub fn defaults(kind: MethodKind) -> Self {
        match kind {
            MethodKind::FocusDirectrix => Method::FocusDirectrix(FocusDirectrixParams::default()),
            MethodKind::ArcCircleFromAxes => Method::ArcCircleFromAxes(AxesParams::default()),
            MethodKind::ArcCircleFromTriangle => {
                Method::ArcCircleFromTriangle(TriangleParams::default())
            }
            MethodKind::ArcCircleMirrored => Method::ArcCircleMirrored(TriangleParams::default()),
        }
    }

    pub fn kind(&self) -> MethodKind {
        match self {
            Method::FocusDirectrix(_) => MethodKind::FocusDirectrix,
            Method::ArcCircleFromAxes(_) => MethodKind::ArcCircleFromAxes,
            Method::ArcCircleFromTriangle(_) => MethodKind::ArcCircleFromTriangle,
            Method::ArcCircleMirrored(_) => MethodKind::ArcCircleMirrored,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Method::FocusDirectrix(_) => "Focus and Directrix Method",
            Method::ArcCircleFromAxes(_) => "Arc of Circle Method (given axes)",
            Method::ArcCircleFromTriangle(_) => "Arc of Circle Method (reference triangle)",
            Method::ArcCircleMirrored(_) => "Arc of Circle Method (mirrored arcs)",
        }
    }

    /// Display units per millimetre.
    pub fn scale(&self) -> f64 {
        match self {
            Method::FocusDirectrix(p) => p.scale,
            Method::ArcCircleFromAxes(p) => p.scale,
            Method::ArcCircleFromTriangle(p) | Method::ArcCircleMirrored(p) => p.scale,
        }
    }

    /// Reject parameters that cannot describe a construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Method::FocusDirectrix(p) => p.validate(),
            Method::ArcCircleFromAxes(p) => p.validate(),
            Method::ArcCircleFromTriangle(p) | Method::ArcCircleMirrored(p) => p.validate(),
        }
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidLength { name, value })
    }
}

fn at_least(name: &'static str, value: usize, min: usize) -> Result<(), ConfigError> {
    if value >= min {
        Ok(())
    } else {
        Err(ConfigError::InvalidCount { name, value, min })
    }
}

impl FocusDirectrixParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("focus_distance_mm", self.focus_distance_mm)?;
        positive("search_bound_mm", self.search_bound_mm)?;
        positive("scale", self.scale)?;
        if !(self.eccentricity > 0.0 && self.eccentricity < 1.0) {
            return Err(ConfigError::InvalidEccentricity(self.eccentricity));
        }
        at_least("samples", self.samples, crate::cfg::MIN_CONTOUR_POINTS)
    }
}

impl TriangleParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("baseline_mm", self.baseline_mm)?;
        positive("apex_from_a_mm", self.apex_from_a_mm)?;
        positive("apex_from_b_mm", self.apex_from_b_mm)?;
        positive("perpendicular_mm", self.perpendicular_mm)?;
        positive("extension_mm", self.extension_mm)?;
        positive("division_spacing_mm", self.division_spacing_mm)?;
        positive("scale", self.scale)?;
        at_least("divisions", self.divisions, 1)?;
        let (ab, ac, bc) = (self.baseline_mm, self.apex_from_a_mm, self.apex_from_b_mm);
        if ab > ac + bc || ab < (ac - bc).abs() {
            return Err(ConfigError::Incompatible(format!(
                "AC = {ac} mm and BC = {bc} mm cannot close a triangle over AB = {ab} mm"
            )));
        }
        let reach = self.divisions as f64 * self.division_spacing_mm;
        if reach >= ab / 2.0 {
            return Err(ConfigError::Incompatible(format!(
                "{} divisions of {} mm do not fit between A and O ({} mm)",
                self.divisions,
                self.division_spacing_mm,
                ab / 2.0
            )));
        }
        Ok(())
    }
}

impl AxesParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("major_axis_mm", self.major_axis_mm)?;
        positive("minor_axis_mm", self.minor_axis_mm)?;
        positive("scale", self.scale)?;
        at_least("divisions", self.divisions, 1)?;
        if self.minor_axis_mm >= self.major_axis_mm {
            return Err(ConfigError::Incompatible(format!(
                "minor axis {} mm must be shorter than major axis {} mm",
                self.minor_axis_mm, self.major_axis_mm
            )));
        }
        Ok(())
    }
}
