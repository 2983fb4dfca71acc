//! Tolerance defaults for the construction engine.
//!
//! Policy
//! - Defaults are fixed constants; `EngineCfg` bundles them so tests can
//!   tighten or loosen a single knob without touching call sites.

/// Points closer than this (display units) are merged by the assembler.
pub const DEDUP_EPS: f64 = 1.0;
/// Allowed deviation of `|PF| / dist(P, directrix)` from the eccentricity.
pub const LOCUS_TOLERANCE: f64 = 0.01;
/// Smallest contour the assembler and fitter accept.
pub const MIN_CONTOUR_POINTS: usize = 4;
/// Auto-advance interval of the step sequencer (time units).
pub const DEFAULT_TICK_INTERVAL: f64 = 1.5;
/// Slack for intersection heights that are zero up to rounding.
pub(crate) const HEIGHT_EPS: f64 = 1e-9;
/// Two polar angles closer than this are treated as the same direction.
pub(crate) const ANGLE_EPS: f64 = 1e-12;

/// Engine configuration (tolerances).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineCfg {
    pub dedup_eps: f64,
    pub locus_tolerance: f64,
    pub min_points: usize,
}

impl Default for EngineCfg {
    fn default() -> Self {
        Self {
            dedup_eps: DEDUP_EPS,
            locus_tolerance: LOCUS_TOLERANCE,
            min_points: MIN_CONTOUR_POINTS,
        }
    }
}
