//! Point locating: compass intersections and the focus–directrix locus.
//!
//! Purpose
//! - Pure, deterministic solvers that every construction method shares.
//! - Strict variants report `ConstructError`; the clamped circle/circle variant
//!   degrades to the nearest feasible point instead.
//!
//! Conventions
//! - `Point2` is a display-unit position with the y axis pointing up. "Left of
//!   A→B" is the counter-clockwise side, i.e. above a left-to-right baseline.

mod solvers;

pub use solvers::{
    circle_circle_intersections, line_circle_intersections, ratio_locus_point, trilaterate,
    trilaterate_mirrored, trilaterate_pair,
};
