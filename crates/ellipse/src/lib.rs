//! Compass-and-straightedge ellipse constructions as step-revealable draw plans.
//!
//! Pipeline
//! - `plan`: method + literal parameters + step table (what is drawn when).
//! - `locate`: circle/circle, circle/line and focus–directrix solvers.
//! - `construct`: per-method drivers producing named points and raw points.
//! - `assemble`: dedup + angular sort into one closed contour.
//! - `fit`: periodic Catmull-Rom → cubic Bézier segments.
//! - `engine`: ties the above together into a `DrawPlan` for a step.
//! - `sequencer`: step state machine with an owned auto-advance timer.
//!
//! Everything except the sequencer is a pure function of its inputs.

pub mod assemble;
pub mod cfg;
pub mod construct;
pub mod draw;
pub mod engine;
pub mod error;
pub mod fit;
pub mod locate;
pub mod plan;
pub mod sequencer;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Planar position in display units (y up).
pub type Point2 = nalgebra::Vector2<f64>;

pub use assemble::{assemble, EllipseContour};
pub use cfg::EngineCfg;
pub use draw::{DrawOp, DrawPlan, Style};
pub use engine::Engine;
pub use error::{ConfigError, ConstructError};
pub use fit::{fit_closed, ClosedCurve, CubicSegment};
pub use plan::{ConstructionPlan, FeatureId, Method, MethodKind};
pub use sequencer::{SequencerEvent, SequencerState, StepSequencer, TimerId};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::construct::{Construction, NamedPoint};
    pub use crate::locate::{
        circle_circle_intersections, line_circle_intersections, ratio_locus_point, trilaterate,
    };
    pub use crate::plan::{AxesParams, FocusDirectrixParams, TriangleParams};
    pub use crate::{
        ConstructionPlan, DrawOp, DrawPlan, Engine, EngineCfg, Method, MethodKind, Point2,
        StepSequencer,
    };
    pub use nalgebra::{vector, Vector2};
}
