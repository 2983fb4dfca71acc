//! Error types for point locating, assembly and plan configuration.
//!
//! Everything in `ConstructError` is recoverable: the engine drops the affected
//! point or curve and keeps drawing the rest. `ConfigError` is raised only by
//! `ConstructionPlan::new`.

use thiserror::Error;

/// Geometric failures raised while building a construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructError {
    /// The two circles do not meet (triangle inequality violated).
    #[error("circles of radius {r1} and {r2} with centres {d} apart do not intersect")]
    Unsatisfiable { r1: f64, r2: f64, d: f64 },

    /// No point on the ray satisfies the focus/directrix ratio within the search bound.
    #[error("no locus point with eccentricity {eccentricity} along direction {angle:.4} rad")]
    LocusNotFound { eccentricity: f64, angle: f64 },

    /// Too few distinct points to close a contour.
    #[error("need at least {required} distinct points, found {found}")]
    InsufficientPoints { found: usize, required: usize },
}

/// Rejected method parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A length, scale or bound is zero, negative or not finite.
    #[error("parameter '{name}' must be a positive finite length, got {value}")]
    InvalidLength { name: &'static str, value: f64 },

    /// Eccentricity outside the open interval (0, 1).
    #[error("eccentricity must lie in (0, 1) for an ellipse, got {0}")]
    InvalidEccentricity(f64),

    /// A count parameter is below its minimum.
    #[error("parameter '{name}' must be at least {min}, got {value}")]
    InvalidCount {
        name: &'static str,
        value: usize,
        min: usize,
    },

    /// Individually valid parameters that cannot be combined.
    #[error("incompatible parameters: {0}")]
    Incompatible(String),
}
