//! Construction plans: a method bound to its parameters and step table.
//!
//! A plan is pure configuration. It validates parameters once at creation and
//! answers "is this feature drawn at this step?" by table lookup.

mod method;
mod steps;

pub use method::{AxesParams, FocusDirectrixParams, Method, MethodKind, TriangleParams};
pub use steps::{ConstructionStep, FeatureId, RevealRule};

pub(crate) use steps::ratio_text;

use crate::error::ConfigError;

/// Validated method plus its ordered steps and reveal rules.
#[derive(Clone, Debug)]
pub struct ConstructionPlan {
    method: Method,
    steps: Vec<ConstructionStep>,
    reveal: Vec<(FeatureId, RevealRule)>,
}

impl ConstructionPlan {
    pub fn new(method: Method) -> Result<Self, ConfigError> {
        method.validate()?;
        let table = steps::table_for(&method);
        tracing::debug!(
            method = %method.kind(),
            steps = table.steps.len(),
            features = table.reveal.len(),
            "construction plan ready"
        );
        Ok(Self {
            method,
            steps: table.steps,
            reveal: table.reveal,
        })
    }

    /// Plan with the default parameters of `kind` (always valid).
    pub fn defaults(kind: MethodKind) -> Result<Self, ConfigError> {
        Self::new(Method::defaults(kind))
    }

    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }
    #[inline]
    pub fn kind(&self) -> MethodKind {
        self.method.kind()
    }
    #[inline]
    pub fn title(&self) -> &'static str {
        self.method.title()
    }
    #[inline]
    pub fn scale(&self) -> f64 {
        self.method.scale()
    }
    #[inline]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
    #[inline]
    pub fn steps(&self) -> &[ConstructionStep] {
        &self.steps
    }
    /// Reveal rule of `feature`, if the method has it.
    pub fn rule(&self, feature: FeatureId) -> Option<RevealRule> {
        self.reveal
            .iter()
            .find(|(f, _)| *f == feature)
            .map(|(_, r)| *r)
    }

    /// Whether `feature` is drawn at `step`. `reveal_all` bypasses step gating
    /// for every feature the method has.
    pub fn is_visible(&self, feature: FeatureId, step: usize, reveal_all: bool) -> bool {
        match self.rule(feature) {
            None => false,
            Some(_) if reveal_all => true,
            Some(rule) => rule.admits(step),
        }
    }
}

#[cfg(test)]
mod tests;
