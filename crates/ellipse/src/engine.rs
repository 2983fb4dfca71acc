//! Engine: plan + step → draw plan.
//!
//! Every call recomputes from scratch: locate → assemble → fit. Nothing is
//! cached or shared, so separate plans can be drawn from separate threads.

use crate::assemble::{assemble, EllipseContour};
use crate::cfg::EngineCfg;
use crate::construct::{self, Construction};
use crate::draw::{DrawOp, DrawPlan, Style};
use crate::error::ConstructError;
use crate::fit::{fit_contour, ClosedCurve};
use crate::plan::{ConstructionPlan, FeatureId};
use crate::sequencer::StepSequencer;

#[derive(Clone, Copy, Debug, Default)]
pub struct Engine {
    cfg: EngineCfg,
}

impl Engine {
    pub fn new(cfg: EngineCfg) -> Self {
        Self { cfg }
    }

    #[inline]
    pub fn cfg(&self) -> EngineCfg {
        self.cfg
    }

    pub fn construct(&self, plan: &ConstructionPlan) -> Construction {
        construct::build(plan.method(), self.cfg)
    }

    fn contour_of(&self, c: &Construction) -> Result<EllipseContour, ConstructError> {
        assemble(&c.raw, Some(c.center), self.cfg)
    }

    /// Ordered closed contour through all construction points.
    pub fn contour(&self, plan: &ConstructionPlan) -> Result<EllipseContour, ConstructError> {
        self.contour_of(&self.construct(plan))
    }

    /// Smooth closed curve through the contour.
    pub fn curve(&self, plan: &ConstructionPlan) -> Result<ClosedCurve, ConstructError> {
        fit_contour(&self.contour(plan)?)
    }

    /// Draw plan for `step` (clamped to the last step). `reveal_all` draws every feature.
    ///
    /// A missing curve (`InsufficientPoints`) is logged and left out; all other
    /// features still render.
    pub fn draw_plan(&self, plan: &ConstructionPlan, step: usize, reveal_all: bool) -> DrawPlan {
        let step = step.min(plan.step_count().saturating_sub(1));
        let construction = self.construct(plan);
        let mut ops: Vec<DrawOp> = Vec::new();
        for group in &construction.features {
            if !plan.is_visible(group.id, step, reveal_all) {
                continue;
            }
            if group.id != FeatureId::Curve {
                ops.extend(group.ops.iter().cloned());
                continue;
            }
            match self.contour_of(&construction).and_then(|c| fit_contour(&c)) {
                Ok(curve) => ops.push(DrawOp::ClosedCurve {
                    segments: curve.segments,
                    style: Style::Curve,
                }),
                Err(err) => {
                    tracing::warn!(method = %plan.kind(), %err, "curve omitted from draw plan")
                }
            }
        }
        DrawPlan { ops }
    }

    /// Draw plan for the sequencer's current state.
    pub fn draw_plan_for(&self, plan: &ConstructionPlan, seq: &StepSequencer) -> DrawPlan {
        self.draw_plan(plan, seq.current_step(), seq.reveal_all())
    }
}
