//! Draw plan: the renderer-facing output of the engine.
//!
//! Angles are radians, counter-clockwise, in the y-up display frame. Styles
//! are semantic roles; colours and stroke widths belong to the renderer.

use serde::Serialize;

use crate::fit::CubicSegment;
use crate::Point2;

/// Semantic stroke/fill role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// Given lines and reference points.
    Primary,
    /// Derived key points (apex, centre, foci).
    Accent,
    /// Thin helper lines and compass arcs.
    Construction,
    Dashed,
    /// Located points on the ellipse.
    Marker,
    Curve,
    Label,
}

/// One drawing instruction.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Point {
        position: Point2,
        label: Option<String>,
        style: Style,
    },
    Segment {
        from: Point2,
        to: Point2,
        style: Style,
    },
    Arc {
        center: Point2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        style: Style,
    },
    ClosedCurve {
        segments: Vec<CubicSegment>,
        style: Style,
    },
    Text {
        position: Point2,
        text: String,
        style: Style,
    },
}

impl DrawOp {
    pub fn point(position: Point2, label: Option<&str>, style: Style) -> Self {
        DrawOp::Point {
            position,
            label: label.map(str::to_owned),
            style,
        }
    }
    pub fn segment(from: Point2, to: Point2, style: Style) -> Self {
        DrawOp::Segment { from, to, style }
    }
    pub fn text(position: Point2, text: impl Into<String>, style: Style) -> Self {
        DrawOp::Text {
            position,
            text: text.into(),
            style,
        }
    }
    /// Short compass mark of `radius` about `center`, centred on the direction of `through`.
    pub fn compass_mark(center: Point2, radius: f64, through: Point2, half_length: f64) -> Self {
        let mid = (through.y - center.y).atan2(through.x - center.x);
        let spread = if radius > 0.0 {
            (half_length / radius).min(0.6)
        } else {
            0.0
        };
        DrawOp::Arc {
            center,
            radius,
            start_angle: mid - spread,
            end_angle: mid + spread,
            style: Style::Construction,
        }
    }
    pub fn style(&self) -> Style {
        match self {
            DrawOp::Point { style, .. }
            | DrawOp::Segment { style, .. }
            | DrawOp::Arc { style, .. }
            | DrawOp::ClosedCurve { style, .. }
            | DrawOp::Text { style, .. } => *style,
        }
    }
}

/// Ordered drawing instructions for one (method, step, reveal mode).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DrawPlan {
    pub ops: Vec<DrawOp>,
}

impl DrawPlan {
    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, DrawOp> {
        self.ops.iter()
    }
    pub fn has_closed_curve(&self) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op, DrawOp::ClosedCurve { .. }))
    }
    pub fn closed_curve(&self) -> Option<&[CubicSegment]> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::ClosedCurve { segments, .. } => Some(segments.as_slice()),
            _ => None,
        })
    }
    /// Labels of all labelled points, in draw order.
    pub fn point_labels(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Point {
                    label: Some(l), ..
                } => Some(l.as_str()),
                _ => None,
            })
            .collect()
    }
    pub fn count_arcs(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Arc { .. }))
            .count()
    }
}
