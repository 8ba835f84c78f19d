use serde::Serialize;

use crate::config::DrawingMode;
use crate::geometry::{Passage, PolarPoint, Projection, Track};
use crate::layout::{Direction, Layout};

/// The stroke of one curve.
#[derive(Debug, Clone, Serialize)]
pub struct CurvePath {
    pub curve: usize,
    pub track: Track,
    /// SVG path data in canvas coordinates.
    pub d: String,
    /// False only when the crossing sequence does not bring the curve back to
    /// its starting level.
    pub closed: bool,
}

impl CurvePath {
    pub fn radius_at(&self, angle: f32) -> f32 {
        self.track.radius_at(angle)
    }

    /// Every curve meets each ray from the center once, so a point is inside
    /// exactly when it is closer to the center than the curve on its ray.
    pub fn contains(&self, point: PolarPoint) -> bool {
        point.radius < self.radius_at(point.angle)
    }
}

/// Bit `c` is set when curve `c` encloses `point`.
pub fn signature_of(curves: &[CurvePath], point: PolarPoint) -> u32 {
    curves
        .iter()
        .filter(|curve| curve.contains(point))
        .fold(0u32, |bits, curve| bits | (1 << curve.curve))
}

pub fn trace_curve(curve: usize, layout: &Layout, projection: &Projection) -> CurvePath {
    let trace = &layout.traces[curve];
    let passages: Vec<Passage> = trace
        .events
        .iter()
        .map(|event| {
            let (from, to) = match event.direction {
                Direction::Outward => (event.ring, event.ring + 1),
                Direction::Inward => (event.ring + 1, event.ring),
            };
            Passage {
                column: event.crossing,
                toward: projection.level_radius(to),
                away: projection.level_radius(from),
                to: projection.level_radius(to),
            }
        })
        .collect();
    let track = Track::build(
        projection.level_radius(trace.start_level),
        &passages,
        layout,
        projection.half_width,
    );

    let end_level = layout.level_of(curve, layout.total_columns());
    let closed = end_level == trace.start_level;
    let mut d = String::new();
    projection.append_path(&mut d, &track.segments, true);
    if closed && projection.mode == DrawingMode::Radial {
        d.push_str(" Z");
    }
    CurvePath {
        curve,
        track,
        d,
        closed,
    }
}

pub fn trace_curves(layout: &Layout, projection: &Projection) -> Vec<CurvePath> {
    (0..layout.curves)
        .map(|curve| trace_curve(curve, layout, projection))
        .collect()
}
