//! Faces of the arrangement and the filled paths drawn beneath the curves.
//!
//! Between two crossings every curve sits on its own level, so the plane is
//! cut into bands: band `k` lies between levels `k - 1` and `k`. Band 0 (inside
//! every curve) and band `n` (outside every curve) never close off. Band `k`
//! is pinched shut at each crossing on ring `k - 1`, and every stretch between
//! two pinches is one face.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::{ColorRule, DrawingMode};
use crate::curves::{CurvePath, signature_of};
use crate::geometry::{Passage, PolarPoint, Projection, Segment, Track};
use crate::layout::Layout;
use crate::palette::Palette;

/// Angular extent of a face, in crossing columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FaceSpan {
    /// The full circle, never pinched.
    Whole,
    /// From the crossing at column `from` round to the crossing at column
    /// `to`; wraps through angle zero when `to <= from`.
    Between { from: usize, to: usize },
}

#[derive(Debug, Clone, Serialize)]
pub struct Face {
    pub band: usize,
    pub span: FaceSpan,
    /// Bit `c` is set when curve `c` encloses the face.
    pub signature: u32,
    /// Interior point the signature was measured at.
    pub sample: PolarPoint,
}

#[derive(Debug, Clone, Serialize)]
pub struct Arrangement {
    pub curves: usize,
    pub faces: Vec<Face>,
    columns: usize,
}

impl Arrangement {
    /// Every face except the unbounded one outside all curves.
    pub fn bounded(&self) -> impl Iterator<Item = &Face> {
        self.faces.iter().filter(move |face| face.band < self.curves)
    }

    pub fn distinct_signatures(&self) -> usize {
        self.faces
            .iter()
            .map(|face| face.signature)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Pairs of signatures whose faces share a stretch of curve.
    pub fn adjacency(&self) -> BTreeSet<(u32, u32)> {
        let mut owners = vec![vec![None; self.columns]; self.curves + 1];
        for face in &self.faces {
            for gap in self.gaps(face.span) {
                owners[face.band][gap] = Some(face.signature);
            }
        }
        let mut pairs = BTreeSet::new();
        for band in 0..self.curves {
            for gap in 0..self.columns {
                if let (Some(a), Some(b)) = (owners[band][gap], owners[band + 1][gap]) {
                    pairs.insert((a.min(b), a.max(b)));
                }
            }
        }
        pairs
    }

    /// Gaps between neighbouring columns covered by `span`; gap `g` follows column `g`.
    fn gaps(&self, span: FaceSpan) -> Vec<usize> {
        match span {
            FaceSpan::Whole => (0..self.columns).collect(),
            FaceSpan::Between { from, to } => {
                let count = if to > from {
                    to - from
                } else {
                    to + self.columns - from
                };
                (0..count).map(|step| (from + step) % self.columns).collect()
            }
        }
    }
}

/// A face ready to draw.
#[derive(Debug, Clone, Serialize)]
pub struct RegionFill {
    pub signature: u32,
    pub band: usize,
    pub color_index: usize,
    pub color: String,
    pub d: String,
}

/// Boundary strand of every level: at each angle, level `k`'s track is the
/// `k`-th closest curve to the center. It follows the curves themselves, so
/// fills meet the strokes exactly.
pub fn level_tracks(layout: &Layout, projection: &Projection) -> Vec<Track> {
    (0..layout.curves)
        .map(|level| {
            let own = projection.level_radius(level);
            let passages: Vec<Passage> = layout
                .crossings
                .iter()
                .filter_map(|crossing| {
                    let other = if crossing.ring == level {
                        projection.level_radius(level + 1)
                    } else if crossing.ring + 1 == level {
                        projection.level_radius(level - 1)
                    } else {
                        return None;
                    };
                    Some(Passage {
                        column: crossing.column,
                        toward: other,
                        away: other,
                        to: own,
                    })
                })
                .collect();
            Track::build(own, &passages, layout, projection.half_width)
        })
        .collect()
}

/// Splits the plane into faces and measures the signature of each one by
/// testing an interior point against every curve.
pub fn decompose(layout: &Layout, projection: &Projection, curves: &[CurvePath]) -> Arrangement {
    let n = layout.curves;
    let columns = layout.total_columns();
    let gap = layout.column_gap();
    let mut faces = Vec::new();

    for band in 0..=n {
        let pinches: Vec<usize> = if band == 0 || band == n {
            Vec::new()
        } else {
            layout.rings[band - 1].crossings.clone()
        };
        let spans: Vec<FaceSpan> = if pinches.is_empty() {
            vec![FaceSpan::Whole]
        } else {
            pinches
                .iter()
                .enumerate()
                .map(|(idx, &from)| FaceSpan::Between {
                    from,
                    to: pinches[(idx + 1) % pinches.len()],
                })
                .collect()
        };
        for span in spans {
            let angle = match span {
                FaceSpan::Whole => 0.0,
                FaceSpan::Between { from, .. } => (from + 1) as f32 * gap,
            };
            let sample = PolarPoint::new(angle, projection.band_radius(band));
            let signature = signature_of(curves, sample);
            faces.push(Face {
                band,
                span,
                signature,
                sample,
            });
        }
    }

    Arrangement {
        curves: n,
        faces,
        columns,
    }
}

/// Fills for every bounded face. `rule` must already be resolved against the
/// palette (see [`Palette::color_rule_for`]).
pub fn resolve_regions(
    arrangement: &Arrangement,
    layout: &Layout,
    projection: &Projection,
    palette: &Palette,
    rule: ColorRule,
) -> Vec<RegionFill> {
    let tracks = level_tracks(layout, projection);
    arrangement
        .bounded()
        .map(|face| {
            let color_index = palette.index_for(face.signature, rule);
            RegionFill {
                signature: face.signature,
                band: face.band,
                color_index,
                color: palette.color(color_index).to_string(),
                d: outline(face, &tracks, projection),
            }
        })
        .collect()
}

fn outline(face: &Face, tracks: &[Track], projection: &Projection) -> String {
    let mut d = String::new();
    if face.band == 0 {
        let upper = &tracks[0].segments;
        match projection.mode {
            DrawingMode::Radial => {
                projection.append_path(&mut d, upper, true);
                d.push_str(" Z");
            }
            DrawingMode::Cylindrical => {
                let floor = [Segment::Flat {
                    from: 0.0,
                    to: std::f32::consts::TAU,
                    radius: 0.0,
                }];
                close_between(&mut d, projection, &floor, upper);
            }
        }
        return d;
    }

    let lower = &tracks[face.band - 1];
    let upper = &tracks[face.band];
    match (face.span, projection.mode) {
        (FaceSpan::Whole, _) => close_between(&mut d, projection, &lower.segments, &upper.segments),
        (FaceSpan::Between { from, to }, DrawingMode::Radial) => close_between(
            &mut d,
            projection,
            &lower.between_unwrapped(from, to),
            &upper.between_unwrapped(from, to),
        ),
        (FaceSpan::Between { from, to }, DrawingMode::Cylindrical) => {
            // A face crossing the seam becomes two pieces, one at each end of the strip.
            for (low, high) in lower.between(from, to).iter().zip(upper.between(from, to).iter()) {
                if low.is_empty() || high.is_empty() {
                    continue;
                }
                close_between(&mut d, projection, low, high);
            }
        }
    }
    d
}

/// Outline running forward along `lower` and back along `upper`.
fn close_between(d: &mut String, projection: &Projection, lower: &[Segment], upper: &[Segment]) {
    let reversed: Vec<Segment> = upper.iter().rev().map(Segment::reversed).collect();
    projection.append_path(d, lower, true);
    projection.append_path(d, &reversed, lower.is_empty());
    d.push_str(" Z");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::curves::trace_curves;
    use crate::layout::compute_layout;
    use crate::matrix::IntersectionMatrix;
    use crate::sequence::CrossingSequence;

    fn arrangement_of(rows: &[usize], n: usize, mode: DrawingMode) -> (Layout, Projection, Arrangement) {
        let sequence = CrossingSequence::new(rows.to_vec(), n, 1).unwrap();
        let layout = compute_layout(&IntersectionMatrix::build(&sequence));
        let projection = Projection::new(&layout, mode, &LayoutConfig::default());
        let curves = trace_curves(&layout, &projection);
        let arrangement = decompose(&layout, &projection, &curves);
        (layout, projection, arrangement)
    }

    #[test]
    fn three_circles_have_eight_faces() {
        let (_, _, arrangement) = arrangement_of(&[0, 1], 3, DrawingMode::Radial);
        assert_eq!(arrangement.faces.len(), 8);
        assert_eq!(arrangement.distinct_signatures(), 8);
        assert_eq!(arrangement.bounded().count(), 7);
        let outer = arrangement.faces.iter().find(|face| face.band == 3).unwrap();
        assert_eq!(outer.signature, 0);
        let inner = arrangement.faces.iter().find(|face| face.band == 0).unwrap();
        assert_eq!(inner.signature, 0b111);
    }

    #[test]
    fn band_signatures_have_matching_popcount() {
        let (_, _, arrangement) = arrangement_of(&[0, 1, 2, 1, 2, 3], 5, DrawingMode::Cylindrical);
        assert_eq!(arrangement.faces.len(), 32);
        for face in &arrangement.faces {
            assert_eq!(face.signature.count_ones() as usize, 5 - face.band);
        }
    }

    #[test]
    fn adjacency_links_neighbouring_bands_only() {
        let (_, _, arrangement) = arrangement_of(&[0, 1], 3, DrawingMode::Radial);
        let pairs = arrangement.adjacency();
        // Each of the 6 crossings has four faces around it; the 3-circle
        // diagram has 12 edges, each separating a distinct pair of faces.
        assert_eq!(pairs.len(), 12);
        for (a, b) in pairs {
            assert_eq!((a ^ b).count_ones(), 1, "{a:03b} and {b:03b}");
        }
    }

    #[test]
    fn fills_are_closed_and_colored_by_popcount() {
        let (layout, projection, arrangement) = arrangement_of(&[0, 1], 3, DrawingMode::Radial);
        let palette = Palette::default_for(3);
        let fills = resolve_regions(&arrangement, &layout, &projection, &palette, ColorRule::Popcount);
        assert_eq!(fills.len(), 7);
        for fill in &fills {
            assert!(fill.d.starts_with("M "));
            assert!(fill.d.ends_with(" Z"));
            assert_eq!(fill.color_index, fill.signature.count_ones() as usize);
            assert_eq!(fill.color, palette.colors()[fill.color_index]);
        }
    }

    #[test]
    fn seam_faces_split_in_two_on_the_strip() {
        let (layout, projection, arrangement) = arrangement_of(&[0, 1], 3, DrawingMode::Cylindrical);
        let palette = Palette::default_for(3);
        let fills = resolve_regions(&arrangement, &layout, &projection, &palette, ColorRule::Signature);
        let wrapping: Vec<_> = arrangement
            .bounded()
            .zip(fills.iter())
            .filter(|(face, _)| matches!(face.span, FaceSpan::Between { from, to } if to <= from))
            .collect();
        assert_eq!(wrapping.len(), 2);
        for (_, fill) in wrapping {
            assert_eq!(fill.d.matches('M').count(), 2);
            assert_eq!(fill.d.matches('Z').count(), 2);
        }
    }

    #[test]
    fn level_tracks_touch_at_pinches() {
        let (layout, projection, _) = arrangement_of(&[0, 1, 2, 1, 2, 3], 5, DrawingMode::Radial);
        let tracks = level_tracks(&layout, &projection);
        for crossing in &layout.crossings {
            let expected = projection.ring_radius(crossing.ring);
            let lower = tracks[crossing.ring].radius_at(crossing.angle);
            let upper = tracks[crossing.ring + 1].radius_at(crossing.angle);
            assert!((lower - expected).abs() < 1e-2);
            assert!((upper - expected).abs() < 1e-2);
        }
    }
}
