//! Polar-space pieces shared by curve strokes and region outlines.
//!
//! Everything is built in `(angle, radius)` space and mapped to the canvas by
//! a [`Projection`] at the very end. A strand is flat on its level between
//! crossings; around a crossing it follows an S-shaped cubic from one level to
//! the other, split in two halves that meet exactly on the crossing point.

use std::collections::BTreeMap;
use std::f32::consts::{PI, TAU};
use std::fmt::Write;

use serde::Serialize;

use crate::config::{DrawingMode, LayoutConfig};
use crate::layout::Layout;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolarPoint {
    pub angle: f32,
    pub radius: f32,
}

impl PolarPoint {
    pub const fn new(angle: f32, radius: f32) -> Self {
        Self { angle, radius }
    }

    fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.angle + (other.angle - self.angle) * t,
            self.radius + (other.radius - self.radius) * t,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Segment {
    /// Constant radius from angle `from` to angle `to`.
    Flat { from: f32, to: f32, radius: f32 },
    /// Cubic Bézier in polar space; its angle is monotone in `t`.
    Cubic([PolarPoint; 4]),
}

impl Segment {
    pub fn start(&self) -> PolarPoint {
        match *self {
            Segment::Flat { from, radius, .. } => PolarPoint::new(from, radius),
            Segment::Cubic(points) => points[0],
        }
    }

    pub fn end(&self) -> PolarPoint {
        match *self {
            Segment::Flat { to, radius, .. } => PolarPoint::new(to, radius),
            Segment::Cubic(points) => points[3],
        }
    }

    pub fn reversed(&self) -> Self {
        match *self {
            Segment::Flat { from, to, radius } => Segment::Flat {
                from: to,
                to: from,
                radius,
            },
            Segment::Cubic([a, b, c, d]) => Segment::Cubic([d, c, b, a]),
        }
    }

    fn shifted(&self, turn: f32) -> Self {
        match *self {
            Segment::Flat { from, to, radius } => Segment::Flat {
                from: from + turn,
                to: to + turn,
                radius,
            },
            Segment::Cubic(points) => Segment::Cubic(
                points.map(|point| PolarPoint::new(point.angle + turn, point.radius)),
            ),
        }
    }

    pub fn point_at(&self, t: f32) -> PolarPoint {
        match *self {
            Segment::Flat { .. } => self.start().lerp(self.end(), t),
            Segment::Cubic([a, b, c, d]) => {
                let ab = a.lerp(b, t);
                let bc = b.lerp(c, t);
                let cd = c.lerp(d, t);
                let abc = ab.lerp(bc, t);
                let bcd = bc.lerp(cd, t);
                abc.lerp(bcd, t)
            }
        }
    }

    /// Radius of the segment at `angle`, if the segment spans it.
    pub fn radius_at(&self, angle: f32) -> Option<f32> {
        let (start, end) = (self.start().angle, self.end().angle);
        let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
        if angle < lo || angle > hi {
            return None;
        }
        match *self {
            Segment::Flat { radius, .. } => Some(radius),
            Segment::Cubic(_) => {
                let increasing = start <= end;
                let (mut t0, mut t1) = (0.0f32, 1.0f32);
                for _ in 0..40 {
                    let mid = 0.5 * (t0 + t1);
                    let before = self.point_at(mid).angle < angle;
                    if before == increasing {
                        t0 = mid;
                    } else {
                        t1 = mid;
                    }
                }
                Some(self.point_at(0.5 * (t0 + t1)).radius)
            }
        }
    }
}

/// First half of the S-curve from radius `from` to radius `to` centred on `angle`.
fn rising_half(angle: f32, half_width: f32, from: f32, to: f32) -> Segment {
    Segment::Cubic([
        PolarPoint::new(angle - half_width, from),
        PolarPoint::new(angle - half_width / 2.0, from),
        PolarPoint::new(angle - half_width / 4.0, (3.0 * from + to) / 4.0),
        PolarPoint::new(angle, (from + to) / 2.0),
    ])
}

/// Second half of the S-curve from radius `from` to radius `to` centred on `angle`.
fn settling_half(angle: f32, half_width: f32, from: f32, to: f32) -> Segment {
    Segment::Cubic([
        PolarPoint::new(angle, (from + to) / 2.0),
        PolarPoint::new(angle + half_width / 4.0, (from + 3.0 * to) / 4.0),
        PolarPoint::new(angle + half_width / 2.0, to),
        PolarPoint::new(angle + half_width, to),
    ])
}

/// How a strand passes one crossing column. It leaves its current radius
/// heading for `toward`, touches the crossing point, and settles on `to`
/// as if it had come from `away`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Passage {
    pub column: usize,
    /// The radius the entering half heads for.
    pub toward: f32,
    /// The radius the leaving half comes from.
    pub away: f32,
    pub to: f32,
}

/// A strand around the full circle, as consecutive segments from angle 0 to 2π.
#[derive(Debug, Clone, Serialize)]
pub struct Track {
    pub segments: Vec<Segment>,
    /// Column -> index of the segment leaving that crossing point.
    #[serde(skip)]
    pub(crate) crossing_index: BTreeMap<usize, usize>,
}

impl Track {
    pub(crate) fn build(start: f32, passages: &[Passage], layout: &Layout, half_width: f32) -> Self {
        let mut segments = Vec::new();
        let mut crossing_index = BTreeMap::new();
        let mut cursor = 0.0f32;
        let mut radius = start;
        for passage in passages {
            let angle = layout.column_angle(passage.column);
            push_flat(&mut segments, cursor, angle - half_width, radius);
            segments.push(rising_half(angle, half_width, radius, passage.toward));
            crossing_index.insert(passage.column, segments.len());
            segments.push(settling_half(angle, half_width, passage.away, passage.to));
            cursor = angle + half_width;
            radius = passage.to;
        }
        push_flat(&mut segments, cursor, TAU, radius);
        Self {
            segments,
            crossing_index,
        }
    }

    pub fn radius_at(&self, angle: f32) -> f32 {
        let angle = angle.rem_euclid(TAU);
        self.segments
            .iter()
            .find_map(|segment| segment.radius_at(angle))
            .unwrap_or_else(|| self.segments.last().map_or(0.0, |s| s.end().radius))
    }

    /// Segments from the crossing at column `from` to the crossing at column
    /// `to`, going round through angle zero when `to <= from`. Both columns
    /// must be crossings of this track. A wrapping span comes back as two
    /// runs, the second one starting at angle zero.
    pub(crate) fn between(&self, from: usize, to: usize) -> Vec<Vec<Segment>> {
        let start = self.crossing_index.get(&from).copied().unwrap_or(0);
        let end = self.crossing_index.get(&to).copied().unwrap_or(0);
        if start < end {
            return vec![self.segments[start..end].to_vec()];
        }
        vec![
            self.segments[start..].to_vec(),
            self.segments[..end].to_vec(),
        ]
    }

    pub(crate) fn between_unwrapped(&self, from: usize, to: usize) -> Vec<Segment> {
        let mut runs = self.between(from, to).into_iter();
        let mut joined = runs.next().unwrap_or_default();
        for run in runs {
            joined.extend(run.iter().map(|segment| segment.shifted(TAU)));
        }
        joined
    }
}

fn push_flat(segments: &mut Vec<Segment>, from: f32, to: f32, radius: f32) {
    if to - from <= f32::EPSILON {
        return;
    }
    // Keep every arc under half a turn so SVG arc flags stay unambiguous.
    let pieces = ((to - from) / (PI / 2.0)).ceil().max(1.0) as usize;
    let step = (to - from) / pieces as f32;
    for piece in 0..pieces {
        let start = from + step * piece as f32;
        let end = if piece + 1 == pieces { to } else { start + step };
        segments.push(Segment::Flat {
            from: start,
            to: end,
            radius,
        });
    }
}

/// Maps polar points onto the canvas for one drawing mode.
#[derive(Debug, Clone, Serialize)]
pub struct Projection {
    pub mode: DrawingMode,
    /// Radius of every level, innermost first.
    pub levels: Vec<f32>,
    /// Radius standing for the outside of the outermost level.
    pub outer: f32,
    pub width: f32,
    pub height: f32,
    pub half_width: f32,
    margin: f32,
    rotation: f32,
    samples: usize,
}

impl Projection {
    pub fn new(layout: &Layout, mode: DrawingMode, config: &LayoutConfig) -> Self {
        let n = layout.curves;
        let margin = config.margin.max(0.0);
        let crossing_width = config.crossing_width.clamp(0.05, 1.0);
        let half_width = crossing_width * layout.column_gap() / 2.0;
        match mode {
            DrawingMode::Radial => {
                let spacing = config.level_spacing.max(1.0);
                let inner = config
                    .inner_radius
                    .max(layout.total_columns() as f32 * config.min_column_arc / TAU)
                    .max(spacing / 2.0);
                let levels: Vec<f32> = (0..n).map(|k| inner + k as f32 * spacing).collect();
                let outer = inner + n as f32 * spacing;
                let size = 2.0 * (outer + margin);
                Self {
                    mode,
                    levels,
                    outer,
                    width: size,
                    height: size,
                    half_width,
                    margin,
                    rotation: config.rotation.to_radians(),
                    samples: config.samples_per_transition.max(1),
                }
            }
            DrawingMode::Cylindrical => {
                let spacing = config.strip_level_spacing.max(1.0);
                let levels: Vec<f32> = (0..n).map(|k| (k + 1) as f32 * spacing).collect();
                let outer = (n + 1) as f32 * spacing;
                let strip = layout.total_columns() as f32 * config.strip_column_width.max(1.0);
                Self {
                    mode,
                    levels,
                    outer,
                    width: strip + 2.0 * margin,
                    height: outer + 2.0 * margin,
                    half_width,
                    margin,
                    rotation: 0.0,
                    samples: config.samples_per_transition.max(1),
                }
            }
        }
    }

    pub fn level_radius(&self, level: usize) -> f32 {
        self.levels[level]
    }

    pub fn ring_radius(&self, ring: usize) -> f32 {
        (self.levels[ring] + self.levels[ring + 1]) / 2.0
    }

    /// Radius halfway between the boundaries of `band` (number of levels below it).
    pub fn band_radius(&self, band: usize) -> f32 {
        let below = if band == 0 { 0.0 } else { self.levels[band - 1] };
        let above = self.levels.get(band).copied().unwrap_or(self.outer);
        (below + above) / 2.0
    }

    pub fn to_canvas(&self, point: PolarPoint) -> (f32, f32) {
        match self.mode {
            DrawingMode::Radial => {
                let center = self.width / 2.0;
                let angle = point.angle + self.rotation;
                (
                    center + point.radius * angle.cos(),
                    center + point.radius * angle.sin(),
                )
            }
            DrawingMode::Cylindrical => {
                let strip = self.width - 2.0 * self.margin;
                (
                    self.margin + point.angle / TAU * strip,
                    self.margin + (self.outer - point.radius),
                )
            }
        }
    }

    /// Inverse of [`Projection::to_canvas`]. A cylindrical drawing only covers
    /// its strip, so canvas points in the margins give `None`.
    pub fn from_canvas(&self, x: f32, y: f32) -> Option<PolarPoint> {
        match self.mode {
            DrawingMode::Radial => {
                let center = self.width / 2.0;
                let (dx, dy) = (x - center, y - center);
                let angle = (dy.atan2(dx) - self.rotation).rem_euclid(TAU);
                Some(PolarPoint::new(angle, dx.hypot(dy)))
            }
            DrawingMode::Cylindrical => {
                let strip = self.width - 2.0 * self.margin;
                let (along, down) = (x - self.margin, y - self.margin);
                if !(0.0..=strip).contains(&along) || !(0.0..=self.outer).contains(&down) {
                    return None;
                }
                Some(PolarPoint::new(along / strip * TAU, self.outer - down))
            }
        }
    }

    /// Appends drawing commands for `segments`, starting with a move when
    /// `move_to` is set and a line to the first point otherwise.
    pub(crate) fn append_path(&self, d: &mut String, segments: &[Segment], move_to: bool) {
        let Some(first) = segments.first() else {
            return;
        };
        let (x, y) = self.to_canvas(first.start());
        let command = if move_to { "M" } else { "L" };
        if !d.is_empty() {
            d.push(' ');
        }
        let _ = write!(d, "{command} {x:.2} {y:.2}");
        for segment in segments {
            self.append_segment(d, segment);
        }
    }

    fn append_segment(&self, d: &mut String, segment: &Segment) {
        match (self.mode, *segment) {
            (DrawingMode::Radial, Segment::Flat { from, to, radius }) => {
                let (x, y) = self.to_canvas(segment.end());
                let large = u8::from((to - from).abs() > PI);
                let sweep = u8::from(to > from);
                let _ = write!(d, " A {radius:.2} {radius:.2} 0 {large} {sweep} {x:.2} {y:.2}");
            }
            (DrawingMode::Radial, Segment::Cubic(_)) => {
                for step in 1..=self.samples {
                    let t = step as f32 / self.samples as f32;
                    let (x, y) = self.to_canvas(segment.point_at(t));
                    let _ = write!(d, " L {x:.2} {y:.2}");
                }
            }
            (DrawingMode::Cylindrical, Segment::Flat { .. }) => {
                let (x, y) = self.to_canvas(segment.end());
                let _ = write!(d, " L {x:.2} {y:.2}");
            }
            (DrawingMode::Cylindrical, Segment::Cubic([_, b, c, e])) => {
                let (x1, y1) = self.to_canvas(b);
                let (x2, y2) = self.to_canvas(c);
                let (x3, y3) = self.to_canvas(e);
                let _ = write!(
                    d,
                    " C {x1:.2} {y1:.2} {x2:.2} {y2:.2} {x3:.2} {y3:.2}"
                );
            }
        }
    }
}
