use crate::diagram::Diagram;
use crate::geometry::PolarPoint;
use crate::layout::Direction;
use crate::regions::FaceSpan;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub curves: usize,
    pub mode: String,
    pub width: f32,
    pub height: f32,
    pub sequence: Vec<usize>,
    pub closes: bool,
    pub rings: Vec<RingDump>,
    pub crossings: Vec<CrossingDump>,
    pub traces: Vec<TraceDump>,
    pub faces: Vec<FaceDump>,
}

#[derive(Debug, Serialize)]
pub struct RingDump {
    pub index: usize,
    pub radius: f32,
    pub crossings: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct CrossingDump {
    pub column: usize,
    pub ring: usize,
    pub curves: [usize; 2],
    pub angle: f32,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Serialize)]
pub struct TraceDump {
    pub curve: usize,
    pub closed: bool,
    pub moves: Vec<MoveDump>,
}

#[derive(Debug, Serialize)]
pub struct MoveDump {
    pub column: usize,
    pub ring: usize,
    pub direction: Direction,
}

#[derive(Debug, Serialize)]
pub struct FaceDump {
    pub band: usize,
    pub signature: u32,
    pub span: Option<[usize; 2]>,
    pub color: Option<String>,
}

impl LayoutDump {
    pub fn from_diagram(diagram: &Diagram) -> Self {
        let layout = &diagram.layout;
        let projection = &diagram.projection;

        let rings = layout
            .rings
            .iter()
            .map(|ring| RingDump {
                index: ring.index,
                radius: projection.ring_radius(ring.index),
                crossings: ring.crossings.clone(),
            })
            .collect();

        let crossings = layout
            .crossings
            .iter()
            .map(|crossing| {
                let point = PolarPoint::new(
                    crossing.angle,
                    projection.ring_radius(crossing.ring),
                );
                let (x, y) = projection.to_canvas(point);
                CrossingDump {
                    column: crossing.column,
                    ring: crossing.ring,
                    curves: [crossing.lower, crossing.upper],
                    angle: crossing.angle,
                    x,
                    y,
                }
            })
            .collect();

        let traces = layout
            .traces
            .iter()
            .zip(diagram.curves.iter())
            .map(|(trace, path)| TraceDump {
                curve: trace.curve,
                closed: path.closed,
                moves: trace
                    .events
                    .iter()
                    .map(|event| MoveDump {
                        column: event.crossing,
                        ring: event.ring,
                        direction: event.direction,
                    })
                    .collect(),
            })
            .collect();

        let mut faces: Vec<FaceDump> = diagram
            .arrangement
            .faces
            .iter()
            .map(|face| FaceDump {
                band: face.band,
                signature: face.signature,
                span: match face.span {
                    FaceSpan::Whole => None,
                    FaceSpan::Between { from, to } => Some([from, to]),
                },
                color: None,
            })
            .collect();
        for region in &diagram.regions {
            if let Some(face) = faces
                .iter_mut()
                .find(|face| face.signature == region.signature)
            {
                face.color = Some(region.color.clone());
            }
        }

        LayoutDump {
            curves: layout.curves,
            mode: format!("{:?}", diagram.mode()).to_lowercase(),
            width: diagram.width(),
            height: diagram.height(),
            sequence: diagram.sequence.clone(),
            closes: layout.closes(),
            rings,
            crossings,
            traces,
            faces,
        }
    }
}

pub fn write_layout_dump(path: &Path, dumps: &[LayoutDump]) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, dumps)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{RenderOptions, Renderer};
    use crate::palette::Palette;
    use crate::sequence::CrossingSequence;

    #[test]
    fn dump_lists_every_crossing_and_face() {
        let palette = Palette::default_for(3);
        let renderer = Renderer::new(RenderOptions::classic(3), &palette).unwrap();
        let sequence = CrossingSequence::new(vec![0, 1], 3, 1).unwrap();
        let dump = LayoutDump::from_diagram(&renderer.draw(&sequence));
        assert_eq!(dump.mode, "radial");
        assert!(dump.closes);
        assert_eq!(dump.crossings.len(), 6);
        assert_eq!(dump.rings.len(), 2);
        assert_eq!(dump.faces.len(), 8);
        // The outer face is never filled.
        let colored = dump.faces.iter().filter(|face| face.color.is_some()).count();
        assert_eq!(colored, 7);
        for trace in &dump.traces {
            assert_eq!(trace.moves.len(), 4);
        }
    }

    #[test]
    fn dump_serializes_as_json_array() {
        let palette = Palette::default_for(3);
        let renderer = Renderer::new(RenderOptions::classic(3), &palette).unwrap();
        let sequence = CrossingSequence::new(vec![0, 1], 3, 1).unwrap();
        let diagram = renderer.draw(&sequence);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        write_layout_dump(&path, &[LayoutDump::from_diagram(&diagram)]).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(1));
        assert_eq!(value[0]["curves"], 3);
    }
}
