use crate::config::{ColorRule, Config, DrawingMode, LayoutConfig, RenderConfig};
use crate::curves::{CurvePath, signature_of, trace_curves};
use crate::error::Result;
use crate::geometry::Projection;
use crate::layout::{Layout, compute_layout};
use crate::matrix::IntersectionMatrix;
use crate::palette::Palette;
use crate::regions::{Arrangement, RegionFill, decompose, resolve_regions};
use crate::sequence::{CrossingSequence, SequenceReader, slice_length};
use crate::theme::Theme;

/// Everything fixed for a run: curve count, theme, geometry and fill settings.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub curves: usize,
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl RenderOptions {
    pub fn new(curves: usize, config: &Config) -> Self {
        Self {
            curves,
            theme: config.theme.clone(),
            layout: config.layout.clone(),
            render: config.render.clone(),
        }
    }

    pub fn classic(curves: usize) -> Self {
        Self::new(curves, &Config::default())
    }

    pub fn modern(curves: usize) -> Self {
        let mut options = Self::classic(curves);
        options.theme = Theme::modern();
        options
    }

    pub fn with_mode(mut self, mode: DrawingMode) -> Self {
        self.render.mode = mode;
        self
    }

    pub fn with_fill(mut self, fill: bool) -> Self {
        self.render.fill = fill;
        self
    }
}

/// All geometry of one diagram, ready for [`crate::render::render_svg`].
#[derive(Debug, Clone)]
pub struct Diagram {
    pub sequence: Vec<usize>,
    pub layout: Layout,
    pub projection: Projection,
    pub curves: Vec<CurvePath>,
    pub arrangement: Arrangement,
    /// Empty for outline-only drawings.
    pub regions: Vec<RegionFill>,
}

impl Diagram {
    pub fn width(&self) -> f32 {
        self.projection.width
    }

    pub fn height(&self) -> f32 {
        self.projection.height
    }

    pub fn mode(&self) -> DrawingMode {
        self.projection.mode
    }

    /// Signature of the face under a canvas point, or `None` off the drawing.
    /// Points on a curve belong to neither side; callers keep clear of them.
    pub fn signature_at(&self, x: f32, y: f32) -> Option<u32> {
        let point = self.projection.from_canvas(x, y)?;
        Some(signature_of(&self.curves, point))
    }
}

/// Draws diagrams for one configuration and palette.
///
/// Construction checks the curve count and the palette, so configuration
/// problems surface before any crossing sequence is read.
#[derive(Debug, Clone)]
pub struct Renderer<'p> {
    options: RenderOptions,
    palette: &'p Palette,
    rule: ColorRule,
}

impl<'p> Renderer<'p> {
    pub fn new(options: RenderOptions, palette: &'p Palette) -> Result<Self> {
        slice_length(options.curves)?;
        let rule = if options.render.fill {
            palette.color_rule_for(
                options.curves,
                options.render.color_rule,
                options.render.wrap_palette,
            )?
        } else {
            ColorRule::Popcount
        };
        Ok(Self {
            options,
            palette,
            rule,
        })
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// The color rule in effect after resolving `Auto` against the palette.
    pub fn color_rule(&self) -> ColorRule {
        self.rule
    }

    pub fn reader<'a>(&self, input: &'a str) -> Result<SequenceReader<'a>> {
        SequenceReader::new(input, self.options.curves)
    }

    pub fn draw(&self, sequence: &CrossingSequence) -> Diagram {
        let matrix = IntersectionMatrix::build(sequence);
        let layout = compute_layout(&matrix);
        tracing::debug!(
            rows = matrix.rows(),
            columns = matrix.columns(),
            closes = layout.closes(),
            "crossing layout computed"
        );
        let projection = Projection::new(&layout, self.options.render.mode, &self.options.layout);
        let curves = trace_curves(&layout, &projection);
        let arrangement = decompose(&layout, &projection, &curves);
        let regions = if self.options.render.fill {
            resolve_regions(&arrangement, &layout, &projection, self.palette, self.rule)
        } else {
            Vec::new()
        };
        tracing::debug!(
            curves = layout.curves,
            crossings = layout.total_columns(),
            faces = arrangement.faces.len(),
            fills = regions.len(),
            "diagram laid out"
        );
        Diagram {
            sequence: sequence.rows().to_vec(),
            layout,
            projection,
            curves,
            arrangement,
            regions,
        }
    }

    pub fn render(&self, sequence: &CrossingSequence) -> String {
        crate::render::render_svg(&self.draw(sequence), &self.options.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VennError;

    #[test]
    fn degenerate_curve_counts_fail_before_drawing() {
        let palette = Palette::default_for(4);
        let err = Renderer::new(RenderOptions::classic(4), &palette).unwrap_err();
        assert!(matches!(err, VennError::DegenerateConfiguration { n: 4, .. }));
    }

    #[test]
    fn short_palette_is_fatal_only_when_filling() {
        let palette = Palette::new(vec!["#FF0000".to_string()]).unwrap();
        assert!(matches!(
            Renderer::new(RenderOptions::classic(3), &palette),
            Err(VennError::PaletteMismatch { .. })
        ));
        assert!(Renderer::new(RenderOptions::classic(3).with_fill(false), &palette).is_ok());
    }

    #[test]
    fn face_samples_carry_their_signature_on_canvas() {
        let palette = Palette::default_for(5);
        let sequence = CrossingSequence::new(vec![0, 1, 2, 1, 2, 3], 5, 1).unwrap();
        for mode in [DrawingMode::Radial, DrawingMode::Cylindrical] {
            let renderer = Renderer::new(RenderOptions::classic(5).with_mode(mode), &palette).unwrap();
            let diagram = renderer.draw(&sequence);
            for face in diagram.arrangement.bounded() {
                let (x, y) = diagram.projection.to_canvas(face.sample);
                assert_eq!(diagram.signature_at(x, y), Some(face.signature), "{mode:?}");
            }
        }
    }

    #[test]
    fn outline_drawings_have_no_fills() {
        let palette = Palette::default_for(3);
        let renderer = Renderer::new(RenderOptions::classic(3).with_fill(false), &palette).unwrap();
        let sequence = CrossingSequence::new(vec![0, 1], 3, 1).unwrap();
        let diagram = renderer.draw(&sequence);
        assert!(diagram.regions.is_empty());
        assert_eq!(diagram.curves.len(), 3);
        assert_eq!(diagram.arrangement.faces.len(), 8);
    }
}
