use crate::config::{DrawingMode, RenderConfig};
use crate::diagram::Diagram;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// Serializes a diagram: background, then region fills, then curve strokes on top.
pub fn render_svg(diagram: &Diagram, theme: &Theme) -> String {
    let mut svg = String::new();
    let width = diagram.width();
    let height = diagram.height();
    let n = diagram.layout.curves;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    ));
    svg.push_str(&format!(
        "<title>Simple symmetric {n}-Venn diagram ({})</title>",
        mode_name(diagram.mode())
    ));
    svg.push_str(&format!(
        "<desc>crossing sequence: {}</desc>",
        sequence_text(&diagram.sequence)
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&theme.background)
    ));

    if !diagram.regions.is_empty() {
        svg.push_str("<g class=\"regions\">");
        for region in &diagram.regions {
            svg.push_str(&format!(
                "<path d=\"{}\" fill=\"{}\" fill-opacity=\"{}\" stroke=\"none\" data-signature=\"{}\"/>",
                region.d,
                escape_xml(&region.color),
                theme.fill_opacity,
                region.signature
            ));
        }
        svg.push_str("</g>");
    }

    let filled = !diagram.regions.is_empty();
    svg.push_str("<g class=\"curves\" fill=\"none\" stroke-linejoin=\"round\">");
    for curve in &diagram.curves {
        let stroke = if filled {
            theme.line_color.as_str()
        } else {
            theme.curve_color(curve.curve)
        };
        svg.push_str(&format!(
            "<path d=\"{}\" stroke=\"{}\" stroke-width=\"{}\" data-curve=\"{}\"/>",
            curve.d,
            escape_xml(stroke),
            theme.stroke_width,
            curve.curve
        ));
    }
    svg.push_str("</g>");

    svg.push_str("</svg>");
    svg
}

fn mode_name(mode: DrawingMode) -> &'static str {
    match mode {
        DrawingMode::Radial => "radial",
        DrawingMode::Cylindrical => "cylindrical",
    }
}

fn sequence_text(sequence: &[usize]) -> String {
    sequence
        .iter()
        .map(|row| row.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &opt)?;
    let scale = render_cfg.png_scale.max(0.01);
    let size = tree.size().to_int_size();
    let width = ((size.width() as f32) * scale).ceil() as u32;
    let height = ((size.height() as f32) * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width.max(1), height.max(1))
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the `png` feature"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{RenderOptions, Renderer};
    use crate::palette::Palette;
    use crate::sequence::CrossingSequence;

    #[test]
    fn render_svg_basic() {
        let palette = Palette::default_for(3);
        let renderer = Renderer::new(RenderOptions::classic(3), &palette).unwrap();
        let sequence = CrossingSequence::new(vec![0, 1], 3, 1).unwrap();
        let svg = renderer.render(&sequence);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("crossing sequence: 0 1"));
        assert_eq!(svg.matches("data-signature=").count(), 7);
        assert_eq!(svg.matches("data-curve=").count(), 3);
    }

    #[test]
    fn fills_come_before_strokes() {
        let palette = Palette::default_for(3);
        let renderer = Renderer::new(RenderOptions::classic(3), &palette).unwrap();
        let sequence = CrossingSequence::new(vec![0, 1], 3, 1).unwrap();
        let svg = renderer.render(&sequence);
        let last_fill = svg.rfind("data-signature=").unwrap();
        let first_stroke = svg.find("data-curve=").unwrap();
        assert!(last_fill < first_stroke);
    }

    #[test]
    fn theme_colors_are_escaped() {
        let palette = Palette::default_for(3);
        let mut options = RenderOptions::classic(3);
        options.theme.background = "white\" onload=\"x".to_string();
        options.theme.line_color = "<black>".to_string();
        let renderer = Renderer::new(options, &palette).unwrap();
        let sequence = CrossingSequence::new(vec![0, 1], 3, 1).unwrap();
        let svg = renderer.render(&sequence);
        assert!(svg.contains("fill=\"white&quot; onload=&quot;x\""));
        assert!(svg.contains("stroke=\"&lt;black&gt;\""));
        assert!(!svg.contains("onload=\""));
        assert!(!svg.contains("<black>"));
    }

    #[test]
    fn outline_mode_colors_each_curve() {
        let palette = Palette::default_for(3);
        let options = RenderOptions::classic(3).with_fill(false);
        let theme = options.theme.clone();
        let renderer = Renderer::new(options, &palette).unwrap();
        let sequence = CrossingSequence::new(vec![0, 1], 3, 1).unwrap();
        let svg = renderer.render(&sequence);
        assert!(!svg.contains("class=\"regions\""));
        for curve in 0..3 {
            assert!(svg.contains(&format!("stroke=\"{}\"", theme.curve_color(curve))));
        }
    }
}
