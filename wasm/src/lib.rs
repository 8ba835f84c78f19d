use serde::Deserialize;
use venn_plot::{ColorRule, DrawingMode, Palette, RenderOptions, render_diagram};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VennRenderOptions {
    theme: Option<String>,
    mode: Option<DrawingMode>,
    fill: Option<bool>,
    color_rule: Option<ColorRule>,
    wrap_palette: Option<bool>,
    palette: Option<Vec<String>>,
    stroke_width: Option<f32>,
}

fn build_render_options(curves: usize, options: &VennRenderOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("modern") {
        RenderOptions::modern(curves)
    } else {
        RenderOptions::classic(curves)
    };

    if let Some(mode) = options.mode {
        render_options.render.mode = mode;
    }
    if let Some(fill) = options.fill {
        render_options.render.fill = fill;
    }
    if let Some(rule) = options.color_rule {
        render_options.render.color_rule = rule;
    }
    if let Some(wrap) = options.wrap_palette {
        render_options.render.wrap_palette = wrap;
    }
    if let Some(width) = options.stroke_width {
        render_options.theme.stroke_width = width;
    }

    render_options
}

#[wasm_bindgen]
pub fn render_venn_svg(
    curves: u32,
    sequence: Vec<u32>,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<VennRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        VennRenderOptions::default()
    };

    let curves = curves as usize;
    let rows: Vec<usize> = sequence.iter().map(|&row| row as usize).collect();
    let palette = match &options.palette {
        Some(colors) => {
            Palette::new(colors.clone()).map_err(|error| JsValue::from_str(&error.to_string()))?
        }
        None => Palette::default_for(curves),
    };
    let render_options = build_render_options(curves, &options);
    render_diagram(&rows, render_options, &palette)
        .map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use venn_plot::{DrawingMode, Palette, render_diagram};

    use crate::{VennRenderOptions, build_render_options};

    #[test]
    fn renders_five_curves_on_a_strip() {
        let options: VennRenderOptions =
            serde_json::from_str(r#"{"mode":"cylindrical","theme":"modern"}"#).unwrap();
        let render_options = build_render_options(5, &options);
        assert_eq!(render_options.render.mode, DrawingMode::Cylindrical);

        let svg = render_diagram(&[0, 1, 2, 1, 2, 3], render_options, &Palette::default_for(5))
            .expect("five curve diagram should render");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("cylindrical"));
    }
}
