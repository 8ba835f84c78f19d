use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// How crossing points are placed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DrawingMode {
    /// Concentric rings around a center; every curve is a closed loop.
    Radial,
    /// The disk unrolled into a strip; angle runs left to right.
    Cylindrical,
}

/// Mapping from a region signature to a palette index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ColorRule {
    /// `Signature` when the palette has `2^n` colors, `Popcount` otherwise.
    Auto,
    /// The signature bitmask itself.
    Signature,
    /// Number of curves enclosing the region.
    Popcount,
}

impl fmt::Display for ColorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorRule::Auto => "auto",
            ColorRule::Signature => "signature",
            ColorRule::Popcount => "popcount",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Radius of the innermost level in radial drawings.
    pub inner_radius: f32,
    pub level_spacing: f32,
    /// Lower bound on the arc between neighbouring crossings on the innermost
    /// level; the inner radius grows to honour it.
    pub min_column_arc: f32,
    pub margin: f32,
    /// Share of the gap between two columns used by one crossing, in `(0, 1]`.
    pub crossing_width: f32,
    /// Line segments per half crossing in radial drawings.
    pub samples_per_transition: usize,
    /// Rotation of radial drawings, in degrees.
    pub rotation: f32,
    pub strip_column_width: f32,
    pub strip_level_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            inner_radius: 60.0,
            level_spacing: 32.0,
            min_column_arc: 10.0,
            margin: 20.0,
            crossing_width: 0.8,
            samples_per_transition: 8,
            rotation: -90.0,
            strip_column_width: 28.0,
            strip_level_spacing: 36.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub fill: bool,
    pub mode: DrawingMode,
    pub color_rule: ColorRule,
    /// Cycle palette indices instead of failing on a short palette.
    pub wrap_palette: bool,
    /// Pixel scale for PNG output.
    pub png_scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fill: true,
            mode: DrawingMode::Radial,
            color_rule: ColorRule::Auto,
            wrap_palette: false,
            png_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    background: Option<String>,
    line_color: Option<String>,
    stroke_width: Option<f32>,
    fill_opacity: Option<f32>,
    curve_colors: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutFile {
    inner_radius: Option<f32>,
    level_spacing: Option<f32>,
    min_column_arc: Option<f32>,
    margin: Option<f32>,
    crossing_width: Option<f32>,
    samples_per_transition: Option<usize>,
    rotation: Option<f32>,
    strip_column_width: Option<f32>,
    strip_level_spacing: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderFile {
    fill: Option<bool>,
    mode: Option<DrawingMode>,
    color_rule: Option<ColorRule>,
    wrap_palette: Option<bool>,
    png_scale: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutFile>,
    render: Option<RenderFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "classic" | "default" => config.theme = Theme::classic(),
            other => anyhow::bail!("unknown theme `{other}`"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.stroke_width {
            config.theme.stroke_width = v;
        }
        if let Some(v) = vars.fill_opacity {
            config.theme.fill_opacity = v.clamp(0.0, 1.0);
        }
        if let Some(v) = vars.curve_colors {
            config.theme.curve_colors = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.inner_radius {
            config.layout.inner_radius = v;
        }
        if let Some(v) = layout.level_spacing {
            config.layout.level_spacing = v;
        }
        if let Some(v) = layout.min_column_arc {
            config.layout.min_column_arc = v;
        }
        if let Some(v) = layout.margin {
            config.layout.margin = v;
        }
        if let Some(v) = layout.crossing_width {
            config.layout.crossing_width = v;
        }
        if let Some(v) = layout.samples_per_transition {
            config.layout.samples_per_transition = v;
        }
        if let Some(v) = layout.rotation {
            config.layout.rotation = v;
        }
        if let Some(v) = layout.strip_column_width {
            config.layout.strip_column_width = v;
        }
        if let Some(v) = layout.strip_level_spacing {
            config.layout.strip_level_spacing = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.fill {
            config.render.fill = v;
        }
        if let Some(v) = render.mode {
            config.render.mode = v;
        }
        if let Some(v) = render.color_rule {
            config.render.color_rule = v;
        }
        if let Some(v) = render.wrap_palette {
            config.render.wrap_palette = v;
        }
        if let Some(v) = render.png_scale {
            config.render.png_scale = v;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_keeps_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.layout.inner_radius, LayoutConfig::default().inner_radius);
        assert!(config.render.fill);
        assert_eq!(config.render.mode, DrawingMode::Radial);
    }

    #[test]
    fn overrides_are_merged() {
        let config = parse_config(
            r##"{
                "theme": "modern",
                "themeVariables": { "lineColor": "#123456", "fillOpacity": 3.0 },
                "layout": { "levelSpacing": 12, "samplesPerTransition": 4 },
                "render": { "mode": "cylindrical", "colorRule": "popcount", "fill": false }
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.line_color, "#123456");
        assert_eq!(config.theme.fill_opacity, 1.0);
        assert_eq!(config.theme.curve_colors, Theme::modern().curve_colors);
        assert_eq!(config.layout.level_spacing, 12.0);
        assert_eq!(config.layout.samples_per_transition, 4);
        assert_eq!(config.render.mode, DrawingMode::Cylindrical);
        assert_eq!(config.render.color_rule, ColorRule::Popcount);
        assert!(!config.render.fill);
    }

    #[test]
    fn unknown_theme_is_rejected() {
        assert!(parse_config(r#"{ "theme": "neon" }"#).is_err());
    }
}
