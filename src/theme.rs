use serde::{Deserialize, Serialize};

const CLASSIC_CURVE_COLORS: [&str; 7] = [
    "#E41A1C", "#377EB8", "#4DAF4A", "#984EA3", "#FF7F00", "#A65628", "#F781BF",
];

const MODERN_CURVE_COLORS: [&str; 7] = [
    "#3B82F6", "#EF4444", "#10B981", "#F59E0B", "#8B5CF6", "#EC4899", "#14B8A6",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub background: String,
    /// Stroke of every curve when regions are filled.
    pub line_color: String,
    pub stroke_width: f32,
    pub fill_opacity: f32,
    /// Per-curve strokes for outline-only drawings, cycled when shorter than `n`.
    pub curve_colors: Vec<String>,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            background: "#FFFFFF".to_string(),
            line_color: "#000000".to_string(),
            stroke_width: 1.5,
            fill_opacity: 1.0,
            curve_colors: CLASSIC_CURVE_COLORS
                .iter()
                .map(|value| value.to_string())
                .collect(),
        }
    }

    pub fn modern() -> Self {
        Self {
            background: "#FFFFFF".to_string(),
            line_color: "#1C2430".to_string(),
            stroke_width: 1.2,
            fill_opacity: 0.85,
            curve_colors: MODERN_CURVE_COLORS
                .iter()
                .map(|value| value.to_string())
                .collect(),
        }
    }

    pub fn curve_color(&self, curve: usize) -> &str {
        if self.curve_colors.is_empty() {
            return self.line_color.as_str();
        }
        self.curve_colors[curve % self.curve_colors.len()].as_str()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
