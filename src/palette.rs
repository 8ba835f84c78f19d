//! Region colors: a count followed by that many hex color codes.

use std::path::Path;

use anyhow::Context;

use crate::config::ColorRule;
use crate::error::{PaletteError, Result, VennError};

const RAMP_LIGHT: (u8, u8, u8) = (0xFF, 0xF7, 0xBC);
const RAMP_DARK: (u8, u8, u8) = (0x25, 0x34, 0x94);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    pub fn new(colors: Vec<String>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }
        let colors = colors
            .iter()
            .map(|color| normalize_color(color))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { colors })
    }

    /// Parses the palette file format. Tokens after the announced count are ignored.
    pub fn parse(input: &str) -> Result<Self, PaletteError> {
        let mut tokens = input.split_whitespace();
        let raw_count = tokens.next().ok_or(PaletteError::Empty)?;
        let count = raw_count
            .parse::<usize>()
            .map_err(|_| PaletteError::BadCount(raw_count.to_string()))?;
        let colors: Vec<String> = tokens.take(count).map(str::to_string).collect();
        if colors.len() < count {
            return Err(PaletteError::Truncated {
                expected: count,
                found: colors.len(),
            });
        }
        Self::new(colors)
    }

    /// A light-to-dark ramp of `n + 1` colors, one per number of enclosing curves.
    pub fn default_for(n: usize) -> Self {
        let steps = n.max(1);
        let mut colors = vec!["#FFFFFF".to_string()];
        for depth in 1..=n {
            let t = (depth - 1) as f32 / (steps - 1).max(1) as f32;
            colors.push(mix(RAMP_LIGHT, RAMP_DARK, t));
        }
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Resolves `requested` against this palette for `n` curves.
    ///
    /// Returns the concrete rule (never `Auto`). A palette too short for the
    /// rule is a [`VennError::PaletteMismatch`] unless `wrap` is set.
    pub fn color_rule_for(&self, n: usize, requested: ColorRule, wrap: bool) -> Result<ColorRule> {
        let signatures = 1usize << n;
        let rule = match requested {
            ColorRule::Auto if self.len() >= signatures => ColorRule::Signature,
            ColorRule::Auto => ColorRule::Popcount,
            other => other,
        };
        let required = match rule {
            ColorRule::Signature => signatures,
            _ => n + 1,
        };
        if self.len() < required {
            if !wrap {
                return Err(VennError::PaletteMismatch {
                    required,
                    available: self.len(),
                    rule,
                });
            }
            tracing::warn!(
                required,
                available = self.len(),
                %rule,
                "palette is short, region colors will repeat"
            );
        }
        Ok(rule)
    }

    /// Palette index of a region; `rule` must come from [`Palette::color_rule_for`].
    pub fn index_for(&self, signature: u32, rule: ColorRule) -> usize {
        let index = match rule {
            ColorRule::Signature => signature as usize,
            _ => signature.count_ones() as usize,
        };
        index % self.len()
    }

    pub fn color(&self, index: usize) -> &str {
        self.colors[index % self.len()].as_str()
    }
}

pub fn load_palette(path: &Path) -> anyhow::Result<Palette> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading palette {}", path.display()))?;
    Ok(Palette::parse(&contents)?)
}

fn normalize_color(raw: &str) -> Result<String, PaletteError> {
    let hex = raw.strip_prefix('#').unwrap_or(raw);
    let valid_len = matches!(hex.len(), 3 | 6 | 8);
    if !valid_len || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(PaletteError::BadColor(raw.to_string()));
    }
    Ok(format!("#{}", hex.to_ascii_uppercase()))
}

fn mix(a: (u8, u8, u8), b: (u8, u8, u8), t: f32) -> String {
    let lerp = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    format!("#{:02X}{:02X}{:02X}", lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}
