use thiserror::Error;

use crate::config::ColorRule;

/// Errors raised while reading palettes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaletteError {
    #[error("palette is empty")]
    Empty,
    #[error("palette count `{0}` is not a non-negative integer")]
    BadCount(String),
    #[error("palette announces {expected} colors but only {found} were given")]
    Truncated { expected: usize, found: usize },
    #[error("`{0}` is not a hex color code")]
    BadColor(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VennError {
    /// A crossing sequence with the wrong length, a bad token, or a row out of range.
    /// Processing of the remaining input stops at the first one.
    #[error("diagram {diagram}: malformed crossing sequence: {reason}")]
    MalformedSequence { diagram: usize, reason: String },

    #[error(
        "palette has {available} colors but the {rule} color rule needs {required} (use --wrap-palette to cycle colors)"
    )]
    PaletteMismatch {
        required: usize,
        available: usize,
        rule: ColorRule,
    },

    #[error("cannot draw a symmetric Venn diagram of {n} curves: {reason}")]
    DegenerateConfiguration { n: usize, reason: String },

    #[error(transparent)]
    Palette(#[from] PaletteError),
}

impl VennError {
    pub(crate) fn malformed(diagram: usize, reason: impl Into<String>) -> Self {
        Self::MalformedSequence {
            diagram,
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = VennError> = std::result::Result<T, E>;
