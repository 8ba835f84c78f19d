#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod curves;
pub mod diagram;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod layout_dump;
pub mod matrix;
pub mod palette;
pub mod regions;
pub mod render;
pub mod sequence;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{ColorRule, Config, DrawingMode};
pub use diagram::{Diagram, RenderOptions, Renderer};
pub use error::{PaletteError, Result, VennError};
pub use palette::Palette;
pub use sequence::CrossingSequence;

/// Renders a single diagram from its crossing sequence.
pub fn render_diagram(rows: &[usize], options: RenderOptions, palette: &Palette) -> Result<String> {
    let renderer = Renderer::new(options, palette)?;
    let sequence = CrossingSequence::new(rows.to_vec(), renderer.options().curves, 1)?;
    Ok(renderer.render(&sequence))
}
