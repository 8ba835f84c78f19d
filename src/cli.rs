use crate::config::{ColorRule, Config, DrawingMode, load_config};
use crate::diagram::{RenderOptions, Renderer};
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::palette::{Palette, load_palette};
use crate::render::{render_svg, write_output_png, write_output_svg};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Parser, Debug)]
#[command(
    name = "vennplot",
    version,
    about = "Draw simple symmetric Venn diagrams from crossing sequences"
)]
pub struct Args {
    /// Number of curves
    #[arg(short = 'n', long = "curves")]
    pub curves: usize,

    /// Crossing sequences, whitespace separated, or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file or directory. Defaults to stdout for a single SVG.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Palette file: a color count followed by that many hex colors
    #[arg(short = 'p', long = "palette")]
    pub palette: Option<PathBuf>,

    /// Config JSON file (themeVariables, layout, render)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Drawing mode
    #[arg(short = 'm', long = "mode", value_enum)]
    pub mode: Option<DrawingMode>,

    /// Fill regions
    #[arg(long = "fill", overrides_with = "no_fill")]
    pub fill: bool,

    /// Draw curve outlines only
    #[arg(long = "no-fill")]
    pub no_fill: bool,

    /// How region signatures map to palette entries
    #[arg(long = "color-rule", value_enum)]
    pub color_rule: Option<ColorRule>,

    /// Reuse palette colors when there are fewer than the color rule needs
    #[arg(long = "wrap-palette")]
    pub wrap_palette: bool,

    /// Write the computed layout of every diagram as JSON
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// Log pipeline stages
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    // A subscriber may already be installed when embedded.
    let _ = SubscriberBuilder::default()
        .with_writer(io::stderr)
        .with_target(false)
        .with_max_level(level)
        .try_init();
    execute(&args)
}

/// Renders every sequence in the input. Diagrams read before a malformed
/// record are still written; the run then fails with that record's error.
pub fn execute(args: &Args) -> Result<()> {
    let config = apply_overrides(load_config(args.config.as_deref())?, args);
    let palette = match &args.palette {
        Some(path) => load_palette(path)?,
        None => Palette::default_for(args.curves),
    };
    let renderer = Renderer::new(RenderOptions::new(args.curves, &config), &palette)?;
    tracing::debug!(
        curves = args.curves,
        colors = palette.len(),
        rule = %renderer.color_rule(),
        "renderer ready"
    );

    let input = read_input(args.input.as_deref())?;
    let mut sequences = renderer.reader(&input)?.peekable();
    let mut dumps: Vec<LayoutDump> = Vec::new();
    let mut written = 0usize;
    let mut failure = None;
    while let Some(next) = sequences.next() {
        let sequence = match next {
            Ok(sequence) => sequence,
            Err(err) => {
                failure = Some(err);
                break;
            }
        };
        // Naming depends on whether another diagram follows this one.
        let single = written == 0 && !matches!(sequences.peek(), Some(Ok(_)));
        let output = output_path(
            args.output.as_deref(),
            args.output_format,
            args.curves,
            written,
            single,
        )?;

        let diagram = renderer.draw(&sequence);
        let svg = render_svg(&diagram, &config.theme);
        match (args.output_format, &output) {
            (OutputFormat::Svg, output) => write_output_svg(&svg, output.as_deref())?,
            (OutputFormat::Png, Some(path)) => write_output_png(&svg, path, &config.render)?,
            (OutputFormat::Png, None) => {
                return Err(anyhow::anyhow!("Output path required for png output"));
            }
        }
        if let Some(path) = &output {
            tracing::info!(path = %path.display(), "wrote diagram");
        }
        if args.dump_layout.is_some() {
            dumps.push(LayoutDump::from_diagram(&diagram));
        }
        written += 1;
    }

    if written == 0 {
        return match failure {
            Some(err) => Err(err.into()),
            None => Err(anyhow::anyhow!("No crossing sequences found in input")),
        };
    }

    if let Some(path) = &args.dump_layout {
        write_layout_dump(path, &dumps)
            .with_context(|| format!("writing layout dump to {}", path.display()))?;
    }

    match failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn apply_overrides(mut config: Config, args: &Args) -> Config {
    if let Some(mode) = args.mode {
        config.render.mode = mode;
    }
    if args.no_fill {
        config.render.fill = false;
    } else if args.fill {
        config.render.fill = true;
    }
    if let Some(rule) = args.color_rule {
        config.render.color_rule = rule;
    }
    if args.wrap_palette {
        config.render.wrap_palette = true;
    }
    config
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()));
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// Destination of diagram `index` (0-based); `None` means stdout. `single`
/// tells whether it is the only diagram in the input.
fn output_path(
    output: Option<&Path>,
    format: OutputFormat,
    curves: usize,
    index: usize,
    single: bool,
) -> Result<Option<PathBuf>> {
    let ext = format.extension();
    let Some(base) = output else {
        if format == OutputFormat::Png {
            return Err(anyhow::anyhow!("Output path required for png output"));
        }
        if single {
            return Ok(None);
        }
        return Err(anyhow::anyhow!(
            "Output path required when the input holds more than one diagram"
        ));
    };
    if base.is_dir() {
        return Ok(Some(
            base.join(format!("venn{}-{}.{}", curves, index + 1, ext)),
        ));
    }
    if single {
        return Ok(Some(base.to_path_buf()));
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("venn");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    Ok(Some(parent.join(format!("{}-{}.{}", stem, index + 1, ext))))
}
