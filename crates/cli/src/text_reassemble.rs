//! text_reassemble - reassemble scripted text fragments into SVG
//!
//! Reads a script of positioned text fragments, rebuilds lines and
//! paragraphs from them and writes the result as an SVG document (or, with
//! `--json`, as a listing of every analyzed run).

mod dump;
mod script;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use tracing::Level;

use reassemble_core::font::{
    FixedMetrics, FontBackend, FontRegistry, FontStyle, KerningMode, MetricsMode, SystemFonts,
};
use reassemble_core::layout::{
    Alignment, Direction, LoadFlags, ReassembleParams, Rgb, Session, TextChunk,
};
use reassemble_core::utils::is_narrow_family;
use reassemble_core::{emit_svg, svg_document_footer, svg_document_header};

use dump::RunDump;
use script::{Directive, parse_line};

/// Reassembles scripted text fragments into lines and paragraphs.
///
/// Script lines: FONT:, ESC:, ORI:, FS:, XY:x,y, TEXT:, ALN:{L|C|R}{T|L|B},
/// LDIR:{LR|RL|TB}, MUL:, ITA:, WGT:, CND:, CLR:hex, FLAG:, EMIT:, DONE:,
/// and # comments.
#[derive(Parser, Debug)]
#[command(name = "text_reassemble")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Script to run
    input: PathBuf,

    /// Output file
    #[arg(short = 'o', long, default_value = "dump.svg")]
    output: PathBuf,

    /// Measure with synthetic metrics instead of installed fonts
    #[arg(long = "fixed-metrics", action = ArgAction::SetTrue)]
    fixed_metrics: bool,

    /// Ignore pair kerning
    #[arg(long = "no-kerning", action = ArgAction::SetTrue)]
    no_kerning: bool,

    /// Measure glyphs at the character size instead of in design units
    #[arg(long = "scaled-metrics", action = ArgAction::SetTrue)]
    scaled_metrics: bool,

    /// Write the analyzed runs as JSON instead of SVG
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

/// Attributes applied to the next TEXT: line.
#[derive(Debug, Clone)]
struct ChunkState {
    family: Option<String>,
    style: FontStyle,
    x: f64,
    y: f64,
    orientation: f64,
    color: Rgb,
    alignment: Alignment,
    direction: Direction,
}

impl Default for ChunkState {
    fn default() -> Self {
        Self {
            family: None,
            style: FontStyle::default(),
            x: 0.0,
            y: 0.0,
            orientation: 0.0,
            color: Rgb::BLACK,
            alignment: Alignment::default(),
            direction: Direction::default(),
        }
    }
}

enum Sink {
    Svg(BufWriter<File>),
    Json(Vec<RunDump>),
}

struct Harness {
    session: Session,
    state: ChunkState,
    escapement: f64,
    factor: f64,
    flags: LoadFlags,
    sink: Sink,
}

impl Harness {
    fn new(session: Session, sink: Sink) -> Self {
        Self {
            session,
            state: ChunkState::default(),
            escapement: 0.0,
            factor: 1.0,
            flags: LoadFlags::default(),
            sink,
        }
    }

    /// Applies one directive; returns false once the script is done.
    fn apply(&mut self, directive: Directive) -> Result<bool> {
        match directive {
            Directive::Comment => {}
            Directive::Font(family) => {
                self.state.style.condensed_override = is_narrow_family(&family);
                self.state.family = Some(family);
            }
            Directive::Escapement(degrees) => self.escapement = degrees,
            Directive::Orientation(degrees) => self.state.orientation = degrees,
            Directive::FontSize(size) => self.state.style.size = size * self.factor,
            Directive::Position(x, y) => {
                self.state.x = x * self.factor;
                self.state.y = y * self.factor;
            }
            Directive::Text(text) => self.load_text(&text)?,
            Directive::Align(alignment) => self.state.alignment = alignment,
            Directive::Direction(direction) => self.state.direction = direction,
            Directive::Multiplier(factor) => {
                self.factor = factor;
                self.session.set_quantization_error(factor)?;
            }
            Directive::Italic(italic) => self.state.style.italic = italic,
            Directive::Weight(weight) => self.state.style.weight = weight,
            Directive::Condensed(condensed) => self.state.style.condensed = condensed,
            Directive::Color(color) => self.state.color = color,
            Directive::Flags(bits) => self.flags = LoadFlags::from_bits(bits),
            Directive::Emit => self.flush()?,
            Directive::Done => {
                self.flush()?;
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn load_text(&mut self, text: &str) -> Result<()> {
        let family = self.state.family.as_deref().context("TEXT: before any FONT:")?;
        let font = self
            .session
            .resolve_font(family, &self.state.style)
            .context("Font load failed")?;
        let chunk = TextChunk::builder(font, text, self.state.x, self.state.y)
            .style(self.state.style)
            .orientation(self.state.orientation)
            .color(self.state.color)
            .alignment(self.state.alignment)
            .direction(self.state.direction)
            .build();

        match self.session.load_text_chunk(&chunk, self.escapement, self.flags) {
            Ok(_) => Ok(()),
            Err(e) if e.is_escapement_mismatch() => {
                tracing::debug!(escapement = self.escapement, "escapement changed, flushing run");
                self.flush()?;
                self.session
                    .load_text_chunk(&chunk, self.escapement, self.flags)
                    .context("Text load failed")?;
                Ok(())
            }
            Err(e) => Err(e).context("Text load failed"),
        }
    }

    /// Analyzes the current run, writes it out and starts a new one.
    fn flush(&mut self) -> Result<()> {
        self.session.analyze()?;
        match &mut self.sink {
            Sink::Svg(out) => {
                emit_svg(&mut self.session)?;
                out.write_all(self.session.take_output().as_bytes())?;
            }
            Sink::Json(runs) => runs.push(RunDump::capture(&self.session)),
        }
        self.session.clear();
        Ok(())
    }

    fn finish(self) -> Result<Option<Vec<RunDump>>> {
        match self.sink {
            Sink::Svg(mut out) => {
                out.write_all(svg_document_footer().as_bytes())?;
                out.flush()?;
                Ok(None)
            }
            Sink::Json(runs) => Ok(Some(runs)),
        }
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn run(args: &Args) -> Result<()> {
    let script = fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;

    let backend: Box<dyn FontBackend> = if args.fixed_metrics {
        Box::new(FixedMetrics::new())
    } else {
        Box::new(SystemFonts::shared())
    };
    let mut session = Session::from_registry(FontRegistry::from_boxed(backend), ReassembleParams::default());
    let (metrics_mode, kerning_mode) = if args.scaled_metrics {
        (MetricsMode::Scaled, KerningMode::Unfitted)
    } else {
        (MetricsMode::Unscaled, KerningMode::Unscaled)
    };
    session.set_kerning_options(!args.no_kerning, metrics_mode, kerning_mode);

    let sink = if args.json {
        Sink::Json(Vec::new())
    } else {
        let mut out = create(&args.output)?;
        out.write_all(svg_document_header().as_bytes())?;
        Sink::Svg(out)
    };

    let mut harness = Harness::new(session, sink);
    let mut lineno = 0;
    let mut done = false;
    for line in script.lines() {
        lineno += 1;
        let directive = parse_line(line).with_context(|| format!("Fatal error at line {lineno}"))?;
        if !harness
            .apply(directive)
            .with_context(|| format!("Fatal error at line {lineno}"))?
        {
            done = true;
            break;
        }
    }
    if !done {
        bail!("Fatal error at line {} Unexpected end of file - no DONE:", lineno + 1);
    }

    if let Some(runs) = harness.finish()? {
        let mut out = create(&args.output)?;
        serde_json::to_writer_pretty(&mut out, &runs)?;
        out.write_all(b"\n")?;
        out.flush()?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.debug { Level::DEBUG } else { Level::WARN })
        .init();

    run(&args)
}
