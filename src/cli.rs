// ============================================================================
// DoodlePad CLI — replay drawing operations on a headless canvas
// ============================================================================
//
// Usage examples:
//   doodlepad -o out.png stroke:normal:#000000:8:10,10:10,100
//   doodlepad -o out.png --background page.png fill:#0000ff:25,25
//   doodlepad -o out.png --size 320x240 --seed 7 stroke:spray:#ff0080:6:20,20:200,120 undo redo
//
// No window is opened in CLI mode. Fills are awaited before the next
// operation, so the output is reproducible (spray needs --seed).

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Instant;

use clap::Parser;
use image::Rgba;

use crate::brush::BrushType;
use crate::canvas::{FillRequest, RasterCanvas};
use crate::color;
use crate::error::{DoodleError, Result};
use crate::geometry::Point;
use crate::io::{import_background, save_png};
use crate::settings::CanvasSettings;

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// DoodlePad headless renderer.
#[derive(Parser, Debug)]
#[command(
    name = "doodlepad",
    about = "Draw strokes and fills on a headless DoodlePad canvas and save the result",
    long_about = "Replay drawing operations on a canvas without opening the GUI.\n\n\
                  Operations:\n  \
                  stroke:<brush>:<#color>:<width>:x,y[:x,y...]\n  \
                  fill:<#color>:x,y\n  \
                  undo | redo | clear\n\n\
                  Brushes: normal, round, square, spray, highlighter, star, heart,\n\
                  triangle, diamond, rainbow."
)]
pub struct CliArgs {
    /// Output PNG path.
    #[arg(short, long, value_name = "FILE.png")]
    pub output: PathBuf,

    /// Canvas size, e.g. 800x600. Defaults to the size in the settings file.
    #[arg(long, value_name = "WxH")]
    pub size: Option<CanvasSize>,

    /// Colouring page shown behind the strokes and targeted by fills.
    #[arg(short, long, value_name = "IMAGE")]
    pub background: Option<PathBuf>,

    /// Seed for the spray brush.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log debug output and print per-operation results.
    #[arg(short, long)]
    pub verbose: bool,

    /// Operations, applied in order.
    #[arg(value_name = "OP")]
    pub ops: Vec<Op>,
}

impl CliArgs {
    /// Returns `true` when the output flag is present in the real process arguments.
    /// Used by `main()` to route before creating an eframe window.
    pub fn is_cli_mode() -> bool {
        std::env::args().skip(1).any(|a| a == "-o" || a == "--output" || a.starts_with("--output="))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl FromStr for CanvasSize {
    type Err = DoodleError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || DoodleError::InvalidSize(s.to_string());
        let lower = s.to_ascii_lowercase();
        let (w, h) = lower.split_once('x').ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

/// One drawing operation from the command line.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Stroke {
        brush: BrushType,
        color: Rgba<u8>,
        width: f32,
        points: Vec<Point>,
    },
    Fill {
        color: Rgba<u8>,
        at: Point,
    },
    Undo,
    Redo,
    Clear,
}

impl FromStr for Op {
    type Err = DoodleError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| DoodleError::InvalidOperation { op: s.to_string(), reason: reason.to_string() };
        let mut parts = s.split(':');
        match parts.next().unwrap_or_default() {
            "undo" => Ok(Op::Undo),
            "redo" => Ok(Op::Redo),
            "clear" => Ok(Op::Clear),
            "stroke" => {
                let brush: BrushType = parts.next().ok_or_else(|| invalid("missing brush"))?.parse()?;
                let color = color::parse_hex(parts.next().ok_or_else(|| invalid("missing color"))?)?;
                let width: f32 = parts
                    .next()
                    .ok_or_else(|| invalid("missing width"))?
                    .parse()
                    .map_err(|_| invalid("width is not a number"))?;
                let points = parts.map(Point::from_str).collect::<Result<Vec<_>>>()?;
                if points.is_empty() {
                    return Err(invalid("a stroke needs at least one point"));
                }
                Ok(Op::Stroke { brush, color, width, points })
            }
            "fill" => {
                let color = color::parse_hex(parts.next().ok_or_else(|| invalid("missing color"))?)?;
                let at: Point = parts.next().ok_or_else(|| invalid("missing point"))?.parse()?;
                if parts.next().is_some() {
                    return Err(invalid("fill takes a single point"));
                }
                Ok(Op::Fill { color, at })
            }
            _ => Err(invalid("expected stroke, fill, undo, redo or clear")),
        }
    }
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run the operations and return an OS exit code.
pub fn run(args: CliArgs) -> ExitCode {
    let started = Instant::now();
    match render(&args) {
        Ok(()) => {
            if args.verbose {
                println!("→ {} ({:.0}ms)", args.output.display(), started.elapsed().as_secs_f64() * 1000.0);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn render(args: &CliArgs) -> Result<()> {
    let settings = CanvasSettings::load();
    let size = args
        .size
        .unwrap_or(CanvasSize { width: settings.canvas_width, height: settings.canvas_height });

    let mut canvas = RasterCanvas::with_settings(size.width, size.height, &settings);
    if let Some(seed) = args.seed {
        canvas = canvas.with_seed(seed);
    }
    if let Some(path) = &args.background {
        canvas.set_background_image(import_background(path, size.width, size.height)?);
    }

    for op in &args.ops {
        apply(&mut canvas, op, args.verbose);
    }

    save_png(&canvas.export_composite(), &args.output)
}

/// Apply one operation. Fills are awaited so later operations see them.
pub fn apply(canvas: &mut RasterCanvas, op: &Op, verbose: bool) {
    match op {
        Op::Stroke { brush, color, width, points } => {
            let Some((first, rest)) = points.split_first() else { return };
            canvas.set_brush(*brush, *color, *width);
            canvas.begin_stroke(*first);
            for p in rest {
                canvas.continue_stroke(*p);
            }
            canvas.end_stroke();
            if verbose {
                println!("  stroke ({}, {} points)", brush.key(), points.len());
            }
        }
        Op::Fill { color, at } => {
            let status = canvas.fill(*at, *color);
            if matches!(status, FillRequest::Started | FillRequest::Queued) {
                canvas.wait_for_fill();
            }
            if verbose {
                println!("  fill at {},{}: {:?}", at.x, at.y, status);
            }
        }
        Op::Undo => {
            let done = canvas.undo();
            if verbose {
                println!("  undo{}", if done { "" } else { " (nothing to undo)" });
            }
        }
        Op::Redo => {
            let done = canvas.redo();
            if verbose {
                println!("  redo{}", if done { "" } else { " (nothing to redo)" });
            }
        }
        Op::Clear => {
            canvas.clear();
            if verbose {
                println!("  clear");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_operations() {
        let op: Op = "stroke:heart:#ff000080:12:1,2:3.5,4".parse().unwrap();
        assert_eq!(
            op,
            Op::Stroke {
                brush: BrushType::Heart,
                color: Rgba([255, 0, 0, 128]),
                width: 12.0,
                points: vec![Point::new(1.0, 2.0), Point::new(3.5, 4.0)],
            }
        );
        assert_eq!("fill:#00ff00:5,6".parse::<Op>().unwrap(), Op::Fill { color: Rgba([0, 255, 0, 255]), at: Point::new(5.0, 6.0) });
        assert_eq!("undo".parse::<Op>().unwrap(), Op::Undo);
    }

    #[test]
    fn rejects_bad_operations() {
        assert!("stroke:normal:#000000:8".parse::<Op>().is_err());
        assert!("stroke:pencil:#000000:8:1,1".parse::<Op>().is_err());
        assert!("fill:#0000ff:1,1:2,2".parse::<Op>().is_err());
        assert!("fill:blue:1,1".parse::<Op>().is_err());
        assert!("erase".parse::<Op>().is_err());
    }

    #[test]
    fn parses_sizes() {
        assert_eq!("320x240".parse::<CanvasSize>().unwrap(), CanvasSize { width: 320, height: 240 });
        assert!("0x10".parse::<CanvasSize>().is_err());
        assert!("320".parse::<CanvasSize>().is_err());
    }

    #[test]
    fn clap_accepts_operation_list() {
        let args = CliArgs::try_parse_from(["doodlepad", "-o", "out.png", "--size", "64x64", "stroke:normal:#000000:4:1,1:60,60", "undo"]).unwrap();
        assert_eq!(args.ops.len(), 2);
        assert_eq!(args.size, Some(CanvasSize { width: 64, height: 64 }));
    }

    #[test]
    fn apply_replays_on_canvas() {
        let mut canvas = RasterCanvas::new(64, 64);
        apply(&mut canvas, &"stroke:square:#000000:4:8,8:56,8".parse().unwrap(), false);
        assert!(canvas.can_undo());
        apply(&mut canvas, &Op::Undo, false);
        assert!(canvas.strokes().pixels().all(|p| p[3] == 0));
        apply(&mut canvas, &Op::Redo, false);
        assert!(canvas.strokes().pixels().any(|p| p[3] > 0));
    }

    #[test]
    fn empty_stroke_is_ignored() {
        let mut canvas = RasterCanvas::new(32, 32);
        let op = Op::Stroke { brush: BrushType::Normal, color: color::BLACK, width: 4.0, points: Vec::new() };
        apply(&mut canvas, &op, false);
        assert!(!canvas.is_stroking());
        assert!(!canvas.can_undo());
        assert!(canvas.strokes().pixels().all(|p| p[3] == 0));
    }
}
