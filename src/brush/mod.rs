//! Brush configuration and per-segment stroke rasterization.
//!
//! Every brush works on the straight segment between the last sampled pointer
//! position and the current one. A fast drag is therefore drawn as a polyline
//! through the sampled points.

pub mod raster;
pub mod spray;
pub mod stamps;

use std::str::FromStr;

use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;

use crate::color::{self, BlendMode};
use crate::error::DoodleError;
use crate::geometry::{PixelRect, Point};

use self::stamps::StampShape;

/// Width multiplier of the soft round brush.
pub const ROUND_WIDTH_SCALE: f32 = 1.2;
/// Width multiplier of the highlighter.
pub const HIGHLIGHTER_WIDTH_SCALE: f32 = 2.0;
/// Alpha factor of the highlighter.
pub const HIGHLIGHTER_ALPHA: f32 = 0.4;
/// Stamp brushes place one shape every `STAMP_SPACING × width` pixels.
pub const STAMP_SPACING: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BrushType {
    #[default]
    Normal,
    Round,
    Square,
    Spray,
    Highlighter,
    Star,
    Heart,
    Triangle,
    Diamond,
    Rainbow,
}

impl BrushType {
    pub fn label(&self) -> &'static str {
        match self {
            BrushType::Normal => "Normal",
            BrushType::Round => "Round",
            BrushType::Square => "Square",
            BrushType::Spray => "Spray",
            BrushType::Highlighter => "Highlighter",
            BrushType::Star => "Star",
            BrushType::Heart => "Heart",
            BrushType::Triangle => "Triangle",
            BrushType::Diamond => "Diamond",
            BrushType::Rainbow => "Rainbow",
        }
    }

    /// Lower-case name used on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            BrushType::Normal => "normal",
            BrushType::Round => "round",
            BrushType::Square => "square",
            BrushType::Spray => "spray",
            BrushType::Highlighter => "highlighter",
            BrushType::Star => "star",
            BrushType::Heart => "heart",
            BrushType::Triangle => "triangle",
            BrushType::Diamond => "diamond",
            BrushType::Rainbow => "rainbow",
        }
    }

    pub fn all() -> &'static [BrushType] {
        &[
            BrushType::Normal,
            BrushType::Round,
            BrushType::Square,
            BrushType::Spray,
            BrushType::Highlighter,
            BrushType::Star,
            BrushType::Heart,
            BrushType::Triangle,
            BrushType::Diamond,
            BrushType::Rainbow,
        ]
    }

    /// Brushes whose output depends only on the points and the configuration.
    pub fn is_deterministic(&self) -> bool {
        !matches!(self, BrushType::Spray | BrushType::Rainbow)
    }

    fn stamp_shape(&self) -> Option<StampShape> {
        match self {
            BrushType::Star => Some(StampShape::Star),
            BrushType::Heart => Some(StampShape::Heart),
            BrushType::Triangle => Some(StampShape::Triangle),
            BrushType::Diamond => Some(StampShape::Diamond),
            _ => None,
        }
    }
}

impl FromStr for BrushType {
    type Err = DoodleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        BrushType::all()
            .iter()
            .copied()
            .find(|b| b.key() == wanted)
            .ok_or_else(|| DoodleError::UnknownBrush(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushConfig {
    pub brush_type: BrushType,
    pub color: Rgba<u8>,
    pub width: f32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            brush_type: BrushType::Normal,
            color: color::BLACK,
            width: 8.0,
        }
    }
}

/// Mutable state brushes read or advance while drawing: the spray random
/// source and the rainbow hue cursor. Lives as long as the canvas.
pub struct BrushContext {
    pub rng: StdRng,
    /// Rainbow hue cursor in `[0, 1)`. Never reset between strokes.
    pub hue: f32,
    pub hue_step: f32,
}

/// Rasterize one stroke segment into `buffer` with the given brush.
/// Returns the touched pixel region, if any.
pub fn rasterize_segment(
    buffer: &mut RgbaImage,
    from: Point,
    to: Point,
    brush: &BrushConfig,
    ctx: &mut BrushContext,
) -> Option<PixelRect> {
    let width = brush.width.max(1.0);
    match brush.brush_type {
        BrushType::Normal => raster::capsule(buffer, from, to, width * 0.5, brush.color, BlendMode::Normal),
        BrushType::Round => raster::soft_capsule(buffer, from, to, width * ROUND_WIDTH_SCALE * 0.5, brush.color),
        BrushType::Square => raster::square_segment(buffer, from, to, width * 0.5, brush.color),
        BrushType::Spray => {
            let dots = spray::spray_dots(&mut ctx.rng, from, to, width);
            raster::dots(buffer, &dots, brush.color)
        }
        BrushType::Highlighter => {
            let tint = color::with_alpha_factor(brush.color, HIGHLIGHTER_ALPHA);
            raster::capsule(buffer, from, to, width * HIGHLIGHTER_WIDTH_SCALE * 0.5, tint, BlendMode::Multiply)
        }
        BrushType::Rainbow => {
            let [r, g, b] = color::hsv_to_rgb(ctx.hue, 1.0, 1.0);
            let dirty = raster::capsule(buffer, from, to, width * 0.5, Rgba([r, g, b, brush.color[3]]), BlendMode::Normal);
            ctx.hue = (ctx.hue + ctx.hue_step).rem_euclid(1.0);
            dirty
        }
        BrushType::Star | BrushType::Heart | BrushType::Triangle | BrushType::Diamond => {
            let shape = brush.brush_type.stamp_shape()?;
            let polygon = shape.polygon(width * 0.5);
            let mut dirty: Option<PixelRect> = None;
            for center in stamp_positions(from, to, width) {
                if let Some(r) = raster::polygon(buffer, &polygon, center, brush.color) {
                    dirty = Some(dirty.map_or(r, |d| d.union(r)));
                }
            }
            dirty
        }
    }
}

/// Evenly spaced stamp centres along a segment, starting at `from`.
pub fn stamp_positions(from: Point, to: Point, width: f32) -> Vec<Point> {
    let spacing = (width * STAMP_SPACING).max(1.0);
    let steps = ((from.distance(to) / spacing).floor() as usize).max(1);
    (0..steps).map(|i| from.lerp(to, i as f32 / steps as f32)).collect()
}
