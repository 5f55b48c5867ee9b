// ============================================================================
// COVERAGE RASTERIZERS — every brush reduces to "coverage at pixel centre"
// ============================================================================

use image::{Rgba, RgbaImage};
use rayon::prelude::*;

use crate::color::{BlendMode, blend_pixel};
use crate::geometry::{PixelRect, Point};

use super::spray::SprayDot;

/// Regions at least this many pixels are painted row-parallel.
const PARALLEL_AREA: u32 = 64 * 64;

/// Paint `color` into `rect`, scaling its alpha by `coverage(x, y)` evaluated
/// at each pixel centre.
fn paint_region<F>(buffer: &mut RgbaImage, rect: PixelRect, color: Rgba<u8>, mode: BlendMode, coverage: F)
where
    F: Fn(f32, f32) -> f32 + Sync,
{
    let stride = buffer.width() as usize * 4;
    let x0 = rect.min_x as usize;
    let x1 = rect.max_x as usize;

    let paint_row = |y: usize, row: &mut [u8]| {
        let py = y as f32 + 0.5;
        for x in x0..x1 {
            let cov = coverage(x as f32 + 0.5, py);
            if cov <= 0.0 {
                continue;
            }
            let o = x * 4;
            let base = Rgba([row[o], row[o + 1], row[o + 2], row[o + 3]]);
            let out = blend_pixel(base, color, mode, cov);
            row[o..o + 4].copy_from_slice(&out.0);
        }
    };

    let raw: &mut [u8] = &mut **buffer;
    let rows = raw
        .chunks_mut(stride)
        .enumerate()
        .skip(rect.min_y as usize)
        .take(rect.height() as usize);

    if rect.width() * rect.height() >= PARALLEL_AREA {
        let rows: Vec<(usize, &mut [u8])> = rows.collect();
        rows.into_par_iter().for_each(|(y, row)| paint_row(y, row));
    } else {
        rows.for_each(|(y, row)| paint_row(y, row));
    }
}

/// Distance from `p` to the segment `a`–`b`.
#[inline]
pub fn distance_to_segment(px: f32, py: f32, a: Point, b: Point) -> f32 {
    let ex = b.x - a.x;
    let ey = b.y - a.y;
    let len2 = ex * ex + ey * ey;
    let t = if len2 > 1e-12 {
        (((px - a.x) * ex + (py - a.y) * ey) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let cx = a.x + ex * t - px;
    let cy = a.y + ey * t - py;
    (cx * cx + cy * cy).sqrt()
}

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn segment_bounds(a: Point, b: Point, pad: f32, buffer: &RgbaImage) -> Option<PixelRect> {
    PixelRect::from_bounds(
        a.x.min(b.x) - pad,
        a.y.min(b.y) - pad,
        a.x.max(b.x) + pad,
        a.y.max(b.y) + pad,
        buffer.width(),
        buffer.height(),
    )
}

/// Solid line with round caps and joins, 1 px anti-aliased edge.
pub fn capsule(buffer: &mut RgbaImage, a: Point, b: Point, radius: f32, color: Rgba<u8>, mode: BlendMode) -> Option<PixelRect> {
    let rect = segment_bounds(a, b, radius + 1.0, buffer)?;
    paint_region(buffer, rect, color, mode, |x, y| {
        (radius + 0.5 - distance_to_segment(x, y, a, b)).clamp(0.0, 1.0)
    });
    Some(rect)
}

/// Round line whose outer band fades out, giving a soft glow.
pub fn soft_capsule(buffer: &mut RgbaImage, a: Point, b: Point, radius: f32, color: Rgba<u8>) -> Option<PixelRect> {
    let band = (radius * 0.35).max(1.0);
    let rect = segment_bounds(a, b, radius + 1.0, buffer)?;
    paint_region(buffer, rect, color, BlendMode::Normal, |x, y| {
        1.0 - smoothstep(radius - band, radius, distance_to_segment(x, y, a, b))
    });
    Some(rect)
}

/// Straight line with square caps: the segment's rectangle extended by
/// `half_width` past both ends.
pub fn square_segment(buffer: &mut RgbaImage, a: Point, b: Point, half_width: f32, color: Rgba<u8>) -> Option<PixelRect> {
    let len = a.distance(b);
    let (ux, uy) = if len > 1e-6 { ((b.x - a.x) / len, (b.y - a.y) / len) } else { (1.0, 0.0) };
    let mid = a.lerp(b, 0.5);
    let half_len = len * 0.5 + half_width;
    // Corners can reach half_width·√2 past the endpoints
    let rect = segment_bounds(a, b, half_width * std::f32::consts::SQRT_2 + 1.0, buffer)?;
    paint_region(buffer, rect, color, BlendMode::Normal, |x, y| {
        let dx = x - mid.x;
        let dy = y - mid.y;
        let along = (dx * ux + dy * uy).abs();
        let across = (-dx * uy + dy * ux).abs();
        ((half_len - along).min(half_width - across) + 0.5).clamp(0.0, 1.0)
    });
    Some(rect)
}

/// Scatter of small discs, each with its own alpha factor.
pub fn dots(buffer: &mut RgbaImage, dots: &[SprayDot], color: Rgba<u8>) -> Option<PixelRect> {
    let mut dirty: Option<PixelRect> = None;
    for dot in dots {
        let c = dot.center;
        let r = dot.radius;
        let Some(rect) = PixelRect::from_bounds(c.x - r - 1.0, c.y - r - 1.0, c.x + r + 1.0, c.y + r + 1.0, buffer.width(), buffer.height()) else {
            continue;
        };
        let alpha = dot.alpha;
        paint_region(buffer, rect, color, BlendMode::Normal, |x, y| {
            let dx = x - c.x;
            let dy = y - c.y;
            (r + 0.5 - (dx * dx + dy * dy).sqrt()).clamp(0.0, 1.0) * alpha
        });
        dirty = Some(dirty.map_or(rect, |d| d.union(rect)));
    }
    dirty
}

/// Filled polygon (vertices relative to `center`), anti-aliased by signed distance.
pub fn polygon(buffer: &mut RgbaImage, vertices: &[Point], center: Point, color: Rgba<u8>) -> Option<PixelRect> {
    if vertices.len() < 3 {
        return None;
    }
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (f32::MAX, f32::MAX, f32::MIN, f32::MIN);
    for v in vertices {
        min_x = min_x.min(v.x);
        min_y = min_y.min(v.y);
        max_x = max_x.max(v.x);
        max_y = max_y.max(v.y);
    }
    let rect = PixelRect::from_bounds(
        center.x + min_x - 1.0,
        center.y + min_y - 1.0,
        center.x + max_x + 1.0,
        center.y + max_y + 1.0,
        buffer.width(),
        buffer.height(),
    )?;
    paint_region(buffer, rect, color, BlendMode::Normal, |x, y| {
        (0.5 - polygon_sdf(vertices, x - center.x, y - center.y)).clamp(0.0, 1.0)
    });
    Some(rect)
}

/// Signed distance to a closed polygon (negative inside, even-odd rule).
pub fn polygon_sdf(vertices: &[Point], px: f32, py: f32) -> f32 {
    let mut min_dist = f32::MAX;
    let mut inside = false;
    let n = vertices.len();
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        min_dist = min_dist.min(distance_to_segment(px, py, a, b));
        if (a.y > py) != (b.y > py) {
            let cross_x = a.x + (py - a.y) / (b.y - a.y) * (b.x - a.x);
            if px < cross_x {
                inside = !inside;
            }
        }
    }
    if inside { -min_dist } else { min_dist }
}
