use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::geometry::Point;

/// Ratio of the star's inner radius to its outer radius.
const STAR_INNER_RATIO: f32 = 0.4;
/// Vertices used to polygonize the heart curve.
const HEART_SEGMENTS: usize = 48;

/// Shapes the stamp brushes place along a stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StampShape {
    Star,
    Heart,
    Triangle,
    Diamond,
}

impl StampShape {
    /// Outline centred on the origin, fitting in a `2·radius` square.
    /// Screen orientation: y grows downward.
    pub fn polygon(&self, radius: f32) -> Vec<Point> {
        let r = radius.max(1.0);
        match self {
            StampShape::Star => star(r),
            StampShape::Heart => heart(r),
            StampShape::Triangle => {
                let half_base = r * (PI / 3.0).sin();
                vec![
                    Point::new(0.0, -r),
                    Point::new(half_base, r * 0.5),
                    Point::new(-half_base, r * 0.5),
                ]
            }
            StampShape::Diamond => vec![
                Point::new(0.0, -r),
                Point::new(r * 0.7, 0.0),
                Point::new(0.0, r),
                Point::new(-r * 0.7, 0.0),
            ],
        }
    }
}

/// Five-point star: ten vertices alternating outer and inner radius every 36°,
/// first point straight up.
fn star(r: f32) -> Vec<Point> {
    (0..10)
        .map(|i| {
            let angle = -FRAC_PI_2 + i as f32 * (PI / 5.0);
            let radius = if i % 2 == 0 { r } else { r * STAR_INNER_RATIO };
            Point::new(angle.cos() * radius, angle.sin() * radius)
        })
        .collect()
}

/// Heart from the parametric curve
/// `x = 16 sin³t`, `y = 13 cos t − 5 cos 2t − 2 cos 3t − cos 4t`,
/// flipped so the lobes sit on top, scaled to fit `r`.
fn heart(r: f32) -> Vec<Point> {
    // The curve spans x ∈ [-16, 16], y ∈ [-17, 12]; centre it on y = -2.5
    let scale = r / 16.0;
    (0..HEART_SEGMENTS)
        .map(|i| {
            let t = i as f32 / HEART_SEGMENTS as f32 * TAU;
            let x = 16.0 * t.sin().powi(3);
            let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
            Point::new(x * scale, -(y + 2.5) * scale)
        })
        .collect()
}
