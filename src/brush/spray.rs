use rand::Rng;

use crate::geometry::Point;

/// Samples are taken every `SAMPLE_SPACING` pixels along a segment.
pub const SAMPLE_SPACING: f32 = 3.0;
pub const DOT_RADIUS_MIN: f32 = 0.5;
pub const DOT_RADIUS_MAX: f32 = 1.5;
pub const DOT_ALPHA_MIN: f32 = 0.5;
pub const DOT_ALPHA_MAX: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SprayDot {
    pub center: Point,
    pub radius: f32,
    /// Alpha factor applied on top of the brush colour's alpha.
    pub alpha: f32,
}

/// Number of samples along a segment of length `len`.
pub fn sample_count(len: f32) -> usize {
    ((len / SAMPLE_SPACING).floor() as usize).max(1)
}

/// Dots scattered around each sample point.
pub fn dots_per_sample(width: f32) -> usize {
    ((width * 2.0).round() as usize).max(1)
}

/// Airbrush scatter for one segment: `2 × width` dots around each sample,
/// at a random angle and a random distance of at most `width`.
pub fn spray_dots<R: Rng + ?Sized>(rng: &mut R, from: Point, to: Point, width: f32) -> Vec<SprayDot> {
    let samples = sample_count(from.distance(to));
    let per_sample = dots_per_sample(width);
    let mut dots = Vec::with_capacity(samples * per_sample);

    for i in 0..samples {
        let anchor = from.lerp(to, i as f32 / samples as f32);
        for _ in 0..per_sample {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let distance = rng.gen_range(0.0..=width);
            dots.push(SprayDot {
                center: Point::new(anchor.x + angle.cos() * distance, anchor.y + angle.sin() * distance),
                radius: rng.gen_range(DOT_RADIUS_MIN..=DOT_RADIUS_MAX),
                alpha: rng.gen_range(DOT_ALPHA_MIN..=DOT_ALPHA_MAX),
            });
        }
    }
    dots
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn scatter_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let from = Point::new(50.0, 50.0);
        let to = Point::new(80.0, 50.0);
        let width = 6.0;
        let dots = spray_dots(&mut rng, from, to, width);

        // 30 px → 10 samples, 12 dots each
        assert_eq!(dots.len(), 10 * 12);
        for dot in &dots {
            assert!((DOT_RADIUS_MIN..=DOT_RADIUS_MAX).contains(&dot.radius));
            assert!((DOT_ALPHA_MIN..=DOT_ALPHA_MAX).contains(&dot.alpha));
            // Distance to the segment never exceeds the scatter radius
            let dx = (dot.center.x - dot.center.x.clamp(from.x, to.x)).abs();
            let dy = (dot.center.y - from.y).abs();
            assert!((dx * dx + dy * dy).sqrt() <= width + 1e-3);
        }
    }

    #[test]
    fn zero_length_segment_still_sprays() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = Point::new(10.0, 10.0);
        assert_eq!(spray_dots(&mut rng, p, p, 2.0).len(), 4);
    }

    #[test]
    fn different_seeds_differ() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(30.0, 0.0);
        let a = spray_dots(&mut StdRng::seed_from_u64(1), from, to, 5.0);
        let b = spray_dots(&mut StdRng::seed_from_u64(2), from, to, 5.0);
        assert_ne!(a, b);
    }
}
