use std::str::FromStr;

use crate::error::DoodleError;

/// A point in view (canvas) space. The canvas buffer is sized to the view,
/// so view coordinates and buffer pixel coordinates coincide.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation toward `other` (`t` in 0..=1).
    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }
}

impl FromStr for Point {
    type Err = DoodleError;

    /// Parses `"x,y"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| DoodleError::InvalidPoint(s.to_string()))?;
        let x: f32 = x.trim().parse().map_err(|_| DoodleError::InvalidPoint(s.to_string()))?;
        let y: f32 = y.trim().parse().map_err(|_| DoodleError::InvalidPoint(s.to_string()))?;
        Ok(Point::new(x, y))
    }
}

/// Integer pixel rectangle, half-open: `[min_x, max_x) × [min_y, max_y)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl PixelRect {
    pub fn full(width: u32, height: u32) -> Self {
        Self { min_x: 0, min_y: 0, max_x: width, max_y: height }
    }

    /// Bounding box of a float region, clamped to `width × height`.
    /// Returns `None` when nothing of it lies on the canvas.
    pub fn from_bounds(min_x: f32, min_y: f32, max_x: f32, max_y: f32, width: u32, height: u32) -> Option<Self> {
        let x0 = (min_x.floor().max(0.0) as u32).min(width);
        let y0 = (min_y.floor().max(0.0) as u32).min(height);
        let x1 = (max_x.ceil().max(0.0) as u32).min(width);
        let y1 = (max_y.ceil().max(0.0) as u32).min(height);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self { min_x: x0, min_y: y0, max_x: x1, max_y: y1 })
    }

    pub fn union(self, other: PixelRect) -> PixelRect {
        PixelRect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> u32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y
    }
}

/// Where an image of `image_w × image_h` lands when displayed aspect-fit
/// (scaled uniformly, centred) inside a `bounds_w × bounds_h` view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl FitRect {
    pub fn aspect_fit(image_w: u32, image_h: u32, bounds_w: u32, bounds_h: u32) -> Self {
        if image_w == 0 || image_h == 0 || bounds_w == 0 || bounds_h == 0 {
            return Self { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };
        }
        let scale = (bounds_w as f32 / image_w as f32).min(bounds_h as f32 / image_h as f32);
        let width = image_w as f32 * scale;
        let height = image_h as f32 * scale;
        Self {
            x: (bounds_w as f32 - width) * 0.5,
            y: (bounds_h as f32 - height) * 0.5,
            width,
            height,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.x + self.width && p.y < self.y + self.height
    }

    /// Map a view point inside this rect to pixel coordinates of the
    /// `image_w × image_h` image it displays.
    pub fn to_image_pixel(&self, p: Point, image_w: u32, image_h: u32) -> Option<(u32, u32)> {
        if !self.contains(p) || image_w == 0 || image_h == 0 {
            return None;
        }
        let u = (p.x - self.x) / self.width;
        let v = (p.y - self.y) / self.height;
        let px = ((u * image_w as f32) as u32).min(image_w - 1);
        let py = ((v * image_h as f32) as u32).min(image_h - 1);
        Some((px, py))
    }

    /// Integer placement used when blitting the scaled image.
    pub fn pixel_rect(&self) -> (i64, i64, u32, u32) {
        (
            self.x.round() as i64,
            self.y.round() as i64,
            self.width.round().max(1.0) as u32,
            self.height.round().max(1.0) as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_fit_letterboxes_wide_image() {
        let fit = FitRect::aspect_fit(200, 100, 100, 100);
        assert_eq!(fit.width, 100.0);
        assert_eq!(fit.height, 50.0);
        assert_eq!(fit.y, 25.0);
        assert!(!fit.contains(Point::new(50.0, 10.0)));
        assert_eq!(fit.to_image_pixel(Point::new(50.0, 50.0), 200, 100), Some((100, 50)));
    }

    #[test]
    fn identity_fit_maps_one_to_one() {
        let fit = FitRect::aspect_fit(100, 100, 100, 100);
        assert_eq!(fit.to_image_pixel(Point::new(25.0, 25.0), 100, 100), Some((25, 25)));
        assert_eq!(fit.to_image_pixel(Point::new(99.9, 0.0), 100, 100), Some((99, 0)));
        assert_eq!(fit.to_image_pixel(Point::new(100.0, 0.0), 100, 100), None);
    }

    #[test]
    fn parses_points() {
        assert_eq!("10, 20.5".parse::<Point>().unwrap(), Point::new(10.0, 20.5));
        assert!("10;20".parse::<Point>().is_err());
    }

    #[test]
    fn bounds_clamp_to_canvas() {
        let r = PixelRect::from_bounds(-5.0, 2.2, 12.1, 40.0, 10, 10).unwrap();
        assert_eq!(r, PixelRect { min_x: 0, min_y: 2, max_x: 10, max_y: 10 });
        assert!(PixelRect::from_bounds(20.0, 20.0, 30.0, 30.0, 10, 10).is_none());
    }
}
