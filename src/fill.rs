// ============================================================================
// FLOOD FILL — stack-based 4-connected bucket fill + background worker
// ============================================================================

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use image::{Rgba, RgbaImage};

use crate::color::rgb_within;

/// Target pixels this close (per RGB channel) to the fill colour are
/// treated as already filled.
pub const DEFAULT_MATCH_TOLERANCE: u8 = 10;
/// Pixels this close (per RGB channel) to the tapped pixel belong to its region.
pub const DEFAULT_REGION_TOLERANCE: u8 = 30;
/// Upper bound on visited pixels per fill.
pub const DEFAULT_PIXEL_CAP: usize = 500_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FillOptions {
    pub match_tolerance: u8,
    pub region_tolerance: u8,
    pub pixel_cap: usize,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            match_tolerance: DEFAULT_MATCH_TOLERANCE,
            region_tolerance: DEFAULT_REGION_TOLERANCE,
            pixel_cap: DEFAULT_PIXEL_CAP,
        }
    }
}

/// What to do with a fill requested while another one is still running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FillPolicy {
    /// Run it after the in-flight fill completes.
    #[default]
    Queue,
    /// Drop it and report the canvas as busy.
    Reject,
}

impl FillPolicy {
    pub fn key(&self) -> &'static str {
        match self {
            FillPolicy::Queue => "queue",
            FillPolicy::Reject => "reject",
        }
    }
}

/// Result of a completed fill over a copy of the source raster.
#[derive(Clone, Debug)]
pub struct FillOutcome {
    pub image: RgbaImage,
    /// Pixels recoloured.
    pub filled: usize,
    /// Pixels examined (the visited set size).
    pub visited: usize,
    /// True when the pixel cap stopped the fill early.
    pub truncated: bool,
}

/// True when the pixel at `(x, y)` already matches `color` within `tolerance`.
pub fn already_filled(image: &RgbaImage, (x, y): (u32, u32), color: Rgba<u8>, tolerance: u8) -> bool {
    x < image.width() && y < image.height() && rgb_within(*image.get_pixel(x, y), color, tolerance)
}

/// Fill the 4-connected region around `start` whose RGB stays within the
/// region tolerance of the start pixel's original colour.
///
/// Returns `None` (nothing to do) when `start` is outside the image or the
/// start pixel already matches `color`. The fill colour is written opaque.
pub fn flood_fill(image: &RgbaImage, start: (u32, u32), color: Rgba<u8>, options: &FillOptions) -> Option<FillOutcome> {
    let (width, height) = image.dimensions();
    let (sx, sy) = start;
    if sx >= width || sy >= height {
        return None;
    }
    let fill = Rgba([color[0], color[1], color[2], 255]);
    if already_filled(image, start, fill, options.match_tolerance) {
        return None;
    }

    let target = *image.get_pixel(sx, sy);
    let mut out = image.clone();
    let wu = width as usize;

    // Visited set keyed by flat pixel index; `visited` counts its members
    let mut seen = vec![false; wu * height as usize];
    let mut visited = 0usize;
    let mut filled = 0usize;
    let mut truncated = false;

    let mut stack: Vec<(u32, u32)> = Vec::with_capacity(4096);
    stack.push(start);

    while let Some((x, y)) = stack.pop() {
        let idx = y as usize * wu + x as usize;
        if seen[idx] {
            continue;
        }
        if visited >= options.pixel_cap {
            truncated = true;
            break;
        }
        seen[idx] = true;
        visited += 1;

        // Compare against the original raster, not the partially filled copy
        if !rgb_within(*image.get_pixel(x, y), target, options.region_tolerance) {
            continue;
        }
        out.put_pixel(x, y, fill);
        filled += 1;

        if x > 0 {
            stack.push((x - 1, y));
        }
        if x + 1 < width {
            stack.push((x + 1, y));
        }
        if y > 0 {
            stack.push((x, y - 1));
        }
        if y + 1 < height {
            stack.push((x, y + 1));
        }
    }

    Some(FillOutcome { image: out, filled, visited, truncated })
}

// ============================================================================
// BACKGROUND WORKER
// ============================================================================

/// A fill to run off the interactive thread.
pub struct FillJob {
    pub source: Arc<RgbaImage>,
    pub start: (u32, u32),
    pub color: Rgba<u8>,
    /// Background revision the job was computed against. Results whose
    /// revision no longer matches the canvas are stale and get dropped.
    pub revision: u64,
}

pub struct FillResult {
    pub revision: u64,
    pub start: (u32, u32),
    pub outcome: Option<FillOutcome>,
    pub elapsed: Duration,
}

/// Runs at most one fill at a time on the rayon pool and hands results back
/// over a channel, polled from the interactive thread.
pub struct FillWorker {
    sender: Sender<FillResult>,
    receiver: Receiver<FillResult>,
    in_flight: bool,
}

impl Default for FillWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl FillWorker {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver, in_flight: false }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn spawn(&mut self, job: FillJob, options: FillOptions) {
        let sender = self.sender.clone();
        self.in_flight = true;
        log::debug!("fill started at {:?} (revision {})", job.start, job.revision);
        rayon::spawn(move || {
            let started = Instant::now();
            let outcome = flood_fill(&job.source, job.start, job.color, &options);
            let _ = sender.send(FillResult {
                revision: job.revision,
                start: job.start,
                outcome,
                elapsed: started.elapsed(),
            });
        });
    }

    /// Non-blocking: the finished result, if there is one.
    pub fn try_take(&mut self) -> Option<FillResult> {
        if !self.in_flight {
            return None;
        }
        let result = self.receiver.try_recv().ok()?;
        self.in_flight = false;
        Some(result)
    }

    /// Block until the in-flight fill finishes. `None` when idle.
    pub fn wait(&mut self) -> Option<FillResult> {
        if !self.in_flight {
            return None;
        }
        let result = self.receiver.recv().ok();
        self.in_flight = false;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const RED: Rgba<u8> = Rgba([220, 20, 20, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    /// Red disk of radius 20 centred at (50, 50) on white.
    fn disk() -> RgbaImage {
        RgbaImage::from_fn(100, 100, |x, y| {
            let dx = x as f32 - 50.0;
            let dy = y as f32 - 50.0;
            if dx * dx + dy * dy <= 400.0 { RED } else { WHITE }
        })
    }

    #[test]
    fn fill_stays_inside_disk() {
        let src = disk();
        let out = flood_fill(&src, (50, 50), BLUE, &FillOptions::default()).unwrap();
        assert!(!out.truncated);
        for (x, y, p) in src.enumerate_pixels() {
            let expected = if *p == RED { BLUE } else { WHITE };
            assert_eq!(*out.image.get_pixel(x, y), expected, "pixel ({x}, {y})");
        }
        assert_eq!(out.filled, src.pixels().filter(|p| **p == RED).count());
    }

    #[test]
    fn near_colours_join_the_region() {
        let mut src = RgbaImage::from_pixel(10, 1, Rgba([100, 100, 100, 255]));
        src.put_pixel(5, 0, Rgba([130, 70, 100, 255])); // within 30
        src.put_pixel(8, 0, Rgba([131, 100, 100, 255])); // outside 30
        let out = flood_fill(&src, (0, 0), BLUE, &FillOptions::default()).unwrap();
        assert_eq!(out.filled, 8);
        assert_eq!(*out.image.get_pixel(5, 0), BLUE);
        assert_eq!(*out.image.get_pixel(9, 0), Rgba([100, 100, 100, 255]));
    }

    #[test]
    fn matching_target_is_a_noop() {
        let src = RgbaImage::from_pixel(8, 8, Rgba([5, 5, 250, 255]));
        assert!(flood_fill(&src, (3, 3), BLUE, &FillOptions::default()).is_none());
        assert!(already_filled(&src, (3, 3), BLUE, DEFAULT_MATCH_TOLERANCE));
    }

    #[test]
    fn pixel_cap_bounds_the_fill() {
        let src = RgbaImage::from_pixel(100, 100, WHITE);
        let options = FillOptions { pixel_cap: 1_000, ..FillOptions::default() };
        let out = flood_fill(&src, (50, 50), BLUE, &options).unwrap();
        assert!(out.truncated);
        assert!(out.visited <= 1_000);
        assert!(out.filled <= 1_000);
        assert_eq!(out.image.pixels().filter(|p| **p == BLUE).count(), out.filled);
    }

    #[test]
    fn fill_forces_opaque_alpha() {
        let src = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        let out = flood_fill(&src, (0, 0), Rgba([10, 200, 10, 40]), &FillOptions::default()).unwrap();
        assert_eq!(*out.image.get_pixel(3, 3), Rgba([10, 200, 10, 255]));
    }

    #[test]
    fn worker_round_trip() {
        let mut worker = FillWorker::new();
        assert!(worker.wait().is_none());
        worker.spawn(
            FillJob { source: Arc::new(disk()), start: (50, 50), color: BLUE, revision: 7 },
            FillOptions::default(),
        );
        assert!(worker.is_busy());
        let result = worker.wait().unwrap();
        assert_eq!(result.revision, 7);
        assert!(result.outcome.is_some());
        assert!(!worker.is_busy());
        assert!(worker.try_take().is_none());
    }
}
