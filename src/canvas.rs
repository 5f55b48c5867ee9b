use std::collections::VecDeque;
use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::brush::{self, BrushConfig, BrushContext, BrushType};
use crate::color::{BlendMode, blend_pixel};
use crate::fill::{self, FillJob, FillOptions, FillPolicy, FillResult, FillWorker};
use crate::geometry::{FitRect, PixelRect, Point};
use crate::history::{CanvasSnapshot, HistoryManager};
use crate::settings::CanvasSettings;

/// Outcome of a fill request. No-op outcomes are values, not errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillRequest {
    /// Handed to the worker.
    Started,
    /// Another fill is running; this one runs after it.
    Queued,
    /// Another fill is running and the policy rejects overlapping requests.
    Busy,
    NoBackground,
    /// The point lies outside the displayed background.
    OutOfBounds,
    /// The tapped pixel already has the fill colour.
    AlreadyFilled,
}

#[derive(Clone, Copy, Debug)]
struct QueuedFill {
    pixel: (u32, u32),
    color: Rgba<u8>,
}

/// Live drag gesture: the last sampled point.
#[derive(Clone, Copy, Debug)]
struct StrokeSession {
    last: Point,
    segments: usize,
}

// ============================================================================
// RASTER CANVAS
// ============================================================================

/// Drawing surface: an optional background raster shown aspect-fit, a
/// transparent stroke buffer the size of the view on top of it, and a bounded
/// undo history of both.
pub struct RasterCanvas {
    width: u32,
    height: u32,
    strokes: RgbaImage,
    background: Option<Arc<RgbaImage>>,
    /// Bumped on every background change; fill results carry the value they
    /// were computed against.
    background_revision: u64,
    /// The background scaled to its on-screen rectangle, and that rectangle's origin.
    display_background: Option<(Arc<RgbaImage>, i64, i64)>,
    brush: BrushConfig,
    brush_ctx: BrushContext,
    stroke: Option<StrokeSession>,
    history: HistoryManager,
    fill_options: FillOptions,
    fill_policy: FillPolicy,
    fill_worker: FillWorker,
    fill_queue: VecDeque<QueuedFill>,
    paper: Rgba<u8>,
    dirty: Option<PixelRect>,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_settings(width, height, &CanvasSettings::default())
    }

    pub fn with_settings(width: u32, height: u32, settings: &CanvasSettings) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            strokes: RgbaImage::new(width, height),
            background: None,
            background_revision: 0,
            display_background: None,
            brush: BrushConfig { width: settings.default_brush_width.max(1.0), ..BrushConfig::default() },
            brush_ctx: BrushContext {
                rng: StdRng::from_entropy(),
                hue: 0.0,
                hue_step: settings.rainbow_hue_step,
            },
            stroke: None,
            history: HistoryManager::new(settings.undo_limit),
            fill_options: settings.fill_options(),
            fill_policy: settings.fill_policy,
            fill_worker: FillWorker::new(),
            fill_queue: VecDeque::new(),
            paper: settings.paper_color,
            dirty: Some(PixelRect::full(width, height)),
        }
    }

    /// Reseed the spray random source.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.brush_ctx.rng = StdRng::seed_from_u64(seed);
        self
    }

    // --- Accessors ---

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn strokes(&self) -> &RgbaImage {
        &self.strokes
    }

    pub fn background(&self) -> Option<&RgbaImage> {
        self.background.as_deref()
    }

    pub fn brush(&self) -> &BrushConfig {
        &self.brush
    }

    /// Current rainbow hue in `[0, 1)`.
    pub fn hue(&self) -> f32 {
        self.brush_ctx.hue
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_count()
    }

    pub fn is_stroking(&self) -> bool {
        self.stroke.is_some()
    }

    /// True while a fill is running or waiting in the queue.
    pub fn is_filling(&self) -> bool {
        self.fill_worker.is_busy() || !self.fill_queue.is_empty()
    }

    /// Returns and clears the region that changed since the last call.
    pub fn take_redraw(&mut self) -> Option<PixelRect> {
        self.dirty.take()
    }

    // --- Configuration ---

    pub fn set_brush(&mut self, brush_type: BrushType, color: Rgba<u8>, width: f32) {
        let width = if width.is_finite() { width.max(1.0) } else { 1.0 };
        self.brush = BrushConfig { brush_type, color, width };
    }

    /// Replace the background. Clears strokes and history and drops any
    /// pending fill.
    pub fn set_background_image(&mut self, image: RgbaImage) {
        log::info!("background set ({}x{})", image.width(), image.height());
        self.replace_background(Some(Arc::new(image)));
    }

    pub fn clear_background_image(&mut self) {
        if self.background.is_none() {
            return;
        }
        log::info!("background cleared");
        self.replace_background(None);
    }

    fn replace_background(&mut self, background: Option<Arc<RgbaImage>>) {
        self.background = background;
        self.background_revision += 1;
        self.refresh_display_background();
        self.fill_queue.clear();
        self.strokes = RgbaImage::new(self.width, self.height);
        self.history.clear();
        self.stroke = None;
        self.mark_all_dirty();
    }

    /// Reallocate for a new view size. Strokes and history are dropped; a fill
    /// in flight still lands, since it works in background pixels.
    pub fn resize(&mut self, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        if width == self.width && height == self.height {
            return;
        }
        log::debug!("canvas resized {}x{} -> {}x{}", self.width, self.height, width, height);
        self.width = width;
        self.height = height;
        self.strokes = RgbaImage::new(width, height);
        self.history.clear();
        self.stroke = None;
        self.refresh_display_background();
        self.mark_all_dirty();
    }

    /// Rescale the background for the current view. Called whenever the
    /// background or the view size changes, so export never resamples.
    fn refresh_display_background(&mut self) {
        self.display_background = self.background.as_ref().map(|background| {
            let fit = FitRect::aspect_fit(background.width(), background.height(), self.width, self.height);
            let (x, y, w, h) = fit.pixel_rect();
            let scaled = if w == background.width() && h == background.height() {
                Arc::clone(background)
            } else {
                Arc::new(imageops::resize(&**background, w, h, FilterType::Triangle))
            };
            (scaled, x, y)
        });
    }

    // --- Strokes ---

    pub fn begin_stroke(&mut self, point: Point) {
        if self.stroke.is_some() {
            self.end_stroke();
        }
        self.history.push(self.snapshot());
        self.stroke = Some(StrokeSession { last: point, segments: 0 });
    }

    pub fn continue_stroke(&mut self, point: Point) {
        let Some(session) = self.stroke.as_mut() else { return };
        let from = session.last;
        session.last = point;
        session.segments += 1;
        if let Some(rect) = brush::rasterize_segment(&mut self.strokes, from, point, &self.brush, &mut self.brush_ctx) {
            self.mark_dirty(rect);
        }
    }

    pub fn end_stroke(&mut self) {
        if let Some(session) = self.stroke.take() {
            log::debug!("{} stroke ended after {} segments", self.brush.brush_type.key(), session.segments);
        }
    }

    // --- History ---

    /// Restore the previous state. Ignored while a stroke is in progress.
    pub fn undo(&mut self) -> bool {
        if self.stroke.is_some() {
            return false;
        }
        match self.history.undo(self.snapshot()) {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        if self.stroke.is_some() {
            return false;
        }
        match self.history.redo(self.snapshot()) {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Erase all strokes (undoable). Ignored while a stroke is in progress.
    pub fn clear(&mut self) -> bool {
        if self.stroke.is_some() {
            return false;
        }
        self.history.push(self.snapshot());
        self.strokes = RgbaImage::new(self.width, self.height);
        self.mark_all_dirty();
        true
    }

    fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot { strokes: self.strokes.clone(), background: self.background.clone() }
    }

    fn restore(&mut self, snapshot: CanvasSnapshot) {
        let same_background = match (&self.background, &snapshot.background) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        self.background = snapshot.background;
        if !same_background {
            self.background_revision += 1;
            self.refresh_display_background();
        }
        // History is cleared on resize, so dimensions always match
        self.strokes = snapshot.strokes;
        self.mark_all_dirty();
    }

    // --- Fill ---

    /// Request a bucket fill of the background region under `point`.
    pub fn fill(&mut self, point: Point, color: Rgba<u8>) -> FillRequest {
        let Some(background) = self.background.clone() else {
            return FillRequest::NoBackground;
        };
        let fit = FitRect::aspect_fit(background.width(), background.height(), self.width, self.height);
        let Some(pixel) = fit.to_image_pixel(point, background.width(), background.height()) else {
            return FillRequest::OutOfBounds;
        };
        let color = Rgba([color[0], color[1], color[2], 255]);
        if fill::already_filled(&background, pixel, color, self.fill_options.match_tolerance) {
            return FillRequest::AlreadyFilled;
        }

        if self.is_filling() {
            return match self.fill_policy {
                FillPolicy::Queue => {
                    self.fill_queue.push_back(QueuedFill { pixel, color });
                    FillRequest::Queued
                }
                FillPolicy::Reject => {
                    log::debug!("fill at {pixel:?} rejected, another fill is running");
                    FillRequest::Busy
                }
            };
        }

        self.spawn_fill(background, QueuedFill { pixel, color });
        FillRequest::Started
    }

    /// Apply a finished fill, if any, without blocking. Results are held back
    /// while a stroke is in progress. Returns true when the canvas changed.
    pub fn poll_fill(&mut self) -> bool {
        if self.stroke.is_some() {
            return false;
        }
        let mut changed = false;
        while let Some(result) = self.fill_worker.try_take() {
            changed |= self.apply_fill(result);
            self.start_next_fill();
        }
        changed
    }

    /// Block until every running and queued fill has been applied. An active
    /// stroke is ended first so the fill snapshot never splits it.
    pub fn wait_for_fill(&mut self) -> bool {
        self.end_stroke();
        let mut changed = false;
        loop {
            if let Some(result) = self.fill_worker.wait() {
                changed |= self.apply_fill(result);
            }
            self.start_next_fill();
            if !self.fill_worker.is_busy() {
                return changed;
            }
        }
    }

    fn spawn_fill(&mut self, source: Arc<RgbaImage>, request: QueuedFill) {
        let job = FillJob { source, start: request.pixel, color: request.color, revision: self.background_revision };
        self.fill_worker.spawn(job, self.fill_options);
    }

    fn start_next_fill(&mut self) {
        while !self.fill_worker.is_busy() {
            let Some(next) = self.fill_queue.pop_front() else { return };
            let Some(background) = self.background.clone() else {
                self.fill_queue.clear();
                return;
            };
            // An earlier fill may already have painted this spot
            if fill::already_filled(&background, next.pixel, next.color, self.fill_options.match_tolerance) {
                continue;
            }
            self.spawn_fill(background, next);
        }
    }

    fn apply_fill(&mut self, result: FillResult) -> bool {
        if result.revision != self.background_revision {
            log::debug!("discarding stale fill at {:?} (revision {})", result.start, result.revision);
            return false;
        }
        let Some(outcome) = result.outcome else { return false };
        if outcome.truncated {
            log::warn!(
                "fill at {:?} stopped at the {} pixel cap, result is partial",
                result.start,
                self.fill_options.pixel_cap
            );
        }
        log::info!("filled {} pixels in {:.1?}", outcome.filled, result.elapsed);

        self.history.push(self.snapshot());
        self.background = Some(Arc::new(outcome.image));
        self.background_revision += 1;
        self.refresh_display_background();
        self.mark_all_dirty();
        true
    }

    // --- Output ---

    /// Flatten paper, background and strokes into one opaque-backed image.
    pub fn export_composite(&self) -> RgbaImage {
        let mut out = RgbaImage::from_pixel(self.width, self.height, self.paper);

        if let Some((scaled, x, y)) = &self.display_background {
            imageops::overlay(&mut out, &**scaled, *x, *y);
        }

        let stride = self.width as usize * 4;
        let raw: &mut [u8] = &mut out;
        raw.par_chunks_mut(stride)
            .zip(self.strokes.as_raw().par_chunks(stride))
            .for_each(|(dst, src)| {
                for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
                    if s[3] == 0 {
                        continue;
                    }
                    let base = Rgba([d[0], d[1], d[2], d[3]]);
                    let top = Rgba([s[0], s[1], s[2], s[3]]);
                    d.copy_from_slice(&blend_pixel(base, top, BlendMode::Normal, 1.0).0);
                }
            });
        out
    }

    fn mark_dirty(&mut self, rect: PixelRect) {
        self.dirty = Some(self.dirty.map_or(rect, |d| d.union(rect)));
    }

    fn mark_all_dirty(&mut self) {
        self.dirty = Some(PixelRect::full(self.width, self.height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, TRANSPARENT, WHITE};

    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn drag(canvas: &mut RasterCanvas, points: &[Point]) {
        canvas.begin_stroke(points[0]);
        for p in &points[1..] {
            canvas.continue_stroke(*p);
        }
        canvas.end_stroke();
    }

    #[test]
    fn stroke_then_undo_restores_blank() {
        let mut canvas = RasterCanvas::new(64, 64);
        drag(&mut canvas, &[Point::new(10.0, 10.0), Point::new(50.0, 50.0)]);
        assert!(canvas.strokes().pixels().any(|p| p[3] > 0));
        assert!(canvas.undo());
        assert!(canvas.strokes().pixels().all(|p| *p == TRANSPARENT));
        assert!(!canvas.undo());
    }

    #[test]
    fn redo_reapplies_and_new_stroke_clears_it() {
        let mut canvas = RasterCanvas::new(64, 64);
        drag(&mut canvas, &[Point::new(10.0, 10.0), Point::new(50.0, 10.0)]);
        let drawn = canvas.strokes().clone();
        canvas.undo();
        assert!(canvas.redo());
        assert_eq!(canvas.strokes(), &drawn);

        canvas.undo();
        drag(&mut canvas, &[Point::new(10.0, 40.0), Point::new(50.0, 40.0)]);
        assert!(!canvas.can_redo());
    }

    #[test]
    fn continue_without_begin_is_noop() {
        let mut canvas = RasterCanvas::new(32, 32);
        canvas.take_redraw();
        canvas.continue_stroke(Point::new(5.0, 5.0));
        assert!(canvas.take_redraw().is_none());
        assert!(canvas.strokes().pixels().all(|p| p[3] == 0));
        assert_eq!(canvas.undo_depth(), 0);
    }

    #[test]
    fn undo_and_clear_ignored_mid_stroke() {
        let mut canvas = RasterCanvas::new(32, 32);
        canvas.begin_stroke(Point::new(4.0, 4.0));
        canvas.continue_stroke(Point::new(20.0, 4.0));
        assert!(!canvas.undo());
        assert!(!canvas.clear());
        assert!(canvas.strokes().pixels().any(|p| p[3] > 0));
        canvas.end_stroke();
        assert!(canvas.clear());
        assert!(canvas.strokes().pixels().all(|p| p[3] == 0));
        assert!(canvas.undo());
        assert!(canvas.strokes().pixels().any(|p| p[3] > 0));
    }

    #[test]
    fn width_is_clamped() {
        let mut canvas = RasterCanvas::new(8, 8);
        canvas.set_brush(BrushType::Square, BLACK, 0.2);
        assert_eq!(canvas.brush().width, 1.0);
        canvas.set_brush(BrushType::Square, BLACK, f32::NAN);
        assert_eq!(canvas.brush().width, 1.0);
    }

    #[test]
    fn fill_status_values() {
        let mut canvas = RasterCanvas::new(100, 50);
        assert_eq!(canvas.fill(Point::new(10.0, 10.0), BLUE), FillRequest::NoBackground);

        // 50x50 page letterboxed into 100x50: x in [25, 75)
        canvas.set_background_image(RgbaImage::from_pixel(50, 50, WHITE));
        assert_eq!(canvas.fill(Point::new(10.0, 10.0), BLUE), FillRequest::OutOfBounds);
        assert_eq!(canvas.fill(Point::new(30.0, 10.0), WHITE), FillRequest::AlreadyFilled);
        assert_eq!(canvas.fill(Point::new(30.0, 10.0), BLUE), FillRequest::Started);
        assert!(canvas.wait_for_fill());
        assert_eq!(*canvas.background().unwrap().get_pixel(0, 0), BLUE);
        assert!(!canvas.is_filling());
    }

    #[test]
    fn fill_is_undoable() {
        let mut canvas = RasterCanvas::new(40, 40);
        let page = RgbaImage::from_pixel(40, 40, WHITE);
        canvas.set_background_image(page.clone());
        canvas.fill(Point::new(5.0, 5.0), BLUE);
        canvas.wait_for_fill();
        assert_eq!(canvas.undo_depth(), 1);
        assert!(canvas.undo());
        assert_eq!(canvas.background(), Some(&page));
    }

    #[test]
    fn queued_fills_run_in_order() {
        let mut canvas = RasterCanvas::new(40, 20);
        // Two separate regions split by a black column
        let page = RgbaImage::from_fn(40, 20, |x, _| if x == 20 { BLACK } else { WHITE });
        canvas.set_background_image(page);
        assert_eq!(canvas.fill(Point::new(5.0, 5.0), BLUE), FillRequest::Started);
        let second = canvas.fill(Point::new(30.0, 5.0), Rgba([255, 0, 0, 255]));
        assert!(matches!(second, FillRequest::Queued | FillRequest::Started));
        canvas.wait_for_fill();
        let bg = canvas.background().unwrap();
        assert_eq!(*bg.get_pixel(5, 5), BLUE);
        assert_eq!(*bg.get_pixel(30, 5), Rgba([255, 0, 0, 255]));
        assert_eq!(*bg.get_pixel(20, 5), BLACK);
        assert_eq!(canvas.undo_depth(), 2);
    }

    #[test]
    fn reject_policy_reports_busy() {
        let settings = CanvasSettings { fill_policy: FillPolicy::Reject, ..CanvasSettings::default() };
        let mut canvas = RasterCanvas::with_settings(40, 40, &settings);
        canvas.set_background_image(RgbaImage::from_pixel(40, 40, WHITE));
        assert_eq!(canvas.fill(Point::new(5.0, 5.0), BLUE), FillRequest::Started);
        // Still in flight until applied on this thread
        assert_eq!(canvas.fill(Point::new(6.0, 6.0), Rgba([0, 255, 0, 255])), FillRequest::Busy);
        canvas.wait_for_fill();
        assert_eq!(*canvas.background().unwrap().get_pixel(6, 6), BLUE);
    }

    #[test]
    fn replacing_background_discards_pending_fill() {
        let mut canvas = RasterCanvas::new(40, 40);
        canvas.set_background_image(RgbaImage::from_pixel(40, 40, WHITE));
        canvas.fill(Point::new(5.0, 5.0), BLUE);
        let fresh = RgbaImage::from_pixel(40, 40, Rgba([200, 200, 200, 255]));
        canvas.set_background_image(fresh.clone());
        assert!(!canvas.wait_for_fill());
        assert_eq!(canvas.background(), Some(&fresh));
        assert_eq!(canvas.undo_depth(), 0);
    }

    #[test]
    fn composite_layers_paper_background_strokes() {
        let mut canvas = RasterCanvas::new(40, 20);
        canvas.set_background_image(RgbaImage::from_pixel(10, 10, Rgba([0, 255, 0, 255])));
        canvas.set_brush(BrushType::Normal, BLACK, 2.0);
        drag(&mut canvas, &[Point::new(2.0, 10.0), Point::new(38.0, 10.0)]);

        let out = canvas.export_composite();
        // Background fills x in [10, 30)
        assert_eq!(*out.get_pixel(2, 2), WHITE);
        assert_eq!(*out.get_pixel(20, 2), Rgba([0, 255, 0, 255]));
        assert_eq!(*out.get_pixel(20, 10), BLACK);
        assert_eq!(*out.get_pixel(5, 10), BLACK);
        // Export leaves the canvas untouched
        assert_eq!(canvas.export_composite(), out);
    }

    #[test]
    fn resize_reallocates_and_drops_history() {
        let mut canvas = RasterCanvas::new(30, 30);
        drag(&mut canvas, &[Point::new(1.0, 1.0), Point::new(20.0, 20.0)]);
        canvas.resize(50, 40);
        assert_eq!(canvas.strokes().dimensions(), (50, 40));
        assert!(!canvas.can_undo());
        assert_eq!(canvas.take_redraw(), Some(PixelRect::full(50, 40)));
        assert!(canvas.take_redraw().is_none());
    }

    #[test]
    fn resize_keeps_running_fill() {
        let mut canvas = RasterCanvas::new(100, 100);
        canvas.set_background_image(RgbaImage::from_pixel(100, 100, WHITE));
        assert_eq!(canvas.fill(Point::new(50.0, 50.0), BLUE), FillRequest::Started);
        canvas.resize(200, 100);
        assert!(canvas.wait_for_fill());
        assert_eq!(*canvas.background().unwrap().get_pixel(50, 50), BLUE);
        // Page now sits at x in [50, 150)
        assert_eq!(*canvas.export_composite().get_pixel(100, 50), BLUE);
        assert_eq!(canvas.undo_depth(), 1);
    }

    #[test]
    fn wait_for_fill_ends_active_stroke() {
        let mut canvas = RasterCanvas::new(40, 40);
        canvas.set_background_image(RgbaImage::from_pixel(40, 40, WHITE));
        canvas.begin_stroke(Point::new(4.0, 30.0));
        canvas.continue_stroke(Point::new(30.0, 30.0));
        assert_eq!(canvas.fill(Point::new(5.0, 5.0), BLUE), FillRequest::Started);
        assert!(canvas.wait_for_fill());
        assert!(!canvas.is_stroking());
        assert_eq!(*canvas.background().unwrap().get_pixel(5, 5), BLUE);
        // Stroke snapshot, then fill snapshot
        assert_eq!(canvas.undo_depth(), 2);
        canvas.continue_stroke(Point::new(30.0, 4.0));
        assert!(canvas.undo());
        assert_eq!(*canvas.background().unwrap().get_pixel(5, 5), WHITE);
        assert!(canvas.strokes().pixels().any(|p| p[3] > 0));
    }

    #[test]
    fn scaled_background_follows_resize() {
        let green = Rgba([0, 255, 0, 255]);
        let mut canvas = RasterCanvas::new(40, 20);
        canvas.set_background_image(RgbaImage::from_pixel(10, 10, green));
        assert_eq!(*canvas.export_composite().get_pixel(35, 5), WHITE);

        // 10x10 page in 80x20: drawn 20 px wide at x in [30, 50)
        canvas.resize(80, 20);
        let out = canvas.export_composite();
        assert_eq!(out.dimensions(), (80, 20));
        assert_eq!(*out.get_pixel(35, 5), green);
        assert_eq!(*out.get_pixel(20, 5), WHITE);
        assert_eq!(*out.get_pixel(55, 5), WHITE);

        canvas.clear_background_image();
        assert!(canvas.export_composite().pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn rainbow_hue_persists_across_strokes() {
        let mut canvas = RasterCanvas::new(64, 64);
        canvas.set_brush(BrushType::Rainbow, BLACK, 4.0);
        drag(&mut canvas, &[Point::new(5.0, 5.0), Point::new(20.0, 5.0), Point::new(40.0, 5.0)]);
        let after_first = canvas.hue();
        drag(&mut canvas, &[Point::new(5.0, 30.0), Point::new(20.0, 30.0)]);
        assert!((after_first - 0.04).abs() < 1e-5);
        assert!((canvas.hue() - 0.06).abs() < 1e-5);
    }
}
