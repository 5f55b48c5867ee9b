//! DoodlePad: a colouring-book drawing engine.
//!
//! [`RasterCanvas`] holds an optional background page shown aspect-fit, a
//! transparent stroke buffer on top of it and a bounded undo history. Brush
//! strokes are rasterized segment by segment; bucket fills run on a rayon
//! worker and are applied back on the calling thread.

pub mod app;
pub mod brush;
pub mod canvas;
pub mod cli;
pub mod color;
pub mod error;
pub mod fill;
pub mod geometry;
pub mod history;
pub mod io;
pub mod logger;
pub mod settings;

pub use brush::{BrushConfig, BrushType};
pub use canvas::{FillRequest, RasterCanvas};
pub use error::{DoodleError, Result};
pub use fill::{FillOptions, FillPolicy};
pub use geometry::Point;
pub use settings::CanvasSettings;
