use std::path::PathBuf;

use image::Rgba;

use crate::color;
use crate::error::Result;
use crate::fill::{DEFAULT_MATCH_TOLERANCE, DEFAULT_PIXEL_CAP, DEFAULT_REGION_TOLERANCE, FillOptions, FillPolicy};

/// Canvas behaviour that persists across sessions
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasSettings {
    /// Maximum number of undo steps
    pub undo_limit: usize,
    /// Per-channel distance under which a tapped pixel counts as already filled
    pub fill_match_tolerance: u8,
    /// Per-channel distance under which a pixel joins the filled region
    pub fill_region_tolerance: u8,
    /// Pixels a single fill may visit before it stops
    pub fill_pixel_cap: usize,
    pub fill_policy: FillPolicy,
    /// Hue advance per rainbow segment, as a fraction of the colour wheel
    pub rainbow_hue_step: f32,
    pub default_brush_width: f32,
    /// Colour under everything in the exported composite
    pub paper_color: Rgba<u8>,
    /// Headless canvas size (the desktop host sizes the canvas to its window)
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            undo_limit: 30,
            fill_match_tolerance: DEFAULT_MATCH_TOLERANCE,
            fill_region_tolerance: DEFAULT_REGION_TOLERANCE,
            fill_pixel_cap: DEFAULT_PIXEL_CAP,
            fill_policy: FillPolicy::Queue,
            rainbow_hue_step: 0.02,
            default_brush_width: 8.0,
            paper_color: color::WHITE,
            canvas_width: 800,
            canvas_height: 600,
        }
    }
}

impl CanvasSettings {
    /// Path to the settings file.
    /// On Linux:   ~/.config/doodlepad/doodlepad_settings.cfg  (XDG_CONFIG_HOME respected)
    /// On Windows: %APPDATA%\DoodlePad\doodlepad_settings.cfg
    /// On macOS:   ~/Library/Application Support/DoodlePad/doodlepad_settings.cfg
    pub fn settings_path() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            let appdata = std::env::var("APPDATA").or_else(|_| std::env::var("USERPROFILE")).ok()?;
            Some(PathBuf::from(appdata).join("DoodlePad").join("doodlepad_settings.cfg"))
        }
        #[cfg(target_os = "macos")]
        {
            let home = std::env::var("HOME").ok()?;
            Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("DoodlePad")
                    .join("doodlepad_settings.cfg"),
            )
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            let config_dir = std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .or_else(|_| std::env::var("HOME").map(|home| PathBuf::from(home).join(".config")))
                .ok()?;
            Some(config_dir.join("doodlepad").join("doodlepad_settings.cfg"))
        }
    }

    pub fn fill_options(&self) -> FillOptions {
        FillOptions {
            match_tolerance: self.fill_match_tolerance,
            region_tolerance: self.fill_region_tolerance,
            pixel_cap: self.fill_pixel_cap,
        }
    }

    /// Load settings from disk (defaults if the file is missing)
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else { return Self::default() };
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                log::debug!("loaded settings from {}", path.display());
                Self::parse(&content)
            }
            Err(_) => Self::default(),
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::settings_path() else { return Ok(()) };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.to_config())?;
        log::info!("settings saved to {}", path.display());
        Ok(())
    }

    pub fn to_config(&self) -> String {
        format!(
            "undo_limit={}\n\
             fill_match_tolerance={}\n\
             fill_region_tolerance={}\n\
             fill_pixel_cap={}\n\
             fill_policy={}\n\
             rainbow_hue_step={}\n\
             default_brush_width={}\n\
             paper_color={}\n\
             canvas_width={}\n\
             canvas_height={}\n",
            self.undo_limit,
            self.fill_match_tolerance,
            self.fill_region_tolerance,
            self.fill_pixel_cap,
            self.fill_policy.key(),
            self.rainbow_hue_step,
            self.default_brush_width,
            color::to_hex(self.paper_color),
            self.canvas_width,
            self.canvas_height,
        )
    }

    /// Parse `key=value` lines. Unknown keys and bad values keep the default.
    pub fn parse(content: &str) -> Self {
        let mut s = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                log::warn!("settings: ignoring malformed line '{line}'");
                continue;
            };
            let key = key.trim();
            let val = val.trim();
            let ok = match key {
                "undo_limit" => set(&mut s.undo_limit, val.parse().ok().filter(|&n: &usize| n > 0)),
                "fill_match_tolerance" => set(&mut s.fill_match_tolerance, val.parse().ok()),
                "fill_region_tolerance" => set(&mut s.fill_region_tolerance, val.parse().ok()),
                "fill_pixel_cap" => set(&mut s.fill_pixel_cap, val.parse().ok().filter(|&n: &usize| n > 0)),
                "fill_policy" => set(
                    &mut s.fill_policy,
                    match val {
                        "queue" => Some(FillPolicy::Queue),
                        "reject" => Some(FillPolicy::Reject),
                        _ => None,
                    },
                ),
                "rainbow_hue_step" => set(&mut s.rainbow_hue_step, val.parse().ok().filter(|v: &f32| v.is_finite())),
                "default_brush_width" => {
                    set(&mut s.default_brush_width, val.parse().ok().filter(|&v: &f32| v.is_finite() && v >= 1.0))
                }
                "paper_color" => set(&mut s.paper_color, color::parse_hex(val).ok()),
                "canvas_width" => set(&mut s.canvas_width, val.parse().ok().filter(|&n: &u32| n > 0)),
                "canvas_height" => set(&mut s.canvas_height, val.parse().ok().filter(|&n: &u32| n > 0)),
                _ => {
                    log::warn!("settings: unknown key '{key}'");
                    true
                }
            };
            if !ok {
                log::warn!("settings: bad value '{val}' for '{key}', keeping default");
            }
        }
        s
    }
}

fn set<T>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(v) => {
            *slot = v;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_known_keys() {
        let s = CanvasSettings::parse(
            "undo_limit=5\nfill_policy=reject\npaper_color=#102030\nrainbow_hue_step=0.1\ncanvas_width=320\n",
        );
        assert_eq!(s.undo_limit, 5);
        assert_eq!(s.fill_policy, FillPolicy::Reject);
        assert_eq!(s.paper_color, Rgba([0x10, 0x20, 0x30, 255]));
        assert!((s.rainbow_hue_step - 0.1).abs() < 1e-6);
        assert_eq!(s.canvas_width, 320);
        assert_eq!(s.canvas_height, 600);
    }

    #[test]
    fn bad_values_keep_defaults() {
        let s = CanvasSettings::parse("undo_limit=0\nfill_region_tolerance=300\nfill_policy=maybe\nnonsense\nshiny=yes\n");
        assert_eq!(s, CanvasSettings::default());
    }

    #[test]
    fn config_text_parses_back() {
        let s = CanvasSettings {
            undo_limit: 12,
            fill_pixel_cap: 9_000,
            fill_policy: FillPolicy::Reject,
            paper_color: Rgba([1, 2, 3, 4]),
            ..CanvasSettings::default()
        };
        assert_eq!(CanvasSettings::parse(&s.to_config()), s);
    }

    #[test]
    fn fill_options_follow_settings() {
        let s = CanvasSettings { fill_region_tolerance: 5, ..CanvasSettings::default() };
        let options = s.fill_options();
        assert_eq!(options.region_tolerance, 5);
        assert_eq!(options.match_tolerance, DEFAULT_MATCH_TOLERANCE);
    }
}
