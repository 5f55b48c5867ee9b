use image::Rgba;

use crate::error::DoodleError;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// How a brush dab combines with what is already in the stroke buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Normal,
    /// Overlaps darken, the way a real highlighter does.
    Multiply,
}

/// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
pub fn parse_hex(s: &str) -> Result<Rgba<u8>, DoodleError> {
    let hex = s.trim().trim_start_matches('#');
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .ok_or_else(|| DoodleError::InvalidColor(s.to_string()))
    };
    match hex.len() {
        6 => Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, 255])),
        8 => Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, channel(6)?])),
        _ => Err(DoodleError::InvalidColor(s.to_string())),
    }
}

pub fn to_hex(c: Rgba<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}{:02x}", c[0], c[1], c[2], c[3])
}

/// HSV (all components 0..=1) to 8-bit RGB.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [u8; 3] {
    let h = h.rem_euclid(1.0) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match sector as u32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [unit_to_u8(r), unit_to_u8(g), unit_to_u8(b)]
}

/// True when every RGB channel differs by at most `tolerance`. Alpha is ignored.
#[inline]
pub fn rgb_within(a: Rgba<u8>, b: Rgba<u8>, tolerance: u8) -> bool {
    a[0].abs_diff(b[0]) <= tolerance
        && a[1].abs_diff(b[1]) <= tolerance
        && a[2].abs_diff(b[2]) <= tolerance
}

/// Same colour with alpha scaled by `factor` (0..=1).
pub fn with_alpha_factor(c: Rgba<u8>, factor: f32) -> Rgba<u8> {
    Rgba([c[0], c[1], c[2], unit_to_u8(c[3] as f32 / 255.0 * factor)])
}

#[inline]
fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

/// Composite `top` over `base` with separable blend `mode`, `opacity`
/// scaling the top alpha. Straight (non-premultiplied) alpha in and out.
pub fn blend_pixel(base: Rgba<u8>, top: Rgba<u8>, mode: BlendMode, opacity: f32) -> Rgba<u8> {
    // Fast path: nothing to add
    if top[3] == 0 || opacity <= 0.0 {
        return base;
    }
    // Fast path: opaque normal paint just overwrites
    if mode == BlendMode::Normal && opacity >= 1.0 && top[3] == 255 {
        return top;
    }

    let opacity = opacity.clamp(0.0, 1.0);
    let base_a = base[3] as f32 / 255.0;
    let top_a = top[3] as f32 / 255.0 * opacity;

    let out_a = top_a + base_a * (1.0 - top_a);
    if out_a <= 0.0 {
        return TRANSPARENT;
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let cb = base[i] as f32 / 255.0;
        let cs = top[i] as f32 / 255.0;
        let mixed = match mode {
            BlendMode::Normal => cs,
            BlendMode::Multiply => cb * cs,
        };
        // Over an empty backdrop the blend degenerates to the source colour
        let cr = (1.0 - base_a) * cs + base_a * mixed;
        let premul = top_a * cr + base_a * (1.0 - top_a) * cb;
        out[i] = unit_to_u8(premul / out_a);
    }
    out[3] = unit_to_u8(out_a);
    Rgba(out)
}
