use std::f64::consts::{PI, TAU};

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::blend;
use crate::config::{Color, ConfigError, GaugeConfig};

/// Fonts used by the draw routine, parsed once at construction.
pub(crate) struct Fonts {
    value: Font<'static>,
    label: Font<'static>,
}

impl Fonts {
    pub(crate) fn load(config: &GaugeConfig) -> Result<Self, ConfigError> {
        let value =
            Font::try_from_vec(config.value_font_data.to_vec()).ok_or(ConfigError::InvalidFont)?;
        let label =
            Font::try_from_vec(config.label_font_data.to_vec()).ok_or(ConfigError::InvalidFont)?;
        Ok(Self { value, label })
    }
}

/// A borrowed RGBA framebuffer.
pub(crate) struct Surface<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Surface<'a> {
    pub(crate) fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        debug_assert!(frame.len() >= width * height * 4);
        Self {
            frame,
            width,
            height,
        }
    }

    fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    /// Source-over blend of `color` at `alpha` into one pixel.
    fn blend_px(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let a = alpha.clamp(0.0, 1.0);
        let px = &mut self.frame[idx..idx + 4];
        px[0] = (color.r as f32 * a + px[0] as f32 * (1.0 - a)).round() as u8;
        px[1] = (color.g as f32 * a + px[1] as f32 * (1.0 - a)).round() as u8;
        px[2] = (color.b as f32 * a + px[2] as f32 * (1.0 - a)).round() as u8;
        px[3] = 0xff;
    }
}

/// Arc placement derived from the surface dimensions. The radius tracks the
/// smaller dimension so the gauge always fits.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ArcGeometry {
    cx: f64,
    cy: f64,
    radius: f64,
    stroke: f64,
}

impl ArcGeometry {
    fn new(width: usize, height: usize) -> Self {
        let w = width as f64;
        let h = height as f64;
        let radius = if w < h { w * 0.35 } else { h * 0.4 };
        Self {
            cx: w / 2.0,
            cy: h * 0.65,
            radius,
            stroke: radius * 0.45,
        }
    }
}

/// Paint the full gauge frame at the given (already clamped) value.
pub(crate) fn paint(surface: &mut Surface, config: &GaugeConfig, fonts: &Fonts, value: f64) {
    let geo = ArcGeometry::new(surface.width, surface.height);
    surface.clear(Color::WHITE);

    // Background: the full semicircle.
    stroke_arc(surface, geo, PI, TAU, config.background_color, 1.0);

    // Foreground: sweep from 9 o'clock to the value's position.
    let value_pct = (value - config.min) / (config.max - config.min);
    let end_angle = (1.0 + value_pct) * PI;
    if value > config.min {
        // Blending is skipped entirely at value == min (empty sweep).
        match if config.continuous_color {
            blend::blend_at(&config.bands, value)
        } else {
            None
        } {
            Some(layers) => {
                // White primer, then both band colors at their weights; the
                // per-pixel source-over blend does the mixing.
                stroke_arc(surface, geo, PI, end_angle, Color::WHITE, 1.0);
                stroke_arc(surface, geo, PI, end_angle, layers.first, layers.first_alpha as f32);
                stroke_arc(
                    surface,
                    geo,
                    PI,
                    end_angle,
                    layers.second,
                    layers.second_alpha as f32,
                );
            }
            None => stroke_arc(surface, geo, PI, end_angle, Color::RED, 1.0),
        }
    }

    // Value readout at the arc center, range and description labels below.
    let value_scale = Scale::uniform((geo.radius * 0.3) as f32);
    draw_text_centered(
        surface,
        geo.cx as i32,
        geo.cy as i32,
        &format!("{value}"),
        &fonts.value,
        value_scale,
        config.value_text_color,
    );

    let label_scale = Scale::uniform((geo.radius * 0.1) as f32);
    let label_y = (surface.height as f64 * 0.75) as i32;
    for (x, text) in [
        ((geo.cx - geo.radius) as i32, format!("{}", config.min)),
        ((geo.cx + geo.radius) as i32, format!("{}", config.max)),
        (geo.cx as i32, config.desc.clone()),
    ] {
        draw_text_centered(
            surface,
            x,
            label_y,
            &text,
            &fonts.label,
            label_scale,
            config.desc_text_color,
        );
    }
}

/// Stroke an arc of the given centerline radius and stroke width between two
/// angles (radians, y-down, normalized to `(0, 2π]`; no wrap-around). Edges
/// get a one-pixel radial feather.
fn stroke_arc(
    surface: &mut Surface,
    geo: ArcGeometry,
    start_angle: f64,
    end_angle: f64,
    color: Color,
    alpha: f32,
) {
    if end_angle <= start_angle || alpha <= 0.0 {
        return;
    }
    let half = geo.stroke / 2.0;
    let r_out = geo.radius + half;
    let r_in = (geo.radius - half).max(0.0);

    let min_x = ((geo.cx - r_out).floor() as i32 - 1).max(0);
    let max_x = ((geo.cx + r_out).ceil() as i32 + 1).min(surface.width as i32 - 1);
    let min_y = ((geo.cy - r_out).floor() as i32 - 1).max(0);
    let max_y = ((geo.cy + r_out).ceil() as i32 + 1).min(surface.height as i32 - 1);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f64 - geo.cx;
            let dy = y as f64 - geo.cy;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist < r_in - 1.0 || dist > r_out + 1.0 {
                continue;
            }
            let mut angle = dy.atan2(dx);
            if angle <= 0.0 {
                angle += TAU;
            }
            if angle < start_angle || angle > end_angle {
                continue;
            }
            let coverage = if dist > r_out {
                1.0 - (dist - r_out).min(1.0)
            } else if dist < r_in {
                1.0 - (r_in - dist).min(1.0)
            } else {
                1.0
            };
            let a = coverage as f32 * alpha;
            if a > 0.003 {
                surface.blend_px(x, y, color, a);
            }
        }
    }
}

fn draw_text_centered(
    surface: &mut Surface,
    x: i32,
    y: i32,
    text: &str,
    font: &Font,
    scale: Scale,
    color: Color,
) {
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();
    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    let width_px = if min_x < max_x { max_x - min_x } else { 0 };
    let height_px = if min_y < max_y { max_y - min_y } else { 0 };
    let offset_x = x - width_px / 2;
    let offset_y = y - height_px / 2;
    for glyph in glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                surface.blend_px(px, py, color, v);
            });
        }
    }
}
