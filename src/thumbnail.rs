use std::fs;
use std::path::Path;

use fontdue::{Font, FontSettings};
use image::imageops::{self, FilterType};
use image::{GrayImage, ImageFormat, Luma, RgbaImage};
use tracing::{debug, info};

use crate::config::{TextStyle, ThumbnailConfig, parse_color};
use crate::error::{Error, Result};
use crate::title::TitleCard;

pub trait Thumbnailer: Send + Sync {
    fn render(&self, title: &str, dest: &Path) -> Result<()>;
}

/// Draws the episode tag and caption over the configured background image.
#[derive(Debug, Clone)]
pub struct TitleCardRenderer {
    config: ThumbnailConfig,
}

impl TitleCardRenderer {
    pub fn new(config: ThumbnailConfig) -> Self {
        Self { config }
    }
}

impl Thumbnailer for TitleCardRenderer {
    fn render(&self, title: &str, dest: &Path) -> Result<()> {
        info!("Rendering thumbnail...");
        let cfg = &self.config;
        let card = TitleCard::from_title(title, &cfg.special_label);
        debug!("Title card: tag={:?} caption={:?}", card.tag, card.caption);

        let fill = parse_color(&cfg.fill_color)?;
        let stroke = parse_color(&cfg.stroke_color)?;
        let font = load_font(&cfg.font)?;

        let mut canvas = image::open(&cfg.background)
            .map_err(|source| Error::Background {
                path: cfg.background.clone(),
                source,
            })?
            .to_rgba8();
        let (width, height) = canvas.dimensions();
        let max_caption_width = width.saturating_sub(2 * cfg.margin_x) as usize;
        let x = cfg.margin_x as i32;

        let pen = Pen { fill, stroke };
        pen.draw(&mut canvas, &font, &card.tag, &cfg.tag, x, height, None);
        pen.draw(
            &mut canvas,
            &font,
            &card.caption,
            &cfg.caption,
            x,
            height,
            Some(max_caption_width),
        );

        canvas.save_with_format(dest, ImageFormat::Png)?;
        info!("Thumbnail written to {}", dest.display());
        Ok(())
    }
}

fn load_font(path: &Path) -> Result<Font> {
    let bytes = fs::read(path).map_err(|source| Error::Asset {
        path: path.to_path_buf(),
        source,
    })?;
    Font::from_bytes(bytes, FontSettings::default()).map_err(|reason| Error::Font {
        path: path.to_path_buf(),
        reason,
    })
}

struct Pen {
    fill: [u8; 3],
    stroke: [u8; 3],
}

impl Pen {
    /// Stroke then fill `text` with its baseline `style.baseline_from_bottom` above the bottom edge.
    #[allow(clippy::too_many_arguments)]
    fn draw(
        &self,
        canvas: &mut RgbaImage,
        font: &Font,
        text: &str,
        style: &TextStyle,
        x: i32,
        image_height: u32,
        max_width: Option<usize>,
    ) {
        let mut mask = TextMask::rasterize(font, text, style.size);
        if let Some(max_width) = max_width {
            mask = mask.condense(max_width);
        }
        let baseline = image_height as i32 - style.baseline_from_bottom as i32;

        let radius = (style.stroke_width / 2) as usize;
        if radius > 0 {
            composite(canvas, &mask.outline(radius), x, baseline, self.stroke);
        }
        composite(canvas, &mask, x, baseline, self.fill);
    }
}

/// Coverage bitmap for one line of text.
#[derive(Debug, Clone, PartialEq)]
struct TextMask {
    width: usize,
    height: usize,
    /// Column of the pen start.
    origin_x: usize,
    /// Row of the baseline.
    baseline: usize,
    /// Distance the pen travels, which is what a max width is measured against.
    advance: f32,
    data: Vec<u8>,
}

impl TextMask {
    fn rasterize(font: &Font, text: &str, px: f32) -> Self {
        let (ascent, descent) = font
            .horizontal_line_metrics(px)
            .map(|m| (m.ascent, m.descent))
            .unwrap_or((px * 0.8, -px * 0.2));
        let line_baseline = ascent.ceil() as i32;

        let mut placed = Vec::new();
        let mut pen = 0.0f32;
        let mut prev = None;
        for c in text.chars() {
            if let Some(p) = prev {
                pen += font.horizontal_kern(p, c, px).unwrap_or(0.0);
            }
            let (metrics, bitmap) = font.rasterize(c, px);
            let left = (pen + metrics.xmin as f32).round() as i32;
            let top = line_baseline - metrics.ymin - metrics.height as i32;
            placed.push((left, top, metrics.width, metrics.height, bitmap));
            pen += metrics.advance_width;
            prev = Some(c);
        }

        // Union of the line box and every glyph box.
        let mut min_x = 0;
        let mut min_y = 0;
        let mut max_x = pen.ceil() as i32;
        let mut max_y = (ascent - descent).ceil() as i32;
        for (left, top, w, h, _) in &placed {
            min_x = min_x.min(*left);
            min_y = min_y.min(*top);
            max_x = max_x.max(left + *w as i32);
            max_y = max_y.max(top + *h as i32);
        }

        let width = (max_x - min_x).max(1) as usize;
        let height = (max_y - min_y).max(1) as usize;
        let mut data = vec![0u8; width * height];
        for (left, top, w, h, bitmap) in placed {
            let ox = (left - min_x) as usize;
            let oy = (top - min_y) as usize;
            for row in 0..h {
                for col in 0..w {
                    let idx = (oy + row) * width + ox + col;
                    data[idx] = data[idx].max(bitmap[row * w + col]);
                }
            }
        }

        TextMask {
            width,
            height,
            origin_x: (-min_x) as usize,
            baseline: (line_baseline - min_y) as usize,
            advance: pen,
            data,
        }
    }

    /// Squeeze horizontally so the advance fits in `max_width`.
    fn condense(self, max_width: usize) -> Self {
        if self.advance <= max_width as f32 || self.advance <= 0.0 {
            return self;
        }
        let factor = max_width as f32 / self.advance;
        let new_width = ((self.width as f32 * factor).round() as usize).max(1);
        debug!("Condensing text from {:.0}px to {}px", self.advance, max_width);

        let gray = GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            Luma([self.data[y as usize * self.width + x as usize]])
        });
        let resized = imageops::resize(&gray, new_width as u32, self.height as u32, FilterType::Triangle);

        TextMask {
            width: new_width,
            height: self.height,
            origin_x: (self.origin_x as f32 * factor).round() as usize,
            baseline: self.baseline,
            advance: max_width as f32,
            data: resized.into_raw(),
        }
    }

    /// Grow the coverage by `radius` pixels in every direction.
    ///
    /// Alternates square and cross steps, which approximates a round pen.
    fn outline(&self, radius: usize) -> Self {
        let width = self.width + 2 * radius;
        let height = self.height + 2 * radius;
        let mut data = vec![0u8; width * height];
        for row in 0..self.height {
            let src = &self.data[row * self.width..(row + 1) * self.width];
            let start = (row + radius) * width + radius;
            data[start..start + self.width].copy_from_slice(src);
        }

        for step in 0..radius {
            data = dilate_step(&data, width, height, step % 2 == 1);
        }

        TextMask {
            width,
            height,
            origin_x: self.origin_x + radius,
            baseline: self.baseline + radius,
            advance: self.advance,
            data,
        }
    }
}

fn dilate_step(src: &[u8], width: usize, height: usize, cross: bool) -> Vec<u8> {
    let mut dst = vec![0u8; src.len()];
    for y in 0..height {
        for x in 0..width {
            let mut v = src[y * width + x];
            for dy in -1i32..=1 {
                for dx in -1i32..=1 {
                    if cross && dx != 0 && dy != 0 {
                        continue;
                    }
                    let nx = x as i32 + dx;
                    let ny = y as i32 + dy;
                    if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                        continue;
                    }
                    v = v.max(src[ny as usize * width + nx as usize]);
                }
            }
            dst[y * width + x] = v;
        }
    }
    dst
}

/// Blend `mask` in `color` onto `canvas`, pen start at `x` and baseline at `baseline`.
fn composite(canvas: &mut RgbaImage, mask: &TextMask, x: i32, baseline: i32, color: [u8; 3]) {
    let (cw, ch) = canvas.dimensions();
    let left = x - mask.origin_x as i32;
    let top = baseline - mask.baseline as i32;

    for row in 0..mask.height {
        let py = top + row as i32;
        if py < 0 || py >= ch as i32 {
            continue;
        }
        for col in 0..mask.width {
            let px = left + col as i32;
            if px < 0 || px >= cw as i32 {
                continue;
            }
            let coverage = mask.data[row * mask.width + col];
            if coverage == 0 {
                continue;
            }
            let pixel = canvas.get_pixel_mut(px as u32, py as u32);
            let alpha = u16::from(coverage);
            let inv_alpha = 255 - alpha;
            for channel in 0..3 {
                let dst = u16::from(pixel[channel]);
                let src = u16::from(color[channel]);
                pixel[channel] = ((src * alpha + dst * inv_alpha + 127) / 255) as u8;
            }
            let dst_a = u16::from(pixel[3]);
            pixel[3] = (dst_a + ((255 - dst_a) * alpha + 127) / 255) as u8;
        }
    }
}
