use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Sprite size in pixels. Half-block rendering packs two pixel rows per cell,
/// so this fills 20 columns by 8 rows on a card.
pub const SPRITE_MAX_WIDTH: u32 = 20;
pub const SPRITE_MAX_HEIGHT: u32 = 16;

const ALPHA_CUTOFF: u8 = 128;

/// A decoded sprite, cropped to its visible pixels and scaled for a card.
/// Transparent pixels are `None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteArt {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Option<[u8; 3]>>,
}

impl SpriteArt {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get((y * self.width + x) as usize)
            .copied()
            .flatten()
    }

    /// Terminal rows needed to draw the sprite with half blocks.
    pub fn cell_rows(&self) -> u32 {
        self.height.div_ceil(2)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SpriteError {
    #[error("could not decode sprite: {0}")]
    Decode(#[from] image::ImageError),
    #[error("sprite has no visible pixels")]
    Empty,
}

pub fn decode_sprite(bytes: &[u8]) -> Result<SpriteArt, SpriteError> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    let (x, y, width, height) = opaque_bounds(&image).ok_or(SpriteError::Empty)?;
    let cropped = imageops::crop_imm(&image, x, y, width, height).to_image();
    let (target_w, target_h) = fit_within(width, height, SPRITE_MAX_WIDTH, SPRITE_MAX_HEIGHT);
    let scaled = imageops::resize(&cropped, target_w, target_h, FilterType::Nearest);

    let pixels = scaled
        .pixels()
        .map(|pixel| {
            let [r, g, b, a] = pixel.0;
            (a >= ALPHA_CUTOFF).then_some([r, g, b])
        })
        .collect();

    Ok(SpriteArt {
        width: target_w,
        height: target_h,
        pixels,
    })
}

/// Bounding box `(x, y, width, height)` of pixels above the alpha cutoff.
fn opaque_bounds(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0[3] < ALPHA_CUTOFF {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }
    bounds.map(|(min_x, min_y, max_x, max_y)| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

fn fit_within(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    let scale = (max_w as f32 / width as f32)
        .min(max_h as f32 / height as f32)
        .min(1.0);
    let w = ((width as f32 * scale).round() as u32).clamp(1, max_w);
    let h = ((height as f32 * scale).round() as u32).clamp(1, max_h);
    (w, h)
}
