//! Image preprocessing: raster bytes to a fixed-resolution binary mask.

use image::imageops::{self, FilterType};
use image::GrayImage;

use crate::error::Result;
use crate::ReliefSettings;

/// A two-level mask at the working resolution.
///
/// Every pixel is either 0 (dark, becomes raised relief) or 255
/// (background).
#[derive(Debug, Clone)]
pub struct BinaryMask {
    /// Mask width in pixels.
    pub width: u32,
    /// Mask height in pixels.
    pub height: u32,
    /// Row-major pixel values, each 0 or 255.
    pub pixels: Vec<u8>,
}

impl BinaryMask {
    /// True if the pixel at `(x, y)` is foreground (dark).
    pub fn is_foreground(&self, x: u32, y: u32, threshold: u8) -> bool {
        self.pixels[(y * self.width + x) as usize] < threshold
    }
}

/// Normalize arbitrary raster bytes into a [`BinaryMask`].
///
/// Steps, in order: decode, collapse to grayscale (unsupported channel
/// layouts are coerced, never rejected), Gaussian blur to suppress
/// aliasing, threshold to two levels, nearest-neighbor resize to the
/// working resolution. Undecodable input is a [`ReliefError::Decode`].
///
/// [`ReliefError::Decode`]: crate::ReliefError::Decode
pub fn preprocess_image(bytes: &[u8], settings: &ReliefSettings) -> Result<BinaryMask> {
    let decoded = image::load_from_memory(bytes)?;
    let gray: GrayImage = decoded.to_luma8();

    let blurred = imageops::blur(&gray, settings.blur_sigma);

    let mut binary = blurred;
    for p in binary.pixels_mut() {
        p.0[0] = if p.0[0] < settings.threshold { 0 } else { 255 };
    }

    // Nearest-neighbor keeps the strict two-level invariant through the
    // resize.
    let resized = imageops::resize(
        &binary,
        settings.resolution,
        settings.resolution,
        FilterType::Nearest,
    );

    Ok(BinaryMask {
        width: settings.resolution,
        height: settings.resolution,
        pixels: resized.into_raw(),
    })
}
