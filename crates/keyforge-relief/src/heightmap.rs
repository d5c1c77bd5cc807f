//! Heightmap construction and resampling.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma};

use crate::error::{ReliefError, Result};
use crate::mask::BinaryMask;
use crate::ReliefSettings;

/// A row-major grid of extrusion heights.
#[derive(Debug, Clone)]
pub struct HeightField {
    /// Grid width.
    pub width: u32,
    /// Grid height.
    pub height: u32,
    /// Row-major heights in working units.
    pub data: Vec<f32>,
}

impl HeightField {
    /// Height at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[(y * self.width + x) as usize]
    }

    /// Resample to a new resolution with Lanczos interpolation.
    ///
    /// The two-level invariant does not survive this step: interpolated
    /// cells may take intermediate heights, which is what smooths the
    /// relief boundary when the working resolution differs.
    ///
    /// A field whose data length does not match its stated dimensions is
    /// a [`ReliefError::Geometry`].
    pub fn resample(&self, width: u32, height: u32) -> Result<HeightField> {
        if self.data.len() != self.width as usize * self.height as usize {
            return Err(ReliefError::Geometry(format!(
                "height field claims {}x{} but holds {} samples",
                self.width,
                self.height,
                self.data.len()
            )));
        }
        let buf: ImageBuffer<Luma<f32>, Vec<f32>> =
            ImageBuffer::from_raw(self.width, self.height, self.data.clone()).ok_or_else(
                || ReliefError::Geometry("height field does not fit an image buffer".into()),
            )?;
        let resized = imageops::resize(&buf, width, height, FilterType::Lanczos3);
        Ok(HeightField {
            width,
            height,
            data: resized.into_raw(),
        })
    }
}

/// Map a binary mask to a height field: dark (foreground) cells get the
/// relief height, background cells the floor height. Pure elementwise
/// transform.
pub fn build_heightmap(mask: &BinaryMask, settings: &ReliefSettings) -> HeightField {
    let data = mask
        .pixels
        .iter()
        .map(|&p| {
            if p < settings.threshold {
                settings.relief_height
            } else {
                settings.floor_height
            }
        })
        .collect();

    HeightField {
        width: mask.width,
        height: mask.height,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn checker_mask(size: u32) -> BinaryMask {
        let pixels = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                if (x + y) % 2 == 0 {
                    0
                } else {
                    255
                }
            })
            .collect();
        BinaryMask {
            width: size,
            height: size,
            pixels,
        }
    }

    #[test]
    fn test_two_level_heights() {
        let settings = ReliefSettings::default();
        let field = build_heightmap(&checker_mask(8), &settings);
        assert_relative_eq!(field.get(0, 0), settings.relief_height);
        assert_relative_eq!(field.get(1, 0), settings.floor_height);
        assert!(field
            .data
            .iter()
            .all(|&h| h == settings.relief_height || h == settings.floor_height));
    }

    #[test]
    fn test_resample_preserves_constant_field() {
        let field = HeightField {
            width: 8,
            height: 8,
            data: vec![30.0; 64],
        };
        let resampled = field.resample(16, 16).unwrap();
        assert_eq!(resampled.width, 16);
        assert_eq!(resampled.data.len(), 256);
        for &h in &resampled.data {
            assert_relative_eq!(h, 30.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_resample_rejects_mismatched_dimensions() {
        // Caller-assembled field with too little data must error, not panic.
        let field = HeightField {
            width: 8,
            height: 8,
            data: vec![0.0; 10],
        };
        let err = field.resample(16, 16).unwrap_err();
        assert!(matches!(err, ReliefError::Geometry(_)));
    }
}
