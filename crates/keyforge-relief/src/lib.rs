#![warn(missing_docs)]

//! Image-to-printable-relief pipeline for keyforge.
//!
//! Converts a raster image into a keychain-style printable solid:
//!
//! 1. [`mask::preprocess_image`] — normalize to a binary mask
//! 2. [`heightmap::build_heightmap`] — mask to per-pixel heights
//! 3. [`extrude::extrude_surface`] — heights to a triangulated surface,
//!    clipped to the base footprint
//! 4. [`base::synthesize_base`] — oval base disc minus keychain hole
//! 5. [`assemble::assemble`] — placement union, optional print-volume fit
//!
//! # Example
//!
//! ```no_run
//! use keyforge_relief::{image_to_mesh, ReliefSettings};
//!
//! let bytes = std::fs::read("design.png")?;
//! let mesh = image_to_mesh(&bytes, &ReliefSettings::default())?;
//! keyforge_mesh::write_stl(&mesh, "design.stl").unwrap();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assemble;
pub mod base;
pub mod error;
pub mod extrude;
pub mod heightmap;
pub mod mask;

pub use assemble::{assemble, fit_factor};
pub use base::synthesize_base;
pub use error::{ReliefError, Result};
pub use extrude::extrude_surface;
pub use heightmap::{build_heightmap, HeightField};
pub use mask::{preprocess_image, BinaryMask};

use keyforge_mesh::TriangleMesh;
use serde::{Deserialize, Serialize};

/// Parameters of the relief pipeline.
///
/// Defaults reproduce the reference keychain geometry: a 512×512 working
/// grid, a 300-unit base disc stretched ×1.2 in Y, and a 20-unit hole
/// offset 280 units toward the near edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReliefSettings {
    /// Working grid resolution (cells per side).
    pub resolution: u32,
    /// Binarization threshold (0-255).
    pub threshold: u8,
    /// Gaussian blur sigma applied before thresholding (px).
    pub blur_sigma: f32,
    /// Height of background cells (working units).
    pub floor_height: f32,
    /// Height of foreground (dark) cells (working units).
    pub relief_height: f32,
    /// Multiplier applied to heights at extrusion time.
    pub z_scale: f32,
    /// Base disc thickness (working units).
    pub base_height: f64,
    /// Base disc radius (working units).
    pub base_radius: f64,
    /// Margin between the relief clip circle and the disc rim.
    pub rim_margin: f64,
    /// Y-axis stretch giving the disc its oval footprint.
    pub oval_stretch_y: f64,
    /// Keychain hole radius (working units).
    pub hole_radius: f64,
    /// Hole center offset from the grid center along Y.
    pub hole_offset_y: f64,
    /// Angular segment count for both cylinders.
    pub segments: u32,
    /// Rescale the final assembly to fit `max_volume`.
    pub fit_to_volume: bool,
    /// Maximum print volume (x, y, z).
    pub max_volume: [f64; 3],
}

impl Default for ReliefSettings {
    fn default() -> Self {
        Self {
            resolution: 512,
            threshold: 128,
            blur_sigma: 1.0,
            floor_height: 0.0,
            relief_height: 30.0,
            z_scale: 1.0,
            base_height: 15.0,
            base_radius: 300.0,
            rim_margin: 5.0,
            oval_stretch_y: 1.2,
            hole_radius: 20.0,
            hole_offset_y: -280.0,
            segments: 200,
            fit_to_volume: true,
            max_volume: [200.0, 200.0, 250.0],
        }
    }
}

impl ReliefSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.resolution < 2 {
            return Err(ReliefError::InvalidSettings(
                "resolution must be at least 2".into(),
            ));
        }
        if self.base_radius <= 0.0 || self.base_height <= 0.0 {
            return Err(ReliefError::InvalidSettings(
                "base dimensions must be positive".into(),
            ));
        }
        if self.hole_radius <= 0.0 || self.hole_radius >= self.base_radius {
            return Err(ReliefError::InvalidSettings(
                "hole_radius must be positive and smaller than base_radius".into(),
            ));
        }
        if self.rim_margin < 0.0 || self.rim_margin >= self.base_radius {
            return Err(ReliefError::InvalidSettings(
                "rim_margin must be non-negative and smaller than base_radius".into(),
            ));
        }
        if self.segments < 3 {
            return Err(ReliefError::InvalidSettings(
                "segments must be at least 3".into(),
            ));
        }
        Ok(())
    }
}

/// Run the full pipeline: image bytes to exportable mesh.
pub fn image_to_mesh(bytes: &[u8], settings: &ReliefSettings) -> Result<TriangleMesh> {
    settings.validate()?;

    let mask = preprocess_image(bytes, settings)?;
    let field = build_heightmap(&mask, settings);
    let surface = extrude_surface(&field, settings)?;
    let base = synthesize_base(settings)?;
    let assembly = assemble(&surface, &base, settings);

    log::info!(
        "built relief mesh: {} triangles ({} from the surface)",
        assembly.num_triangles(),
        surface.num_triangles()
    );
    Ok(assembly)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_valid() {
        assert!(ReliefSettings::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_hole() {
        let settings = ReliefSettings {
            hole_radius: 400.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ReliefError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_blank_image_yields_base_only() {
        use image::{GrayImage, ImageFormat, Luma};
        use std::io::Cursor;

        // All-white input: no foreground, so the assembly is just the
        // holed base.
        let img = GrayImage::from_pixel(32, 32, Luma([255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let settings = ReliefSettings {
            resolution: 32,
            base_radius: 12.0,
            rim_margin: 1.0,
            hole_radius: 3.0,
            hole_offset_y: -8.0,
            base_height: 6.0,
            segments: 16,
            fit_to_volume: false,
            ..Default::default()
        };

        let assembly = image_to_mesh(&bytes, &settings).unwrap();
        let base = synthesize_base(&settings).unwrap();
        assert_eq!(assembly.num_triangles(), base.num_triangles());
    }
}
