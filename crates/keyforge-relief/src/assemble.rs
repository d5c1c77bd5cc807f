//! Final mesh assembly and print-volume scaling.

use keyforge_mesh::TriangleMesh;

use crate::ReliefSettings;

/// Combine the relief surface and the holed base into one exportable mesh.
///
/// This is an additive union by placement, not a boolean union: the two
/// parts are concatenated in the shared coordinate frame, where the base
/// is already sunk below the relief's z = 0 plane so they visually fuse.
/// When `fit_to_volume` is set the assembly is uniformly rescaled so its
/// bounding box fits the configured print volume.
pub fn assemble(
    surface: &TriangleMesh,
    base: &TriangleMesh,
    settings: &ReliefSettings,
) -> TriangleMesh {
    let mut assembly = base.clone();
    assembly.merge(surface);

    if settings.fit_to_volume {
        if let Some(factor) = fit_factor(&assembly, settings.max_volume) {
            assembly.scale_uniform(factor);
            log::debug!("assembly rescaled by {factor:.4} to fit the print volume");
        }
    }

    assembly
}

/// Uniform scale factor that makes the mesh's bounding box fit `max_box`,
/// using the tightest axis so proportions are preserved. `None` for an
/// empty or flat mesh.
pub fn fit_factor(mesh: &TriangleMesh, max_box: [f64; 3]) -> Option<f64> {
    let (min, max) = mesh.bounds()?;
    let mut factor = f64::INFINITY;
    for axis in 0..3 {
        let extent = max[axis] - min[axis];
        if extent > 1e-9 {
            factor = factor.min(max_box[axis] / extent);
        }
    }
    factor.is_finite().then_some(factor)
}
