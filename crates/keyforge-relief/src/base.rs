//! Base plate synthesis: an oval disc with a keychain hole cut through it.
//!
//! Solid modeling is delegated to the csgrs kernel; we only place two
//! cylinders and take their boolean difference. A failed subtraction makes
//! the part unusable as a keychain, so degenerate output is a hard error.

use csgrs::mesh::Mesh as CsgMesh;
use csgrs::traits::CSG;
use std::collections::HashMap;

use keyforge_mesh::TriangleMesh;

use crate::error::{ReliefError, Result};
use crate::ReliefSettings;

/// Build the holed base solid in the extruder's coordinate frame.
///
/// The disc is a cylinder stretched into an oval footprint and centered
/// under the relief grid; the hole is a smaller cylinder near one edge,
/// one unit taller than the disc so it pierces both faces. Both cylinders
/// are centered on z = -1, matching the relief surface's z = 0 plane
/// convention.
pub fn synthesize_base(settings: &ReliefSettings) -> Result<TriangleMesh> {
    let center = settings.resolution as f64 / 2.0;
    let h = settings.base_height;
    let segments = settings.segments as usize;

    let disc = CsgMesh::<()>::cylinder(settings.base_radius, h, segments, None)
        .scale(1.0, settings.oval_stretch_y, 1.0)
        .translate(center, center, -h / 2.0 - 1.0);

    let hole_h = h + 1.0;
    let hole = CsgMesh::<()>::cylinder(settings.hole_radius, hole_h, segments, None).translate(
        center,
        center + settings.hole_offset_y,
        -hole_h / 2.0 - 1.0,
    );

    let cut = disc.difference(&hole);
    let mesh = to_triangle_mesh(&cut);

    if mesh.is_empty() {
        return Err(ReliefError::Geometry(
            "base/hole subtraction produced no geometry".into(),
        ));
    }
    let (min, max) = mesh.bounds().ok_or_else(|| {
        ReliefError::Geometry("base/hole subtraction produced no geometry".into())
    })?;
    if max[2] - min[2] < h - 1e-3 {
        return Err(ReliefError::Geometry(format!(
            "holed base lost its thickness: {:.3} < {:.3}",
            max[2] - min[2],
            h
        )));
    }

    log::debug!(
        "holed base: {} vertices, {} triangles",
        mesh.num_vertices(),
        mesh.num_triangles()
    );
    Ok(mesh)
}

/// Convert a csgrs polygon soup into an indexed [`TriangleMesh`].
///
/// Vertices are deduplicated on a quantized position key; degenerate
/// polygons (fewer than three vertices) are dropped.
fn to_triangle_mesh(csg: &CsgMesh<()>) -> TriangleMesh {
    const QUANT: f64 = 1e6;

    let mut mesh = TriangleMesh::new();
    let mut seen: HashMap<(i64, i64, i64), u32> = HashMap::new();

    for polygon in &csg.polygons {
        if polygon.vertices.len() < 3 {
            continue;
        }
        for tri in polygon.triangulate() {
            let mut idx = [0u32; 3];
            for (k, vtx) in tri.iter().enumerate() {
                let pos = vtx.pos;
                let key = (
                    (pos.x * QUANT).round() as i64,
                    (pos.y * QUANT).round() as i64,
                    (pos.z * QUANT).round() as i64,
                );
                idx[k] = *seen.entry(key).or_insert_with(|| {
                    mesh.push_vertex(pos.x as f32, pos.y as f32, pos.z as f32)
                });
            }
            if idx[0] != idx[1] && idx[1] != idx[2] && idx[2] != idx[0] {
                mesh.push_triangle(idx[0], idx[1], idx[2]);
            }
        }
    }

    mesh
}
