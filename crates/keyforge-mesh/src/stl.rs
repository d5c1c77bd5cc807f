//! Binary STL export.
//!
//! Layout: 80-byte header, little-endian u32 triangle count, then 50 bytes
//! per triangle (normal, three vertices, u16 attribute count).

use nalgebra::Vector3;

use crate::{MeshError, Result, TriangleMesh};

fn header() -> [u8; 80] {
    let mut header = [b' '; 80];
    let tag = b"keyforge binary STL";
    header[..tag.len()].copy_from_slice(tag);
    header
}

/// Serialize a mesh to binary STL bytes.
///
/// Facet normals are recomputed from the triangle winding; degenerate
/// triangles get a zero normal, which slicers accept.
pub fn to_stl_bytes(mesh: &TriangleMesh) -> Result<Vec<u8>> {
    if mesh.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    let tri_count = mesh.num_triangles();
    let mut out = Vec::with_capacity(84 + tri_count * 50);
    out.extend_from_slice(&header());
    out.extend_from_slice(&(tri_count as u32).to_le_bytes());

    for tri in mesh.indices.chunks_exact(3) {
        let a = vertex(mesh, tri[0]);
        let b = vertex(mesh, tri[1]);
        let c = vertex(mesh, tri[2]);

        let n = (b - a).cross(&(c - a));
        let n = if n.norm() > 1e-12 {
            n.normalize()
        } else {
            Vector3::zeros()
        };

        write_vec3(&mut out, &n);
        write_vec3(&mut out, &a);
        write_vec3(&mut out, &b);
        write_vec3(&mut out, &c);
        out.extend_from_slice(&0u16.to_le_bytes());
    }

    Ok(out)
}

/// Write a mesh to a binary STL file.
pub fn write_stl(mesh: &TriangleMesh, path: impl AsRef<std::path::Path>) -> Result<()> {
    let bytes = to_stl_bytes(mesh)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

fn vertex(mesh: &TriangleMesh, idx: u32) -> Vector3<f32> {
    let i = idx as usize * 3;
    Vector3::new(mesh.vertices[i], mesh.vertices[i + 1], mesh.vertices[i + 2])
}

fn write_vec3(out: &mut Vec<u8>, v: &Vector3<f32>) {
    out.extend_from_slice(&v.x.to_le_bytes());
    out.extend_from_slice(&v.y.to_le_bytes());
    out.extend_from_slice(&v.z.to_le_bytes());
}
