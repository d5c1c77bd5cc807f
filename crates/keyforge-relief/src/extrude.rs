//! Height field to triangulated relief surface.

use keyforge_mesh::TriangleMesh;

use crate::error::Result;
use crate::heightmap::HeightField;
use crate::ReliefSettings;

/// Extrude a height field into a triangulated surface clipped to the
/// circular base footprint.
///
/// Vertices are shared on a row-major indexed grid (one vertex per grid
/// node, allocated lazily), two triangles per 2×2 cell. The image row
/// index becomes the mesh x coordinate and the column index becomes y.
/// A cell is emitted only when its lower corner lies within
/// `base_radius - rim_margin` of the grid center and at least one of its
/// corners rises above the floor height — flat floor cells produce
/// nothing, the base disc is the surface there. The resulting mesh gets
/// one midpoint subdivision pass, which is part of the expected output
/// shape.
pub fn extrude_surface(field: &HeightField, settings: &ReliefSettings) -> Result<TriangleMesh> {
    let res = settings.resolution;
    let field = if field.width == res && field.height == res {
        field.clone()
    } else {
        field.resample(res, res)?
    };

    let center = res as f64 / 2.0;
    let clip_radius = settings.base_radius - settings.rim_margin;
    let floor = settings.floor_height;

    let mut mesh = TriangleMesh::new();
    // u32::MAX marks a grid node with no vertex allocated yet.
    let mut grid: Vec<u32> = vec![u32::MAX; (res * res) as usize];

    let mut node = |mesh: &mut TriangleMesh, grid: &mut Vec<u32>, row: u32, col: u32| -> u32 {
        let slot = (row * res + col) as usize;
        if grid[slot] == u32::MAX {
            let z = field.get(col, row) * settings.z_scale;
            grid[slot] = mesh.push_vertex(row as f32, col as f32, z);
        }
        grid[slot]
    };

    for row in 0..res - 1 {
        for col in 0..res - 1 {
            let dx = row as f64 - center;
            let dy = col as f64 - center;
            if (dx * dx + dy * dy).sqrt() > clip_radius {
                continue;
            }

            let raised = [(row, col), (row + 1, col), (row, col + 1), (row + 1, col + 1)]
                .iter()
                .any(|&(r, c)| (field.get(c, r) - floor).abs() > f32::EPSILON);
            if !raised {
                continue;
            }

            let v1 = node(&mut mesh, &mut grid, row, col);
            let v2 = node(&mut mesh, &mut grid, row + 1, col);
            let v3 = node(&mut mesh, &mut grid, row, col + 1);
            let v4 = node(&mut mesh, &mut grid, row + 1, col + 1);

            mesh.push_triangle(v1, v2, v3);
            mesh.push_triangle(v3, v2, v4);
        }
    }

    log::debug!(
        "extruded surface: {} vertices, {} triangles before subdivision",
        mesh.num_vertices(),
        mesh.num_triangles()
    );

    Ok(mesh.subdivide())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_field(size: u32, height: f32) -> HeightField {
        HeightField {
            width: size,
            height: size,
            data: vec![height; (size * size) as usize],
        }
    }

    fn small_settings(size: u32) -> ReliefSettings {
        ReliefSettings {
            resolution: size,
            base_radius: size as f64, // no clipping in small tests
            rim_margin: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_blank_field_produces_no_geometry() {
        let settings = small_settings(16);
        let field = flat_field(16, settings.floor_height);
        let mesh = extrude_surface(&field, &settings).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.num_vertices(), 0);
    }

    #[test]
    fn test_image_row_maps_to_mesh_x() {
        // Raise a single pixel at column 2, row 5: the bump must land at
        // mesh x ≈ 5, y ≈ 2, not the transposed position.
        let mut field = flat_field(8, 0.0);
        field.data[5 * 8 + 2] = 30.0;
        let settings = small_settings(8);
        let mesh = extrude_surface(&field, &settings).unwrap();

        let mut raised_x = Vec::new();
        let mut raised_y = Vec::new();
        for i in 0..mesh.num_vertices() {
            if mesh.vertices[i * 3 + 2] > 1.0 {
                raised_x.push(mesh.vertices[i * 3]);
                raised_y.push(mesh.vertices[i * 3 + 1]);
            }
        }
        assert!(!raised_x.is_empty());
        assert!(raised_x.iter().all(|&x| (4.0..=6.0).contains(&x)));
        assert!(raised_y.iter().all(|&y| (1.0..=3.0).contains(&y)));
    }

    #[test]
    fn test_full_field_height_is_relief_times_z_scale() {
        let settings = ReliefSettings {
            z_scale: 2.0,
            ..small_settings(16)
        };
        let field = flat_field(16, settings.relief_height);
        let mesh = extrude_surface(&field, &settings).unwrap();
        assert!(!mesh.is_empty());
        let (_, max) = mesh.bounds().unwrap();
        assert_relative_eq!(
            max[2],
            (settings.relief_height * settings.z_scale) as f64,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_disc_clipping() {
        // A tight clip radius excludes the grid corners.
        let settings = ReliefSettings {
            resolution: 32,
            base_radius: 8.0,
            rim_margin: 2.0,
            ..Default::default()
        };
        let field = flat_field(32, settings.relief_height);
        let mesh = extrude_surface(&field, &settings).unwrap();
        assert!(!mesh.is_empty());

        let center = 16.0;
        let (min, max) = mesh.bounds().unwrap();
        // All cells start within 6 units of center; +1 for the far cell
        // corner.
        assert!(min[0] >= center - 7.0);
        assert!(max[0] <= center + 7.0);
        assert!(min[1] >= center - 7.0);
        assert!(max[1] <= center + 7.0);
    }

    #[test]
    fn test_subdivision_applied() {
        // A 3x3 grid of raised cells: 2x2 cells * 2 triangles * 4 children.
        let settings = small_settings(3);
        let field = flat_field(3, settings.relief_height);
        let mesh = extrude_surface(&field, &settings).unwrap();
        assert_eq!(mesh.num_triangles(), 2 * 2 * 2 * 4);
    }

    #[test]
    fn test_vertices_shared_between_cells() {
        let settings = small_settings(3);
        let field = flat_field(3, settings.relief_height);
        let mesh = extrude_surface(&field, &settings).unwrap();
        // Shared indexed grid: 9 grid nodes + subdivision midpoints, far
        // fewer than 4 fresh vertices per cell would give.
        assert!(mesh.num_vertices() < 4 * 4 * 4);
    }
}
