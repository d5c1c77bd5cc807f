#![warn(missing_docs)]

//! Indexed triangle mesh type for the keyforge pipeline.
//!
//! The relief extruder and base synthesizer both produce [`TriangleMesh`]
//! values, which the assembler merges and the STL module exports. Vertices
//! are deduplicated and shared between triangles via the index buffer.

use std::collections::HashMap;

pub mod stl;

pub use stl::{to_stl_bytes, write_stl};

use thiserror::Error;

/// Errors returned by mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// Mesh has no triangles.
    #[error("mesh is empty")]
    EmptyMesh,

    /// An I/O error occurred during export.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;

/// An indexed triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, y1, z1, ...]` (f32).
    pub vertices: Vec<f32>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]` (u32).
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// True if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append a vertex and return its index.
    pub fn push_vertex(&mut self, x: f32, y: f32, z: f32) -> u32 {
        let idx = self.num_vertices() as u32;
        self.vertices.push(x);
        self.vertices.push(y);
        self.vertices.push(z);
        idx
    }

    /// Append a triangle referencing three existing vertices.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.push(a);
        self.indices.push(b);
        self.indices.push(c);
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.num_vertices() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices
            .extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Axis-aligned bounding box as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<([f64; 3], [f64; 3])> {
        if self.vertices.is_empty() {
            return None;
        }

        let mut min = [f64::MAX, f64::MAX, f64::MAX];
        let mut max = [f64::MIN, f64::MIN, f64::MIN];

        for i in 0..self.num_vertices() {
            let x = self.vertices[i * 3] as f64;
            let y = self.vertices[i * 3 + 1] as f64;
            let z = self.vertices[i * 3 + 2] as f64;

            min[0] = min[0].min(x);
            min[1] = min[1].min(y);
            min[2] = min[2].min(z);
            max[0] = max[0].max(x);
            max[1] = max[1].max(y);
            max[2] = max[2].max(z);
        }

        Some((min, max))
    }

    /// Uniformly scale every vertex about the origin.
    pub fn scale_uniform(&mut self, factor: f64) {
        for v in &mut self.vertices {
            *v = (*v as f64 * factor) as f32;
        }
    }

    /// Translate every vertex by `(dx, dy, dz)`.
    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) {
        for i in 0..self.num_vertices() {
            self.vertices[i * 3] = (self.vertices[i * 3] as f64 + dx) as f32;
            self.vertices[i * 3 + 1] = (self.vertices[i * 3 + 1] as f64 + dy) as f32;
            self.vertices[i * 3 + 2] = (self.vertices[i * 3 + 2] as f64 + dz) as f32;
        }
    }

    /// One midpoint subdivision pass: each triangle is split into four
    /// children through its edge midpoints. Midpoints on shared edges are
    /// deduplicated so the subdivided mesh stays indexed.
    pub fn subdivide(&self) -> TriangleMesh {
        let mut out = TriangleMesh {
            vertices: self.vertices.clone(),
            indices: Vec::with_capacity(self.indices.len() * 4),
        };

        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();

        let mut midpoint = |mesh: &mut TriangleMesh, a: u32, b: u32| -> u32 {
            let key = if a < b { (a, b) } else { (b, a) };
            if let Some(&idx) = midpoints.get(&key) {
                return idx;
            }
            let (ai, bi) = (a as usize * 3, b as usize * 3);
            let mx = (mesh.vertices[ai] + mesh.vertices[bi]) * 0.5;
            let my = (mesh.vertices[ai + 1] + mesh.vertices[bi + 1]) * 0.5;
            let mz = (mesh.vertices[ai + 2] + mesh.vertices[bi + 2]) * 0.5;
            let idx = mesh.push_vertex(mx, my, mz);
            midpoints.insert(key, idx);
            idx
        };

        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0], tri[1], tri[2]);
            let ab = midpoint(&mut out, a, b);
            let bc = midpoint(&mut out, b, c);
            let ca = midpoint(&mut out, c, a);

            out.push_triangle(a, ab, ca);
            out.push_triangle(ab, b, bc);
            out.push_triangle(ca, bc, c);
            out.push_triangle(ab, bc, ca);
        }

        out
    }
}
