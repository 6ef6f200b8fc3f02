//! Mesh-side input types and a few stock meshes for tests and demos

use super::math::{Vec2, Vec3};
use crate::error::{Error, Result};

/// A vertex with position and texture coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub pos: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    pub fn new(pos: Vec3, uv: Vec2) -> Self {
        Self { pos, uv }
    }

    pub fn from_pos(x: f32, y: f32, z: f32) -> Self {
        Self {
            pos: Vec3::new(x, y, z),
            uv: Vec2::default(),
        }
    }
}

/// One triangle as submitted to the renderer, counter-clockwise when
/// front-facing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(a: Vertex, b: Vertex, c: Vertex) -> Self {
        Self { vertices: [a, b, c] }
    }
}

/// A triangle face (indices into vertex array)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
}

impl Face {
    pub fn new(v0: usize, v1: usize, v2: usize) -> Self {
        Self { v0, v1, v2 }
    }
}

/// Indexed triangle mesh
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
}

impl Mesh {
    /// Build a mesh, rejecting faces that point past the vertex list
    pub fn new(vertices: Vec<Vertex>, faces: Vec<Face>) -> Result<Self> {
        let mesh = Self { vertices, faces };
        mesh.validate()?;
        Ok(mesh)
    }

    /// First face index that does not name a vertex, as an error
    pub fn validate(&self) -> Result<()> {
        let count = self.vertices.len();
        for (face, f) in self.faces.iter().enumerate() {
            if let Some(&index) = [f.v0, f.v1, f.v2].iter().find(|&&i| i >= count) {
                return Err(Error::FaceIndex { face, index, vertex_count: count });
            }
        }
        Ok(())
    }

    /// Triangles in face order. Faces with out-of-range indices are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces.iter().filter_map(move |f| {
            Some(Triangle::new(
                *self.vertices.get(f.v0)?,
                *self.vertices.get(f.v1)?,
                *self.vertices.get(f.v2)?,
            ))
        })
    }

    /// Axis-aligned quad from four corners in counter-clockwise order,
    /// UVs (0,0) (1,0) (1,1) (0,1)
    pub fn quad(corners: [Vec3; 4]) -> Self {
        let uvs = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        Self {
            vertices: corners
                .iter()
                .zip(uvs)
                .map(|(&pos, uv)| Vertex::new(pos, uv))
                .collect(),
            faces: vec![Face::new(0, 1, 2), Face::new(0, 2, 3)],
        }
    }

    /// Cube centred on the origin, edge length 1
    pub fn unit_cube() -> Self {
        Self::cube(0.5)
    }

    /// Cube centred on the origin with faces at `±half`.
    /// Four vertices per face so every face gets the full texture.
    pub fn cube(half: f32) -> Self {
        let h = half;
        let mut vertices = Vec::with_capacity(24);
        let mut faces = Vec::with_capacity(12);

        let positions = [
            // Front face
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
            // Back face
            Vec3::new(-h, -h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(h, -h, -h),
            // Top face
            Vec3::new(-h, h, -h),
            Vec3::new(-h, h, h),
            Vec3::new(h, h, h),
            Vec3::new(h, h, -h),
            // Bottom face
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, -h, h),
            Vec3::new(-h, -h, h),
            // Right face
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(h, h, h),
            Vec3::new(h, -h, h),
            // Left face
            Vec3::new(-h, -h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(-h, h, h),
            Vec3::new(-h, h, -h),
        ];

        let uvs = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];

        for face_idx in 0..6 {
            let base = face_idx * 4;
            for i in 0..4 {
                vertices.push(Vertex::new(positions[base + i], uvs[i]));
            }

            // Two triangles per face
            faces.push(Face::new(base, base + 1, base + 2));
            faces.push(Face::new(base, base + 2, base + 3));
        }

        Self { vertices, faces }
    }
}
