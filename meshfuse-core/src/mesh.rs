//! Indexed mesh data structures and functionality

use crate::point::*;
use serde::{Deserialize, Serialize};

/// A triangle mesh with shared vertices and index triples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Expand the faces into a flat triangle list, three points per triangle.
    pub fn triangle_list(&self) -> Vec<Point3f> {
        self.faces
            .iter()
            .flat_map(|face| face.iter().map(|&i| self.vertices[i]))
            .collect()
    }

    /// Vertex positions as a flat `x, y, z, ...` buffer.
    pub fn vertex_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}
