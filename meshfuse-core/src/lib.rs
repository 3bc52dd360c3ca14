//! Core data structures for meshfuse
//!
//! This crate provides the fundamental types for triangle mesh decimation:
//! point aliases, an indexed [`TriangleMesh`], canonical edge and triangle
//! keys, and the [`MeshGraph`] adjacency structure that edge contraction
//! operates on.

pub mod point;
pub mod mesh;
pub mod topology;
pub mod mesh_graph;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use topology::*;
pub use mesh_graph::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
