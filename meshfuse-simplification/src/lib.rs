//! Mesh simplification and decimation
//!
//! This crate reduces the polygon count of a triangle mesh by greedy edge
//! contraction:
//! - A cost-ranked queue of candidate edges shared across one or more meshes
//! - A local safety check that refuses fold-back contractions
//! - Ratio-driven and per-component parallel entry points

pub mod config;
pub mod cost;
pub mod candidate;
pub mod simplifier;
pub mod edge_fuse;
pub mod parallel;

pub use config::*;
pub use cost::*;
pub use candidate::*;
pub use simplifier::*;
pub use edge_fuse::*;
pub use parallel::*;

use meshfuse_core::{Result, TriangleMesh};

/// Simplify a mesh by reducing the number of faces/vertices
pub trait MeshSimplifier {
    /// Simplify mesh with target reduction ratio (0.0 = no reduction, 1.0 = maximum reduction)
    fn simplify(&self, mesh: &TriangleMesh, reduction_ratio: f32) -> Result<TriangleMesh>;
}
