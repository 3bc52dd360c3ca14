//! Ratio-driven edge contraction on indexed meshes
//!
//! Wraps [`Simplifier`] behind the [`MeshSimplifier`] trait so an indexed
//! [`TriangleMesh`] can be reduced in one call.

use meshfuse_core::{Error, MeshGraph, Result, TriangleMesh};

use crate::config::SimplifierConfig;
use crate::simplifier::Simplifier;
use crate::MeshSimplifier;

/// Greedy midpoint edge-contraction simplifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeFuseSimplifier {
    pub config: SimplifierConfig,
}

impl EdgeFuseSimplifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SimplifierConfig) -> Self {
        Self { config }
    }
}

/// Reject reduction ratios outside `[0, 1]`.
pub(crate) fn validate_ratio(reduction_ratio: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&reduction_ratio) {
        return Err(Error::InvalidData(
            "Reduction ratio must be between 0.0 and 1.0".to_string(),
        ));
    }
    Ok(())
}

/// Number of vertices to remove for an already validated ratio.
pub(crate) fn vertices_to_remove(vertex_count: usize, reduction_ratio: f32) -> usize {
    (reduction_ratio * vertex_count as f32) as usize
}

impl MeshSimplifier for EdgeFuseSimplifier {
    fn simplify(&self, mesh: &TriangleMesh, reduction_ratio: f32) -> Result<TriangleMesh> {
        validate_ratio(reduction_ratio)?;
        let graph = MeshGraph::from_triangle_mesh(mesh)?;
        if reduction_ratio == 0.0 {
            return Ok(mesh.clone());
        }
        let count = vertices_to_remove(graph.vertex_count(), reduction_ratio);

        let mut simplifier = Simplifier::with_config(vec![graph], self.config)?;
        simplifier.remove_next(count)?;
        simplifier
            .into_meshes()
            .pop()
            .map(|graph| graph.to_triangle_mesh())
            .ok_or_else(|| Error::Algorithm("Simplifier lost its mesh".to_string()))
    }
}
