//! Priority-queue entries for edge contraction

use std::cmp::Ordering;

use meshfuse_core::{midpoint, Edge, Error, MeshGraph, Point3f, Result};

use crate::config::CostMode;
use crate::cost::contraction_cost;

/// Queue key: which mesh, which edge.
pub type CandidateKey = (usize, Edge);

/// An edge waiting to be contracted, with its cost cached at insertion time.
///
/// Candidates are totally ordered: by cost, then mesh index, then the edge
/// midpoint compared on `(z, y, x)`, and finally by the edge's vertex ids so
/// that two distinct edges never compare equal.
#[derive(Debug, Clone, Copy)]
pub struct CandidateEdge {
    pub mesh_index: usize,
    pub edge: Edge,
    pub cost: f64,
    pub midpoint: Point3f,
}

impl CandidateEdge {
    /// Compute the candidate for a live edge of `graph`.
    pub fn evaluate(graph: &MeshGraph, mesh_index: usize, edge: Edge, mode: CostMode) -> Result<Self> {
        let (p1, p2) = edge.vertices();
        let (a, b) = graph
            .position(p1)
            .zip(graph.position(p2))
            .ok_or(Error::UnknownEdge { a: p1, b: p2 })?;

        Ok(Self {
            mesh_index,
            edge,
            cost: contraction_cost(graph, edge, mode)?,
            midpoint: midpoint(&a, &b),
        })
    }

    pub fn key(&self) -> CandidateKey {
        (self.mesh_index, self.edge)
    }
}

impl PartialEq for CandidateEdge {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for CandidateEdge {}

impl PartialOrd for CandidateEdge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CandidateEdge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then(self.mesh_index.cmp(&other.mesh_index))
            .then(self.midpoint.z.total_cmp(&other.midpoint.z))
            .then(self.midpoint.y.total_cmp(&other.midpoint.y))
            .then(self.midpoint.x.total_cmp(&other.midpoint.x))
            .then(self.edge.cmp(&other.edge))
    }
}
