//! Greedy edge-contraction simplifier
//!
//! A [`Simplifier`] owns one or more [`MeshGraph`]s and a single priority
//! queue holding one [`CandidateEdge`] per live edge across all of them.
//! Each step pops the cheapest candidate, checks that contracting it is
//! locally safe, contracts it to its midpoint, and re-ranks every edge whose
//! cost the contraction may have changed.
//!
//! A candidate that fails the safety check is dropped for good. It is not
//! requeued even if later contractions would make it safe.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use meshfuse_core::{midpoint, triangle_edges, Edge, Error, MeshGraph, Result, VertexId};
use priority_queue::PriorityQueue;
use tracing::{debug, info, trace};

use crate::candidate::{CandidateEdge, CandidateKey};
use crate::config::SimplifierConfig;

/// Endpoints with fewer incident edges than this are never contracted.
const MIN_FUSE_DEGREE: usize = 4;

/// Running totals for a [`Simplifier`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimplificationStats {
    /// Contractions applied
    pub fused: usize,
    /// Candidates dropped by the safety check
    pub rejected: usize,
    /// Highest cached cost among the applied contractions
    pub max_fused_cost: Option<f64>,
}

/// Greedy edge-contraction engine over one or more meshes.
pub struct Simplifier {
    meshes: Vec<MeshGraph>,
    queue: PriorityQueue<CandidateKey, Reverse<CandidateEdge>>,
    config: SimplifierConfig,
    stats: SimplificationStats,
}

impl Simplifier {
    /// Simplifier over a single mesh with the default configuration.
    pub fn new(mesh: MeshGraph) -> Result<Self> {
        Self::with_config(vec![mesh], SimplifierConfig::default())
    }

    /// Simplifier over several meshes sharing one queue.
    ///
    /// Candidates are tagged with the index of their mesh in `meshes`.
    pub fn with_config(meshes: Vec<MeshGraph>, config: SimplifierConfig) -> Result<Self> {
        let mut queue = PriorityQueue::new();
        for (mesh_index, graph) in meshes.iter().enumerate() {
            for edge in graph.edges() {
                let candidate = CandidateEdge::evaluate(graph, mesh_index, edge, config.cost_mode)?;
                queue.push(candidate.key(), Reverse(candidate));
            }
        }

        debug!(
            "Simplifier ready: {} meshes, {} candidate edges",
            meshes.len(),
            queue.len()
        );
        Ok(Self {
            meshes,
            queue,
            config,
            stats: SimplificationStats::default(),
        })
    }

    pub fn config(&self) -> &SimplifierConfig {
        &self.config
    }

    pub fn stats(&self) -> &SimplificationStats {
        &self.stats
    }

    pub fn meshes(&self) -> &[MeshGraph] {
        &self.meshes
    }

    pub fn mesh(&self, index: usize) -> Option<&MeshGraph> {
        self.meshes.get(index)
    }

    pub fn into_meshes(self) -> Vec<MeshGraph> {
        self.meshes
    }

    /// Live vertices across all meshes
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(MeshGraph::vertex_count).sum()
    }

    /// Live triangles across all meshes
    pub fn face_count(&self) -> usize {
        self.meshes.iter().map(MeshGraph::face_count).sum()
    }

    /// Number of queued candidates
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// The cheapest queued candidate.
    pub fn peek(&self) -> Option<&CandidateEdge> {
        self.queue.peek().map(|(_, Reverse(candidate))| candidate)
    }

    /// Contract edges in cost order for as long as the cheapest candidate
    /// costs at most `max_cost`. Returns the remaining vertex count.
    pub fn remove_until(&mut self, max_cost: f64) -> Result<usize> {
        let start = self.vertex_count();
        info!("Simplifying until cost {} ({} vertices)", max_cost, start);

        while self.peek().is_some_and(|c| c.cost <= max_cost) {
            let Some((_, Reverse(candidate))) = self.queue.pop() else {
                break;
            };
            self.try_fuse(candidate)?;
        }

        let remaining = self.vertex_count();
        info!(
            "Simplification finished: {} -> {} vertices, {} candidates left",
            start,
            remaining,
            self.queue.len()
        );
        Ok(remaining)
    }

    /// Contract edges in cost order until the vertex count across all meshes
    /// has dropped by at least `count`, or no candidates remain. Returns the
    /// remaining vertex count.
    pub fn remove_next(&mut self, count: usize) -> Result<usize> {
        let start = self.vertex_count();
        let target = start.saturating_sub(count);
        info!("Simplifying {} -> {} vertices", start, target);

        while self.vertex_count() > target {
            if let Some(limit) = self.config.max_cost {
                if self.peek().is_some_and(|c| c.cost > limit) {
                    debug!("Cheapest candidate exceeds cost limit {}", limit);
                    break;
                }
            }
            let Some((_, Reverse(candidate))) = self.queue.pop() else {
                break;
            };
            self.try_fuse(candidate)?;
        }

        let remaining = self.vertex_count();
        info!(
            "Simplification finished: {} -> {} vertices, {} candidates left",
            start,
            remaining,
            self.queue.len()
        );
        Ok(remaining)
    }

    /// Local safety check for contracting `edge`.
    ///
    /// Both endpoints need at least four incident edges, and the neighbours
    /// of the two endpoints (excluding each other) must overlap in exactly
    /// two vertices, the apices of the two triangles on the edge. Any other
    /// overlap means the contraction would fold the surface or pinch it into
    /// a non-manifold configuration.
    pub fn should_fuse(graph: &MeshGraph, edge: Edge) -> bool {
        let (p1, p2) = edge.vertices();
        let n1 = graph.degree(p1);
        let n2 = graph.degree(p2);
        if n1 < MIN_FUSE_DEGREE || n2 < MIN_FUSE_DEGREE {
            return false;
        }

        let ring: BTreeSet<VertexId> = graph
            .vertex_edges(p1)
            .chain(graph.vertex_edges(p2))
            .filter(|e| *e != edge)
            .filter_map(|e| e.other(p1).or_else(|| e.other(p2)))
            .collect();
        ring.len() == n1 + n2 - 4
    }

    /// Edges whose queue entries a contraction of `(p1, p2)` can invalidate:
    /// everything incident to either endpoint plus the far side of their
    /// triangles.
    fn affected_edges(graph: &MeshGraph, p1: VertexId, p2: VertexId) -> BTreeSet<Edge> {
        let mut affected = BTreeSet::new();
        for v in [p1, p2] {
            affected.extend(graph.vertex_edges(v));
            for tid in graph.vertex_triangles(v) {
                if let Some(tri) = graph.triangle(tid) {
                    affected.extend(triangle_edges(&tri));
                }
            }
        }
        affected
    }

    /// Apply a popped candidate if it is still live and safe.
    fn try_fuse(&mut self, candidate: CandidateEdge) -> Result<bool> {
        let mesh_index = candidate.mesh_index;
        let edge = candidate.edge;
        let graph = self.meshes.get(mesh_index).ok_or_else(|| {
            Error::Algorithm(format!("Candidate refers to missing mesh {}", mesh_index))
        })?;

        if !graph.contains_edge(&edge) {
            trace!("Dropping stale candidate {:?} in mesh {}", edge, mesh_index);
            return Ok(false);
        }
        if !Self::should_fuse(graph, edge) {
            trace!("Rejected {:?} in mesh {}", edge, mesh_index);
            self.stats.rejected += 1;
            return Ok(false);
        }

        let (p1, p2) = edge.vertices();
        let target = match (graph.position(p1), graph.position(p2)) {
            (Some(a), Some(b)) => midpoint(&a, &b),
            _ => return Err(Error::UnknownEdge { a: p1, b: p2 }),
        };

        let old_ring: BTreeSet<VertexId> = graph
            .neighbors(p1)
            .union(&graph.neighbors(p2))
            .copied()
            .collect();
        for stale in Self::affected_edges(graph, p1, p2) {
            self.queue.remove(&(mesh_index, stale));
        }

        let graph = &mut self.meshes[mesh_index];
        let merged = graph.contract_edge(edge, target)?;

        // the cost looks at a one-ring, so edges around the neighbours move too
        let mut refresh: BTreeSet<Edge> = graph.vertex_edges(merged).collect();
        for n in graph.neighbors(merged).into_iter().chain(old_ring) {
            refresh.extend(graph.vertex_edges(n));
        }
        let graph = &self.meshes[mesh_index];
        for e in refresh {
            let updated = CandidateEdge::evaluate(graph, mesh_index, e, self.config.cost_mode)?;
            self.queue.push(updated.key(), Reverse(updated));
        }

        self.stats.fused += 1;
        self.stats.max_fused_cost = Some(
            self.stats
                .max_fused_cost
                .map_or(candidate.cost, |m| m.max(candidate.cost)),
        );
        debug!(
            "Fused {:?} in mesh {} at cost {:.6} into vertex {}",
            edge, mesh_index, candidate.cost, merged
        );
        Ok(true)
    }
}
