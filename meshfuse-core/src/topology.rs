//! Identifier types and canonical keys for mesh connectivity

/// Index of a vertex slot in a [`MeshGraph`](crate::MeshGraph).
pub type VertexId = usize;

/// Index of a triangle slot in a [`MeshGraph`](crate::MeshGraph).
pub type TriangleId = usize;

/// Sentinel written into tombstoned face slots.
pub const INVALID: usize = usize::MAX;

/// An undirected edge between two vertices.
///
/// The endpoints are stored in ascending order, so `Edge::new(a, b)` and
/// `Edge::new(b, a)` are equal and hash identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    lo: VertexId,
    hi: VertexId,
}

impl Edge {
    pub fn new(a: VertexId, b: VertexId) -> Self {
        Self {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    /// Both endpoints, smaller id first.
    pub fn vertices(&self) -> (VertexId, VertexId) {
        (self.lo, self.hi)
    }

    pub fn contains(&self, v: VertexId) -> bool {
        self.lo == v || self.hi == v
    }

    /// The endpoint opposite `v`, or `None` if `v` is not on this edge.
    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        if v == self.lo {
            Some(self.hi)
        } else if v == self.hi {
            Some(self.lo)
        } else {
            None
        }
    }
}

/// The three edges of a triangle, in corner order.
pub fn triangle_edges(tri: &[VertexId; 3]) -> [Edge; 3] {
    [
        Edge::new(tri[0], tri[1]),
        Edge::new(tri[1], tri[2]),
        Edge::new(tri[2], tri[0]),
    ]
}

/// Order-independent identity of a triangle.
///
/// Any rotation or reflection of the same three vertex ids maps to the
/// same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriangleKey([VertexId; 3]);

impl TriangleKey {
    pub fn new(tri: &[VertexId; 3]) -> Self {
        let mut sorted = *tri;
        sorted.sort_unstable();
        Self(sorted)
    }
}
