//! Vertex / edge / triangle adjacency graph
//!
//! [`MeshGraph`] keeps vertices, undirected edges and triangles in flat
//! storage and links them to each other by integer id. Nothing is ever
//! compacted: a deleted triangle leaves [`INVALID`] in its three face slots
//! and a vertex without triangles is simply treated as dead, so ids handed
//! out earlier stay meaningful (or detectably stale) for the life of the
//! graph.

use std::collections::{BTreeSet, HashMap, VecDeque};

use tracing::{debug, trace};

use crate::point::{is_finite_point, PositionKey};
use crate::topology::{triangle_edges, Edge, TriangleId, TriangleKey, VertexId, INVALID};
use crate::{Error, Point3f, Result, TriangleMesh};

#[derive(Debug, Clone)]
struct Vertex {
    position: Point3f,
    edges: BTreeSet<Edge>,
    triangles: BTreeSet<TriangleId>,
}

impl Vertex {
    fn new(position: Point3f) -> Self {
        Self {
            position,
            edges: BTreeSet::new(),
            triangles: BTreeSet::new(),
        }
    }

    fn is_live(&self) -> bool {
        !self.triangles.is_empty()
    }
}

/// Topology-aware triangle mesh built from a flat triangle list.
///
/// Vertices are deduplicated by exact position: adding a point equal to an
/// existing vertex returns that vertex's id.
#[derive(Debug, Clone, Default)]
pub struct MeshGraph {
    vertices: Vec<Vertex>,
    vertex_lookup: HashMap<PositionKey, VertexId>,
    edges: HashMap<Edge, BTreeSet<TriangleId>>,
    /// Three vertex ids per triangle, `INVALID` once removed
    faces: Vec<VertexId>,
    face_lookup: HashMap<TriangleKey, TriangleId>,
    live_vertices: usize,
    live_faces: usize,
}

impl MeshGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a flat triangle list, three points per triangle.
    ///
    /// Degenerate triangles (two corners at the same position) and repeated
    /// triangles are skipped.
    pub fn from_points(points: &[Point3f]) -> Result<Self> {
        if points.len() < 3 {
            return Err(Error::InvalidData(format!(
                "A mesh needs at least 3 points, got {}",
                points.len()
            )));
        }
        if points.len() % 3 != 0 {
            return Err(Error::InvalidData(format!(
                "Triangle list length must be a multiple of 3, got {}",
                points.len()
            )));
        }

        let mut graph = Self::new();
        for tri in points.chunks_exact(3) {
            let a = graph.add_vertex(tri[0])?;
            let b = graph.add_vertex(tri[1])?;
            let c = graph.add_vertex(tri[2])?;
            graph.add_face(a, b, c)?;
        }

        debug!(
            "Built mesh graph: {} triangles in, {} vertices, {} faces",
            points.len() / 3,
            graph.live_vertices,
            graph.live_faces
        );
        Ok(graph)
    }

    /// Build a graph from a flat `x, y, z, ...` coordinate buffer.
    pub fn from_coords(coords: &[f32]) -> Result<Self> {
        if coords.len() % 9 != 0 {
            return Err(Error::InvalidData(format!(
                "Coordinate buffer length must be a multiple of 9, got {}",
                coords.len()
            )));
        }
        let points: Vec<Point3f> = coords
            .chunks_exact(3)
            .map(|c| Point3f::new(c[0], c[1], c[2]))
            .collect();
        Self::from_points(&points)
    }

    /// Build a graph from an indexed mesh.
    pub fn from_triangle_mesh(mesh: &TriangleMesh) -> Result<Self> {
        if mesh.is_empty() {
            return Err(Error::InvalidData("Mesh is empty".to_string()));
        }

        let mut graph = Self::new();
        let ids = mesh
            .vertices
            .iter()
            .map(|&p| graph.add_vertex(p))
            .collect::<Result<Vec<_>>>()?;

        for face in &mesh.faces {
            let corner = |i: usize| {
                ids.get(i).copied().ok_or_else(|| {
                    Error::InvalidData(format!(
                        "Face index {} out of range for {} vertices",
                        i,
                        ids.len()
                    ))
                })
            };
            graph.add_face(corner(face[0])?, corner(face[1])?, corner(face[2])?)?;
        }
        Ok(graph)
    }

    /// Insert a vertex, or return the id of the vertex already at `position`.
    ///
    /// A freshly inserted vertex has no triangles and does not count as live
    /// until a face references it.
    pub fn add_vertex(&mut self, position: Point3f) -> Result<VertexId> {
        if !is_finite_point(&position) {
            return Err(Error::InvalidData(format!(
                "Vertex position must be finite, got {:?}",
                position
            )));
        }

        let key = PositionKey::new(&position);
        if let Some(&id) = self.vertex_lookup.get(&key) {
            return Ok(id);
        }

        let id = self.vertices.len();
        self.vertices.push(Vertex::new(position));
        self.vertex_lookup.insert(key, id);
        Ok(id)
    }

    /// Add the triangle `(a, b, c)`.
    ///
    /// Returns `Ok(None)` without touching the graph if the three ids are
    /// not pairwise distinct or the same triangle (in any corner order)
    /// already exists.
    pub fn add_face(&mut self, a: VertexId, b: VertexId, c: VertexId) -> Result<Option<TriangleId>> {
        for v in [a, b, c] {
            if v >= self.vertices.len() {
                return Err(Error::InvalidData(format!(
                    "Vertex id {} out of range for {} vertices",
                    v,
                    self.vertices.len()
                )));
            }
        }

        if a == b || b == c || c == a {
            trace!("Skipping degenerate face ({}, {}, {})", a, b, c);
            return Ok(None);
        }

        let tri = [a, b, c];
        let key = TriangleKey::new(&tri);
        if self.face_lookup.contains_key(&key) {
            trace!("Skipping duplicate face ({}, {}, {})", a, b, c);
            return Ok(None);
        }

        let tid = self.faces.len() / 3;
        self.faces.extend_from_slice(&tri);
        self.face_lookup.insert(key, tid);

        for edge in triangle_edges(&tri) {
            self.edges.entry(edge).or_default().insert(tid);
            let (lo, hi) = edge.vertices();
            self.vertices[lo].edges.insert(edge);
            self.vertices[hi].edges.insert(edge);
        }

        for v in tri {
            let vertex = &mut self.vertices[v];
            if !vertex.is_live() {
                self.live_vertices += 1;
            }
            vertex.triangles.insert(tid);
        }

        self.live_faces += 1;
        Ok(Some(tid))
    }

    /// Remove a triangle.
    ///
    /// Edges left without triangles are deleted, and vertices left without
    /// triangles become dead. Returns `false` if the triangle was already
    /// removed or never existed.
    pub fn remove_face(&mut self, tid: TriangleId) -> bool {
        let Some(tri) = self.triangle(tid) else {
            return false;
        };

        for edge in triangle_edges(&tri) {
            if let Some(incident) = self.edges.get_mut(&edge) {
                incident.remove(&tid);
                if incident.is_empty() {
                    self.edges.remove(&edge);
                    let (lo, hi) = edge.vertices();
                    self.vertices[lo].edges.remove(&edge);
                    self.vertices[hi].edges.remove(&edge);
                }
            }
        }

        for v in tri {
            let vertex = &mut self.vertices[v];
            vertex.triangles.remove(&tid);
            if !vertex.is_live() {
                self.live_vertices -= 1;
            }
        }

        self.face_lookup.remove(&TriangleKey::new(&tri));
        self.faces[tid * 3..tid * 3 + 3].fill(INVALID);
        self.live_faces -= 1;
        true
    }

    /// Remove every triangle incident to `v`. Returns how many were removed.
    pub fn remove_vertex(&mut self, v: VertexId) -> usize {
        let incident: Vec<TriangleId> = match self.vertices.get(v) {
            Some(vertex) => vertex.triangles.iter().copied().collect(),
            None => return 0,
        };
        incident
            .into_iter()
            .filter(|&tid| self.remove_face(tid))
            .count()
    }

    /// Collapse `edge` into a single vertex at `new_position`.
    ///
    /// The triangles spanning the edge disappear and every other triangle
    /// touching either endpoint is reattached to the merged vertex. The
    /// merged vertex reuses an existing vertex at `new_position` if there is
    /// one, otherwise it takes over the first endpoint's slot.
    ///
    /// Fails with [`Error::UnknownEdge`] if `edge` is not in the graph.
    pub fn contract_edge(&mut self, edge: Edge, new_position: Point3f) -> Result<VertexId> {
        let (p1, p2) = edge.vertices();
        let spanning = match self.edges.get(&edge) {
            Some(incident) => incident.clone(),
            None => return Err(Error::UnknownEdge { a: p1, b: p2 }),
        };
        if !is_finite_point(&new_position) {
            return Err(Error::InvalidData(format!(
                "Contraction target must be finite, got {:?}",
                new_position
            )));
        }

        let kept = self.detach_vertex(p1, &spanning);
        let merged = self.place_merged_vertex(p1, new_position);
        self.reattach(&kept, p1, merged)?;

        if merged != p2 {
            let kept = self.detach_vertex(p2, &spanning);
            self.reattach(&kept, p2, merged)?;
        }

        debug!(
            "Contracted edge ({}, {}) into vertex {}, {} spanning faces removed",
            p1,
            p2,
            merged,
            spanning.len()
        );
        Ok(merged)
    }

    /// Remove all triangles at `v`, returning the corners of those not in
    /// `skip` so they can be re-added.
    fn detach_vertex(&mut self, v: VertexId, skip: &BTreeSet<TriangleId>) -> Vec<[VertexId; 3]> {
        let kept = self.vertices[v]
            .triangles
            .iter()
            .filter(|tid| !skip.contains(tid))
            .filter_map(|&tid| self.triangle(tid))
            .collect();
        self.remove_vertex(v);
        kept
    }

    fn place_merged_vertex(&mut self, p1: VertexId, position: Point3f) -> VertexId {
        let key = PositionKey::new(&position);
        if let Some(&existing) = self.vertex_lookup.get(&key) {
            return existing;
        }

        let old_key = PositionKey::new(&self.vertices[p1].position);
        if self.vertex_lookup.get(&old_key) == Some(&p1) {
            self.vertex_lookup.remove(&old_key);
        }
        self.vertices[p1].position = position;
        self.vertex_lookup.insert(key, p1);
        p1
    }

    fn reattach(&mut self, triangles: &[[VertexId; 3]], from: VertexId, to: VertexId) -> Result<()> {
        for tri in triangles {
            let [a, b, c] = tri.map(|v| if v == from { to } else { v });
            self.add_face(a, b, c)?;
        }
        Ok(())
    }

    /// Number of live vertices
    pub fn vertex_count(&self) -> usize {
        self.live_vertices
    }

    /// Number of live triangles
    pub fn face_count(&self) -> usize {
        self.live_faces
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check if the graph has no live triangles
    pub fn is_empty(&self) -> bool {
        self.live_faces == 0
    }

    pub fn is_vertex_live(&self, v: VertexId) -> bool {
        self.vertices.get(v).is_some_and(Vertex::is_live)
    }

    /// Position of a live vertex.
    pub fn position(&self, v: VertexId) -> Option<Point3f> {
        self.vertices
            .get(v)
            .filter(|vertex| vertex.is_live())
            .map(|vertex| vertex.position)
    }

    /// Id of the vertex stored at exactly `position`, live or not.
    pub fn find_vertex(&self, position: &Point3f) -> Option<VertexId> {
        self.vertex_lookup.get(&PositionKey::new(position)).copied()
    }

    /// Number of edges incident to `v`.
    pub fn degree(&self, v: VertexId) -> usize {
        self.vertices.get(v).map_or(0, |vertex| vertex.edges.len())
    }

    pub fn vertex_edges(&self, v: VertexId) -> impl Iterator<Item = Edge> + '_ {
        self.vertices
            .get(v)
            .into_iter()
            .flat_map(|vertex| vertex.edges.iter().copied())
    }

    pub fn vertex_triangles(&self, v: VertexId) -> impl Iterator<Item = TriangleId> + '_ {
        self.vertices
            .get(v)
            .into_iter()
            .flat_map(|vertex| vertex.triangles.iter().copied())
    }

    /// Vertices sharing an edge with `v`.
    pub fn neighbors(&self, v: VertexId) -> BTreeSet<VertexId> {
        self.vertex_edges(v).filter_map(|e| e.other(v)).collect()
    }

    pub fn contains_edge(&self, edge: &Edge) -> bool {
        self.edges.contains_key(edge)
    }

    /// Triangles incident to `edge`; more than two means the edge is
    /// non-manifold.
    pub fn edge_triangles(&self, edge: &Edge) -> impl Iterator<Item = TriangleId> + '_ {
        self.edges
            .get(edge)
            .into_iter()
            .flat_map(|incident| incident.iter().copied())
    }

    /// All edges, in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.keys().copied()
    }

    /// Corners of a live triangle.
    pub fn triangle(&self, tid: TriangleId) -> Option<[VertexId; 3]> {
        let start = tid.checked_mul(3)?;
        let slots = self.faces.get(start..start.checked_add(3)?)?;
        if slots[0] == INVALID {
            None
        } else {
            Some([slots[0], slots[1], slots[2]])
        }
    }

    /// Live triangles with their ids, in id order.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleId, [VertexId; 3])> + '_ {
        self.faces
            .chunks_exact(3)
            .enumerate()
            .filter(|(_, slots)| slots[0] != INVALID)
            .map(|(tid, slots)| (tid, [slots[0], slots[1], slots[2]]))
    }

    fn corner_positions(&self, tri: &[VertexId; 3]) -> [Point3f; 3] {
        tri.map(|v| self.vertices[v].position)
    }

    /// Corner positions of a live triangle.
    pub fn triangle_positions(&self, tid: TriangleId) -> Option<[Point3f; 3]> {
        self.triangle(tid).map(|tri| self.corner_positions(&tri))
    }

    /// Live triangles as a flat list, three points per triangle.
    pub fn triangle_list(&self) -> Vec<Point3f> {
        self.triangles()
            .flat_map(|(_, tri)| self.corner_positions(&tri))
            .collect()
    }

    /// Partition the live vertices into connected components.
    ///
    /// Each component is found by a breadth-first walk over edges, starting
    /// from the lowest unvisited vertex id.
    pub fn connected_components(&self) -> Vec<Vec<VertexId>> {
        let mut visited = vec![false; self.vertices.len()];
        let mut components = Vec::new();

        for start in 0..self.vertices.len() {
            if visited[start] || !self.vertices[start].is_live() {
                continue;
            }

            let mut component = Vec::new();
            let mut queue = VecDeque::from([start]);
            visited[start] = true;

            while let Some(v) = queue.pop_front() {
                component.push(v);
                for n in self.vertex_edges(v).filter_map(|e| e.other(v)) {
                    if !visited[n] {
                        visited[n] = true;
                        queue.push_back(n);
                    }
                }
            }
            components.push(component);
        }

        components
    }

    /// Live triangles split by connected component, each as a flat list.
    ///
    /// The lists are pairwise vertex-disjoint and together hold every live
    /// triangle exactly once.
    pub fn submeshes(&self) -> Vec<Vec<Point3f>> {
        let components = self.connected_components();
        let mut component_of = vec![INVALID; self.vertices.len()];
        for (ci, component) in components.iter().enumerate() {
            for &v in component {
                component_of[v] = ci;
            }
        }

        let mut submeshes = vec![Vec::new(); components.len()];
        for (_, tri) in self.triangles() {
            submeshes[component_of[tri[0]]].extend(self.corner_positions(&tri));
        }
        submeshes
    }

    /// One independent graph per connected component.
    pub fn component_graphs(&self) -> Result<Vec<MeshGraph>> {
        self.submeshes()
            .iter()
            .map(|points| MeshGraph::from_points(points))
            .collect()
    }

    /// Export the live part of the graph as a compact indexed mesh.
    pub fn to_triangle_mesh(&self) -> TriangleMesh {
        let mut old_to_new = vec![INVALID; self.vertices.len()];
        let mut vertices = Vec::with_capacity(self.live_vertices);
        for (i, vertex) in self.vertices.iter().enumerate() {
            if vertex.is_live() {
                old_to_new[i] = vertices.len();
                vertices.push(vertex.position);
            }
        }

        let faces = self
            .triangles()
            .map(|(_, tri)| tri.map(|v| old_to_new[v]))
            .collect();

        TriangleMesh::from_vertices_and_faces(vertices, faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn make_plane_grid(size: usize) -> Vec<Point3f> {
        let at = |x: usize, y: usize| Point3f::new(x as f32, y as f32, 0.0);
        let mut points = Vec::new();
        for y in 0..(size - 1) {
            for x in 0..(size - 1) {
                let (tl, tr) = (at(x, y), at(x + 1, y));
                let (bl, br) = (at(x, y + 1), at(x + 1, y + 1));
                points.extend([tl, bl, tr]);
                points.extend([tr, bl, br]);
            }
        }
        points
    }

    fn make_tetrahedron() -> Vec<Point3f> {
        let v = [
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.5, 1.0, 0.0),
            Point3f::new(0.5, 0.5, 1.0),
        ];
        [[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]]
            .iter()
            .flat_map(|f| f.map(|i| v[i]))
            .collect()
    }

    fn sorted_triangles(points: &[Point3f]) -> Vec<[PositionKey; 3]> {
        let mut tris: Vec<_> = points
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]].map(|p| PositionKey::new(&p)))
            .collect();
        tris.sort();
        tris
    }

    fn assert_consistent(graph: &MeshGraph) {
        for (tid, tri) in graph.triangles() {
            assert!(tri[0] != tri[1] && tri[1] != tri[2] && tri[2] != tri[0]);
            for v in tri {
                assert!(graph.is_vertex_live(v), "triangle {} uses dead vertex {}", tid, v);
            }
            for edge in triangle_edges(&tri) {
                assert!(graph.edge_triangles(&edge).any(|t| t == tid));
            }
        }
        assert_eq!(graph.faces.len() % 3, 0);
        assert_eq!(graph.triangles().count(), graph.face_count());
        let live = (0..graph.vertices.len()).filter(|&v| graph.is_vertex_live(v)).count();
        assert_eq!(live, graph.vertex_count());
    }

    #[test]
    fn test_add_vertex_dedups_by_position() {
        let mut graph = MeshGraph::new();
        let a = graph.add_vertex(Point3f::new(1.0, 2.0, 3.0)).unwrap();
        let b = graph.add_vertex(Point3f::new(4.0, 5.0, 6.0)).unwrap();
        let c = graph.add_vertex(Point3f::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(a, c);
        assert_ne!(a, b);
        // no faces yet, so nothing is live
        assert_eq!(graph.vertex_count(), 0);
    }

    #[test]
    fn test_add_vertex_rejects_nan() {
        let mut graph = MeshGraph::new();
        assert!(graph.add_vertex(Point3f::new(f32::NAN, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_add_face_ignores_permutations() {
        let mut graph = MeshGraph::from_points(&make_tetrahedron()).unwrap();
        assert_eq!(graph.face_count(), 4);
        let (_, tri) = graph.triangles().next().unwrap();

        assert_eq!(graph.add_face(tri[1], tri[2], tri[0]).unwrap(), None);
        assert_eq!(graph.add_face(tri[2], tri[1], tri[0]).unwrap(), None);
        assert_eq!(graph.add_face(tri[0], tri[0], tri[1]).unwrap(), None);
        assert_eq!(graph.face_count(), 4);
        assert!(graph.add_face(tri[0], tri[1], 99).is_err());
    }

    #[test]
    fn test_tetrahedron_adjacency() {
        let graph = MeshGraph::from_points(&make_tetrahedron()).unwrap();
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.edge_count(), 6);
        for v in 0..4 {
            assert_eq!(graph.degree(v), 3);
            assert_eq!(graph.neighbors(v).len(), 3);
            assert_eq!(graph.vertex_triangles(v).count(), 3);
        }
        for edge in graph.edges() {
            assert_eq!(graph.edge_triangles(&edge).count(), 2);
        }
        assert_consistent(&graph);
    }

    #[test]
    fn test_from_points_rejects_malformed_input() {
        let points = make_tetrahedron();
        assert!(MeshGraph::from_points(&points[..4]).is_err());
        assert!(MeshGraph::from_points(&points[..2]).is_err());
        assert!(MeshGraph::from_points(&[]).is_err());

        let mut bad = points.clone();
        bad[5] = Point3f::new(0.0, f32::INFINITY, 0.0);
        assert!(MeshGraph::from_points(&bad).is_err());
    }

    #[test]
    fn test_from_coords() {
        let coords = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let graph = MeshGraph::from_coords(&coords).unwrap();
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.face_count(), 1);
        assert!(MeshGraph::from_coords(&coords[..8]).is_err());
    }

    #[test]
    fn test_round_trip_preserves_triangles() {
        let points = make_plane_grid(5);
        let graph = MeshGraph::from_points(&points).unwrap();
        assert_eq!(graph.vertex_count(), 25);
        assert_eq!(graph.face_count(), 32);
        assert_eq!(sorted_triangles(&graph.triangle_list()), sorted_triangles(&points));
    }

    #[test]
    fn test_remove_face_is_idempotent() {
        let mut graph = MeshGraph::from_points(&make_tetrahedron()).unwrap();
        assert!(graph.remove_face(0));
        assert!(!graph.remove_face(0));
        assert!(!graph.remove_face(42));
        assert_eq!(graph.face_count(), 3);
        assert_eq!(graph.triangle(0), None);
        // every vertex still has a triangle, every edge of face 0 is shared
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.edge_count(), 6);
        assert_consistent(&graph);
    }

    #[test]
    fn test_remove_face_drops_orphaned_edges_and_vertices() {
        let points = [
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
        ];
        let mut graph = MeshGraph::from_points(&points).unwrap();
        assert!(graph.remove_face(0));
        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_empty());
        assert!(graph.triangle_list().is_empty());

        // the position slot is kept, so re-adding the point revives the same id
        assert_eq!(graph.add_vertex(points[1]).unwrap(), 1);
    }

    #[test]
    fn test_remove_vertex_cascades() {
        let mut graph = MeshGraph::from_points(&make_plane_grid(3)).unwrap();
        let center = graph.find_vertex(&Point3f::new(1.0, 1.0, 0.0)).unwrap();
        assert_eq!(graph.degree(center), 6);

        assert_eq!(graph.remove_vertex(center), 6);
        assert!(!graph.is_vertex_live(center));
        assert_eq!(graph.degree(center), 0);
        assert_eq!(graph.face_count(), 2);
        assert_consistent(&graph);
    }

    #[test]
    fn test_contract_interior_edge() {
        let mut graph = MeshGraph::from_points(&make_plane_grid(5)).unwrap();
        let p = Point3f::new(1.0, 1.0, 0.0);
        let q = Point3f::new(2.0, 1.0, 0.0);
        let (a, b) = (graph.find_vertex(&p).unwrap(), graph.find_vertex(&q).unwrap());
        let edge = Edge::new(a, b);
        assert_eq!(graph.degree(a), 6);
        assert_eq!(graph.degree(b), 6);

        let spanning: Vec<TriangleId> = graph.edge_triangles(&edge).collect();
        assert_eq!(spanning.len(), 2);
        let mid = Point3f::new(1.5, 1.0, 0.0);

        // every surviving triangle, with the endpoints moved to the midpoint
        let expected: Vec<Point3f> = graph
            .triangles()
            .filter(|(tid, _)| !spanning.contains(tid))
            .flat_map(|(_, tri)| {
                tri.map(|v| if v == a || v == b { mid } else { graph.vertices[v].position })
            })
            .collect();

        let merged = graph.contract_edge(edge, mid).unwrap();
        assert_eq!(merged, a);
        assert_eq!(graph.position(merged), Some(mid));
        assert_eq!(graph.vertex_count(), 24);
        assert_eq!(graph.face_count(), 30);
        for tid in spanning {
            assert_eq!(graph.triangle(tid), None);
        }
        assert!(!graph.contains_edge(&edge));
        assert_eq!(sorted_triangles(&graph.triangle_list()), sorted_triangles(&expected));
        assert_eq!(graph.find_vertex(&p), None);
        assert_consistent(&graph);
    }

    #[test]
    fn test_contract_reuses_coincident_vertex() {
        // an isolated triangle has a corner exactly at the midpoint of (l, r)
        let l = Point3f::new(0.0, 0.0, 0.0);
        let r = Point3f::new(1.0, 0.0, 0.0);
        let top = Point3f::new(0.5, 1.0, 0.0);
        let bottom = Point3f::new(0.5, -1.0, 0.0);
        let west = Point3f::new(-1.0, 1.0, 0.0);
        let c = Point3f::new(0.5, 0.0, 0.0);
        let points = vec![
            l, r, top,
            l, bottom, r,
            l, top, west,
            c, Point3f::new(0.0, 0.0, 1.0), Point3f::new(1.0, 0.0, 1.0),
        ];
        let mut graph = MeshGraph::from_points(&points).unwrap();
        let existing = graph.find_vertex(&c).unwrap();
        let (a, b) = (graph.find_vertex(&l).unwrap(), graph.find_vertex(&r).unwrap());

        let merged = graph.contract_edge(Edge::new(a, b), c).unwrap();
        assert_eq!(merged, existing);
        assert!(!graph.is_vertex_live(a));
        assert!(!graph.is_vertex_live(b));
        assert_eq!(graph.face_count(), 2);
        assert_eq!(graph.vertex_count(), 5);
        assert_eq!(graph.neighbors(merged).len(), 4);
        assert_consistent(&graph);
    }

    #[test]
    fn test_contract_unknown_edge() {
        let mut graph = MeshGraph::from_points(&make_tetrahedron()).unwrap();
        let err = graph.contract_edge(Edge::new(0, 17), Point3f::origin()).unwrap_err();
        assert_eq!(err, Error::UnknownEdge { a: 0, b: 17 });
    }

    #[test]
    fn test_submeshes_are_disjoint() {
        let mut points = make_tetrahedron();
        points.extend(make_plane_grid(3).into_iter().map(|p| p + nalgebra::Vector3::new(10.0, 0.0, 0.0)));
        let graph = MeshGraph::from_points(&points).unwrap();

        let components = graph.connected_components();
        assert_eq!(components.len(), 2);
        assert_eq!(components.iter().map(Vec::len).sum::<usize>(), graph.vertex_count());

        let submeshes = graph.submeshes();
        assert_eq!(submeshes.len(), 2);
        let union: Vec<Point3f> = submeshes.iter().flatten().copied().collect();
        assert_eq!(sorted_triangles(&union), sorted_triangles(&graph.triangle_list()));

        let first: HashSet<PositionKey> = submeshes[0].iter().map(PositionKey::new).collect();
        let second: HashSet<PositionKey> = submeshes[1].iter().map(PositionKey::new).collect();
        assert!(first.is_disjoint(&second));

        let graphs = graph.component_graphs().unwrap();
        assert_eq!(graphs.iter().map(MeshGraph::face_count).sum::<usize>(), 12);
    }

    #[test]
    fn test_triangle_mesh_conversion() {
        let mut graph = MeshGraph::from_points(&make_plane_grid(3)).unwrap();
        let corner = graph.find_vertex(&Point3f::new(0.0, 0.0, 0.0)).unwrap();
        graph.remove_vertex(corner);

        let mesh = graph.to_triangle_mesh();
        assert_eq!(mesh.vertex_count(), graph.vertex_count());
        assert_eq!(mesh.face_count(), graph.face_count());
        assert!(mesh.faces.iter().flatten().all(|&i| i < mesh.vertex_count()));

        let rebuilt = MeshGraph::from_triangle_mesh(&mesh).unwrap();
        assert_eq!(
            sorted_triangles(&rebuilt.triangle_list()),
            sorted_triangles(&graph.triangle_list())
        );

        let broken = TriangleMesh::from_vertices_and_faces(mesh.vertices.clone(), vec![[0, 1, 50]]);
        assert!(MeshGraph::from_triangle_mesh(&broken).is_err());
    }
}
