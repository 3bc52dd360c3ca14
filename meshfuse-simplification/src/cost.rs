//! Contraction cost of a mesh edge
//!
//! In [`CostMode::Curvature`] the cost approximates how much the surface
//! around an edge would bend if its endpoints were merged at the midpoint:
//! every triangle touching either endpoint (other than the ones spanning the
//! edge) contributes the angle its normal would turn through, and the sum is
//! scaled by the edge length.

use std::collections::BTreeSet;

use meshfuse_core::{midpoint, Edge, Error, MeshGraph, Point3f, Result, Vector3f};

use crate::config::CostMode;

/// Unit normal of a triangle. NaN for zero-area triangles.
pub fn face_normal(corners: &[Point3f; 3]) -> Vector3f {
    let e1 = corners[1] - corners[0];
    let e2 = corners[2] - corners[0];
    e1.cross(&e2).normalize()
}

/// Angle between the normals of two versions of a triangle, NaN when either
/// is degenerate.
fn normal_deviation(before: &[Point3f; 3], after: &[Point3f; 3]) -> f32 {
    face_normal(before)
        .dot(&face_normal(after))
        .clamp(-1.0, 1.0)
        .acos()
}

/// Cost of contracting `edge` to its midpoint.
pub fn contraction_cost(graph: &MeshGraph, edge: Edge, mode: CostMode) -> Result<f64> {
    let (p1, p2) = edge.vertices();
    let (a, b) = match (graph.position(p1), graph.position(p2)) {
        (Some(a), Some(b)) if graph.contains_edge(&edge) => (a, b),
        _ => return Err(Error::UnknownEdge { a: p1, b: p2 }),
    };

    let length = (b - a).norm() as f64;
    if mode == CostMode::LengthOnly {
        return Ok(length);
    }

    let mid = midpoint(&a, &b);
    let spanning: BTreeSet<_> = graph.edge_triangles(&edge).collect();
    let mut deviation = 0.0f64;

    for endpoint in [p1, p2] {
        for tid in graph.vertex_triangles(endpoint) {
            if spanning.contains(&tid) {
                continue;
            }
            let (Some(tri), Some(before)) = (graph.triangle(tid), graph.triangle_positions(tid))
            else {
                continue;
            };

            let mut after = before;
            for (corner, &v) in after.iter_mut().zip(tri.iter()) {
                if v == endpoint {
                    *corner = mid;
                }
            }

            let angle = normal_deviation(&before, &after);
            if angle.is_nan() {
                continue;
            }
            deviation += angle as f64;
        }
    }

    Ok(length * deviation)
}
