//! Independent simplification of disconnected components
//!
//! Each connected component gets its own [`MeshGraph`], [`Simplifier`] and
//! queue, so components can be decimated on separate rayon workers without
//! sharing any mutable state.

use meshfuse_core::{Error, MeshGraph, Result};
use rayon::prelude::*;
use tracing::debug;

use crate::config::SimplifierConfig;
use crate::edge_fuse::{validate_ratio, vertices_to_remove};
use crate::simplifier::Simplifier;

/// Split `graph` into connected components and simplify each in parallel,
/// removing `reduction_ratio` of every component's vertices.
pub fn simplify_components_parallel(
    graph: &MeshGraph,
    config: SimplifierConfig,
    reduction_ratio: f32,
) -> Result<Vec<MeshGraph>> {
    validate_ratio(reduction_ratio)?;
    let components = graph.component_graphs()?;
    debug!("Simplifying {} components in parallel", components.len());

    components
        .into_par_iter()
        .map(|component| {
            let count = vertices_to_remove(component.vertex_count(), reduction_ratio);
            let mut simplifier = Simplifier::with_config(vec![component], config)?;
            simplifier.remove_next(count)?;
            simplifier
                .into_meshes()
                .pop()
                .ok_or_else(|| Error::Algorithm("Simplifier lost its mesh".to_string()))
        })
        .collect()
}
