//! Simplifier configuration

/// How the contraction cost of an edge is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CostMode {
    /// Edge length scaled by the summed normal deviation of the surrounding
    /// triangles when either endpoint moves to the edge midpoint.
    #[default]
    Curvature,
    /// Plain Euclidean edge length.
    LengthOnly,
}

/// Configuration for the greedy edge-contraction simplifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplifierConfig {
    /// Cost function used to rank candidate edges
    pub cost_mode: CostMode,
    /// Stop count-driven simplification once the cheapest candidate costs more than this
    pub max_cost: Option<f64>,
}

impl Default for SimplifierConfig {
    fn default() -> Self {
        Self {
            cost_mode: CostMode::Curvature,
            max_cost: None,
        }
    }
}

impl SimplifierConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration ranking edges by length alone.
    pub fn length_only() -> Self {
        Self::default().with_cost_mode(CostMode::LengthOnly)
    }

    pub fn with_cost_mode(mut self, cost_mode: CostMode) -> Self {
        self.cost_mode = cost_mode;
        self
    }

    pub fn with_max_cost(mut self, max_cost: f64) -> Self {
        self.max_cost = Some(max_cost);
        self
    }
}
