use crate::{NodeIndex, RoutingError, RoutingResult};

/// Immutable weighted adjacency matrix. `weights[i][j] == 0` means there is
/// no edge from `i` to `j`. Symmetry is not assumed.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedGraph {
    weights: Vec<Vec<f64>>,
}

impl WeightedGraph {
    pub fn new(weights: Vec<Vec<f64>>) -> RoutingResult<Self> {
        let num_nodes = weights.len();
        if num_nodes == 0 {
            return Err(RoutingError::InvalidGraph {
                reason: "graph has no nodes".to_string(),
            });
        }
        for (i, row) in weights.iter().enumerate() {
            if row.len() != num_nodes {
                return Err(RoutingError::InvalidGraph {
                    reason: format!(
                        "row {} has {} entries, expected {}",
                        i,
                        row.len(),
                        num_nodes
                    ),
                });
            }
            for (j, &w) in row.iter().enumerate() {
                if !w.is_finite() || w < 0.0 {
                    return Err(RoutingError::InvalidGraph {
                        reason: format!(
                            "weight {} on edge ({}, {}) is not a finite non-negative number",
                            w, i, j
                        ),
                    });
                }
            }
        }
        Ok(Self { weights })
    }

    pub fn from_rows<T>(rows: &[Vec<T>]) -> RoutingResult<Self>
    where
        T: Copy + Into<f64>,
    {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|&w| w.into()).collect())
                .collect(),
        )
    }

    pub fn num_nodes(&self) -> usize {
        self.weights.len()
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        node < self.num_nodes()
    }

    pub fn weight(&self, from: NodeIndex, to: NodeIndex) -> f64 {
        self.weights[from][to]
    }

    pub fn has_edge(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.weights[from][to] > 0.0
    }

    /// Nodes reachable from `node` over a single edge, in index order.
    pub fn neighbors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.weights[node]
            .iter()
            .enumerate()
            .filter(|(_, &w)| w > 0.0)
            .map(|(j, _)| j)
    }

    pub fn weights(&self) -> &[Vec<f64>] {
        &self.weights
    }
}

/// Working copy of a [`WeightedGraph`] whose weights only ever grow.
#[derive(Debug, Clone, PartialEq)]
pub struct PenalizedGraph {
    weights: Vec<Vec<f64>>,
}

impl PenalizedGraph {
    pub fn new(base: &WeightedGraph) -> Self {
        Self {
            weights: base.weights.clone(),
        }
    }

    pub fn weight(&self, from: NodeIndex, to: NodeIndex) -> f64 {
        self.weights[from][to]
    }

    /// Raises `(a, b)` and `(b, a)` by `penalty_factor` times their own base
    /// weight. A direction absent from the base graph stays absent.
    pub fn penalize(
        &mut self,
        base: &WeightedGraph,
        a: NodeIndex,
        b: NodeIndex,
        penalty_factor: f64,
    ) {
        self.weights[a][b] += base.weight(a, b) * penalty_factor;
        self.weights[b][a] += base.weight(b, a) * penalty_factor;
    }

    pub fn weights(&self) -> &[Vec<f64>] {
        &self.weights
    }
}
