use crate::{
    reconstruct_path, HashMap, NodeIndex, PenalizedGraph, Parent, RelaxationPolicy, Route,
    RouteSet, RoutingError, RoutingResult, WeightedGraph,
};
use tracing::{debug, trace};

/// Per-agent Dijkstra tables.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    start: NodeIndex,
    distance: Vec<f64>,
    parent: Vec<Option<Parent>>,
    visited: Vec<bool>,
}

impl SearchState {
    fn new(num_nodes: usize, start: NodeIndex) -> Self {
        let mut distance = vec![f64::INFINITY; num_nodes];
        let mut parent = vec![None; num_nodes];
        distance[start] = 0.0;
        parent[start] = Some(Parent::Start);
        Self {
            start,
            distance,
            parent,
            visited: vec![false; num_nodes],
        }
    }

    pub fn start(&self) -> NodeIndex {
        self.start
    }

    /// Tentative distance per node, `f64::INFINITY` where unreached.
    pub fn distance(&self) -> &[f64] {
        &self.distance
    }

    pub fn parents(&self) -> &[Option<Parent>] {
        &self.parent
    }

    pub fn visited(&self) -> &[bool] {
        &self.visited
    }

    /// Unvisited node with the smallest distance; ties go to the lowest index.
    fn closest_unvisited(&self) -> Option<NodeIndex> {
        let mut best: Option<NodeIndex> = None;
        for (node, &visited) in self.visited.iter().enumerate() {
            if visited {
                continue;
            }
            if best.map_or(true, |b| self.distance[node] < self.distance[b]) {
                best = Some(node);
            }
        }
        best
    }
}

/// Cooperative shortest-path search for several agents over one graph.
///
/// Agents are relaxed one step at a time in list order, `N - 1` rounds in
/// total. Each step claims the cheapest edge it improved by raising its
/// weight in the shared [`PenalizedGraph`], so agents later in the order
/// (in this round and the following ones) see that edge as more expensive.
/// Agent order therefore affects the result.
///
/// The search is single use: [`MultiAgentSearch::run`] consumes it.
#[derive(Debug)]
pub struct MultiAgentSearch<'a> {
    graph: &'a WeightedGraph,
    penalized: PenalizedGraph,
    penalty_factor: f64,
    policy: RelaxationPolicy,
    states: Vec<SearchState>,
    own_penalties: Vec<HashMap<(NodeIndex, NodeIndex), f64>>,
}

impl<'a> MultiAgentSearch<'a> {
    pub fn new(
        graph: &'a WeightedGraph,
        starts: &[NodeIndex],
        penalty_factor: f64,
    ) -> RoutingResult<Self> {
        Self::with_policy(graph, starts, penalty_factor, RelaxationPolicy::default())
    }

    pub fn with_policy(
        graph: &'a WeightedGraph,
        starts: &[NodeIndex],
        penalty_factor: f64,
        policy: RelaxationPolicy,
    ) -> RoutingResult<Self> {
        if !penalty_factor.is_finite() || penalty_factor < 0.0 {
            return Err(RoutingError::InvalidPenaltyFactor { penalty_factor });
        }
        let num_nodes = graph.num_nodes();
        for (agent, &start) in starts.iter().enumerate() {
            if start >= num_nodes {
                return Err(RoutingError::InvalidAgentStart {
                    agent,
                    start,
                    num_nodes,
                });
            }
        }
        Ok(Self {
            graph,
            penalized: PenalizedGraph::new(graph),
            penalty_factor,
            policy,
            states: starts
                .iter()
                .map(|&start| SearchState::new(num_nodes, start))
                .collect(),
            own_penalties: starts.iter().map(|_| HashMap::default()).collect(),
        })
    }

    pub fn run(mut self) -> SearchResult {
        let num_nodes = self.graph.num_nodes();
        for _ in 1..num_nodes {
            for agent in 0..self.states.len() {
                self.relax(agent);
            }
        }
        debug!(
            num_nodes,
            num_agents = self.states.len(),
            penalty_factor = self.penalty_factor,
            policy = ?self.policy,
            "cooperative search finished"
        );
        SearchResult {
            states: self.states,
            penalized: self.penalized,
        }
    }

    fn relax(&mut self, agent: usize) {
        let Self {
            graph,
            penalized,
            penalty_factor,
            policy,
            states,
            own_penalties,
        } = self;
        let graph: &WeightedGraph = graph;
        let state = &mut states[agent];
        let own = &mut own_penalties[agent];

        let u = match state.closest_unvisited() {
            Some(u) => u,
            None => return,
        };
        state.visited[u] = true;
        let du = state.distance[u];
        if !du.is_finite() {
            return;
        }

        let mut selected: Option<NodeIndex> = None;
        for v in 0..graph.num_nodes() {
            if state.visited[v] {
                continue;
            }
            let w = match policy {
                RelaxationPolicy::SharedPenalties => penalized.weight(u, v),
                RelaxationPolicy::SelfCorrected => {
                    let claimed = own.get(&(u, v)).copied().unwrap_or(0.0);
                    (penalized.weight(u, v) - claimed).max(graph.weight(u, v))
                }
            };
            if w > 0.0 && du + w < state.distance[v] {
                state.distance[v] = du + w;
                state.parent[v] = Some(Parent::Node(u));
                if selected.map_or(true, |s| state.distance[v] < state.distance[s]) {
                    selected = Some(v);
                }
            }
        }

        if let Some(v) = selected {
            penalized.penalize(graph, u, v, *penalty_factor);
            if *policy == RelaxationPolicy::SelfCorrected {
                *own.entry((u, v)).or_insert(0.0) += graph.weight(u, v) * *penalty_factor;
                *own.entry((v, u)).or_insert(0.0) += graph.weight(v, u) * *penalty_factor;
            }
            trace!(agent, from = u, to = v, "penalized edge");
        }
    }
}

/// Read-only output of a finished [`MultiAgentSearch`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    states: Vec<SearchState>,
    penalized: PenalizedGraph,
}

impl SearchResult {
    pub fn num_agents(&self) -> usize {
        self.states.len()
    }

    /// Panics if `agent >= self.num_agents()`.
    pub fn state(&self, agent: usize) -> &SearchState {
        &self.states[agent]
    }

    pub fn states(&self) -> &[SearchState] {
        &self.states
    }

    /// The working graph with every penalty applied during the run.
    pub fn penalized_graph(&self) -> &PenalizedGraph {
        &self.penalized
    }

    pub fn path(&self, agent: usize, destination: NodeIndex) -> RoutingResult<Route> {
        let state = self
            .states
            .get(agent)
            .ok_or(RoutingError::UnknownAgent {
                agent,
                num_agents: self.states.len(),
            })?;
        if destination >= state.parent.len() {
            return Err(RoutingError::InvalidDestination {
                agent,
                destination,
                num_nodes: state.parent.len(),
            });
        }
        reconstruct_path(&state.parent, destination, Some(state.start))
    }

    /// One route per agent, `destinations[i]` belonging to agent `i`.
    pub fn paths(&self, destinations: &[NodeIndex]) -> RoutingResult<RouteSet> {
        if destinations.len() != self.states.len() {
            return Err(RoutingError::AgentCountMismatch {
                expected: self.states.len(),
                actual: destinations.len(),
            });
        }
        destinations
            .iter()
            .enumerate()
            .map(|(agent, &destination)| self.path(agent, destination))
            .collect()
    }
}
