use crate::HashSet;
use anyhow::{anyhow, Result};
use coop_search::{
    total_cost, MultiAgentSearch, NodeIndex, Route, RouteSet, RoutingError, RoutingResult,
    WeightedGraph,
};
use coop_structs::config::OptimizerConfig;
use rand::Rng;
use serde_json::{Map, Value};
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationOutcome {
    pub routes: RouteSet,
    /// Total cost of the input followed by the cost after every iteration.
    pub cost_history: Vec<usize>,
    pub iterations: usize,
    pub accepted_moves: usize,
}

enum Step {
    /// No route has an interior node with context on both sides.
    Exhausted,
    Skipped,
    Accepted(usize, RouteSet, usize),
}

/// Greedy hill climb over a route set.
///
/// Each iteration picks a random route longer than three nodes and a random
/// interior node on it, then detours the route through a random graph
/// neighbour of that node that is not already next to it on the route. The
/// detour is rebuilt from shortest paths `left -> neighbour -> right`, where
/// `left` and `right` sit two positions either side of the node (clamped to
/// the route ends). Detours that revisit a node are discarded and the rest are
/// kept only if they strictly lower [`total_cost`].
///
/// Stops after `max_iterations`, once the last `plateau_window` recorded
/// costs are identical, or when no route is long enough to change.
pub struct RouteOptimizer<'a> {
    graph: &'a WeightedGraph,
    config: OptimizerConfig,
}

impl<'a> RouteOptimizer<'a> {
    pub fn new(graph: &'a WeightedGraph, config: OptimizerConfig) -> Self {
        Self { graph, config }
    }

    pub fn optimize<R: Rng>(
        &self,
        routes: RouteSet,
        rng: &mut R,
    ) -> RoutingResult<OptimizationOutcome> {
        let num_nodes = self.graph.num_nodes();
        for (agent, route) in routes.iter().enumerate() {
            if let Some(&node) = route.iter().find(|&&n| n >= num_nodes) {
                return Err(RoutingError::InvalidRoute {
                    agent,
                    node,
                    num_nodes,
                });
            }
        }

        let mut routes = routes;
        let mut cost = total_cost(&routes);
        let mut cost_history = vec![cost];
        let mut iterations = 0;
        let mut accepted_moves = 0;

        while iterations < self.config.max_iterations {
            let step = self.step(&routes, cost, rng);
            if matches!(step, Step::Exhausted) {
                break;
            }
            iterations += 1;
            if let Step::Accepted(agent, improved, new_cost) = step {
                debug!(agent, from = cost, to = new_cost, "accepted detour");
                routes = improved;
                cost = new_cost;
                accepted_moves += 1;
            }
            cost_history.push(cost);
            if self.on_plateau(&cost_history) {
                break;
            }
        }

        debug!(
            iterations,
            accepted_moves,
            initial_cost = cost_history[0],
            final_cost = cost,
            "route optimization finished"
        );
        Ok(OptimizationOutcome {
            routes,
            cost_history,
            iterations,
            accepted_moves,
        })
    }

    fn on_plateau(&self, cost_history: &[usize]) -> bool {
        let window = self.config.plateau_window;
        window > 0
            && cost_history.len() > window
            && cost_history[cost_history.len() - window..]
                .iter()
                .all(|&c| c == cost_history[cost_history.len() - 1])
    }

    fn step<R: Rng>(&self, routes: &RouteSet, cost: usize, rng: &mut R) -> Step {
        let eligible: Vec<usize> = (0..routes.len())
            .filter(|&agent| routes[agent].len() > 3)
            .collect();
        if eligible.is_empty() {
            return Step::Exhausted;
        }
        let agent = eligible[rng.gen_range(0..eligible.len())];
        let route = &routes[agent];

        let node_ind = rng.gen_range(1..route.len() - 1);
        let node = route[node_ind];
        let on_path = (route[node_ind - 1], route[node_ind + 1]);
        let candidates: Vec<NodeIndex> = self
            .graph
            .neighbors(node)
            .filter(|&n| n != on_path.0 && n != on_path.1)
            .collect();
        if candidates.is_empty() {
            trace!(agent, node, "no detour available");
            return Step::Skipped;
        }
        let move_to = candidates[rng.gen_range(0..candidates.len())];

        let left_ind = node_ind.saturating_sub(2);
        let right_ind = (node_ind + 2).min(route.len() - 1);
        let new_route = match self.detour(route, left_ind, move_to, right_ind) {
            Some(new_route) => new_route,
            None => {
                trace!(agent, node, move_to, "detour rejected");
                return Step::Skipped;
            }
        };

        let mut candidate_routes = routes.clone();
        candidate_routes[agent] = new_route;
        let new_cost = total_cost(&candidate_routes);
        if new_cost < cost {
            Step::Accepted(agent, candidate_routes, new_cost)
        } else {
            trace!(agent, node, move_to, new_cost, "detour does not improve");
            Step::Skipped
        }
    }

    /// `route[..left_ind] + (left -> move_to) + (move_to -> right) + route[right_ind..]`
    /// with the joints counted once, or `None` if either leg is unreachable
    /// or the result revisits a node.
    fn detour(
        &self,
        route: &Route,
        left_ind: usize,
        move_to: NodeIndex,
        right_ind: usize,
    ) -> Option<Route> {
        let left = route[left_ind];
        let right = route[right_ind];
        let legs = MultiAgentSearch::new(self.graph, &[left, move_to], 0.0)
            .ok()?
            .run();
        let left_path = legs.path(0, move_to).ok()?;
        let right_path = legs.path(1, right).ok()?;

        let mut new_route = Vec::with_capacity(route.len() + left_path.len() + right_path.len());
        new_route.extend_from_slice(&route[..left_ind]);
        new_route.extend_from_slice(&left_path);
        if right_path.len() > 2 {
            new_route.extend_from_slice(&right_path[1..right_path.len() - 1]);
        }
        new_route.extend_from_slice(&route[right_ind..]);

        let mut seen: HashSet<NodeIndex> = HashSet::default();
        if new_route.iter().all(|&n| seen.insert(n)) {
            Some(new_route)
        } else {
            None
        }
    }
}

/// Hill-climbs `routes` with settings read from a hyperparameter map
/// (`max_iterations`, `plateau_window`).
pub fn optimize_routes<R: Rng>(
    graph: &WeightedGraph,
    routes: RouteSet,
    hyperparameters: &Option<Map<String, Value>>,
    rng: &mut R,
) -> Result<RouteSet> {
    let config = OptimizerConfig::from_hyperparameters(hyperparameters)
        .map_err(|e| anyhow!("Invalid optimizer hyperparameters: {}", e))?;
    let outcome = RouteOptimizer::new(graph, config).optimize(routes, rng)?;
    Ok(outcome.routes)
}
