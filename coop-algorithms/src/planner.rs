use crate::hill_climb::RouteOptimizer;
use coop_search::{
    MultiAgentSearch, NodeIndex, RouteSet, RoutingError, RoutingResult, WeightedGraph,
};
use coop_structs::{
    config::{PlannerConfig, RoutingMode},
    core::AgentSpec,
};
use rand::{seq::SliceRandom, Rng};
use tracing::info;

/// One routing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agent {
    pub start: NodeIndex,
    pub destination: Option<NodeIndex>,
}

impl Agent {
    pub fn new(start: NodeIndex, destination: NodeIndex) -> Self {
        Self {
            start,
            destination: Some(destination),
        }
    }
}

impl From<&AgentSpec> for Agent {
    fn from(spec: &AgentSpec) -> Self {
        Self {
            start: spec.start,
            destination: spec.destination,
        }
    }
}

fn endpoints(
    graph: &WeightedGraph,
    agents: &[Agent],
) -> RoutingResult<(Vec<NodeIndex>, Vec<NodeIndex>)> {
    let mut starts = Vec::with_capacity(agents.len());
    let mut destinations = Vec::with_capacity(agents.len());
    for (agent, a) in agents.iter().enumerate() {
        let destination = a
            .destination
            .ok_or(RoutingError::MissingDestination { agent })?;
        if !graph.contains(destination) {
            return Err(RoutingError::InvalidDestination {
                agent,
                destination,
                num_nodes: graph.num_nodes(),
            });
        }
        starts.push(a.start);
        destinations.push(destination);
    }
    Ok((starts, destinations))
}

/// Independent shortest paths, one per agent.
pub fn individual_routes(graph: &WeightedGraph, agents: &[Agent]) -> RoutingResult<RouteSet> {
    let (starts, destinations) = endpoints(graph, agents)?;
    MultiAgentSearch::new(graph, &starts, 0.0)?
        .run()
        .paths(&destinations)
}

/// Penalised cooperative search, hill-climbed when `config.optimize` is set.
pub fn cooperative_routes<R: Rng>(
    graph: &WeightedGraph,
    agents: &[Agent],
    config: &PlannerConfig,
    rng: &mut R,
) -> RoutingResult<RouteSet> {
    let (starts, destinations) = endpoints(graph, agents)?;
    let routes = MultiAgentSearch::with_policy(
        graph,
        &starts,
        config.penalty_factor,
        config.policy,
    )?
    .run()
    .paths(&destinations)?;
    if !config.optimize {
        return Ok(routes);
    }
    let outcome = RouteOptimizer::new(graph, config.optimizer.clone()).optimize(routes, rng)?;
    Ok(outcome.routes)
}

/// Routes agents with `is_coop[i]` set cooperatively among themselves and
/// the others individually. Each group keeps the relative order of `agents`.
pub fn flagged_routes<R: Rng>(
    graph: &WeightedGraph,
    agents: &[Agent],
    is_coop: &[bool],
    config: &PlannerConfig,
    rng: &mut R,
) -> RoutingResult<RouteSet> {
    if is_coop.len() != agents.len() {
        return Err(RoutingError::AgentCountMismatch {
            expected: agents.len(),
            actual: is_coop.len(),
        });
    }
    let (coop_ind, solo_ind): (Vec<usize>, Vec<usize>) =
        (0..agents.len()).partition(|&i| is_coop[i]);
    let pick = |indices: &[usize]| indices.iter().map(|&i| agents[i]).collect::<Vec<_>>();

    let coop_routes = cooperative_routes(graph, &pick(&coop_ind), config, rng)?;
    let solo_routes = individual_routes(graph, &pick(&solo_ind))?;

    let mut routes: RouteSet = vec![Vec::new(); agents.len()];
    for (i, route) in coop_ind.into_iter().zip(coop_routes) {
        routes[i] = route;
    }
    for (i, route) in solo_ind.into_iter().zip(solo_routes) {
        routes[i] = route;
    }
    Ok(routes)
}

/// Routes `round(n * config.coop_share)` randomly drawn agents cooperatively
/// and the rest individually.
pub fn mixed_routes<R: Rng>(
    graph: &WeightedGraph,
    agents: &[Agent],
    config: &PlannerConfig,
    rng: &mut R,
) -> RoutingResult<RouteSet> {
    let coop_share = config.coop_share;
    if !(0.0..=1.0).contains(&coop_share) {
        return Err(RoutingError::InvalidCoopShare { coop_share });
    }
    if coop_share == 1.0 {
        return cooperative_routes(graph, agents, config, rng);
    }
    if coop_share == 0.0 {
        return individual_routes(graph, agents);
    }
    let num_coop = (agents.len() as f64 * coop_share).round() as usize;
    let mut order: Vec<usize> = (0..agents.len()).collect();
    order.shuffle(rng);
    let mut is_coop = vec![false; agents.len()];
    for &i in &order[..num_coop] {
        is_coop[i] = true;
    }
    flagged_routes(graph, agents, &is_coop, config, rng)
}

pub fn plan_routes<R: Rng>(
    graph: &WeightedGraph,
    agents: &[Agent],
    mode: RoutingMode,
    config: &PlannerConfig,
    rng: &mut R,
) -> RoutingResult<RouteSet> {
    info!(
        ?mode,
        num_agents = agents.len(),
        num_nodes = graph.num_nodes(),
        penalty_factor = config.penalty_factor,
        "planning routes"
    );
    match mode {
        RoutingMode::Cooperative => cooperative_routes(graph, agents, config, rng),
        RoutingMode::Individual => individual_routes(graph, agents),
        RoutingMode::Mixed => mixed_routes(graph, agents, config, rng),
    }
}
