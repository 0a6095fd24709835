use anyhow::{anyhow, Result};
use coop_algorithms::planner::{flagged_routes, plan_routes, Agent};
use coop_search::{cost_report, RouteSet, WeightedGraph};
use coop_structs::{
    config::RoutingMode,
    core::{RoutingOutput, Scenario},
};
use coop_utils::{jsonify, rng_from_seed, seed_from_label, seed_from_u64};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

pub type RouteMap = BTreeMap<String, Vec<usize>>;

/// Seed precedence: explicit, then the scenario's own, then a hash of the
/// scenario document.
pub fn scenario_seed(scenario: &Scenario, seed: Option<u64>) -> Result<[u8; 32]> {
    match seed.or(scenario.seed) {
        Some(seed) => Ok(seed_from_u64(seed)),
        None => Ok(seed_from_label(&jsonify(scenario)?)),
    }
}

/// Routes are keyed by agent id, so every id must be unique.
pub fn check_agent_ids(scenario: &Scenario) -> Result<()> {
    let mut seen = BTreeSet::new();
    for agent in &scenario.agents {
        if !seen.insert(agent.id.as_str()) {
            return Err(anyhow!("Agent id '{}' is used more than once", agent.id));
        }
    }
    Ok(())
}

fn agents_of(scenario: &Scenario) -> Vec<Agent> {
    scenario.agents.iter().map(Agent::from).collect()
}

fn keyed(scenario: &Scenario, routes: RouteSet) -> RouteMap {
    scenario.agent_ids().into_iter().zip(routes).collect()
}

/// Plans every agent of `scenario`. In mixed mode, per-agent `cooperative`
/// flags take the place of the random split when every agent carries one.
pub fn route_scenario(
    scenario: &Scenario,
    mode: RoutingMode,
    seed: Option<u64>,
) -> Result<RoutingOutput> {
    check_agent_ids(scenario)?;
    let graph = WeightedGraph::new(scenario.adjacency_matrix.clone())?;
    let agents = agents_of(scenario);
    let config = scenario.planner_config();
    let mut rng = rng_from_seed(&scenario_seed(scenario, seed)?);

    let routes = match (mode, scenario.cooperation_flags()) {
        (RoutingMode::Mixed, Some(is_coop)) => {
            info!(
                num_coop = is_coop.iter().filter(|&&c| c).count(),
                "using per-agent cooperation flags"
            );
            flagged_routes(&graph, &agents, &is_coop, &config, &mut rng)?
        }
        _ => plan_routes(&graph, &agents, mode, &config, &mut rng)?,
    };
    let cost = cost_report(&routes);
    info!(
        visited_nodes = cost.visited_nodes,
        overlap = cost.overlap,
        total = cost.total,
        "routes planned"
    );
    Ok(RoutingOutput {
        routes: keyed(scenario, routes),
        cost,
    })
}

/// Scores externally supplied routes, one per scenario agent.
pub fn evaluate_routes(scenario: &Scenario, routes: &RouteMap) -> Result<RoutingOutput> {
    check_agent_ids(scenario)?;
    let graph = WeightedGraph::new(scenario.adjacency_matrix.clone())?;
    let mut ordered = RouteSet::with_capacity(scenario.agents.len());
    for agent in &scenario.agents {
        let route = routes
            .get(&agent.id)
            .ok_or_else(|| anyhow!("No route given for agent '{}'", agent.id))?;
        if let Some(&node) = route.iter().find(|&&n| !graph.contains(n)) {
            return Err(anyhow!(
                "Route of agent '{}' visits node {} which is outside of the graph ({} nodes)",
                agent.id,
                node,
                graph.num_nodes()
            ));
        }
        if route.first() != Some(&agent.start)
            || agent.destination.is_some_and(|d| route.last() != Some(&d))
        {
            warn!(agent = %agent.id, "route does not connect the agent's endpoints");
        }
        ordered.push(route.clone());
    }
    for id in routes.keys() {
        if !scenario.agents.iter().any(|a| &a.id == id) {
            warn!(agent = %id, "ignoring route of unknown agent");
        }
    }
    let cost = cost_report(&ordered);
    Ok(RoutingOutput {
        routes: keyed(scenario, ordered),
        cost,
    })
}
