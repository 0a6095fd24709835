use crate::{HashSet, NodeIndex, Route};
use coop_structs::core::CostReport;

pub fn visited_node_count(routes: &[Route]) -> usize {
    routes.iter().map(|route| route.len()).sum()
}

/// Number of edge traversals that repeat one already counted.
///
/// Every route contributes each of its consecutive pairs twice, once as
/// travelled and once reversed, so a road segment shared by two routes counts
/// regardless of the direction either of them drives it.
pub fn overlap_count(routes: &[Route]) -> usize {
    let mut distinct: HashSet<(NodeIndex, NodeIndex)> = HashSet::default();
    let mut total = 0;
    for route in routes {
        for pair in route.windows(2) {
            distinct.insert((pair[0], pair[1]));
            distinct.insert((pair[1], pair[0]));
            total += 2;
        }
    }
    total - distinct.len()
}

pub fn total_cost(routes: &[Route]) -> usize {
    visited_node_count(routes) + overlap_count(routes)
}

pub fn cost_report(routes: &[Route]) -> CostReport {
    let visited_nodes = visited_node_count(routes);
    let overlap = overlap_count(routes);
    CostReport {
        visited_nodes,
        overlap,
        total: visited_nodes + overlap,
    }
}
