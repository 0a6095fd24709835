use crate::{NodeIndex, Route, RoutingError, RoutingResult};

/// Back-reference of a node in a shortest-path tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    /// The node is the root the search started from.
    Start,
    Node(NodeIndex),
}

/// Walks `parents` back from `destination` and returns the route in forward
/// order. `None` entries mark nodes the search never reached.
///
/// Without an explicit `start` the walk ends at the [`Parent::Start`] entry.
/// With one, it ends on reaching that node, and running into a different
/// root is an error.
///
/// Fails with [`RoutingError::PathNotFound`] if the destination is out of
/// range, unreached, or the walk takes more steps than there are nodes.
pub fn reconstruct_path(
    parents: &[Option<Parent>],
    destination: NodeIndex,
    start: Option<NodeIndex>,
) -> RoutingResult<Route> {
    let not_found = RoutingError::PathNotFound { destination };
    if destination >= parents.len() {
        return Err(not_found);
    }

    let mut route = vec![destination];
    let mut current = destination;
    for _ in 0..parents.len() {
        if start == Some(current) {
            route.reverse();
            return Ok(route);
        }
        match parents[current] {
            Some(Parent::Start) if start.is_none() => {
                route.reverse();
                return Ok(route);
            }
            Some(Parent::Node(previous)) if previous < parents.len() => {
                route.push(previous);
                current = previous;
            }
            _ => return Err(not_found),
        }
    }
    Err(not_found)
}
