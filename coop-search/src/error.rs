use crate::NodeIndex;

#[derive(Debug, Clone, PartialEq)]
pub enum RoutingError {
    AgentCountMismatch {
        expected: usize,
        actual: usize,
    },
    InvalidAgentStart {
        agent: usize,
        start: NodeIndex,
        num_nodes: usize,
    },
    InvalidCoopShare {
        coop_share: f64,
    },
    InvalidDestination {
        agent: usize,
        destination: NodeIndex,
        num_nodes: usize,
    },
    InvalidGraph {
        reason: String,
    },
    InvalidPenaltyFactor {
        penalty_factor: f64,
    },
    InvalidRoute {
        agent: usize,
        node: NodeIndex,
        num_nodes: usize,
    },
    MissingDestination {
        agent: usize,
    },
    PathNotFound {
        destination: NodeIndex,
    },
    UnknownAgent {
        agent: usize,
        num_agents: usize,
    },
}

impl std::fmt::Display for RoutingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutingError::AgentCountMismatch { expected, actual } => write!(
                f,
                "Expected one entry per agent ({}), got {}",
                expected, actual
            ),
            RoutingError::InvalidAgentStart {
                agent,
                start,
                num_nodes,
            } => write!(
                f,
                "Agent {} starts at node {} which is outside of the graph ({} nodes)",
                agent, start, num_nodes
            ),
            RoutingError::InvalidCoopShare { coop_share } => {
                write!(f, "Cooperation share {} is not within [0, 1]", coop_share)
            }
            RoutingError::InvalidDestination {
                agent,
                destination,
                num_nodes,
            } => write!(
                f,
                "Agent {} has destination {} which is outside of the graph ({} nodes)",
                agent, destination, num_nodes
            ),
            RoutingError::InvalidGraph { reason } => write!(f, "Invalid graph: {}", reason),
            RoutingError::InvalidPenaltyFactor { penalty_factor } => write!(
                f,
                "Penalty factor {} must be finite and non-negative",
                penalty_factor
            ),
            RoutingError::InvalidRoute {
                agent,
                node,
                num_nodes,
            } => write!(
                f,
                "Route of agent {} visits node {} which is outside of the graph ({} nodes)",
                agent, node, num_nodes
            ),
            RoutingError::MissingDestination { agent } => {
                write!(f, "Agent {} has no destination", agent)
            }
            RoutingError::PathNotFound { destination } => {
                write!(f, "No path leads to node {}", destination)
            }
            RoutingError::UnknownAgent { agent, num_agents } => write!(
                f,
                "Agent {} does not exist, the search has {} agents",
                agent, num_agents
            ),
        }
    }
}

impl std::error::Error for RoutingError {}

pub type RoutingResult<T> = std::result::Result<T, RoutingError>;
