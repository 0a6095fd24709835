pub mod cost;
pub mod error;
pub mod graph;
pub mod path;
pub mod search;

pub use cost::*;
pub use error::*;
pub use graph::*;
pub use path::*;
pub use search::*;

pub use coop_structs::{config::RelaxationPolicy, core::CostReport};

pub type NodeIndex = usize;
/// Node sequence from an agent's start to its destination, both inclusive.
pub type Route = Vec<NodeIndex>;
/// Routes indexed by agent position.
pub type RouteSet = Vec<Route>;

pub(crate) type HashMap<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;
pub(crate) type HashSet<T> = std::collections::HashSet<T, ahash::RandomState>;
