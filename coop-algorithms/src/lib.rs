pub mod hill_climb;
pub mod planner;

pub(crate) type HashSet<T> = std::collections::HashSet<T, ahash::RandomState>;
