use crate::{config::PlannerConfig, serializable_struct_with_getters};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

serializable_struct_with_getters! {
    AgentSpec {
        id: String,
        start: usize,
        destination: Option<usize>,
        cooperative: Option<bool>,
    }
}

serializable_struct_with_getters! {
    Scenario {
        adjacency_matrix: Vec<Vec<f64>>,
        agents: Vec<AgentSpec>,
        penalty_factor: Option<f64>,
        seed: Option<u64>,
        planner: Option<PlannerConfig>,
    }
}

impl Scenario {
    pub fn starts(&self) -> Vec<usize> {
        self.agents.iter().map(|a| a.start).collect()
    }

    pub fn destinations(&self) -> Vec<Option<usize>> {
        self.agents.iter().map(|a| a.destination).collect()
    }

    pub fn agent_ids(&self) -> Vec<String> {
        self.agents.iter().map(|a| a.id.clone()).collect()
    }

    /// Per-agent cooperation flags, only when every agent carries one.
    pub fn cooperation_flags(&self) -> Option<Vec<bool>> {
        self.agents.iter().map(|a| a.cooperative).collect()
    }

    /// The scenario's planner settings with a top-level `penalty_factor`
    /// taking precedence.
    pub fn planner_config(&self) -> PlannerConfig {
        let mut config = self.planner.clone().unwrap_or_default();
        if let Some(penalty_factor) = self.penalty_factor {
            config.penalty_factor = penalty_factor;
        }
        config
    }
}

serializable_struct_with_getters! {
    CostReport {
        visited_nodes: usize,
        overlap: usize,
        total: usize,
    }
}

serializable_struct_with_getters! {
    RoutingOutput {
        routes: BTreeMap<String, Vec<usize>>,
        cost: CostReport,
    }
}
