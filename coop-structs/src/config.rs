use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How an agent sees the penalised graph while relaxing.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RelaxationPolicy {
    /// Every agent relaxes over the single shared penalised graph.
    #[default]
    SharedPenalties,
    /// Each agent first subtracts the penalties it applied itself, so it only
    /// reacts to other agents' claims. Routes match `SharedPenalties`, since
    /// an agent never relaxes an edge it penalised itself.
    SelfCorrected,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoutingMode {
    Cooperative,
    Individual,
    Mixed,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct OptimizerConfig {
    pub max_iterations: usize,
    /// Stop once this many consecutive recorded costs are identical. 0 disables.
    pub plateau_window: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            plateau_window: 100,
        }
    }
}

impl OptimizerConfig {
    /// Missing keys fall back to the defaults; unknown keys are ignored.
    pub fn from_hyperparameters(
        hyperparameters: &Option<Map<String, Value>>,
    ) -> serde_json::Result<Self> {
        match hyperparameters {
            Some(params) => serde_json::from_value(Value::Object(params.clone())),
            None => Ok(Self::default()),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PlannerConfig {
    pub penalty_factor: f64,
    pub policy: RelaxationPolicy,
    pub optimize: bool,
    /// Share of agents routed cooperatively in mixed mode, within `[0, 1]`.
    pub coop_share: f64,
    pub optimizer: OptimizerConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            penalty_factor: 0.2,
            policy: RelaxationPolicy::default(),
            optimize: true,
            coop_share: 1.0,
            optimizer: OptimizerConfig::default(),
        }
    }
}
