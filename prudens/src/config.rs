use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationMode {
    /// Rules see each other's derivations within a round.
    #[default]
    SingleThread,
    /// Rules are joined concurrently against the facts as they stood at the
    /// start of the round; merging stays sequential and in priority order.
    MultiThread,
}

pub const DEFAULT_MAX_ROUNDS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasonerConfig {
    pub max_rounds: usize,
    /// Wall-clock budget for one run, in milliseconds.
    pub time_budget_ms: Option<u64>,
    pub operation_mode: OperationMode,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            time_budget_ms: None,
            operation_mode: OperationMode::SingleThread,
        }
    }
}

impl ReasonerConfig {
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget_ms = Some(budget.as_millis() as u64);
        self
    }

    pub fn with_operation_mode(mut self, mode: OperationMode) -> Self {
        self.operation_mode = mode;
        self
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ReasonerConfig::from_json(r#"{ "operation_mode": "multi_thread" }"#).unwrap();
        assert_eq!(config.operation_mode, OperationMode::MultiThread);
        assert_eq!(config.max_rounds, DEFAULT_MAX_ROUNDS);
        assert_eq!(config.time_budget(), None);
    }

    #[test]
    fn test_builder() {
        let config = ReasonerConfig::default()
            .with_max_rounds(5)
            .with_time_budget(Duration::from_secs(2));
        assert_eq!(config.max_rounds, 5);
        assert_eq!(config.time_budget_ms, Some(2000));
    }
}
