use crate::validation::{ConfigValidator, ValidationUtils};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SchedulerLoopConfig {
    pub enabled: bool,
    /// 两轮调度之间的间隔
    pub round_interval_ms: u64,
    /// 每轮最多尝试分派的任务数
    pub max_tasks_per_round: usize,
}

impl Default for SchedulerLoopConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            round_interval_ms: 1000,
            max_tasks_per_round: 100,
        }
    }
}

impl ConfigValidator for SchedulerLoopConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        ValidationUtils::validate_interval_ms(
            self.round_interval_ms,
            "scheduler.round_interval_ms",
        )?;
        ValidationUtils::validate_count(
            self.max_tasks_per_round,
            "scheduler.max_tasks_per_round",
            10000,
        )?;
        Ok(())
    }
}
