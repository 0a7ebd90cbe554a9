use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Task, WorkerVersion};
use crate::{SchedulerError, SchedulerResult};

/// Worker节点在某一时刻的只读快照
///
/// 由注册/心跳子系统在每次刷新时重新构建，选择策略只读不写。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerView {
    pub id: String,
    pub host: String,
    /// 最大并发槽位数
    pub capacity: u32,
    /// 已占用槽位数
    pub current_load: u32,
    /// Worker上报的原始版本号
    pub version: String,
    pub enabled: bool,
    pub supported_task_types: Vec<String>,
    /// 正在运行的任务所属的可用组
    #[serde(default)]
    pub running_availability_groups: BTreeSet<String>,
    pub last_heartbeat: DateTime<Utc>,
}

impl WorkerView {
    /// 剩余可用槽位
    pub fn available_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.current_load)
    }

    /// 获取Worker负载率
    pub fn load_percentage(&self) -> f64 {
        if self.capacity == 0 {
            100.0
        } else {
            (self.current_load as f64 / self.capacity as f64) * 100.0
        }
    }

    pub fn supports(&self, task_type: &str) -> bool {
        self.supported_task_types.iter().any(|t| t == task_type)
    }

    pub fn parsed_version(&self) -> SchedulerResult<WorkerVersion> {
        WorkerVersion::parse(&self.version)
            .map_err(|e| SchedulerError::malformed_worker(&self.id, e.to_string()))
    }

    /// 检查快照自身是否完整，异常的Worker只会被排除，不会中断选择
    pub fn validate(&self) -> SchedulerResult<()> {
        if self.id.trim().is_empty() {
            return Err(SchedulerError::malformed_worker(&self.id, "Worker ID为空"));
        }
        if self.current_load > self.capacity {
            return Err(SchedulerError::malformed_worker(
                &self.id,
                format!("负载 {} 超过容量 {}", self.current_load, self.capacity),
            ));
        }
        self.parsed_version()?;
        Ok(())
    }

    /// 检查Worker是否可以运行该任务
    pub fn can_run_task(&self, task: &Task) -> bool {
        self.enabled
            && self.current_load < self.capacity
            && self.available_capacity() >= task.required_capacity()
            && self.supports(&task.task_type)
            && !self
                .running_availability_groups
                .contains(task.availability_group())
    }

    /// 检查Worker版本是否不低于集群要求的最低版本
    pub fn is_valid_version(&self, min_version: &WorkerVersion) -> bool {
        match WorkerVersion::parse(&self.version) {
            Ok(version) => version >= *min_version,
            Err(_) => false,
        }
    }
}
