use serde::{Deserialize, Serialize};

use crate::models::{WorkerVersion, WorkerView};

/// 集群级调度策略参数，每次选择时显式传入
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterPolicy {
    /// 低于该版本的Worker不参与调度，用于滚动升级；为None时不限制版本
    pub min_worker_version: Option<WorkerVersion>,
}

impl ClusterPolicy {
    pub fn new(min_worker_version: WorkerVersion) -> Self {
        Self {
            min_worker_version: Some(min_worker_version),
        }
    }

    /// 不设最低版本，任何能解析的版本号都满足要求
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Worker版本是否满足集群要求，版本号无法解析的Worker一律不满足
    pub fn admits(&self, worker: &WorkerView) -> bool {
        match &self.min_worker_version {
            Some(min_version) => worker.is_valid_version(min_version),
            None => worker.parsed_version().is_ok(),
        }
    }
}
