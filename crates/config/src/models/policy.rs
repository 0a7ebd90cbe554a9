use overlord_core::{ClusterPolicy, WorkerVersion};
use serde::{Deserialize, Serialize};

use crate::validation::{ConfigValidator, ValidationUtils};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClusterPolicyConfig {
    /// 集群最低Worker版本，低于该版本的Worker不会被分配任务；不配置时不限制版本
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_worker_version: Option<String>,
}

impl ClusterPolicyConfig {
    /// 转换为选择策略使用的显式参数
    pub fn to_policy(&self) -> crate::ConfigResult<ClusterPolicy> {
        let Some(raw) = &self.min_worker_version else {
            return Ok(ClusterPolicy::unrestricted());
        };
        let min_worker_version = WorkerVersion::parse(raw).map_err(|e| {
            crate::ConfigError::Validation(format!("policy.min_worker_version: {e}"))
        })?;
        Ok(ClusterPolicy::new(min_worker_version))
    }
}

impl ConfigValidator for ClusterPolicyConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        if let Some(raw) = &self.min_worker_version {
            ValidationUtils::validate_not_empty(raw, "policy.min_worker_version")?;
        }
        self.to_policy()?;
        Ok(())
    }
}
