use serde::{Deserialize, Serialize};

use crate::{SchedulerError, SchedulerResult};

/// 任务的资源需求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResource {
    /// 同一可用组的任务不会被放到同一个Worker上
    pub availability_group: String,
    /// 任务占用的槽位数
    pub required_capacity: u32,
}

/// 待调度的任务
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub task_type: String,
    #[serde(default)]
    pub data_source: Option<String>,
    #[serde(default)]
    pub resource: Option<TaskResource>,
}

impl Task {
    /// 创建任务，可用组默认为任务ID，槽位需求默认为1
    pub fn new(id: impl Into<String>, task_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            task_type: task_type.into(),
            data_source: None,
            resource: None,
        }
    }

    pub fn with_data_source(mut self, data_source: impl Into<String>) -> Self {
        self.data_source = Some(data_source.into());
        self
    }

    pub fn with_resource(mut self, availability_group: impl Into<String>, required_capacity: u32) -> Self {
        self.resource = Some(TaskResource {
            availability_group: availability_group.into(),
            required_capacity,
        });
        self
    }

    pub fn availability_group(&self) -> &str {
        self.resource
            .as_ref()
            .map(|r| r.availability_group.as_str())
            .unwrap_or(self.id.as_str())
    }

    pub fn required_capacity(&self) -> u32 {
        self.resource.as_ref().map_or(1, |r| r.required_capacity)
    }

    /// 校验任务本身是否合法，不合法属于调用方缺陷
    pub fn validate(&self) -> SchedulerResult<()> {
        if self.id.trim().is_empty() {
            return Err(SchedulerError::invalid_input("任务ID不能为空"));
        }
        if self.task_type.trim().is_empty() {
            return Err(SchedulerError::invalid_input(format!(
                "任务 {} 的类型不能为空",
                self.id
            )));
        }
        if let Some(resource) = &self.resource {
            if resource.availability_group.trim().is_empty() {
                return Err(SchedulerError::invalid_input(format!(
                    "任务 {} 的可用组不能为空",
                    self.id
                )));
            }
            if resource.required_capacity == 0 {
                return Err(SchedulerError::invalid_input(format!(
                    "任务 {} 的槽位需求必须大于0",
                    self.id
                )));
            }
        }
        Ok(())
    }
}
