//! Test data builders for creating test entities
//!
//! This module provides builder patterns for creating test data with
//! sensible defaults and easy customization.

use std::collections::BTreeSet;

use chrono::Utc;
use overlord_core::{Task, WorkerView};

/// Builder for creating test WorkerView snapshots
///
/// Defaults: host `host-{id}`, capacity 5, load 0, version `1.0`, enabled,
/// supports the `index` task type.
pub struct WorkerViewBuilder {
    worker: WorkerView,
}

impl WorkerViewBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            worker: WorkerView {
                id: id.to_string(),
                host: format!("host-{id}"),
                capacity: 5,
                current_load: 0,
                version: "1.0".to_string(),
                enabled: true,
                supported_task_types: vec!["index".to_string()],
                running_availability_groups: BTreeSet::new(),
                last_heartbeat: Utc::now(),
            },
        }
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.worker.host = host.to_string();
        self
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.worker.capacity = capacity;
        self
    }

    pub fn with_load(mut self, current_load: u32, capacity: u32) -> Self {
        self.worker.current_load = current_load;
        self.worker.capacity = capacity;
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.worker.version = version.to_string();
        self
    }

    pub fn with_task_types(mut self, task_types: Vec<&str>) -> Self {
        self.worker.supported_task_types = task_types.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_running_group(mut self, availability_group: &str) -> Self {
        self.worker
            .running_availability_groups
            .insert(availability_group.to_string());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.worker.enabled = false;
        self
    }

    pub fn build(self) -> WorkerView {
        self.worker
    }
}

/// Builder for creating test Task entities
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new() -> Self {
        Self {
            task: Task::new("task-1", "index"),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.task.id = id.to_string();
        self
    }

    pub fn with_task_type(mut self, task_type: &str) -> Self {
        self.task.task_type = task_type.to_string();
        self
    }

    pub fn with_data_source(mut self, data_source: &str) -> Self {
        self.task.data_source = Some(data_source.to_string());
        self
    }

    pub fn with_resource(mut self, availability_group: &str, required_capacity: u32) -> Self {
        self.task = self.task.with_resource(availability_group, required_capacity);
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}

impl Default for TaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}
