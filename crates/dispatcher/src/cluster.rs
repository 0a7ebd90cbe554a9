use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use overlord_core::{
    SchedulerError, SchedulerResult, Task, TaskAssigner, WorkerPool, WorkerPoolSource, WorkerView,
};

/// 一次成功的分派记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub task_id: String,
    pub worker_id: String,
    pub assigned_at: DateTime<Utc>,
}

/// 内存中的Worker注册表
///
/// 同时充当快照来源和分派方：分派成功后在注册表中记账，下一次快照即可看到新的负载。
/// 供命令行工具和集成测试使用。
#[derive(Debug, Default)]
pub struct InMemoryCluster {
    workers: RwLock<BTreeMap<String, WorkerView>>,
    assignments: RwLock<Vec<Assignment>>,
}

impl InMemoryCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workers(workers: Vec<WorkerView>) -> SchedulerResult<Self> {
        let pool = WorkerPool::from_workers(workers)?;
        let workers = pool
            .iter()
            .map(|worker| (worker.id.clone(), worker.clone()))
            .collect();
        Ok(Self {
            workers: RwLock::new(workers),
            assignments: RwLock::new(Vec::new()),
        })
    }

    /// 注册或刷新Worker
    pub async fn register(&self, worker: WorkerView) {
        info!("注册Worker: {} (版本: {})", worker.id, worker.version);
        self.workers.write().await.insert(worker.id.clone(), worker);
    }

    pub async fn deregister(&self, worker_id: &str) -> SchedulerResult<()> {
        match self.workers.write().await.remove(worker_id) {
            Some(_) => {
                info!("注销Worker: {}", worker_id);
                Ok(())
            }
            None => Err(SchedulerError::worker_not_found(worker_id)),
        }
    }

    pub async fn set_enabled(&self, worker_id: &str, enabled: bool) -> SchedulerResult<()> {
        let mut workers = self.workers.write().await;
        let worker = workers
            .get_mut(worker_id)
            .ok_or_else(|| SchedulerError::worker_not_found(worker_id))?;
        worker.enabled = enabled;
        Ok(())
    }

    pub async fn worker(&self, worker_id: &str) -> Option<WorkerView> {
        self.workers.read().await.get(worker_id).cloned()
    }

    pub async fn assignments(&self) -> Vec<Assignment> {
        self.assignments.read().await.clone()
    }
}

#[async_trait]
impl WorkerPoolSource for InMemoryCluster {
    async fn snapshot(&self) -> SchedulerResult<WorkerPool> {
        let workers = self.workers.read().await;
        WorkerPool::from_workers(workers.values().cloned())
    }
}

#[async_trait]
impl TaskAssigner for InMemoryCluster {
    async fn assign(&self, worker_id: &str, task: &Task) -> SchedulerResult<()> {
        let mut workers = self.workers.write().await;
        let worker = workers
            .get_mut(worker_id)
            .ok_or_else(|| SchedulerError::worker_not_found(worker_id))?;

        if !worker.can_run_task(task) {
            return Err(SchedulerError::assignment_rejected(
                worker_id,
                format!(
                    "无法接收任务 {} (负载: {}/{}, 启用: {})",
                    task.id, worker.current_load, worker.capacity, worker.enabled
                ),
            ));
        }

        worker.current_load += task.required_capacity();
        worker
            .running_availability_groups
            .insert(task.availability_group().to_string());
        debug!(
            "任务 {} 已分派到Worker {}，当前负载 {}/{}",
            task.id, worker_id, worker.current_load, worker.capacity
        );

        self.assignments.write().await.push(Assignment {
            task_id: task.id.clone(),
            worker_id: worker_id.to_string(),
            assigned_at: Utc::now(),
        });
        Ok(())
    }
}
