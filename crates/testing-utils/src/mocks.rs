//! Mock implementations of the cluster-facing traits
//!
//! In-memory doubles for `WorkerPoolSource` and `TaskAssigner` that can be
//! used for unit testing the scheduling loop without a real cluster.

use async_trait::async_trait;
use overlord_core::{Task, TaskAssigner, WorkerPool, WorkerPoolSource, WorkerView};
use overlord_errors::{SchedulerError, SchedulerResult};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Mock implementation of WorkerPoolSource for testing
///
/// Always returns the same snapshot unless switched into failure mode.
#[derive(Debug, Clone)]
pub struct MockWorkerPoolSource {
    workers: Arc<Mutex<Vec<WorkerView>>>,
    fail: Arc<Mutex<bool>>,
    calls: Arc<Mutex<usize>>,
}

impl MockWorkerPoolSource {
    pub fn new(workers: Vec<WorkerView>) -> Self {
        Self {
            workers: Arc::new(Mutex::new(workers)),
            fail: Arc::new(Mutex::new(false)),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn failing() -> Self {
        let source = Self::new(Vec::new());
        source.set_failing(true);
        source
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn set_workers(&self, workers: Vec<WorkerView>) {
        *self.workers.lock().unwrap() = workers;
    }

    pub fn snapshot_calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl WorkerPoolSource for MockWorkerPoolSource {
    async fn snapshot(&self) -> SchedulerResult<WorkerPool> {
        *self.calls.lock().unwrap() += 1;
        if *self.fail.lock().unwrap() {
            return Err(SchedulerError::Internal("模拟快照获取失败".to_string()));
        }
        let workers = self.workers.lock().unwrap().clone();
        WorkerPool::from_workers(workers)
    }
}

/// Mock implementation of TaskAssigner for testing
///
/// Records every accepted assignment. Workers listed via `reject_worker`
/// answer with a retryable rejection, and `fail_fatally` makes every call
/// return a non-retryable error.
#[derive(Debug, Clone, Default)]
pub struct MockTaskAssigner {
    assignments: Arc<Mutex<Vec<(String, String)>>>,
    rejecting: Arc<Mutex<HashSet<String>>>,
    fatal: Arc<Mutex<bool>>,
}

impl MockTaskAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_worker(&self, worker_id: &str) {
        self.rejecting.lock().unwrap().insert(worker_id.to_string());
    }

    pub fn fail_fatally(&self) {
        *self.fatal.lock().unwrap() = true;
    }

    /// (任务ID, WorkerID)
    pub fn assignments(&self) -> Vec<(String, String)> {
        self.assignments.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskAssigner for MockTaskAssigner {
    async fn assign(&self, worker_id: &str, task: &Task) -> SchedulerResult<()> {
        if *self.fatal.lock().unwrap() {
            return Err(SchedulerError::Internal("模拟分派通道断开".to_string()));
        }
        if self.rejecting.lock().unwrap().contains(worker_id) {
            return Err(SchedulerError::assignment_rejected(worker_id, "模拟拒绝"));
        }
        self.assignments
            .lock()
            .unwrap()
            .push((task.id.clone(), worker_id.to_string()));
        Ok(())
    }
}
