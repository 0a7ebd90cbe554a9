//! 外部协作方接口
//!
//! Worker选择只是调度链路中的一环，这里定义它与相邻子系统的边界：
//! - `WorkerPoolSource` - 注册/心跳子系统，提供最新的Worker池快照
//! - `TaskAssigner` - 分派子系统，负责把任务真正发给Worker并更新负载
//!
//! 两者都是异步接口，实现可以是远程注册中心，也可以是内存实现（测试和命令行工具使用）。

use async_trait::async_trait;

use crate::{
    models::{Task, WorkerPool},
    SchedulerResult,
};

/// Worker池快照来源
#[async_trait]
pub trait WorkerPoolSource: Send + Sync {
    /// 获取当前的Worker池快照，每次调用都应返回独立的新快照
    async fn snapshot(&self) -> SchedulerResult<WorkerPool>;
}

/// 任务分派接口
#[async_trait]
pub trait TaskAssigner: Send + Sync {
    /// 把任务分派给指定Worker
    ///
    /// 快照可能已经过期，Worker满载或已下线时返回
    /// `AssignmentRejected` / `WorkerNotFound`，由调用方在下一轮重新选择。
    async fn assign(&self, worker_id: &str, task: &Task) -> SchedulerResult<()>;
}
