use crate::{
    models::{ClusterPolicy, Task, WorkerPool, WorkerView},
    SchedulerResult,
};

/// Worker选择策略接口
///
/// 实现必须无状态：同样的快照、任务和策略参数总是得到同样的结果，
/// 且不修改任何输入，因此同一个实例可以被多个调度循环并发共享。
pub trait WorkerSelectStrategy: Send + Sync {
    /// 为任务选择Worker
    ///
    /// - `Ok(Some(worker))`：选中的Worker，一定来自 `pool`
    /// - `Ok(None)`：当前没有符合条件的Worker，任务应留在队列中等待下一轮
    /// - `Err(InvalidInput)`：任务本身不合法，属于调用方缺陷
    fn select<'a>(
        &self,
        policy: &ClusterPolicy,
        pool: &'a WorkerPool,
        task: &Task,
    ) -> SchedulerResult<Option<&'a WorkerView>>;

    /// 获取策略名称
    fn name(&self) -> &str;
}
