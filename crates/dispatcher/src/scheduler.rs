use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use tokio::sync::broadcast;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use overlord_core::{
    ClusterPolicy, SchedulerResult, Task, TaskAssigner, WorkerPoolSource, WorkerSelectStrategy,
};

/// 等待调度的任务队列，先进先出
#[derive(Debug, Clone, Default)]
pub struct PendingTasks {
    tasks: VecDeque<Task>,
}

impl PendingTasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: Task) {
        self.tasks.push_back(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }
}

impl FromIterator<Task> for PendingTasks {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self {
            tasks: iter.into_iter().collect(),
        }
    }
}

/// 一轮调度的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundSummary {
    /// (任务ID, WorkerID)
    pub assigned: Vec<(String, String)>,
    /// 暂无可用Worker，留在队列中
    pub deferred: Vec<String>,
    /// 分派被拒绝，留在队列中等待下一轮重新选择
    pub rejected_by_worker: Vec<String>,
    /// 任务本身不合法，已从队列移除
    pub rejected: Vec<(String, String)>,
}

/// 调度循环从启动到关闭的累计结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopSummary {
    /// 成功执行的轮数
    pub rounds: usize,
    pub assigned: Vec<(String, String)>,
    pub rejected: Vec<(String, String)>,
}

impl LoopSummary {
    fn absorb(&mut self, round: RoundSummary) {
        self.rounds += 1;
        self.assigned.extend(round.assigned);
        self.rejected.extend(round.rejected);
    }
}

/// 调度循环：每个待调度任务获取一次最新快照，调用选择策略，然后分派
pub struct TaskScheduler {
    strategy: Arc<dyn WorkerSelectStrategy>,
    policy: ClusterPolicy,
    pool_source: Arc<dyn WorkerPoolSource>,
    assigner: Arc<dyn TaskAssigner>,
    max_tasks_per_round: usize,
}

impl TaskScheduler {
    pub fn new(
        strategy: Arc<dyn WorkerSelectStrategy>,
        policy: ClusterPolicy,
        pool_source: Arc<dyn WorkerPoolSource>,
        assigner: Arc<dyn TaskAssigner>,
    ) -> Self {
        Self {
            strategy,
            policy,
            pool_source,
            assigner,
            max_tasks_per_round: usize::MAX,
        }
    }

    pub fn with_max_tasks_per_round(mut self, max_tasks_per_round: usize) -> Self {
        self.max_tasks_per_round = max_tasks_per_round;
        self
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// 执行一轮调度
    ///
    /// 快照获取失败会中止本轮并返回错误，已处理的任务不受影响，未处理的任务保持原顺序。
    pub async fn run_round(&self, pending: &mut PendingTasks) -> SchedulerResult<RoundSummary> {
        let start = Instant::now();
        let strategy_name = self.strategy.name().to_string();
        let mut summary = RoundSummary::default();
        let mut remaining = VecDeque::with_capacity(pending.len());
        let mut attempts = 0;

        while let Some(task) = pending.tasks.pop_front() {
            if attempts >= self.max_tasks_per_round {
                remaining.push_back(task);
                continue;
            }
            attempts += 1;

            let pool = match self.pool_source.snapshot().await {
                Ok(pool) => pool,
                Err(e) => {
                    remaining.push_back(task);
                    remaining.extend(pending.tasks.drain(..));
                    pending.tasks = remaining;
                    return Err(e);
                }
            };

            match self.strategy.select(&self.policy, &pool, &task) {
                Ok(Some(worker)) => match self.assigner.assign(&worker.id, &task).await {
                    Ok(()) => {
                        counter!(
                            "overlord_selection_total",
                            "strategy" => strategy_name.clone(),
                            "outcome" => "assigned"
                        )
                        .increment(1);
                        summary.assigned.push((task.id.clone(), worker.id.clone()));
                    }
                    Err(e) if e.is_retryable() => {
                        warn!(
                            "任务 {} 分派到Worker {} 失败，等待下一轮: {}",
                            task.id, worker.id, e
                        );
                        counter!("overlord_assign_rejected_total").increment(1);
                        summary.rejected_by_worker.push(task.id.clone());
                        remaining.push_back(task);
                    }
                    Err(e) => {
                        error!("任务 {} 分派出现不可恢复的错误: {}", task.id, e);
                        remaining.push_back(task);
                        remaining.extend(pending.tasks.drain(..));
                        pending.tasks = remaining;
                        return Err(e);
                    }
                },
                Ok(None) => {
                    debug!("任务 {} 暂无可用Worker，保留在队列中", task.id);
                    counter!(
                        "overlord_selection_total",
                        "strategy" => strategy_name.clone(),
                        "outcome" => "no_worker"
                    )
                    .increment(1);
                    summary.deferred.push(task.id.clone());
                    remaining.push_back(task);
                }
                Err(e) => {
                    error!("任务 {} 不合法，已从队列移除: {}", task.id, e);
                    counter!(
                        "overlord_selection_total",
                        "strategy" => strategy_name.clone(),
                        "outcome" => "invalid"
                    )
                    .increment(1);
                    summary.rejected.push((task.id.clone(), e.to_string()));
                }
            }
        }

        pending.tasks = remaining;
        histogram!("overlord_round_duration_ms").record(start.elapsed().as_secs_f64() * 1000.0);

        if !summary.assigned.is_empty() || !summary.rejected.is_empty() {
            info!(
                "本轮调度完成: 分派 {} 个，等待 {} 个，被拒绝 {} 个，非法 {} 个",
                summary.assigned.len(),
                summary.deferred.len(),
                summary.rejected_by_worker.len(),
                summary.rejected.len()
            );
        }

        Ok(summary)
    }

    /// 按固定间隔执行调度，直到收到关闭信号
    pub async fn run(
        &self,
        pending: &mut PendingTasks,
        round_interval: Duration,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> LoopSummary {
        let mut total = LoopSummary::default();
        let mut round_interval = interval(round_interval);
        info!("调度循环启动，策略: {}", self.strategy.name());

        loop {
            tokio::select! {
                _ = round_interval.tick() => {
                    if pending.is_empty() {
                        continue;
                    }
                    match self.run_round(pending).await {
                        Ok(summary) => total.absorb(summary),
                        Err(e) => error!("调度轮次失败: {}", e),
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("调度循环收到关闭信号，剩余 {} 个任务未分派", pending.len());
                    break;
                }
            }
        }

        total
    }
}
