use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use overlord_config::AppConfig;
use overlord_core::{Task, WorkerView};
use overlord_dispatcher::{InMemoryCluster, PendingTasks, StrategyFactory, TaskScheduler};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// 一次运行的最终结果，以JSON输出到标准输出
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RunReport {
    pub strategy: String,
    pub rounds: usize,
    /// 按分派顺序排列
    pub assignments: Vec<AssignmentRecord>,
    /// 运行结束时仍未分派的任务ID
    pub pending: Vec<String>,
    /// 不合法、已丢弃的任务及原因
    pub rejected: Vec<RejectedTask>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AssignmentRecord {
    pub task_id: String,
    pub worker_id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RejectedTask {
    pub task_id: String,
    pub reason: String,
}

/// 主应用程序
///
/// 把Worker快照载入内存集群，按配置的策略对待调度任务执行若干轮选择和分派。
pub struct Application {
    config: AppConfig,
    cluster: Arc<InMemoryCluster>,
    scheduler: TaskScheduler,
    pending: PendingTasks,
}

impl Application {
    pub fn new(config: AppConfig, workers: Vec<WorkerView>, tasks: Vec<Task>) -> Result<Self> {
        let policy = config.policy.to_policy().context("解析集群策略失败")?;
        let strategy = StrategyFactory::create(&config.strategy).context("创建选择策略失败")?;
        let cluster = Arc::new(InMemoryCluster::with_workers(workers).context("加载Worker快照失败")?);

        let scheduler = TaskScheduler::new(strategy, policy, cluster.clone(), cluster.clone())
            .with_max_tasks_per_round(config.scheduler.max_tasks_per_round);

        info!(
            "初始化应用程序，策略: {}，最低Worker版本: {}，待调度任务 {} 个",
            scheduler.strategy_name(),
            config.policy.min_worker_version.as_deref().unwrap_or("不限"),
            tasks.len()
        );

        Ok(Self {
            config,
            cluster,
            scheduler,
            pending: tasks.into_iter().collect(),
        })
    }

    /// 执行固定轮数，队列清空时提前结束
    pub async fn run_rounds(mut self, rounds: usize) -> Result<RunReport> {
        let mut executed = 0;
        let mut rejected = Vec::new();

        while executed < rounds && !self.pending.is_empty() {
            let summary = self
                .scheduler
                .run_round(&mut self.pending)
                .await
                .with_context(|| format!("第 {} 轮调度失败", executed + 1))?;
            executed += 1;

            rejected.extend(
                summary
                    .rejected
                    .into_iter()
                    .map(|(task_id, reason)| RejectedTask { task_id, reason }),
            );
            if summary.assigned.is_empty() && summary.rejected_by_worker.is_empty() {
                warn!("第 {} 轮没有任务被分派，剩余 {} 个任务", executed, self.pending.len());
            }
        }

        Ok(self.report(executed, rejected).await)
    }

    /// 按配置的间隔持续调度，直到收到关闭信号
    pub async fn run(mut self, shutdown_rx: broadcast::Receiver<()>) -> Result<RunReport> {
        if !self.config.scheduler.enabled {
            return Err(anyhow::anyhow!("调度循环被禁用，请检查配置"));
        }

        let round_interval = Duration::from_millis(self.config.scheduler.round_interval_ms);
        let summary = self
            .scheduler
            .run(&mut self.pending, round_interval, shutdown_rx)
            .await;

        let rejected = summary
            .rejected
            .into_iter()
            .map(|(task_id, reason)| RejectedTask { task_id, reason })
            .collect();
        Ok(self.report(summary.rounds, rejected).await)
    }

    async fn report(&self, rounds: usize, rejected: Vec<RejectedTask>) -> RunReport {
        let assignments = self
            .cluster
            .assignments()
            .await
            .into_iter()
            .map(|assignment| AssignmentRecord {
                task_id: assignment.task_id,
                worker_id: assignment.worker_id,
            })
            .collect();

        RunReport {
            strategy: self.scheduler.strategy_name().to_string(),
            rounds,
            assignments,
            pending: self.pending.iter().map(|task| task.id.clone()).collect(),
            rejected,
        }
    }
}
