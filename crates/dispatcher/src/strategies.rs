use std::cmp::Reverse;

use tracing::{debug, warn};

use overlord_config::AffinityConfig;
use overlord_core::{
    ClusterPolicy, SchedulerResult, Task, WorkerPool, WorkerSelectStrategy, WorkerVersion,
    WorkerView,
};

/// 候选Worker按负载排序的方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrder {
    /// 负载最低的优先，用于均衡分布
    LeastLoadedFirst,
    /// 负载最高的优先，用于填满优先
    MostLoadedFirst,
}

/// 对候选Worker做完整的稳定排序
///
/// 排序键依次为：负载（按 `order` 方向）、版本降序（无法解析的版本排在最后）、ID升序。
/// ID保证任意两个不同的Worker都不会比较相等，排序在普通序列上进行，不会丢失Worker。
pub fn order_candidates<'a, I>(candidates: I, order: LoadOrder) -> Vec<&'a WorkerView>
where
    I: IntoIterator<Item = &'a WorkerView>,
{
    let mut keyed: Vec<(Reverse<Option<WorkerVersion>>, &'a WorkerView)> = candidates
        .into_iter()
        .map(|worker| (Reverse(worker.parsed_version().ok()), worker))
        .collect();

    keyed.sort_by(|(a_version, a), (b_version, b)| {
        let by_load = match order {
            LoadOrder::LeastLoadedFirst => a.current_load.cmp(&b.current_load),
            LoadOrder::MostLoadedFirst => b.current_load.cmp(&a.current_load),
        };
        by_load
            .then_with(|| a_version.cmp(b_version))
            .then_with(|| a.id.cmp(&b.id))
    });

    keyed.into_iter().map(|(_, worker)| worker).collect()
}

/// 按顺序扫描，返回第一个能运行任务且版本合格的Worker
fn first_eligible<'a>(
    strategy: &str,
    ordered: Vec<&'a WorkerView>,
    policy: &ClusterPolicy,
    task: &Task,
) -> Option<&'a WorkerView> {
    for worker in ordered {
        if let Err(e) = worker.validate() {
            warn!("{} 策略跳过异常Worker: {}", strategy, e);
            continue;
        }
        if !worker.can_run_task(task) {
            debug!(
                "Worker {} 无法运行任务 {} (负载: {}/{}, 启用: {})",
                worker.id, task.id, worker.current_load, worker.capacity, worker.enabled
            );
            continue;
        }
        if !policy.admits(worker) {
            if let Some(min_version) = &policy.min_worker_version {
                debug!(
                    "Worker {} 版本 {} 低于最低版本 {}",
                    worker.id, worker.version, min_version
                );
            }
            continue;
        }
        return Some(worker);
    }
    None
}

fn select_ordered<'a, I>(
    strategy: &str,
    order: LoadOrder,
    policy: &ClusterPolicy,
    candidates: I,
    task: &Task,
) -> Option<&'a WorkerView>
where
    I: IntoIterator<Item = &'a WorkerView>,
{
    let ordered = order_candidates(candidates, order);
    let candidate_count = ordered.len();
    let selected = first_eligible(strategy, ordered, policy, task);

    match selected {
        Some(worker) => debug!(
            "{}策略为任务 {} 选择Worker: {} (负载: {}/{}, 版本: {})",
            strategy, task.id, worker.id, worker.current_load, worker.capacity, worker.version
        ),
        None => debug!(
            "{}策略在 {} 个候选Worker中没有找到可运行任务 {} 的Worker",
            strategy, candidate_count, task.id
        ),
    }

    selected
}

/// 均衡分布策略：优先选择负载最低的Worker，负载相同时优先高版本
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualDistributionStrategy;

impl EqualDistributionStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl WorkerSelectStrategy for EqualDistributionStrategy {
    fn select<'a>(
        &self,
        policy: &ClusterPolicy,
        pool: &'a WorkerPool,
        task: &Task,
    ) -> SchedulerResult<Option<&'a WorkerView>> {
        task.validate()?;
        if pool.is_empty() {
            debug!("没有可用的Worker节点");
            return Ok(None);
        }
        Ok(select_ordered(
            self.name(),
            LoadOrder::LeastLoadedFirst,
            policy,
            pool.iter(),
            task,
        ))
    }

    fn name(&self) -> &str {
        "EqualDistribution"
    }
}

/// 填满优先策略：优先选择负载最高但仍有空位的Worker，让空闲Worker可以被回收
#[derive(Debug, Clone, Copy, Default)]
pub struct FillCapacityStrategy;

impl FillCapacityStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl WorkerSelectStrategy for FillCapacityStrategy {
    fn select<'a>(
        &self,
        policy: &ClusterPolicy,
        pool: &'a WorkerPool,
        task: &Task,
    ) -> SchedulerResult<Option<&'a WorkerView>> {
        task.validate()?;
        if pool.is_empty() {
            debug!("没有可用的Worker节点");
            return Ok(None);
        }
        Ok(select_ordered(
            self.name(),
            LoadOrder::MostLoadedFirst,
            policy,
            pool.iter(),
            task,
        ))
    }

    fn name(&self) -> &str {
        "FillCapacity"
    }
}

/// 数据源亲和策略
///
/// - 配置了亲和的数据源：先在专属主机中选择；专属主机都不可用时，
///   弱亲和回退到整个Worker池，强亲和返回None
/// - 未配置亲和的任务：先在非专属主机中选择，都不可用时才使用专属主机
#[derive(Debug, Clone)]
pub struct AffinityStrategy {
    name: &'static str,
    order: LoadOrder,
    affinity_config: AffinityConfig,
}

impl AffinityStrategy {
    pub fn equal_distribution(affinity_config: AffinityConfig) -> Self {
        Self {
            name: "EqualDistributionWithAffinity",
            order: LoadOrder::LeastLoadedFirst,
            affinity_config,
        }
    }

    pub fn fill_capacity(affinity_config: AffinityConfig) -> Self {
        Self {
            name: "FillCapacityWithAffinity",
            order: LoadOrder::MostLoadedFirst,
            affinity_config,
        }
    }
}

impl WorkerSelectStrategy for AffinityStrategy {
    fn select<'a>(
        &self,
        policy: &ClusterPolicy,
        pool: &'a WorkerPool,
        task: &Task,
    ) -> SchedulerResult<Option<&'a WorkerView>> {
        task.validate()?;
        if pool.is_empty() {
            debug!("没有可用的Worker节点");
            return Ok(None);
        }

        let affinity_hosts = task
            .data_source
            .as_deref()
            .and_then(|data_source| self.affinity_config.hosts_for(data_source));

        match affinity_hosts {
            Some(hosts) => {
                let preferred = select_ordered(
                    self.name,
                    self.order,
                    policy,
                    pool.iter().filter(|w| hosts.contains(w.host.as_str())),
                    task,
                );
                if preferred.is_some() || self.affinity_config.strong {
                    return Ok(preferred);
                }
                debug!("任务 {} 的专属主机都不可用，回退到全部Worker", task.id);
                Ok(select_ordered(self.name, self.order, policy, pool.iter(), task))
            }
            None => {
                let reserved = self.affinity_config.reserved_hosts();
                let unreserved = select_ordered(
                    self.name,
                    self.order,
                    policy,
                    pool.iter().filter(|w| !reserved.contains(w.host.as_str())),
                    task,
                );
                if unreserved.is_some() {
                    return Ok(unreserved);
                }
                Ok(select_ordered(
                    self.name,
                    self.order,
                    policy,
                    pool.iter().filter(|w| reserved.contains(w.host.as_str())),
                    task,
                ))
            }
        }
    }

    fn name(&self) -> &str {
        self.name
    }
}
