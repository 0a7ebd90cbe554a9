use std::sync::Arc;

use tracing::info;

use overlord_config::{ConfigValidator, SelectStrategyConfig};
use overlord_core::{SchedulerResult, WorkerSelectStrategy};

use crate::strategies::{AffinityStrategy, EqualDistributionStrategy, FillCapacityStrategy};

/// 根据配置创建Worker选择策略
pub struct StrategyFactory;

impl StrategyFactory {
    pub fn create(config: &SelectStrategyConfig) -> SchedulerResult<Arc<dyn WorkerSelectStrategy>> {
        config.validate()?;

        let strategy: Arc<dyn WorkerSelectStrategy> = match config {
            SelectStrategyConfig::EqualDistribution => Arc::new(EqualDistributionStrategy::new()),
            SelectStrategyConfig::FillCapacity => Arc::new(FillCapacityStrategy::new()),
            SelectStrategyConfig::EqualDistributionWithAffinity { affinity_config } => Arc::new(
                AffinityStrategy::equal_distribution(affinity_config.clone()),
            ),
            SelectStrategyConfig::FillCapacityWithAffinity { affinity_config } => {
                Arc::new(AffinityStrategy::fill_capacity(affinity_config.clone()))
            }
        };

        info!("使用Worker选择策略: {}", strategy.name());
        Ok(strategy)
    }
}
