use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::validation::{ConfigValidator, ValidationUtils};

/// 数据源到专属Worker主机的亲和配置
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AffinityConfig {
    /// 数据源 -> 主机列表
    #[serde(default)]
    pub affinity: BTreeMap<String, Vec<String>>,
    /// 强亲和：专属主机都不可用时不回退到其他Worker
    #[serde(default)]
    pub strong: bool,
}

impl AffinityConfig {
    /// 所有被数据源预留的主机
    pub fn reserved_hosts(&self) -> BTreeSet<&str> {
        self.affinity
            .values()
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// 数据源对应的主机，没有配置亲和时返回None
    pub fn hosts_for(&self, data_source: &str) -> Option<BTreeSet<&str>> {
        self.affinity
            .get(data_source)
            .map(|hosts| hosts.iter().map(String::as_str).collect())
    }
}

impl ConfigValidator for AffinityConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        for (data_source, hosts) in &self.affinity {
            ValidationUtils::validate_not_empty(data_source, "affinity_config.affinity key")?;
            if hosts.is_empty() {
                return Err(crate::ConfigError::Validation(format!(
                    "affinity_config.affinity.{data_source} cannot be empty"
                )));
            }
            for host in hosts {
                ValidationUtils::validate_not_empty(
                    host,
                    &format!("affinity_config.affinity.{data_source}"),
                )?;
            }
        }
        Ok(())
    }
}

/// Worker选择策略配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SelectStrategyConfig {
    /// 均衡分布：优先负载最低的Worker
    #[default]
    EqualDistribution,
    /// 填满优先：优先负载最高但仍有空位的Worker
    FillCapacity,
    EqualDistributionWithAffinity { affinity_config: AffinityConfig },
    FillCapacityWithAffinity { affinity_config: AffinityConfig },
}

impl SelectStrategyConfig {
    pub fn type_name(&self) -> &'static str {
        match self {
            SelectStrategyConfig::EqualDistribution => "equalDistribution",
            SelectStrategyConfig::FillCapacity => "fillCapacity",
            SelectStrategyConfig::EqualDistributionWithAffinity { .. } => {
                "equalDistributionWithAffinity"
            }
            SelectStrategyConfig::FillCapacityWithAffinity { .. } => "fillCapacityWithAffinity",
        }
    }
}

impl ConfigValidator for SelectStrategyConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        match self {
            SelectStrategyConfig::EqualDistribution | SelectStrategyConfig::FillCapacity => Ok(()),
            SelectStrategyConfig::EqualDistributionWithAffinity { affinity_config }
            | SelectStrategyConfig::FillCapacityWithAffinity { affinity_config } => {
                affinity_config.validate()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn affinity(entries: Vec<(&str, Vec<&str>)>) -> AffinityConfig {
        AffinityConfig {
            affinity: entries
                .into_iter()
                .map(|(ds, hosts)| {
                    (
                        ds.to_string(),
                        hosts.into_iter().map(|h| h.to_string()).collect(),
                    )
                })
                .collect(),
            strong: false,
        }
    }

    #[test]
    fn test_strategy_config_serialization() {
        let config: SelectStrategyConfig =
            serde_json::from_str(r#"{"type": "fillCapacity"}"#).unwrap();
        assert_eq!(config, SelectStrategyConfig::FillCapacity);

        let config: SelectStrategyConfig = serde_json::from_str(
            r#"{
                "type": "equalDistributionWithAffinity",
                "affinity_config": {"affinity": {"wiki": ["host-a", "host-b"]}, "strong": true}
            }"#,
        )
        .unwrap();
        match &config {
            SelectStrategyConfig::EqualDistributionWithAffinity { affinity_config } => {
                assert!(affinity_config.strong);
                assert_eq!(affinity_config.affinity["wiki"], vec!["host-a", "host-b"]);
            }
            other => panic!("unexpected strategy: {other:?}"),
        }
        assert_eq!(config.type_name(), "equalDistributionWithAffinity");

        assert!(serde_json::from_str::<SelectStrategyConfig>(r#"{"type": "random"}"#).is_err());
    }

    #[test]
    fn test_default_strategy() {
        assert_eq!(
            SelectStrategyConfig::default(),
            SelectStrategyConfig::EqualDistribution
        );
        assert_eq!(SelectStrategyConfig::default().type_name(), "equalDistribution");
    }

    #[test]
    fn test_affinity_validation() {
        assert!(affinity(vec![("wiki", vec!["host-a"])]).validate().is_ok());
        assert!(affinity(vec![("wiki", vec!["host-a"]), ("news", vec!["host-a"])])
            .validate()
            .is_ok());
        assert!(affinity(vec![("", vec!["host-a"])]).validate().is_err());
        assert!(affinity(vec![("wiki", vec![""])]).validate().is_err());
        assert!(affinity(vec![("wiki", vec![])]).validate().is_err());

        let strategy = SelectStrategyConfig::FillCapacityWithAffinity {
            affinity_config: affinity(vec![("wiki", vec![" "])]),
        };
        assert!(strategy.validate().is_err());
    }

    #[test]
    fn test_reserved_hosts() {
        let config = affinity(vec![("wiki", vec!["host-a", "host-b"]), ("news", vec!["host-b"])]);
        let reserved = config.reserved_hosts();
        assert_eq!(reserved.len(), 2);
        assert!(reserved.contains("host-a"));
        assert_eq!(config.hosts_for("news").unwrap().len(), 1);
        assert!(config.hosts_for("metrics").is_none());
    }
}
