use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::WorkerView;
use crate::{SchedulerError, SchedulerResult};

/// 某次决策时已知的全部Worker快照，按ID唯一
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerPool {
    workers: HashMap<String, WorkerView>,
}

impl WorkerPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// 构建快照，ID重复视为调用方缺陷
    pub fn from_workers<I>(workers: I) -> SchedulerResult<Self>
    where
        I: IntoIterator<Item = WorkerView>,
    {
        let mut map = HashMap::new();
        for worker in workers {
            if map.contains_key(&worker.id) {
                return Err(SchedulerError::invalid_input(format!(
                    "Worker快照中存在重复的ID: {}",
                    worker.id
                )));
            }
            map.insert(worker.id.clone(), worker);
        }
        Ok(Self { workers: map })
    }

    pub fn get(&self, id: &str) -> Option<&WorkerView> {
        self.workers.get(id)
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// 遍历顺序不保证稳定，需要确定顺序的调用方应自行排序
    pub fn iter(&self) -> impl Iterator<Item = &WorkerView> {
        self.workers.values()
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.workers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl Serialize for WorkerPool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut workers: Vec<&WorkerView> = self.workers.values().collect();
        workers.sort_by(|a, b| a.id.cmp(&b.id));
        workers.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WorkerPool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let workers = Vec::<WorkerView>::deserialize(deserializer)?;
        Self::from_workers(workers).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn worker(id: &str) -> WorkerView {
        WorkerView {
            id: id.to_string(),
            host: format!("host-{id}"),
            capacity: 5,
            current_load: 0,
            version: "1.0".to_string(),
            enabled: true,
            supported_task_types: vec!["index".to_string()],
            running_availability_groups: BTreeSet::new(),
            last_heartbeat: Utc::now(),
        }
    }

    #[test]
    fn test_from_workers() {
        let pool = WorkerPool::from_workers(vec![worker("b"), worker("a")]).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.ids(), vec!["a", "b"]);
        assert_eq!(pool.get("a").map(|w| w.host.as_str()), Some("host-a"));
        assert!(pool.get("c").is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = WorkerPool::from_workers(vec![worker("a"), worker("a")]).unwrap_err();
        assert!(err.is_precondition_violation());
    }

    #[test]
    fn test_empty_pool() {
        let pool = WorkerPool::new();
        assert!(pool.is_empty());
        assert_eq!(pool.iter().count(), 0);
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let json = serde_json::to_string(&vec![worker("a"), worker("a")]).unwrap();
        assert!(serde_json::from_str::<WorkerPool>(&json).is_err());

        let json = serde_json::to_string(&vec![worker("a"), worker("b")]).unwrap();
        let pool: WorkerPool = serde_json::from_str(&json).unwrap();
        assert_eq!(pool.len(), 2);
    }
}
