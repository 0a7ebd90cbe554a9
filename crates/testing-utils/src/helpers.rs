//! Test helper utilities and common testing patterns
//!
//! Seeded random pool generation for property-style checks, plus small
//! shortcuts for building policies.

use overlord_core::{ClusterPolicy, WorkerPool, WorkerVersion, WorkerView};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::builders::WorkerViewBuilder;

const VERSIONS: [&str; 6] = ["0.9", "1.0", "1.0.1", "1.1", "1.10", "2.0-rc1"];

/// 生成随机Worker池，同一个种子总是得到相同的池
pub struct RandomPool {
    rng: StdRng,
}

impl RandomPool {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// 随机生成一个Worker，约十分之一处于禁用状态
    pub fn worker(&mut self, id: &str) -> WorkerView {
        let capacity = self.rng.random_range(0..6);
        let load = if capacity == 0 {
            0
        } else {
            self.rng.random_range(0..=capacity)
        };
        let version = VERSIONS[self.rng.random_range(0..VERSIONS.len())];

        let builder = WorkerViewBuilder::new(id)
            .with_load(load, capacity)
            .with_version(version);
        if self.rng.random_range(0..10) == 0 {
            builder.disabled().build()
        } else {
            builder.build()
        }
    }

    pub fn workers(&mut self, count: usize) -> Vec<WorkerView> {
        (0..count).map(|i| self.worker(&format!("w{i:02}"))).collect()
    }

    pub fn pool(&mut self, max_workers: usize) -> WorkerPool {
        let count = self.rng.random_range(0..=max_workers);
        // ids are unique by construction
        WorkerPool::from_workers(self.workers(count)).unwrap()
    }

    /// 随机的最低版本，偶尔不设限制
    pub fn min_version(&mut self) -> ClusterPolicy {
        let index = self.rng.random_range(0..=VERSIONS.len());
        match VERSIONS.get(index) {
            Some(version) => policy(version),
            None => ClusterPolicy::unrestricted(),
        }
    }
}

/// 以给定最低版本构造集群策略
pub fn policy(min_worker_version: &str) -> ClusterPolicy {
    ClusterPolicy::new(WorkerVersion::parse(min_worker_version).unwrap())
}
