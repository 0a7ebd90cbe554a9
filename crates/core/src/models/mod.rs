//! # 数据模型
//!
//! 定义Worker选择所需的核心数据结构：任务、Worker快照、Worker池和集群策略。
//!
//! ## 核心模型
//!
//! ### Task - 待调度任务
//! 任务类型、可选的数据源，以及资源需求（可用组 + 槽位数）。
//!
//! ### WorkerView - Worker快照
//! 注册/心跳子系统在每次刷新时构建的只读快照，提供两个谓词：
//! - `can_run_task`：启用、未满载、剩余槽位足够、支持任务类型且可用组不冲突
//! - `is_valid_version`：版本不低于集群最低版本
//!
//! ### WorkerPool - Worker池
//! 一次决策可见的全部Worker，按ID唯一，调用之间不缓存。
//!
//! ### WorkerVersion - 版本号
//! 全序的版本号，比较规则见 [`WorkerVersion`]。
//!
//! ## 设计原则
//!
//! - 快照是值对象，刷新时重新构建而不是原地修改
//! - 最低版本通过 [`ClusterPolicy`] 显式传入，不读取进程级全局配置
//! - 单个Worker数据异常只会让该Worker失去资格，不影响其他Worker
//!
//! ## 使用示例
//!
//! ```rust
//! use overlord_core::models::*;
//!
//! let task = Task::new("index_wiki_2024", "index").with_resource("wiki", 1);
//! let min = WorkerVersion::parse("1.0").unwrap();
//! assert!(WorkerVersion::parse("1.2").unwrap() >= min);
//! assert_eq!(task.required_capacity(), 1);
//! ```

pub mod policy;
pub mod pool;
pub mod task;
pub mod version;
pub mod worker;

pub use policy::*;
pub use pool::*;
pub use task::*;
pub use version::*;
pub use worker::*;
