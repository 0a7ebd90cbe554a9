//! Dispatcher
//!
//! Worker选择策略及调用它们的调度循环。
//! 选择策略是纯函数；快照获取、分派和记账都通过 `overlord_core::traits`
//! 中的协作方接口完成。

pub mod cluster;
pub mod factory;
pub mod scheduler;
pub mod strategies;


pub use cluster::*;
pub use factory::*;
pub use scheduler::*;
pub use strategies::*;
