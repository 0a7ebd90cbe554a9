pub mod models;
pub mod traits;

pub use models::{
    ClusterPolicy, Task, TaskResource, WorkerPool, WorkerVersion, WorkerView,
};
pub use traits::{TaskAssigner, WorkerPoolSource, WorkerSelectStrategy};

pub use overlord_errors::{SchedulerError, SchedulerResult};
