pub mod cluster;
pub mod scheduler;

pub use cluster::*;
pub use scheduler::*;
