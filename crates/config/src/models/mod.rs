pub mod app_config;
pub mod dispatcher;
pub mod logging;
pub mod policy;
pub mod strategy;

pub use app_config::*;
pub use dispatcher::*;
pub use logging::*;
pub use policy::*;
pub use strategy::*;
