pub mod common;
pub mod config;
pub mod manager;
pub mod schedule;

pub use common::*;
pub use config::*;
pub use manager::*;
pub use schedule::*;
