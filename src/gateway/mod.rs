//! Gateway implementations

mod builder;
mod ops;
mod orchestrator;

pub use builder::{Muninn, MuninnBuilder};
pub use orchestrator::Gateway;
