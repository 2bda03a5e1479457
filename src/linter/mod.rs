pub mod engine;
pub mod problem;

pub use engine::Checker;
pub use problem::{Level, Problem};
