pub mod classify;
pub mod engine;
pub mod expander;
pub mod pipeline;
pub mod resolver;

pub use crate::domain::model::{MergeReport, MergeResult, SourceUnit, UnitRole};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
