pub mod compare;
pub mod core;
pub mod dataset;

pub use compare::{ComparisonRequest, ComparisonResult, Location};
pub use crate::core::GlobalConfig;
pub use crate::core::error::{CompareError, Result};
pub use dataset::{Granularity, Table};
