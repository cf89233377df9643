pub mod config;
pub mod error;
pub mod utils;

pub use config::{ChartConfig, DatasetPaths, GlobalConfig};
pub use error::{CompareError, CompareErrorKind, Result};
pub use utils::{format_count, trim_line_ending};
