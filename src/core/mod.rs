pub mod charts;
pub mod cleaning;
pub mod etl;
pub mod insights;
pub mod pipeline;
pub mod stats;
pub mod summary;

pub use crate::domain::model::{AnalysisResult, CourseRecord, Record};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
