pub mod generator;
pub mod formatters;

pub use generator::{ReportGenerator, ReportRequest};
pub use formatters::{JsonFormatter, ReportFormatter, TextFormatter};
