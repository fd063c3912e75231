pub mod analytics;
pub mod athlete;
pub mod common;
pub mod goal;
pub mod metric;
pub mod report;
