pub mod daily;
pub mod journey;
pub mod report;
pub mod step_chart;
pub mod summary;
pub mod timeline;
