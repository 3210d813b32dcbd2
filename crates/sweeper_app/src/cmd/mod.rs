pub mod analyze;
pub mod clean;
pub mod history;
pub mod keywords;
