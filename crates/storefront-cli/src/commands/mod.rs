pub mod clean;
pub mod completion;
pub mod report;
pub mod run;
