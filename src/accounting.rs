//! The cross-sample accounting report: which samples exist, how far each has
//! made it through the pipeline, and what should happen to it next.

pub mod action;
pub mod command;
pub mod registry;
pub mod report;
pub mod sources;
pub mod table;
