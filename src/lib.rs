pub mod cli;
pub mod config;
pub mod error;
pub mod importer;
pub mod task;
pub mod tracker;
