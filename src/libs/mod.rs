pub mod config;
pub mod data_storage;
pub mod formatter;
pub mod git;
pub mod messages;
pub mod tracker;
pub mod view;
