pub mod collections;
pub mod config;
pub mod config_watcher;
pub mod log;
pub mod store;
