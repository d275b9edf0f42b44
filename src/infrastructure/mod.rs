pub mod client;
pub mod config;
pub mod download;
pub mod persistence;
pub mod session_cache;
