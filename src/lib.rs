pub mod backup;
pub mod calc;
pub mod config;
pub mod db;
pub mod insight;
pub mod ipc;
pub mod kv;
pub mod model;
pub mod session;
pub mod store;
