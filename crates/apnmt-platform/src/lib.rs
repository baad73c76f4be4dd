pub mod config;
pub mod db;
pub mod redis_bus;

pub use config::ServiceConfig;
pub use db::connect_database;
pub use redis_bus::RedisBus;
