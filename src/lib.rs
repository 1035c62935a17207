pub mod config;
pub mod detection;
pub mod execution;
pub mod models;
pub mod polymarket;
pub mod services;
