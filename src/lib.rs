pub mod access;
pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod platform;
pub mod proxy;
pub mod scope;
pub mod session;
pub mod types;
