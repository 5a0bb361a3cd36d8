//! Command handlers, one module per command group

pub mod capture;
pub mod config;
pub mod export;
pub mod folder;
pub mod import;
pub mod link;
pub mod mirror;
pub mod status;
