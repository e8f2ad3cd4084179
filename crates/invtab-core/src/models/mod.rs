//! Data models: analysis block graph, invoice lines, configuration.

pub mod block;
pub mod config;
pub mod invoice;
