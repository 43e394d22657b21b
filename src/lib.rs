pub mod amount;
pub mod classifier;
pub mod config;
pub mod indexer;
pub mod models;
pub mod parser;
pub mod registry;
pub mod report;
pub mod rpc;
