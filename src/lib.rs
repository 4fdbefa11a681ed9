//! Core library for the amm-arbitrager project.
//!
//! The quote engine (`dex::calc`) is pure and synchronous; pool-state
//! fetching and swap settlement are collaborator traits driven by the
//! `arbitrage` workflows.

pub mod arbitrage;
pub mod config;
pub mod dex;
pub mod errors;
pub mod executor;
pub mod models;
pub mod utils;
pub mod venue;
