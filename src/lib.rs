//! Serves the Rotten Tomatoes top box office ranking from memory.
//!
//! A scheduled job scrapes and ranks the table into a [`storage::SnapshotCache`];
//! the HTTP handlers only ever read that cache, so they answer immediately with
//! the last good ranking even while the upstream is slow or failing.

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod refresh;
pub mod scheduler;
pub mod server;
pub mod storage;
