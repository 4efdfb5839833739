//! Shared utilities for Metrosync server and client.

pub mod logger;
pub mod time;
