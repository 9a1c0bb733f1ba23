//! nse-relay: NSE India index snapshot relay
//!
//! This library provides:
//! - Freshness validation of vendor timestamps (same IST day, bounded age)
//! - An NSE index API client with optional proxy and retry
//! - Response assembly with the relay's status codes and JSON bodies
//! - A CLI for one-shot scans, periodic watching and offline checks
//! - Structured logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod freshness;
pub mod nse;
pub mod relay;
pub mod telemetry;
