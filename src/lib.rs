//! Farm Ledger - budget ledger and reallocation engine for small farms
//!
//! This library keeps a monthly budget per category for each calendar year,
//! records expenses against it, moves funds between budget cells and decides
//! what happens to a closed year's surplus.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, months, categories, transactions, vendors)
//! - `storage`: Persistence of the ledger documents
//! - `services`: Engine rules (calculator, registrar, reallocation, rollover)
//! - `audit`: Authorization and activity logging
//! - `context`: Session-owned ledger context
//!
//! # Example
//!
//! ```rust,ignore
//! use farm_ledger::config::{LedgerPaths, Settings};
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod audit;
pub mod cli;
pub mod clock;
pub mod config;
pub mod context;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

#[cfg(test)]
pub mod test_utils;

pub use context::LedgerContext;
pub use error::LedgerError;
