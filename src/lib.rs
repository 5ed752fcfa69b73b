//! nepse-analyzer: technical analysis, screening and portfolio valuation
//! for NEPSE equities.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], the command-line front-end in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
